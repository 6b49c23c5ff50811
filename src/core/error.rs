//! 统一错误处理系统
//!
//! 规则求值过程中的所有失败都通过 `EvaluationError` 上报：
//! 结构化设计，包含错误类型、错误消息和可选的符号信息，
//! 支持序列化/反序列化，用于跨模块传递。
//!
//! 错误在产生处立即向调用方传播，不做本地恢复或重试；
//! 如何呈现给用户由调用方决定。

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// 求值错误（结构化设计）
///
/// 包含错误类型、错误消息和触发错误的符号或字面量文本
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationError {
    /// 错误类型
    pub kind: EvaluationErrorKind,
    /// 错误消息
    pub message: String,
    /// 触发错误的符号名或字面量文本
    pub symbol: Option<String>,
}

/// 求值错误类型枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvaluationErrorKind {
    /// 未定义符号
    UndefinedSymbol,
    /// 格式错误的字面量
    MalformedLiteral,
    /// 类型不匹配
    TypeMismatch,
    /// 参数数量错误
    ArgumentCount,
    /// 溢出错误
    Overflow,
}

/// 统一的结果类型
pub type EvalResult<T> = Result<T, EvaluationError>;

impl EvaluationError {
    /// 创建新的求值错误
    pub fn new(kind: EvaluationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            symbol: None,
        }
    }

    /// 记录触发错误的符号名或字面量文本
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// 创建未定义符号错误
    pub fn undefined_symbol(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(
            EvaluationErrorKind::UndefinedSymbol,
            format!("未定义的符号: {}", name),
        )
        .with_symbol(name)
    }

    /// 创建字面量格式错误
    pub fn malformed_literal(expected: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(
            EvaluationErrorKind::MalformedLiteral,
            format!("格式错误的{}字面量: {:?}", expected.into(), text),
        )
        .with_symbol(text)
    }

    /// 创建类型不匹配错误
    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Self::new(EvaluationErrorKind::TypeMismatch, message)
    }

    /// 创建参数数量错误
    pub fn argument_count(name: impl Into<String>, expected: usize, actual: usize) -> Self {
        let name = name.into();
        Self::new(
            EvaluationErrorKind::ArgumentCount,
            format!("函数 {} 参数数量错误: 期望 {}, 实际 {}", name, expected, actual),
        )
        .with_symbol(name)
    }

    /// 创建溢出错误
    pub fn overflow(message: impl Into<String>) -> Self {
        Self::new(EvaluationErrorKind::Overflow, message)
    }
}

impl fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undefined_symbol() {
        let err = EvaluationError::undefined_symbol("missing");
        assert_eq!(err.kind, EvaluationErrorKind::UndefinedSymbol);
        assert_eq!(err.symbol.as_deref(), Some("missing"));
        assert!(err.message.contains("missing"));
    }

    #[test]
    fn test_malformed_literal() {
        let err = EvaluationError::malformed_literal("日期时间", "not-a-date");
        assert_eq!(err.kind, EvaluationErrorKind::MalformedLiteral);
        assert_eq!(err.symbol.as_deref(), Some("not-a-date"));
    }

    #[test]
    fn test_argument_count() {
        let err = EvaluationError::argument_count("sum", 1, 3);
        assert_eq!(err.kind, EvaluationErrorKind::ArgumentCount);
        assert!(err.message.contains("期望 1"));
        assert!(err.message.contains("实际 3"));
    }

    #[test]
    fn test_display_format() {
        let err = EvaluationError::type_mismatch("测试消息");
        assert_eq!(format!("{}", err), "TypeMismatch: 测试消息");
    }
}
