//! 运行时值模型
//!
//! 规则求值期间流动的值类型。函数值携带可调用闭包，
//! 对应的 `Debug` 与 `PartialEq` 需要手动实现：
//! `Debug` 跳过闭包本体，`PartialEq` 按函数名比较。

use crate::core::error::{EvalResult, EvaluationError};
use crate::core::types::{DataType, FunctionType};
use chrono::{DateTime, Duration, FixedOffset};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// 函数调用主体
pub type FunctionBody = dyn Fn(&[Value]) -> EvalResult<Value> + Send + Sync;

/// 运行时值枚举
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Datetime(DateTime<FixedOffset>),
    Timedelta(Duration),
    Array(Vec<Value>),
    Mapping(HashMap<String, Value>),
    Function(FunctionValue),
}

impl Value {
    /// 返回值对应的声明类型标签
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Null => DataType::Null,
            Value::Bool(_) => DataType::Bool,
            Value::Int(_) => DataType::Int,
            Value::Float(_) => DataType::Float,
            Value::String(_) => DataType::String,
            Value::Datetime(_) => DataType::Datetime,
            Value::Timedelta(_) => DataType::Timedelta,
            Value::Array(_) => DataType::array(DataType::Undefined),
            Value::Mapping(_) => DataType::mapping(DataType::String, DataType::Undefined),
            Value::Function(function) => {
                DataType::Function(FunctionType::new().with_name(function.name()))
            }
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            // NaN 视为相等，保证比较的自反性
            (Value::Float(a), Value::Float(b)) => (a == b) || (a.is_nan() && b.is_nan()),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Datetime(a), Value::Datetime(b)) => a == b,
            (Value::Timedelta(a), Value::Timedelta(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Mapping(a), Value::Mapping(b)) => a == b,
            // 函数值按名称比较，闭包本体不参与
            (Value::Function(a), Value::Function(b)) => a.name == b.name,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Datetime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Value::Timedelta(d) => write!(f, "{}", d),
            Value::Array(items) => {
                let rendered: Vec<_> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
            Value::Mapping(entries) => {
                let mut keys: Vec<_> = entries.keys().collect();
                keys.sort_unstable();
                let rendered: Vec<_> = keys
                    .into_iter()
                    .map(|k| format!("{:?}: {}", k, entries[k]))
                    .collect();
                write!(f, "{{{}}}", rendered.join(", "))
            }
            Value::Function(function) => write!(f, "<function {}>", function.name()),
        }
    }
}

/// 规则级函数值
///
/// 作为普通字面量存放在符号表中，可被求值器直接调用。
/// 调用前先检查参数数量。
#[derive(Clone)]
pub struct FunctionValue {
    name: String,
    arity: usize,
    body: Arc<FunctionBody>,
}

impl FunctionValue {
    /// 创建新的函数值
    pub fn new<F>(name: impl Into<String>, arity: usize, body: F) -> Self
    where
        F: Fn(&[Value]) -> EvalResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arity,
            body: Arc::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// 调用函数值
    pub fn invoke(&self, args: &[Value]) -> EvalResult<Value> {
        if args.len() != self.arity {
            return Err(EvaluationError::argument_count(
                self.name.as_str(),
                self.arity,
                args.len(),
            ));
        }
        (self.body)(args)
    }
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionValue")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}
