//! 声明类型系统
//!
//! 定义符号的声明类型标签，供类型检查和函数签名使用。
//! 类型标签与取值通道完全独立，查询类型不会触发任何值的计算。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 声明类型枚举
///
/// `Undefined` 是哨兵值：未记录类型的符号解析为它，
/// 类型兼容检查中它与任意类型兼容。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Undefined,
    Null,
    Bool,
    Int,
    Float,
    String,
    Datetime,
    Timedelta,
    Array(Box<DataType>),
    Mapping(Box<DataType>, Box<DataType>),
    Function(FunctionType),
}

/// 函数类型签名
///
/// 三个字段都是可选的：全部为空表示未参数化的函数元类型
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionType {
    pub name: Option<String>,
    pub argument_types: Option<Vec<DataType>>,
    pub return_type: Option<Box<DataType>>,
}

impl FunctionType {
    /// 创建未参数化的函数类型
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置函数名称
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// 设置参数类型列表
    pub fn with_argument_types(mut self, argument_types: Vec<DataType>) -> Self {
        self.argument_types = Some(argument_types);
        self
    }

    /// 设置返回类型
    pub fn with_return_type(mut self, return_type: DataType) -> Self {
        self.return_type = Some(Box::new(return_type));
        self
    }
}

impl DataType {
    /// 创建数组类型
    pub fn array(member: DataType) -> Self {
        DataType::Array(Box::new(member))
    }

    /// 创建映射类型
    pub fn mapping(key: DataType, value: DataType) -> Self {
        DataType::Mapping(Box::new(key), Box::new(value))
    }

    /// 创建函数类型
    pub fn function(signature: FunctionType) -> Self {
        DataType::Function(signature)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Int | DataType::Float)
    }

    /// 类型兼容检查，`Undefined` 与任意类型兼容
    pub fn is_compatible(&self, other: &DataType) -> bool {
        self == &DataType::Undefined || other == &DataType::Undefined || self == other
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Undefined => write!(f, "UNDEFINED"),
            DataType::Null => write!(f, "NULL"),
            DataType::Bool => write!(f, "BOOL"),
            DataType::Int => write!(f, "INT"),
            DataType::Float => write!(f, "FLOAT"),
            DataType::String => write!(f, "STRING"),
            DataType::Datetime => write!(f, "DATETIME"),
            DataType::Timedelta => write!(f, "TIMEDELTA"),
            DataType::Array(member) => write!(f, "ARRAY({})", member),
            DataType::Mapping(key, value) => write!(f, "MAPPING({}, {})", key, value),
            DataType::Function(signature) => {
                write!(f, "FUNCTION")?;
                if let Some(argument_types) = &signature.argument_types {
                    let rendered: Vec<_> =
                        argument_types.iter().map(|t| t.to_string()).collect();
                    write!(f, "({})", rendered.join(", "))?;
                }
                if let Some(return_type) = &signature.return_type {
                    write!(f, " -> {}", return_type)?;
                }
                Ok(())
            }
        }
    }
}
