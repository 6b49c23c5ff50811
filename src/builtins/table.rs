//! 内置符号表
//!
//! 只读、带层级命名空间的符号注册表：统一的查找契约覆盖
//! 字面量、按访问生成的值和嵌套命名空间三种条目，
//! 并提供与取值通道完全独立的声明类型查询。
//!
//! 表在构造后不可变，内部映射放在 `Arc` 后面，
//! 可在多线程间无同步共享读取。

use crate::builtins::generator::ValueGenerator;
use crate::core::error::{EvalResult, EvaluationError};
use crate::core::types::DataType;
use crate::core::Value;
use crate::utils::Timezone;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// 内置作用域的标识名称
pub const SCOPE_NAME: &str = "built-in";

/// 符号表条目
///
/// 条目的分类在插入时显式指定，查找时不做任何形态检查：
/// 一个普通函数值是 `Literal`，只有 `Generated` 才会在查找时被调用。
#[derive(Debug, Clone)]
pub enum Entry {
    /// 静态字面量，可以是函数值
    Literal(Value),
    /// 每次查找时重新计算的值
    Generated(ValueGenerator),
    /// 嵌套命名空间
    Namespace(Arc<HashMap<String, Entry>>),
}

impl Entry {
    /// 创建嵌套命名空间条目
    pub fn namespace(entries: HashMap<String, Entry>) -> Self {
        Entry::Namespace(Arc::new(entries))
    }
}

/// 查找结果
#[derive(Debug, Clone)]
pub enum Resolution {
    /// 普通值：字面量本身或生成器的产物
    Value(Value),
    /// 子命名空间对应的符号表
    ///
    /// 子表不继承父表的声明类型信息，类型查询全部返回
    /// `DataType::Undefined`
    Namespace(SymbolTable),
}

/// 内置符号表
#[derive(Clone)]
pub struct SymbolTable {
    entries: Arc<HashMap<String, Entry>>,
    types: Arc<HashMap<String, DataType>>,
    namespace: Option<String>,
    timezone: Timezone,
}

impl SymbolTable {
    /// 创建新的符号表
    ///
    /// 时区默认为宿主本地时区，类型表为空
    pub fn new(entries: HashMap<String, Entry>) -> Self {
        Self {
            entries: Arc::new(entries),
            types: Arc::new(HashMap::new()),
            namespace: None,
            timezone: Timezone::default(),
        }
    }

    /// 设置时区
    pub fn with_timezone(mut self, timezone: Timezone) -> Self {
        self.timezone = timezone;
        self
    }

    /// 设置声明类型表
    pub fn with_types(mut self, types: HashMap<String, DataType>) -> Self {
        self.types = Arc::new(types);
        self
    }

    /// 设置命名空间路径
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// 查找符号
    ///
    /// 命名空间条目每次查找都构造新的子表，子表与本表共享时区；
    /// 生成器条目以本表为参数计算出值；字面量条目原样返回。
    pub fn lookup(&self, name: &str) -> EvalResult<Resolution> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| EvaluationError::undefined_symbol(name))?;
        match entry {
            Entry::Literal(value) => Ok(Resolution::Value(value.clone())),
            Entry::Generated(generator) => generator.invoke(self).map(Resolution::Value),
            Entry::Namespace(mapping) => {
                let child = SymbolTable {
                    entries: Arc::clone(mapping),
                    types: Arc::new(HashMap::new()),
                    namespace: Some(self.child_namespace(name)),
                    timezone: self.timezone,
                };
                Ok(Resolution::Namespace(child))
            }
        }
    }

    fn child_namespace(&self, name: &str) -> String {
        match &self.namespace {
            Some(parent) => format!("{}.{}", parent, name),
            None => name.to_string(),
        }
    }

    /// 查询符号的声明类型
    ///
    /// 未记录类型的符号返回 `DataType::Undefined`。从不失败，
    /// 与符号是否存在于取值通道无关，也不会触发任何值的计算。
    pub fn resolve_type(&self, name: &str) -> DataType {
        self.types
            .get(name)
            .cloned()
            .unwrap_or(DataType::Undefined)
    }

    /// 检查符号是否存在
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// 获取所有直接符号名称
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(|s| s.as_str()).collect()
    }

    /// 直接符号数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 命名空间路径，仅用于诊断显示，不影响查找语义
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// 本表使用的时区
    pub fn timezone(&self) -> Timezone {
        self.timezone
    }
}

impl fmt::Debug for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = self.names();
        names.sort_unstable();
        f.debug_struct("SymbolTable")
            .field("namespace", &self.namespace)
            .field("names", &names)
            .field("timezone", &self.timezone)
            .finish()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::with_defaults(HashMap::new(), HashMap::new())
    }
}
