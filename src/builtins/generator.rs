//! 按访问计算的值生成器
//!
//! 区分两种可调用值：包装进生成器的函数在查找时被调用来产生值，
//! 未包装的普通函数值在查找时原样返回，留给求值器调用。

use crate::builtins::table::SymbolTable;
use crate::core::error::EvalResult;
use crate::core::Value;
use std::fmt;
use std::sync::Arc;

/// 生成器主体
pub type GeneratorBody = dyn Fn(&SymbolTable) -> EvalResult<Value> + Send + Sync;

/// 值生成器
///
/// 包装一个在每次查找时重新计算的值。生成器不缓存结果：
/// 相邻两次调用反映两次独立的计算。
#[derive(Clone)]
pub struct ValueGenerator {
    producer: Arc<GeneratorBody>,
}

impl ValueGenerator {
    /// 创建新的值生成器
    pub fn new<F>(producer: F) -> Self
    where
        F: Fn(&SymbolTable) -> EvalResult<Value> + Send + Sync + 'static,
    {
        Self {
            producer: Arc::new(producer),
        }
    }

    /// 以所属符号表为参数计算当前值
    ///
    /// 时间、时区相关的生成器通过参数拿到所属表的时区
    pub fn invoke(&self, table: &SymbolTable) -> EvalResult<Value> {
        (self.producer)(table)
    }
}

impl fmt::Debug for ValueGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueGenerator").finish_non_exhaustive()
    }
}
