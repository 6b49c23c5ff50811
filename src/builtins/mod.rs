//! 内置符号表模块
//!
//! ## 模块结构
//!
//! - `table` - 符号表、条目分类与查找契约
//! - `generator` - 按访问计算的值生成器
//! - `defaults` - 标准内置符号集与覆盖合并
//!
//! 符号表构造后只读，命名空间逐级下钻时即时构造子表并共享时区，
//! 声明类型查询与取值通道完全独立。

pub mod defaults;
pub mod generator;
pub mod table;

pub use defaults::{default_entries, default_types};
pub use generator::{GeneratorBody, ValueGenerator};
pub use table::{Entry, Resolution, SymbolTable, SCOPE_NAME};
