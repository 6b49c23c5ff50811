pub mod error;
pub mod types;
pub mod value;

// 错误和结果类型
pub use error::{EvalResult, EvaluationError, EvaluationErrorKind};

// 核心数据类型
pub use types::{DataType, FunctionType};
pub use value::{FunctionBody, FunctionValue, Value};
