// 工具模块 - 仅用于导出各个子模块，不包含具体实现

// 时区与日期时间解析模块
pub mod datetime;
pub use datetime::{parse_datetime, parse_timedelta, Timezone};

// 类型转换工具模块
pub mod type_utils;
pub use type_utils::{value_to_bool, value_to_f64};
