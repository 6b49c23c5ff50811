//! 集成测试共享工具模块
//!
//! 提供日志初始化和公共测试夹具，供所有集成测试使用

use chrono::FixedOffset;
use flexi_logger::{Logger, LoggerHandle};
use ruleval::core::Value;
use ruleval::utils::Timezone;
use std::sync::OnceLock;

static LOGGER: OnceLock<LoggerHandle> = OnceLock::new();

/// 初始化测试日志，重复调用只生效一次
///
/// 句柄保存在静态变量里，避免提前关闭日志后端
pub fn init_test_logging() {
    LOGGER.get_or_init(|| {
        Logger::try_with_env_or_str("debug")
            .expect("日志配置应该有效")
            .start()
            .expect("日志初始化应该成功")
    });
}

/// 创建固定偏移时区，偏移以小时计，东为正
pub fn fixed_timezone(hours: i32) -> Timezone {
    Timezone::Fixed(FixedOffset::east_opt(hours * 3600).expect("时区偏移应该有效"))
}

/// 创建整数数组值
pub fn int_array(values: &[i64]) -> Value {
    Value::Array(values.iter().map(|v| Value::Int(*v)).collect())
}
