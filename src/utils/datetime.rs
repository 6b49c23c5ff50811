//! 时区与日期时间解析工具
//!
//! 提供符号表使用的时区抽象（宿主本地时区或固定偏移），
//! 以及日期时间、时间间隔字面量的解析。
//! 解析失败统一上报 `MalformedLiteral` 类错误。

use crate::core::error::{EvalResult, EvaluationError};
use chrono::{
    DateTime, Duration, FixedOffset, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime,
    Offset, TimeZone, Utc,
};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// 时区引用
///
/// `Local` 在每次取值时解析宿主本地时区，适合交互场景；
/// `Fixed` 使用固定偏移，测试中注入它以获得确定的结果。
/// 符号表与其派生的子表共享同一时区。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timezone {
    /// 宿主本地时区
    Local,
    /// 固定偏移时区
    Fixed(FixedOffset),
}

impl Timezone {
    /// UTC 时区（零偏移）
    pub fn utc() -> Self {
        Timezone::Fixed(Utc.fix())
    }

    /// 返回该时区下的当前时间
    pub fn now(&self) -> DateTime<FixedOffset> {
        match self {
            Timezone::Local => Local::now().fixed_offset(),
            Timezone::Fixed(offset) => Utc::now().with_timezone(offset),
        }
    }

    /// 将无时区的本地时间解释为本时区的时刻
    ///
    /// 边界年份减去偏移后越界时返回 `None`
    pub fn localize(&self, naive: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        let offset = match self {
            Timezone::Fixed(offset) => *offset,
            Timezone::Local => match Local.offset_from_local_datetime(&naive) {
                LocalResult::Single(offset) | LocalResult::Ambiguous(offset, _) => offset,
                // 夏令时跳变产生的不存在时刻，使用当前偏移兜底
                LocalResult::None => *Local::now().offset(),
            },
        };
        offset.from_local_datetime(&naive).single()
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Timezone::Local
    }
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timezone::Local => write!(f, "local"),
            Timezone::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

/// 解析日期时间字面量
///
/// 自带偏移的 RFC 3339 文本保留原偏移；
/// 无偏移的文本按给定时区解释，纯日期视为当天零点。
pub fn parse_datetime(text: &str, timezone: Timezone) -> EvalResult<DateTime<FixedOffset>> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Ok(datetime);
    }
    let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f"))
        .or_else(|_| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d").map(|date| date.and_time(NaiveTime::MIN))
        })
        .map_err(|_| EvaluationError::malformed_literal("日期时间", text))?;
    timezone
        .localize(naive)
        .ok_or_else(|| EvaluationError::malformed_literal("日期时间", text))
}

static TIMEDELTA_PATTERN: OnceLock<Regex> = OnceLock::new();

fn timedelta_pattern() -> &'static Regex {
    TIMEDELTA_PATTERN.get_or_init(|| {
        Regex::new(
            r"^P(?:(?P<weeks>\d+)W)?(?:(?P<days>\d+)D)?(?:T(?:(?P<hours>\d+)H)?(?:(?P<minutes>\d+)M)?(?:(?P<seconds>\d+(?:\.\d+)?)S)?)?$",
        )
        .expect("时间间隔正则必定有效")
    })
}

/// 解析 ISO 8601 时间段格式的时间间隔字面量，例如 `P1DT2H30M`
pub fn parse_timedelta(text: &str) -> EvalResult<Duration> {
    let captures = timedelta_pattern()
        .captures(text)
        .ok_or_else(|| EvaluationError::malformed_literal("时间间隔", text))?;

    let has_date_part = captures.name("weeks").is_some() || captures.name("days").is_some();
    let has_time_part = captures.name("hours").is_some()
        || captures.name("minutes").is_some()
        || captures.name("seconds").is_some();
    // 拒绝没有任何分量的 "P" 和只剩分隔符的 "P1DT"
    if !has_time_part && (!has_date_part || text.ends_with('T')) {
        return Err(EvaluationError::malformed_literal("时间间隔", text));
    }

    let mut total = Duration::zero();
    if let Some(digits) = captures.name("weeks") {
        total = add_units(total, digits.as_str(), Duration::try_weeks, text)?;
    }
    if let Some(digits) = captures.name("days") {
        total = add_units(total, digits.as_str(), Duration::try_days, text)?;
    }
    if let Some(digits) = captures.name("hours") {
        total = add_units(total, digits.as_str(), Duration::try_hours, text)?;
    }
    if let Some(digits) = captures.name("minutes") {
        total = add_units(total, digits.as_str(), Duration::try_minutes, text)?;
    }
    if let Some(digits) = captures.name("seconds") {
        let seconds: f64 = digits
            .as_str()
            .parse()
            .map_err(|_| EvaluationError::malformed_literal("时间间隔", text))?;
        let nanos = (seconds * 1_000_000_000.0).round();
        if !nanos.is_finite() || nanos >= i64::MAX as f64 {
            return Err(overflow_error(text));
        }
        total = checked_sum(total, Duration::nanoseconds(nanos as i64), text)?;
    }
    Ok(total)
}

fn add_units(
    total: Duration,
    digits: &str,
    build: fn(i64) -> Option<Duration>,
    text: &str,
) -> EvalResult<Duration> {
    let count: i64 = digits
        .parse()
        .map_err(|_| EvaluationError::malformed_literal("时间间隔", text))?;
    let component = build(count).ok_or_else(|| overflow_error(text))?;
    checked_sum(total, component, text)
}

fn checked_sum(total: Duration, component: Duration, text: &str) -> EvalResult<Duration> {
    total
        .checked_add(&component)
        .ok_or_else(|| overflow_error(text))
}

fn overflow_error(text: &str) -> EvaluationError {
    EvaluationError::overflow(format!("时间间隔超出可表示范围: {:?}", text)).with_symbol(text)
}
