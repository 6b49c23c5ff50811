//! 默认内置符号集
//!
//! 组装标准的内置注册表：数学常量、时间生成器、聚合与解析函数，
//! 并支持调用方的覆盖合并。值通道与类型通道分别合并、互不联动。

use crate::builtins::generator::ValueGenerator;
use crate::builtins::table::{Entry, SymbolTable};
use crate::core::error::{EvalResult, EvaluationError};
use crate::core::types::{DataType, FunctionType};
use crate::core::value::{FunctionValue, Value};
use crate::utils::datetime;
use crate::utils::type_utils::{value_to_bool, value_to_f64};
use chrono::NaiveTime;
use log::debug;
use std::collections::HashMap;

impl SymbolTable {
    /// 创建带默认内置符号的符号表
    ///
    /// `overrides` 与 `override_types` 分别合并进值通道和类型通道，
    /// 同名时覆盖默认条目。两个通道相互独立：覆盖一个值不会自动
    /// 更新它已记录的类型，反之亦然，调用方需要自行保持二者一致。
    pub fn with_defaults(
        overrides: HashMap<String, Entry>,
        override_types: HashMap<String, DataType>,
    ) -> Self {
        let mut entries = default_entries();
        let mut types = default_types();
        for (name, entry) in overrides {
            if entries.insert(name.clone(), entry).is_some() {
                debug!("覆盖默认内置符号: {}", name);
            }
        }
        for (name, data_type) in override_types {
            types.insert(name, data_type);
        }
        Self::new(entries).with_types(types)
    }
}

/// 标准内置条目表
pub fn default_entries() -> HashMap<String, Entry> {
    let mut entries = HashMap::new();
    // 数学常量
    entries.insert(
        "e".to_string(),
        Entry::Literal(Value::Float(std::f64::consts::E)),
    );
    entries.insert(
        "pi".to_string(),
        Entry::Literal(Value::Float(std::f64::consts::PI)),
    );
    // 时间戳
    entries.insert(
        "now".to_string(),
        Entry::Generated(ValueGenerator::new(|table| {
            Ok(Value::Datetime(table.timezone().now()))
        })),
    );
    entries.insert(
        "today".to_string(),
        Entry::Generated(ValueGenerator::new(|table| {
            let timezone = table.timezone();
            // 截断到当天零点；零点的偏移重新解析，夏令时切换日可能与 now 不同
            let midnight = timezone.now().date_naive().and_time(NaiveTime::MIN);
            timezone
                .localize(midnight)
                .map(Value::Datetime)
                .ok_or_else(|| EvaluationError::overflow("today时间戳超出可表示范围"))
        })),
    );
    // 聚合与高阶函数
    entries.insert("any".to_string(), function_entry(make_any()));
    entries.insert("all".to_string(), function_entry(make_all()));
    entries.insert("sum".to_string(), function_entry(make_sum()));
    entries.insert("map".to_string(), function_entry(make_map()));
    entries.insert("filter".to_string(), function_entry(make_filter()));
    // 解析函数；parse_datetime 在解析时绑定所属表的时区，
    // 因此是生成器而不是普通字面量
    entries.insert(
        "parse_datetime".to_string(),
        Entry::Generated(ValueGenerator::new(|table| {
            let timezone = table.timezone();
            Ok(Value::Function(FunctionValue::new(
                "parse_datetime",
                1,
                move |args| {
                    let text = expect_string("parse_datetime", &args[0])?;
                    datetime::parse_datetime(text, timezone).map(Value::Datetime)
                },
            )))
        })),
    );
    entries.insert(
        "parse_timedelta".to_string(),
        function_entry(FunctionValue::new("parse_timedelta", 1, |args| {
            let text = expect_string("parse_timedelta", &args[0])?;
            datetime::parse_timedelta(text).map(Value::Timedelta)
        })),
    );
    entries
}

/// 标准内置类型表
pub fn default_types() -> HashMap<String, DataType> {
    let mut types = HashMap::new();
    // 数学常量
    types.insert("e".to_string(), DataType::Float);
    types.insert("pi".to_string(), DataType::Float);
    // 时间戳
    types.insert("now".to_string(), DataType::Datetime);
    types.insert("today".to_string(), DataType::Datetime);
    // 函数
    types.insert(
        "any".to_string(),
        function_type(
            "any",
            vec![DataType::array(DataType::Undefined)],
            Some(DataType::Bool),
        ),
    );
    types.insert(
        "all".to_string(),
        function_type(
            "all",
            vec![DataType::array(DataType::Undefined)],
            Some(DataType::Bool),
        ),
    );
    types.insert(
        "sum".to_string(),
        function_type(
            "sum",
            vec![DataType::array(DataType::Float)],
            Some(DataType::Float),
        ),
    );
    types.insert(
        "map".to_string(),
        function_type(
            "map",
            vec![
                DataType::Function(FunctionType::new()),
                DataType::array(DataType::Undefined),
            ],
            None,
        ),
    );
    types.insert(
        "filter".to_string(),
        function_type(
            "filter",
            vec![
                DataType::Function(FunctionType::new()),
                DataType::array(DataType::Undefined),
            ],
            None,
        ),
    );
    types.insert(
        "parse_datetime".to_string(),
        function_type(
            "parse_datetime",
            vec![DataType::String],
            Some(DataType::Datetime),
        ),
    );
    types.insert(
        "parse_timedelta".to_string(),
        function_type(
            "parse_timedelta",
            vec![DataType::String],
            Some(DataType::Timedelta),
        ),
    );
    types
}

fn function_entry(function: FunctionValue) -> Entry {
    Entry::Literal(Value::Function(function))
}

fn function_type(
    name: &str,
    argument_types: Vec<DataType>,
    return_type: Option<DataType>,
) -> DataType {
    let mut signature = FunctionType::new()
        .with_name(name)
        .with_argument_types(argument_types);
    if let Some(return_type) = return_type {
        signature = signature.with_return_type(return_type);
    }
    DataType::function(signature)
}

fn make_any() -> FunctionValue {
    FunctionValue::new("any", 1, |args| {
        let items = expect_array("any", &args[0])?;
        Ok(Value::Bool(items.iter().any(value_to_bool)))
    })
}

fn make_all() -> FunctionValue {
    FunctionValue::new("all", 1, |args| {
        let items = expect_array("all", &args[0])?;
        Ok(Value::Bool(items.iter().all(value_to_bool)))
    })
}

fn make_sum() -> FunctionValue {
    FunctionValue::new("sum", 1, |args| {
        let items = expect_array("sum", &args[0])?;
        let mut total = Value::Int(0);
        for item in items {
            total = numeric_add(total, item)?;
        }
        Ok(total)
    })
}

fn make_map() -> FunctionValue {
    FunctionValue::new("map", 2, |args| {
        let function = expect_function("map", &args[0])?;
        let items = expect_array("map", &args[1])?;
        let mut mapped = Vec::with_capacity(items.len());
        for item in items {
            mapped.push(function.invoke(std::slice::from_ref(item))?);
        }
        Ok(Value::Array(mapped))
    })
}

fn make_filter() -> FunctionValue {
    FunctionValue::new("filter", 2, |args| {
        let predicate = expect_function("filter", &args[0])?;
        let items = expect_array("filter", &args[1])?;
        let mut kept = Vec::new();
        for item in items {
            let verdict = predicate.invoke(std::slice::from_ref(item))?;
            if value_to_bool(&verdict) {
                kept.push(item.clone());
            }
        }
        Ok(Value::Array(kept))
    })
}

/// Int 相加保持 Int，出现 Float 后加宽为 Float
fn numeric_add(total: Value, item: &Value) -> EvalResult<Value> {
    match (&total, item) {
        (Value::Int(a), Value::Int(b)) => a
            .checked_add(*b)
            .map(Value::Int)
            .ok_or_else(|| EvaluationError::overflow("sum函数整数相加溢出")),
        _ => {
            let a = value_to_f64(&total).ok_or_else(|| non_numeric(&total))?;
            let b = value_to_f64(item).ok_or_else(|| non_numeric(item))?;
            Ok(Value::Float(a + b))
        }
    }
}

fn non_numeric(value: &Value) -> EvaluationError {
    EvaluationError::type_mismatch(format!(
        "sum函数需要数值元素, 实际: {}",
        value.data_type()
    ))
}

fn expect_array<'a>(name: &str, value: &'a Value) -> EvalResult<&'a Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        other => Err(EvaluationError::type_mismatch(format!(
            "{}函数需要数组类型, 实际: {}",
            name,
            other.data_type()
        ))),
    }
}

fn expect_function<'a>(name: &str, value: &'a Value) -> EvalResult<&'a FunctionValue> {
    match value {
        Value::Function(function) => Ok(function),
        other => Err(EvaluationError::type_mismatch(format!(
            "{}函数需要函数类型参数, 实际: {}",
            name,
            other.data_type()
        ))),
    }
}

fn expect_string<'a>(name: &str, value: &'a Value) -> EvalResult<&'a str> {
    match value {
        Value::String(text) => Ok(text),
        other => Err(EvaluationError::type_mismatch(format!(
            "{}函数需要字符串类型, 实际: {}",
            name,
            other.data_type()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::table::Resolution;
    use crate::core::error::EvaluationErrorKind;

    fn resolve_function(table: &SymbolTable, name: &str) -> FunctionValue {
        match table.lookup(name).expect("内置函数查找应该成功") {
            Resolution::Value(Value::Function(function)) => function,
            other => panic!("{} 应该解析为函数值: {:?}", name, other),
        }
    }

    #[test]
    fn test_default_entries_complete() {
        let entries = default_entries();
        for name in [
            "e",
            "pi",
            "now",
            "today",
            "any",
            "all",
            "sum",
            "map",
            "filter",
            "parse_datetime",
            "parse_timedelta",
        ] {
            assert!(entries.contains_key(name), "缺少默认符号 {}", name);
        }
        assert_eq!(entries.len(), 11);
    }

    #[test]
    fn test_default_types_match_entries() {
        let types = default_types();
        assert_eq!(types.get("e"), Some(&DataType::Float));
        assert_eq!(types.get("now"), Some(&DataType::Datetime));
        match types.get("sum") {
            Some(DataType::Function(signature)) => {
                assert_eq!(signature.name.as_deref(), Some("sum"));
                assert_eq!(
                    signature.argument_types,
                    Some(vec![DataType::array(DataType::Float)])
                );
                assert_eq!(
                    signature.return_type.as_deref(),
                    Some(&DataType::Float)
                );
            }
            other => panic!("sum 的类型应该是函数类型: {:?}", other),
        }
        match types.get("map") {
            Some(DataType::Function(signature)) => {
                assert_eq!(signature.return_type, None);
            }
            other => panic!("map 的类型应该是函数类型: {:?}", other),
        }
    }

    #[test]
    fn test_sum_int_preserving() {
        let table = SymbolTable::default();
        let sum = resolve_function(&table, "sum");
        let total = sum
            .invoke(&[Value::Array(vec![
                Value::Int(1),
                Value::Int(2),
                Value::Int(3),
            ])])
            .expect("sum调用应该成功");
        assert_eq!(total, Value::Int(6));
        let widened = sum
            .invoke(&[Value::Array(vec![Value::Int(1), Value::Float(2.5)])])
            .expect("sum调用应该成功");
        assert_eq!(widened, Value::Float(3.5));
    }

    #[test]
    fn test_sum_rejects_non_numeric() {
        let table = SymbolTable::default();
        let sum = resolve_function(&table, "sum");
        let err = sum
            .invoke(&[Value::Array(vec![Value::String("x".to_string())])])
            .expect_err("非数值元素应该被拒绝");
        assert_eq!(err.kind, EvaluationErrorKind::TypeMismatch);
    }

    #[test]
    fn test_sum_overflow() {
        let table = SymbolTable::default();
        let sum = resolve_function(&table, "sum");
        let err = sum
            .invoke(&[Value::Array(vec![
                Value::Int(i64::MAX),
                Value::Int(1),
            ])])
            .expect_err("整数溢出应该报错");
        assert_eq!(err.kind, EvaluationErrorKind::Overflow);
    }

    #[test]
    fn test_aggregates_on_empty_array() {
        let table = SymbolTable::default();
        let empty = Value::Array(vec![]);
        assert_eq!(
            resolve_function(&table, "sum")
                .invoke(&[empty.clone()])
                .expect("sum调用应该成功"),
            Value::Int(0)
        );
        assert_eq!(
            resolve_function(&table, "all")
                .invoke(&[empty.clone()])
                .expect("all调用应该成功"),
            Value::Bool(true)
        );
        assert_eq!(
            resolve_function(&table, "any")
                .invoke(&[empty])
                .expect("any调用应该成功"),
            Value::Bool(false)
        );
    }

    #[test]
    fn test_override_merge() {
        let mut overrides = HashMap::new();
        overrides.insert("e".to_string(), Entry::Literal(Value::Int(5)));
        overrides.insert(
            "answer".to_string(),
            Entry::Literal(Value::Int(42)),
        );
        let table = SymbolTable::with_defaults(overrides, HashMap::new());
        match table.lookup("e").expect("查找应该成功") {
            Resolution::Value(value) => assert_eq!(value, Value::Int(5)),
            other => panic!("e 应该解析为普通值: {:?}", other),
        }
        // 值通道被覆盖，类型通道保持默认记录
        assert_eq!(table.resolve_type("e"), DataType::Float);
        assert!(table.contains("answer"));
        assert_eq!(table.resolve_type("answer"), DataType::Undefined);
    }

    #[test]
    fn test_default_impl_uses_defaults() {
        let table = SymbolTable::default();
        assert_eq!(table.len(), 11);
        assert!(table.contains("pi"));
        assert_eq!(table.namespace(), None);
    }
}
