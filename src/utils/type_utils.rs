use crate::core::Value;

/// Returns the truth value of a Value, used by the aggregate builtins
pub fn value_to_bool(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Int(i) => *i != 0,
        Value::Float(f) => *f != 0.0 && !f.is_nan(),
        Value::String(s) => !s.is_empty(),
        Value::Datetime(_) => true,
        Value::Timedelta(d) => !d.is_zero(),
        Value::Array(items) => !items.is_empty(),
        Value::Mapping(entries) => !entries.is_empty(),
        Value::Function(_) => true,
    }
}

/// Attempts to widen a numeric Value to a float, non-numeric values yield None
pub fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Float(f) => Some(*f),
        Value::Int(i) => Some(*i as f64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::collections::HashMap;

    #[test]
    fn test_value_to_bool() {
        assert!(!value_to_bool(&Value::Null));
        assert!(value_to_bool(&Value::Bool(true)));
        assert!(!value_to_bool(&Value::Bool(false)));
        assert!(value_to_bool(&Value::Int(1)));
        assert!(value_to_bool(&Value::Int(-1)));
        assert!(!value_to_bool(&Value::Int(0)));
        assert!(value_to_bool(&Value::Float(0.5)));
        assert!(!value_to_bool(&Value::Float(0.0)));
        assert!(!value_to_bool(&Value::Float(f64::NAN)));
        assert!(value_to_bool(&Value::String("x".to_string())));
        assert!(!value_to_bool(&Value::String(String::new())));
        assert!(value_to_bool(&Value::Timedelta(Duration::seconds(1))));
        assert!(!value_to_bool(&Value::Timedelta(Duration::zero())));
        assert!(value_to_bool(&Value::Array(vec![Value::Null])));
        assert!(!value_to_bool(&Value::Array(vec![])));
        assert!(!value_to_bool(&Value::Mapping(HashMap::new())));
    }

    #[test]
    fn test_value_to_f64() {
        assert_eq!(value_to_f64(&Value::Float(12.3)), Some(12.3));
        assert_eq!(value_to_f64(&Value::Int(42)), Some(42.0));
        assert_eq!(value_to_f64(&Value::String("12.3".to_string())), None);
        assert_eq!(value_to_f64(&Value::Bool(true)), None);
        assert_eq!(value_to_f64(&Value::Null), None);
    }
}
