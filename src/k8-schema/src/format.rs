use chrono::DateTime;
use chrono::Utc;
use serde_json::Value;

use crate::ColumnType;

pub const EMPTY_CELL: &str = "-";

/// text of scalar value, `None` for null, arrays and objects
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// generic text rendering; composites render as compact json
pub fn display_text(value: &Value) -> String {
    match value {
        Value::Null => EMPTY_CELL.to_owned(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
        scalar => scalar_text(scalar).unwrap_or_default(),
    }
}

/// kubectl style age: 45s, 12m, 3h, 5d
pub fn format_age(created: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - created).num_seconds().max(0);
    match seconds {
        s if s < 60 => format!("{}s", s),
        s if s < 3_600 => format!("{}m", s / 60),
        s if s < 86_400 => format!("{}h", s / 3_600),
        s => format!("{}d", s / 86_400),
    }
}

pub fn format_value(value: Option<&Value>, value_type: ColumnType, now: DateTime<Utc>) -> String {
    let value = match value {
        None | Some(Value::Null) => return EMPTY_CELL.to_owned(),
        Some(value) => value,
    };

    match value_type {
        ColumnType::Date => match value.as_str().map(DateTime::parse_from_rfc3339) {
            Some(Ok(created)) => format_age(created.with_timezone(&Utc), now),
            _ => display_text(value),
        },
        ColumnType::Boolean => match value {
            Value::Bool(true) => "Yes".to_owned(),
            Value::Bool(false) => "No".to_owned(),
            Value::String(text) if text.eq_ignore_ascii_case("true") => "Yes".to_owned(),
            Value::String(text) if text.eq_ignore_ascii_case("false") => "No".to_owned(),
            other => display_text(other),
        },
        ColumnType::Integer => match value {
            Value::Number(number) => match number.as_i64() {
                Some(int) => int.to_string(),
                None => number
                    .as_f64()
                    .map(|float| (float.trunc() as i64).to_string())
                    .unwrap_or_else(|| number.to_string()),
            },
            Value::String(text) => match text.trim().parse::<i64>() {
                Ok(int) => int.to_string(),
                Err(_) => text.clone(),
            },
            other => display_text(other),
        },
        ColumnType::Number | ColumnType::String | ColumnType::Unknown => display_text(value),
    }
}
