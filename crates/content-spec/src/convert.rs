use serde_json::{Map, Number, Value};

use crate::error::{ContentError, Result};
use crate::question::PRICE_FIELDS;

/// Lenient boolean parsing; unrecognised input is returned as a string.
pub fn convert_to_boolean(raw: &str) -> Value {
    match raw.to_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Value::Bool(true),
        "false" | "off" | "no" | "0" => Value::Bool(false),
        _ => Value::String(raw.to_string()),
    }
}

/// Lenient number parsing: a `.` means float, otherwise integer.
pub fn convert_to_number(raw: &str) -> Value {
    let parsed = if raw.contains('.') {
        raw.parse::<f64>().ok().and_then(Number::from_f64)
    } else {
        raw.parse::<i64>()
            .map(Number::from)
            .or_else(|_| raw.parse::<u64>().map(Number::from))
            .ok()
    };
    parsed
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(raw.to_string()))
}

/// Splits positional pricing inputs into the four named price fields.
pub fn expand_pricing_field(values: &[String]) -> Result<Map<String, Value>> {
    if values.len() < PRICE_FIELDS.len() {
        return Err(ContentError::PricingFieldCount {
            found: values.len(),
        });
    }
    Ok(PRICE_FIELDS
        .iter()
        .zip(values)
        .map(|(field, value)| ((*field).to_string(), Value::String(value.clone())))
        .collect())
}
