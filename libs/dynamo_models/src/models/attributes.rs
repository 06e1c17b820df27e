//! Conversions between DynamoDB attribute values and the JSON / float
//! values carried by readings.
use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use serde_json::{Map, Number, Value};

use crate::error::StoreError;

pub type Item = HashMap<String, AttributeValue>;

/// Smallest non-zero magnitude a DynamoDB number can hold.
pub const MIN_NUMBER_MAGNITUDE: f64 = 1e-130;
/// Magnitudes at or above this overflow a DynamoDB number.
pub const MAX_NUMBER_MAGNITUDE: f64 = 1e126;

/// Whether `value` fits the DynamoDB number type.
pub fn is_storable_number(value: f64) -> bool {
    value == 0.0
        || (MIN_NUMBER_MAGNITUDE..MAX_NUMBER_MAGNITUDE).contains(&value.abs())
}

pub fn json_to_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => match n.as_f64() {
            Some(v) if !is_storable_number(v) => AttributeValue::Null(true),
            _ => AttributeValue::N(n.to_string()),
        },
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(items) => {
            AttributeValue::L(items.iter().map(json_to_attribute).collect())
        }
        Value::Object(map) => AttributeValue::M(
            map.iter()
                .map(|(k, v)| (k.clone(), json_to_attribute(v)))
                .collect(),
        ),
    }
}

pub fn attribute_to_json(attr: &AttributeValue) -> Result<Value, StoreError> {
    let value = match attr {
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::N(n) => {
            let number = n.parse::<Number>().map_err(|e| {
                StoreError::Decode(format!("invalid number {n:?}: {e}"))
            })?;
            Value::Number(number)
        }
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::L(items) => Value::Array(
            items
                .iter()
                .map(attribute_to_json)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        AttributeValue::M(map) => Value::Object(
            map.iter()
                .map(|(k, v)| Ok((k.clone(), attribute_to_json(v)?)))
                .collect::<Result<Map<_, _>, StoreError>>()?,
        ),
        other => {
            return Err(StoreError::Decode(format!(
                "unsupported attribute type: {other:?}"
            )));
        }
    };

    Ok(value)
}

/// NaN, infinities and magnitudes outside the DynamoDB number range are
/// stored as NULL.
pub fn float_to_attribute(value: f64) -> AttributeValue {
    if is_storable_number(value) {
        AttributeValue::N(value.to_string())
    } else {
        AttributeValue::Null(true)
    }
}

pub fn attribute_to_float(attr: &AttributeValue) -> Result<f64, StoreError> {
    match attr {
        AttributeValue::N(n) => n.parse::<f64>().map_err(|e| {
            StoreError::Decode(format!("invalid number {n:?}: {e}"))
        }),
        AttributeValue::Null(_) => Ok(f64::NAN),
        other => Err(StoreError::Decode(format!(
            "expected a number, found {other:?}"
        ))),
    }
}

pub(crate) fn string_attribute(
    item: &Item,
    name: &str,
) -> Result<String, StoreError> {
    match item.get(name) {
        Some(AttributeValue::S(s)) => Ok(s.clone()),
        _ => Err(StoreError::Decode(format!(
            "missing string attribute `{name}`"
        ))),
    }
}

pub(crate) fn json_attribute(
    item: &Item,
    name: &str,
) -> Result<Value, StoreError> {
    item.get(name)
        .map(attribute_to_json)
        .transpose()
        .map(Option::unwrap_or_default)
}

pub(crate) fn float_attribute(
    item: &Item,
    name: &str,
) -> Result<f64, StoreError> {
    item.get(name)
        .map(attribute_to_float)
        .transpose()
        .map(|v| v.unwrap_or(f64::NAN))
}
