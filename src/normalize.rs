//! Structural normalization: replace every array leaf with its
//! nested-sequence equivalent so the tree becomes plain JSON.

use crate::inspect::FieldMap;
use crate::value::DatasetValue;
use serde_json::{Number, Value};

/// Recursively convert a dataset value into a JSON-compatible value.
///
/// Total over any input: arrays become nested JSON arrays (dimension and
/// element order preserved), mappings and sequences are rebuilt with the
/// same keys and order, and everything else passes through verbatim.
pub fn normalize(value: &DatasetValue) -> Value {
    match value {
        DatasetValue::Null => Value::Null,
        DatasetValue::Bool(b) => Value::Bool(*b),
        DatasetValue::Number(n) => Value::Number(n.clone()),
        DatasetValue::String(s) => Value::String(s.clone()),
        DatasetValue::Array(array) => nest(array.shape(), array.data()),
        DatasetValue::Sequence(items) => Value::Array(items.iter().map(normalize).collect()),
        DatasetValue::Mapping(entries) => Value::Object(
            entries
                .iter()
                .map(|(key, value)| (key.clone(), normalize(value)))
                .collect(),
        ),
    }
}

/// Normalize an extraction result into the tree handed to the JSON writer.
pub fn normalize_fields(fields: &FieldMap) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(field, sub_fields)| {
                let inner = sub_fields
                    .iter()
                    .map(|(key, value)| (key.clone(), normalize(value)))
                    .collect();
                (field.clone(), Value::Object(inner))
            })
            .collect(),
    )
}

/// Split a flat row-major buffer into nested arrays along `shape`.
///
/// An empty shape is a 0-dimensional array and yields its single element.
fn nest(shape: &[usize], data: &[f64]) -> Value {
    match shape.split_first() {
        None => data.first().map(|&x| json_number(x)).unwrap_or(Value::Null),
        Some((&n, rest)) => {
            let stride: usize = rest.iter().product();
            Value::Array(
                (0..n)
                    .map(|i| nest(rest, &data[i * stride..(i + 1) * stride]))
                    .collect(),
            )
        }
    }
}

/// Non-finite floats have no JSON representation and become null.
fn json_number(x: f64) -> Value {
    Number::from_f64(x).map(Value::Number).unwrap_or(Value::Null)
}
