use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Reserved key marking a multi-dimensional array in the wire format.
///
/// An object whose only key is `"__ndarray__"` decodes as an [`NdArray`];
/// its payload carries the shape and a flat row-major data buffer. Every
/// other object decodes as a plain mapping.
pub const NDARRAY_KEY: &str = "__ndarray__";

/// Why an `"__ndarray__"` payload failed to decode.
#[derive(Debug, Error)]
pub enum ArrayError {
    #[error("malformed array payload: {0}")]
    Payload(serde_json::Error),

    #[error("shape {shape:?} implies {expected} element(s), data has {actual}")]
    LengthMismatch {
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },

    #[error("shape {shape:?} is too large to index")]
    ShapeOverflow { shape: Vec<usize> },
}

/// A multi-dimensional numeric array: a shape plus a flat row-major buffer.
///
/// Invariant: `data.len()` equals the product of `shape`. An empty shape
/// denotes a 0-dimensional array holding exactly one element.
///
/// Elements are stored as `f64`, so integer values above 2^53 lose
/// precision at decode time.
#[derive(Debug, Clone, PartialEq)]
pub struct NdArray {
    shape: Vec<usize>,
    data: Vec<f64>,
}

/// Wire representation of an array payload.
#[derive(Deserialize)]
struct NdArrayWire {
    shape: Vec<usize>,
    data: Vec<f64>,
}

impl NdArray {
    /// Build an array, validating that the data length matches the shape.
    pub fn new(shape: Vec<usize>, data: Vec<f64>) -> Result<Self, ArrayError> {
        // The naive product wraps on corrupt payloads with huge dimensions.
        let expected = shape
            .iter()
            .try_fold(1usize, |acc, &dim| acc.checked_mul(dim));
        let Some(expected) = expected else {
            return Err(ArrayError::ShapeOverflow { shape });
        };
        if data.len() != expected {
            return Err(ArrayError::LengthMismatch {
                shape,
                expected,
                actual: data.len(),
            });
        }
        Ok(NdArray { shape, data })
    }

    fn decode(payload: Value) -> Result<Self, ArrayError> {
        let wire: NdArrayWire = serde_json::from_value(payload).map_err(ArrayError::Payload)?;
        NdArray::new(wire.shape, wire.data)
    }

    /// Dimension sizes, outermost first.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// The flat row-major element buffer.
    pub fn data(&self) -> &[f64] {
        &self.data
    }
}

/// Size descriptor reported for a leaf value during inspection.
///
/// Sequences expose a length, arrays expose their shape, and everything
/// else reports an explicit unknown rather than failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SizeDescriptor {
    Length(usize),
    Shape(Vec<usize>),
    Unknown,
}

impl fmt::Display for SizeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeDescriptor::Length(n) => write!(f, "{}", n),
            SizeDescriptor::Shape(dims) => {
                let dims: Vec<String> = dims.iter().map(|d| d.to_string()).collect();
                write!(f, "({})", dims.join(", "))
            }
            SizeDescriptor::Unknown => write!(f, "unknown (no shape)"),
        }
    }
}

/// A decoded dataset value.
///
/// The closed set of variants replaces runtime type probing: every value a
/// dataset blob can hold is one of these, and the inspector and normalizer
/// match on them exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    /// Multi-dimensional numeric array
    Array(NdArray),
    /// Ordered sequence of arbitrary values
    Sequence(Vec<DatasetValue>),
    /// Insertion-ordered string-keyed mapping
    Mapping(IndexMap<String, DatasetValue>),
}

impl DatasetValue {
    /// Decode a parsed JSON value, recognizing the `"__ndarray__"` wire form.
    ///
    /// Mapping key order is preserved from the source. The only failure is a
    /// malformed array payload; everything else decodes structurally.
    pub fn decode(value: Value) -> Result<Self, ArrayError> {
        match value {
            Value::Null => Ok(DatasetValue::Null),
            Value::Bool(b) => Ok(DatasetValue::Bool(b)),
            Value::Number(n) => Ok(DatasetValue::Number(n)),
            Value::String(s) => Ok(DatasetValue::String(s)),
            Value::Array(items) => {
                let items = items
                    .into_iter()
                    .map(DatasetValue::decode)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(DatasetValue::Sequence(items))
            }
            Value::Object(mut map) => {
                if map.len() == 1 {
                    if let Some(payload) = map.remove(NDARRAY_KEY) {
                        return Ok(DatasetValue::Array(NdArray::decode(payload)?));
                    }
                }
                let entries = map
                    .into_iter()
                    .map(|(key, value)| Ok((key, DatasetValue::decode(value)?)))
                    .collect::<Result<IndexMap<_, _>, ArrayError>>()?;
                Ok(DatasetValue::Mapping(entries))
            }
        }
    }

    /// Short runtime type tag used in inspection reports.
    pub fn type_tag(&self) -> &'static str {
        match self {
            DatasetValue::Null => "null",
            DatasetValue::Bool(_) => "bool",
            DatasetValue::Number(_) => "number",
            DatasetValue::String(_) => "string",
            DatasetValue::Array(_) => "ndarray",
            DatasetValue::Sequence(_) => "sequence",
            DatasetValue::Mapping(_) => "mapping",
        }
    }

    /// Size descriptor for inspection reports.
    pub fn size_descriptor(&self) -> SizeDescriptor {
        match self {
            DatasetValue::Sequence(items) => SizeDescriptor::Length(items.len()),
            DatasetValue::Array(array) => SizeDescriptor::Shape(array.shape().to_vec()),
            _ => SizeDescriptor::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_decode_scalars() {
        assert_eq!(DatasetValue::decode(json!(null)).unwrap(), DatasetValue::Null);
        assert_eq!(
            DatasetValue::decode(json!(true)).unwrap(),
            DatasetValue::Bool(true)
        );
        assert_eq!(
            DatasetValue::decode(json!("hi")).unwrap(),
            DatasetValue::String("hi".to_string())
        );
    }

    #[test]
    fn test_decode_mapping_preserves_order() {
        let value = DatasetValue::decode(json!({"z": 1, "a": 2, "m": 3})).unwrap();
        let DatasetValue::Mapping(entries) = value else {
            panic!("expected a mapping");
        };
        let keys: Vec<&String> = entries.keys().collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn test_decode_ndarray() {
        let value = DatasetValue::decode(json!({
            "__ndarray__": {"shape": [2, 3], "data": [0.0, 0.1, 0.2, 1.0, 1.1, 1.2]}
        }))
        .unwrap();

        let DatasetValue::Array(array) = value else {
            panic!("expected an array");
        };
        assert_eq!(array.shape(), [2, 3]);
        assert_eq!(array.data().len(), 6);
    }

    #[test]
    fn test_decode_ndarray_length_mismatch() {
        let err = DatasetValue::decode(json!({
            "__ndarray__": {"shape": [2, 3], "data": [1.0, 2.0]}
        }))
        .unwrap_err();

        assert!(matches!(
            err,
            ArrayError::LengthMismatch { expected: 6, actual: 2, .. }
        ));
    }

    #[test]
    fn test_decode_ndarray_bad_payload() {
        let err = DatasetValue::decode(json!({
            "__ndarray__": {"shape": [2], "data": ["not", "numbers"]}
        }))
        .unwrap_err();

        assert!(matches!(err, ArrayError::Payload(_)));
    }

    #[test]
    fn test_object_with_extra_keys_is_a_mapping() {
        // The reserved key only triggers when it is the object's sole key.
        let value = DatasetValue::decode(json!({
            "__ndarray__": {"shape": [1], "data": [1.0]},
            "other": 1
        }))
        .unwrap();
        assert!(matches!(value, DatasetValue::Mapping(_)));
    }

    #[test]
    fn test_size_descriptors() {
        let seq = DatasetValue::decode(json!([1, 2, 3])).unwrap();
        assert_eq!(seq.size_descriptor(), SizeDescriptor::Length(3));

        let array = DatasetValue::Array(NdArray::new(vec![2, 3], vec![0.0; 6]).unwrap());
        assert_eq!(array.size_descriptor(), SizeDescriptor::Shape(vec![2, 3]));
        assert_eq!(array.size_descriptor().to_string(), "(2, 3)");

        let scalar = DatasetValue::decode(json!(42)).unwrap();
        assert_eq!(scalar.size_descriptor(), SizeDescriptor::Unknown);
        assert_eq!(scalar.size_descriptor().to_string(), "unknown (no shape)");
    }

    #[test]
    fn test_shape_product_overflow() {
        let err = NdArray::new(vec![usize::MAX, 2], vec![]).unwrap_err();
        assert!(matches!(err, ArrayError::ShapeOverflow { .. }));

        // A wrapped product would be 0 and an empty buffer would pass.
        let err = NdArray::new(vec![1usize << 63, 2], vec![]).unwrap_err();
        assert!(matches!(err, ArrayError::ShapeOverflow { .. }));
    }

    #[test]
    fn test_zero_dim_array() {
        let array = NdArray::new(vec![], vec![7.5]).unwrap();
        assert!(array.shape().is_empty());
        assert_eq!(array.data(), [7.5]);

        // An empty shape requires exactly one element.
        assert!(NdArray::new(vec![], vec![]).is_err());
    }
}
