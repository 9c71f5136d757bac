//! Type conversions from raw parameters to BSON.

use bson::{Bson, Document};
use indexmap::IndexMap;
use sift_query::RawValue;

/// Largest magnitude at which every integer is exactly representable in an f64.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Convert a raw parameter value to BSON.
///
/// Text stays text; casting to the field's stored type is left to the
/// execution layer.
pub fn raw_value_to_bson(value: &RawValue) -> Bson {
    match value {
        RawValue::Text(s) => Bson::String(s.clone()),
        RawValue::Many(values) => Bson::Array(values.iter().cloned().map(Bson::String).collect()),
        RawValue::Nested(map) => Bson::Document(raw_map_to_document(map)),
    }
}

/// Convert a raw parameter object to a document, preserving key order.
pub fn raw_map_to_document(map: &IndexMap<String, RawValue>) -> Document {
    map.iter()
        .map(|(key, value)| (key.clone(), raw_value_to_bson(value)))
        .collect()
}

/// Convert a parsed number to BSON, keeping whole numbers integral.
pub fn number_to_bson(n: f64) -> Bson {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        Bson::Int64(n as i64)
    } else {
        Bson::Double(n)
    }
}

/// Convert a JSON number to BSON.
pub fn json_number_to_bson(n: &serde_json::Number) -> Bson {
    match (n.as_i64(), n.as_f64()) {
        (Some(i), _) => Bson::Int64(i),
        (None, Some(f)) => Bson::Double(f),
        (None, None) => Bson::Null,
    }
}
