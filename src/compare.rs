//! Kind-aware ordering of field values.

use std::cmp::Ordering;

use crate::value::FieldValue;

/// Compare two field values.
///
/// Numbers compare numerically (ints against floats included), strings
/// lexically by code point, and everything else by canonical string form.
pub fn compare(a: &FieldValue, b: &FieldValue) -> Ordering {
    match (a, b) {
        (FieldValue::Int(x), FieldValue::Int(y)) => x.cmp(y),
        (FieldValue::String(x), FieldValue::String(y)) => x.cmp(y),
        (FieldValue::Int(_) | FieldValue::Float(_), FieldValue::Int(_) | FieldValue::Float(_)) => {
            match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => Ordering::Equal,
            }
        }
        _ => a.to_string().cmp(&b.to_string()),
    }
}

/// Compare sort keys where a key that failed to resolve, or resolved to
/// null, orders as the empty string: before every present value.
pub fn compare_keys(a: Option<&FieldValue>, b: Option<&FieldValue>) -> Ordering {
    fn present(v: Option<&FieldValue>) -> Option<&FieldValue> {
        v.filter(|v| !matches!(v, FieldValue::Null))
    }

    match (present(a), present(b)) {
        (None, None) => Ordering::Equal,
        (None, Some(v)) => "".cmp(v.to_string().as_str()),
        (Some(v), None) => v.to_string().as_str().cmp(""),
        (Some(x), Some(y)) => compare(x, y),
    }
}
