//! Cell coercions used by validation.

use crate::types::Value;

/// Coerce a cell to an integer.
///
/// Accepts integers, integral floats (`7.0`) and text holding either after trimming. Fractional,
/// non-finite, out-of-range, boolean and blank values yield `None`.
pub fn to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Int64(i) => Some(*i),
        Value::Float64(f) => float_to_i64(*f),
        Value::Utf8(s) => {
            let t = s.trim();
            t.parse::<i64>()
                .ok()
                .or_else(|| t.parse::<f64>().ok().and_then(float_to_i64))
        }
        Value::Bool(_) | Value::Null => None,
    }
}

fn float_to_i64(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Render a cell as text; null becomes the empty string.
///
/// Integral floats drop their fraction (`10.0` → `"10"`), so numeric cells that a spreadsheet
/// stored as floats read the way they were typed.
pub fn to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Utf8(s) => s.clone(),
        Value::Int64(i) => i.to_string(),
        Value::Float64(f) => match float_to_i64(*f) {
            Some(i) => i.to_string(),
            None => f.to_string(),
        },
        Value::Bool(b) => b.to_string(),
    }
}
