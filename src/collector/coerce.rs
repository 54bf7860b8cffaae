//! 느슨한 타입의 JSON 필드 변환
//!
//! Management REST responses omit fields or change their types between server
//! releases. Every extraction goes through these total functions so that a
//! missing or mistyped field becomes a sentinel value instead of an error.

use serde_json::Value;

/// Field present but empty
pub const NO_DATA: &str = "NO_DATA";

/// Field absent or of an unexpected type
pub const DATA_ERROR: &str = "DATA_ERROR";

/// Numeric sentinel for integer fields
pub const INT_SENTINEL: i64 = -1;

/// Numeric sentinel for float fields
pub const FLOAT_SENTINEL: f64 = -1.0;

const BYTES_PER_MEGABYTE: f64 = 1_000_000.0;

/// 문자열 필드 변환
pub fn coerce_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) if s.is_empty() => NO_DATA.to_string(),
        Some(Value::String(s)) => s.clone(),
        _ => DATA_ERROR.to_string(),
    }
}

/// 정수 필드 변환
///
/// The REST API serializes counters as doubles on some releases, so finite
/// floats are truncated toward zero.
pub fn coerce_int(value: Option<&Value>) -> i64 {
    let Some(Value::Number(n)) = value else {
        return INT_SENTINEL;
    };

    if let Some(i) = n.as_i64() {
        return i;
    }

    match n.as_f64() {
        Some(f) if f.is_finite() && f.abs() < i64::MAX as f64 => f.trunc() as i64,
        _ => INT_SENTINEL,
    }
}

/// 실수 필드 변환
pub fn coerce_float(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(FLOAT_SENTINEL),
        _ => FLOAT_SENTINEL,
    }
}

/// 바이트 단위 힙 크기를 MB로 변환 (소수점 버림)
pub fn scale_bytes_to_megabytes(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) if f.is_finite() => (f / BYTES_PER_MEGABYTE).trunc() as i64,
            _ => INT_SENTINEL,
        },
        _ => INT_SENTINEL,
    }
}

/// 불리언 필드 변환
///
/// Accepts JSON booleans and the strings "true"/"false"; anything else is
/// reported as `false`.
pub fn coerce_bool(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// 구조화된 값(health symptoms 등)을 텍스트로 변환
///
/// Strings pass through like [`coerce_string`]; arrays, objects, numbers and
/// booleans are rendered as compact JSON. Empty collections count as empty.
pub fn coerce_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => DATA_ERROR.to_string(),
        Some(Value::String(_)) => coerce_string(value),
        Some(Value::Array(items)) if items.is_empty() => NO_DATA.to_string(),
        Some(Value::Object(map)) if map.is_empty() => NO_DATA.to_string(),
        Some(other) => other.to_string(),
    }
}
