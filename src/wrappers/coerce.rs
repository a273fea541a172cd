use crate::de::{Decode, Decoder};
use crate::error::DecodeError;
use crate::value::Value;

/// Interpret a string as a boolean.
///
/// `"true"`, `"yes"`, `"1"`, `"y"` and `"t"` are true, `"false"`, `"no"`,
/// `"0"`, `"n"` and `"f"` are false (case-insensitive). Any other string is
/// true when it parses as a nonzero number and false when it parses as zero.
pub fn truthiness(s: &str) -> Option<bool> {
    let lower = s.trim().to_lowercase();
    match lower.as_str() {
        "true" | "yes" | "1" | "y" | "t" => Some(true),
        "false" | "no" | "0" | "n" | "f" => Some(false),
        other => other
            .parse::<f64>()
            .ok()
            .filter(|n| !n.is_nan())
            .map(|n| n != 0.0),
    }
}

/// Decode a boolean, accepting integers and truthy strings when the value
/// is not a boolean at all.
///
/// Only a type mismatch triggers the retry; absent and null values fail as
/// they would for a plain `bool`.
pub fn decode_bool_coercing(decoder: &Decoder<'_>) -> Result<bool, DecodeError> {
    let error = match bool::decode(decoder) {
        Ok(v) => return Ok(v),
        Err(e) if e.is_type_mismatch() => e,
        Err(e) => return Err(e),
    };
    if let Ok(n) = i64::decode(decoder) {
        return Ok(n != 0);
    }
    match decoder.raw() {
        Some(Value::String(s)) => truthiness(s).ok_or(error),
        _ => Err(error),
    }
}
