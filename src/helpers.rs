//! Lenient deserializers for IPMA payloads.
//!
//! The live API is inconsistent about numeric encoding: the same field can
//! arrive as a JSON number in one file and as a quoted string in another
//! (`"precipitaProb": "20.0"`, `"latitude": "40.6413"`). These helpers accept
//! either form so the domain types can stay strongly typed.
//!
//! Use with `#[serde(deserialize_with = "...")]`.

use serde::de::{self, Deserializer};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Deserialize an `f64` from a JSON number or a numeric string.
///
/// Non-finite values (`"NaN"`, `"inf"`) are rejected.
pub(crate) fn f64_from_number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let v = match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Int(i) => i as f64,
        NumberOrString::Float(f) => f,
        NumberOrString::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("invalid number '{}'", s)))?,
    };
    if !v.is_finite() {
        return Err(de::Error::custom(format!("non-finite number {}", v)));
    }
    Ok(v)
}

/// Deserialize an `i64` from a JSON integer or an integer string.
///
/// Floats are accepted only when they carry no fractional part (`5.0`) and
/// fit in an `i64`.
pub(crate) fn i64_from_number_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Int(i) => Ok(i),
        NumberOrString::Float(f)
            if f.is_finite()
                && f.fract() == 0.0
                && f >= i64::MIN as f64
                && f < i64::MAX as f64 =>
        {
            Ok(f as i64)
        }
        NumberOrString::Float(f) => Err(de::Error::custom(format!("expected integer, got {}", f))),
        NumberOrString::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| de::Error::custom(format!("invalid integer '{}'", s))),
    }
}

/// Deserialize a `String` from a JSON string or number (warning area codes
/// are strings like `"AVR"` upstream but numeric in older payloads).
pub(crate) fn string_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Int(i) => i.to_string(),
        NumberOrString::Float(f) => f.to_string(),
        NumberOrString::Text(s) => s,
    })
}
