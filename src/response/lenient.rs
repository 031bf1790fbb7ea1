// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Lenient field deserializers for station responses.
//!
//! Stations are not consistent about value types: integers sometimes arrive
//! as floats (`24.0`) or strings, and fields are sometimes `null`. These
//! helpers coerce what can be converted without loss and fall back to the
//! field default for everything else, so one odd field never makes a whole
//! snapshot unreadable.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A type that can be read from an arbitrary JSON value.
pub(crate) trait Coerce: Sized {
    /// Converts `value`, or returns `None` if it cannot be done without loss.
    fn coerce(value: &Value) -> Option<Self>;
}

impl Coerce for bool {
    fn coerce(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::Number(_) => match integer(value)? {
                0 => Some(false),
                1 => Some(true),
                _ => None,
            },
            Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }
}

impl Coerce for f64 {
    fn coerce(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok().filter(|f: &f64| f.is_finite()),
            _ => None,
        }
    }
}

impl Coerce for u32 {
    fn coerce(value: &Value) -> Option<Self> {
        integer(value).and_then(|n| n.try_into().ok())
    }
}

impl Coerce for i32 {
    fn coerce(value: &Value) -> Option<Self> {
        integer(value).and_then(|n| n.try_into().ok())
    }
}

impl Coerce for u64 {
    fn coerce(value: &Value) -> Option<Self> {
        integer(value).and_then(|n| n.try_into().ok())
    }
}

impl Coerce for String {
    fn coerce(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Reads an integral value from an integer, an integral float or a numeric
/// string.
#[allow(clippy::float_cmp, clippy::cast_possible_truncation)]
fn integer(value: &Value) -> Option<i128> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(i.into());
            }
            if let Some(u) = n.as_u64() {
                return Some(u.into());
            }
            // Integral and bounded well inside i128, so the cast is exact
            n.as_f64()
                .filter(|f| f.is_finite() && f.trunc() == *f && f.abs() < 1e18)
                .map(|f| f as i128)
        }
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn coerced<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Coerce,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::coerce(&value))
}

/// Deserializes any value, falling back to `T::default()`.
pub(crate) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Coerce + Default,
{
    Ok(coerced(deserializer)?.unwrap_or_default())
}

/// Deserializes a boolean, falling back to `true`.
pub(crate) fn or_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(coerced(deserializer)?.unwrap_or(true))
}

/// Deserializes a string, falling back to `"Unknown"`.
pub(crate) fn or_unknown<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(coerced(deserializer)?.unwrap_or_else(|| "Unknown".to_string()))
}

/// Deserializes a MAC address, falling back to `"unknown"`.
pub(crate) fn mac_or_unknown<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(coerced(deserializer)?.unwrap_or_else(|| "unknown".to_string()))
}
