// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Operational status of a charging station.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Operational status reported by the station.
///
/// The station reports its status as a small integer code. Any code outside
/// the known table, a missing code, or a value that is not an integer maps to
/// [`Status::Unknown`]; building a `Status` never fails.
///
/// # Examples
///
/// ```
/// use technove::Status;
///
/// assert_eq!(Status::from_code(Some(67)), Status::PluggedCharging);
/// assert_eq!(Status::from_code(Some(42)), Status::Unknown);
/// assert_eq!(Status::from_code(None), Status::Unknown);
///
/// assert_eq!(Status::PluggedCharging.code(), Some(67));
/// assert_eq!(Status::PluggedCharging.to_string(), "plugged_charging");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    /// Unknown or unreported status.
    #[default]
    Unknown,
    /// No vehicle plugged in (65).
    Unplugged,
    /// Vehicle plugged in, waiting (66).
    PluggedWaiting,
    /// Vehicle plugged in and charging (67).
    PluggedCharging,
    /// Outside the configured activation period (83).
    OutOfActivationPeriod,
    /// Inside the high-rate charging period (84).
    HighChargePeriod,
}

impl Status {
    /// Maps a station status code to a `Status`.
    #[must_use]
    pub const fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(65) => Self::Unplugged,
            Some(66) => Self::PluggedWaiting,
            Some(67) => Self::PluggedCharging,
            Some(83) => Self::OutOfActivationPeriod,
            Some(84) => Self::HighChargePeriod,
            _ => Self::Unknown,
        }
    }

    /// Maps a raw JSON value to a `Status`.
    ///
    /// Only integer values are looked up; strings, floats, booleans and
    /// null all map to [`Status::Unknown`].
    #[must_use]
    pub fn from_value(value: &serde_json::Value) -> Self {
        Self::from_code(value.as_i64())
    }

    /// Returns the station code, or `None` for [`Status::Unknown`].
    #[must_use]
    pub const fn code(self) -> Option<u8> {
        match self {
            Self::Unknown => None,
            Self::Unplugged => Some(65),
            Self::PluggedWaiting => Some(66),
            Self::PluggedCharging => Some(67),
            Self::OutOfActivationPeriod => Some(83),
            Self::HighChargePeriod => Some(84),
        }
    }

    /// Returns a snake-case label for the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Unplugged => "unplugged",
            Self::PluggedWaiting => "plugged_waiting",
            Self::PluggedCharging => "plugged_charging",
            Self::OutOfActivationPeriod => "out_of_activation_period",
            Self::HighChargePeriod => "high_charge_period",
        }
    }

    /// Returns `true` if a vehicle is plugged in.
    #[must_use]
    pub const fn is_plugged(self) -> bool {
        matches!(self, Self::PluggedWaiting | Self::PluggedCharging)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.code().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn known_codes() {
        assert_eq!(Status::from_code(Some(65)), Status::Unplugged);
        assert_eq!(Status::from_code(Some(66)), Status::PluggedWaiting);
        assert_eq!(Status::from_code(Some(67)), Status::PluggedCharging);
        assert_eq!(Status::from_code(Some(83)), Status::OutOfActivationPeriod);
        assert_eq!(Status::from_code(Some(84)), Status::HighChargePeriod);
    }

    #[test]
    fn unknown_codes_fall_back() {
        assert_eq!(Status::from_code(None), Status::Unknown);
        assert_eq!(Status::from_code(Some(42)), Status::Unknown);
        assert_eq!(Status::from_code(Some(-1)), Status::Unknown);
        assert_eq!(Status::from_code(Some(1234)), Status::Unknown);
    }

    #[test]
    fn code_round_trips_through_table() {
        for status in [
            Status::Unplugged,
            Status::PluggedWaiting,
            Status::PluggedCharging,
            Status::OutOfActivationPeriod,
            Status::HighChargePeriod,
        ] {
            let code = status.code().map(i64::from);
            assert_eq!(Status::from_code(code), status);
        }
        assert_eq!(Status::Unknown.code(), None);
    }

    #[test]
    fn non_integer_values_are_unknown() {
        assert_eq!(Status::from_value(&json!("1234")), Status::Unknown);
        assert_eq!(Status::from_value(&json!("67")), Status::Unknown);
        assert_eq!(Status::from_value(&json!(67.5)), Status::Unknown);
        assert_eq!(Status::from_value(&json!(null)), Status::Unknown);
        assert_eq!(Status::from_value(&json!(67)), Status::PluggedCharging);
    }

    #[test]
    fn display() {
        assert_eq!(Status::Unknown.to_string(), "unknown");
        assert_eq!(
            Status::OutOfActivationPeriod.to_string(),
            "out_of_activation_period"
        );
    }

    #[test]
    fn plugged() {
        assert!(Status::PluggedWaiting.is_plugged());
        assert!(Status::PluggedCharging.is_plugged());
        assert!(!Status::Unplugged.is_plugged());
        assert!(!Status::Unknown.is_plugged());
    }

    #[test]
    fn serde_uses_station_codes() {
        assert_eq!(serde_json::to_value(Status::Unplugged).unwrap(), json!(65));
        assert_eq!(serde_json::to_value(Status::Unknown).unwrap(), json!(null));

        let status: Status = serde_json::from_value(json!(84)).unwrap();
        assert_eq!(status, Status::HighChargePeriod);
        let status: Status = serde_json::from_value(json!("weird")).unwrap();
        assert_eq!(status, Status::Unknown);
    }
}
