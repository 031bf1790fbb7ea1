// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Station info response parsing.

use serde::{Deserialize, Serialize};

use crate::error::{DeviceError, Error, ParseError};
use crate::protocol::Payload;
use crate::types::Status;

use super::lenient;

/// Snapshot of a station's state, from `/station/get/info`.
///
/// Every field has a default used when the station omits the key, so a
/// partial payload still produces a complete snapshot. Booleans default to
/// `false` (except `is_up_to_date`, which defaults to `true`), numbers to
/// `0`, and text fields to `"Unknown"` (`"unknown"` for the MAC address,
/// empty for `last_charge`).
///
/// The same defaults apply when a key is present but unusable (`null`, or a
/// value of the wrong type). Values that convert without loss are accepted:
/// `24.0` or `"24"` for an integer field, `0`/`1` or `"true"` for a boolean.
///
/// # Examples
///
/// ```
/// use technove::{StationInfo, Status};
///
/// let json = serde_json::json!({
///     "name": "Garage",
///     "maxStationCurrent": 32,
///     "status": 67
/// });
/// let info = StationInfo::from_json(&json).unwrap();
///
/// assert_eq!(info.name, "Garage");
/// assert_eq!(info.max_station_current, 32);
/// assert_eq!(info.status, Status::PluggedCharging);
/// assert_eq!(info.version, "Unknown");
/// assert!(info.is_manual_charging_allowed());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StationInfo {
    /// Whether the station manages charging automatically.
    #[serde(rename = "auto_charge", deserialize_with = "lenient::or_default")]
    pub auto_charge: bool,

    /// Whether the sharing group configuration conflicts with this station.
    #[serde(deserialize_with = "lenient::or_default")]
    pub conflict_in_sharing_config: bool,

    /// Current being delivered, in amperes.
    #[serde(deserialize_with = "lenient::or_default")]
    pub current: f64,

    /// Energy delivered during the current session, in kWh.
    #[serde(deserialize_with = "lenient::or_default")]
    pub energy_session: f64,

    /// Energy delivered since installation, in kWh.
    #[serde(deserialize_with = "lenient::or_default")]
    pub energy_total: f64,

    /// Whether the high-rate period is active.
    #[serde(deserialize_with = "lenient::or_default")]
    pub high_charge_period_active: bool,

    /// MAC address of the station.
    #[serde(rename = "id", deserialize_with = "lenient::mac_or_unknown")]
    pub mac_address: String,

    /// Whether the max current is managed by a sharing group.
    #[serde(deserialize_with = "lenient::or_default")]
    pub in_sharing_mode: bool,

    /// Whether battery protection is enabled.
    #[serde(deserialize_with = "lenient::or_default")]
    pub is_battery_protected: bool,

    /// Whether a charging session is in progress.
    #[serde(deserialize_with = "lenient::or_default")]
    pub is_session_active: bool,

    /// Whether the station uses a static IP address.
    #[serde(deserialize_with = "lenient::or_default")]
    pub is_static_ip: bool,

    /// Whether the firmware is up to date.
    #[serde(deserialize_with = "lenient::or_true")]
    pub is_up_to_date: bool,

    /// Timestamp of the last charge, as reported.
    #[serde(deserialize_with = "lenient::or_default")]
    pub last_charge: String,

    /// Maximum charge percentage.
    #[serde(rename = "maxChargePourcentage", deserialize_with = "lenient::or_default")]
    pub max_charge_percentage: f64,

    /// Configured max current, in amperes.
    #[serde(deserialize_with = "lenient::or_default")]
    pub max_current: u32,

    /// Highest max current the station is rated for, in amperes.
    #[serde(deserialize_with = "lenient::or_default")]
    pub max_station_current: u32,

    /// Station name.
    #[serde(deserialize_with = "lenient::or_unknown")]
    pub name: String,

    /// SSID of the Wi-Fi network.
    #[serde(rename = "network_ssid", deserialize_with = "lenient::or_unknown")]
    pub network_ssid: String,

    /// Whether the normal-rate period is active.
    #[serde(deserialize_with = "lenient::or_default")]
    pub normal_period_active: bool,

    /// Wi-Fi signal strength, in dBm.
    #[serde(deserialize_with = "lenient::or_default")]
    pub rssi: i32,

    /// Operational status.
    pub status: Status,

    /// Station clock.
    #[serde(deserialize_with = "lenient::or_default")]
    pub time: u64,

    /// Firmware version.
    #[serde(deserialize_with = "lenient::or_unknown")]
    pub version: String,

    /// Input voltage, in volts.
    #[serde(deserialize_with = "lenient::or_default")]
    pub voltage_in: u32,

    /// Output voltage, in volts.
    #[serde(deserialize_with = "lenient::or_default")]
    pub voltage_out: u32,
}

impl StationInfo {
    /// Builds a snapshot from a decoded `/station/get/info` document.
    ///
    /// # Errors
    ///
    /// - [`DeviceError::EmptyResponse`] if the document is null or an empty object
    /// - [`ParseError::UnexpectedFormat`] if it is not a JSON object
    pub fn from_json(value: &serde_json::Value) -> Result<Self, Error> {
        match value {
            serde_json::Value::Null => Err(DeviceError::EmptyResponse.into()),
            serde_json::Value::Object(map) if map.is_empty() => {
                Err(DeviceError::EmptyResponse.into())
            }
            serde_json::Value::Object(_) => Self::deserialize(value)
                .map_err(|e| ParseError::Json(e).into()),
            other => Err(ParseError::UnexpectedFormat(format!(
                "expected a JSON object, got {other}"
            ))
            .into()),
        }
    }

    /// Builds a snapshot from a transport payload.
    ///
    /// # Errors
    ///
    /// - [`DeviceError::EmptyResponse`] if the payload is empty
    /// - [`ParseError::UnexpectedFormat`] if the payload is not a JSON object
    pub fn from_payload(payload: &Payload) -> Result<Self, Error> {
        if payload.is_empty() {
            return Err(DeviceError::EmptyResponse.into());
        }

        match payload {
            Payload::Json(value) => Self::from_json(value),
            Payload::Text(text) => Err(ParseError::UnexpectedFormat(format!(
                "expected JSON, got text: {text}"
            ))
            .into()),
        }
    }

    /// Returns `true` if charging can be started or stopped by hand.
    ///
    /// Manual control is rejected while auto-charge is enabled.
    #[must_use]
    pub fn is_manual_charging_allowed(&self) -> bool {
        !self.auto_charge
    }

    /// Returns `true` if the max current can be set on this station.
    ///
    /// In sharing mode the max current is managed by the sharing group.
    #[must_use]
    pub fn is_max_current_configurable(&self) -> bool {
        !self.in_sharing_mode
    }
}

impl Default for StationInfo {
    fn default() -> Self {
        Self {
            auto_charge: false,
            conflict_in_sharing_config: false,
            current: 0.0,
            energy_session: 0.0,
            energy_total: 0.0,
            high_charge_period_active: false,
            mac_address: "unknown".to_string(),
            in_sharing_mode: false,
            is_battery_protected: false,
            is_session_active: false,
            is_static_ip: false,
            is_up_to_date: true,
            last_charge: String::new(),
            max_charge_percentage: 0.0,
            max_current: 0,
            max_station_current: 0,
            name: "Unknown".to_string(),
            network_ssid: "Unknown".to_string(),
            normal_period_active: false,
            rssi: 0,
            status: Status::Unknown,
            time: 0,
            version: "Unknown".to_string(),
            voltage_in: 0,
            voltage_out: 0,
        }
    }
}
