// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Session with a single TechnoVE station.
//!
//! A [`Station`] pairs the HTTP transport with the last snapshot read from
//! the station. Commands check their preconditions against that cached
//! snapshot before anything is sent, so a command that the station would
//! silently ignore (or that conflicts with its current mode) is rejected
//! locally. Commands never refresh the snapshot themselves; call
//! [`Station::update`] for that.
//!
//! # Concurrency
//!
//! All operations take `&mut self`: a session runs one operation at a time.
//! Share it between tasks behind a lock if needed.

use reqwest::Method;
use serde_json::json;

use crate::error::{DeviceError, OutOfBoundError, Result};
use crate::protocol::{HttpClient, HttpConfig, Payload};
use crate::response::StationInfo;

/// Lowest max current accepted by a station, in amperes.
///
/// The station silently ignores lower values, so they are rejected locally.
pub const MIN_CURRENT: u32 = 8;

const INFO_PATH: &str = "/station/get/info";
const AUTO_CHARGE_PATH: &str = "/station/set/automatic";
const START_CHARGING_PATH: &str = "/station/control/start";
const STOP_CHARGING_PATH: &str = "/station/control/stop";
const MAX_CURRENT_PATH: &str = "/station/control/partage";
const HIGH_RATE_SCHEDULE_PATH: &str = "/station/schedule/high/activate";

/// A TechnoVE charging station.
///
/// # Examples
///
/// ```no_run
/// use technove::Station;
///
/// # async fn example() -> technove::Result<()> {
/// let mut station = Station::new("192.168.1.100");
///
/// let info = station.update().await?;
/// println!("{} is {}", info.name, info.status);
///
/// station.set_max_current(16).await?;
/// station.close();
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Station {
    transport: HttpClient,
    info: Option<StationInfo>,
}

impl Station {
    /// Creates a session for the station at `host` with default settings.
    ///
    /// No connection is made until the first request.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self::from_config(HttpConfig::new(host))
    }

    /// Creates a session from a full configuration.
    #[must_use]
    pub fn from_config(config: HttpConfig) -> Self {
        Self {
            transport: config.into_client(),
            info: None,
        }
    }

    /// Creates a session that uses a caller-supplied `reqwest::Client`.
    ///
    /// The session never releases a client it did not create, so the same
    /// client can be shared between sessions.
    #[must_use]
    pub fn with_client(config: HttpConfig, client: reqwest::Client) -> Self {
        Self {
            transport: config.into_client_with(client),
            info: None,
        }
    }

    /// Returns the station address.
    #[must_use]
    pub fn host(&self) -> &str {
        self.transport.config().host()
    }

    /// Returns the underlying transport.
    #[must_use]
    pub fn transport(&self) -> &HttpClient {
        &self.transport
    }

    /// Returns the last snapshot read by [`update`](Self::update), if any.
    #[must_use]
    pub fn info(&self) -> Option<&StationInfo> {
        self.info.as_ref()
    }

    /// Replaces the cached snapshot without contacting the station.
    ///
    /// Useful to restore a snapshot saved earlier; command preconditions are
    /// checked against it.
    pub fn set_info(&mut self, info: StationInfo) {
        self.info = Some(info);
    }

    /// Sends a raw request to the station.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn request(
        &mut self,
        path: &str,
        method: Method,
        body: Option<&serde_json::Value>,
    ) -> Result<Payload> {
        self.transport.request(path, method, body).await
    }

    /// Reads the full station state and caches it.
    ///
    /// The cached snapshot is replaced as a whole; nothing from the previous
    /// snapshot is kept.
    ///
    /// # Errors
    ///
    /// - [`DeviceError::EmptyResponse`] if the station returned no data
    /// - any error from [`HttpClient::request`] or [`StationInfo::from_payload`]
    pub async fn update(&mut self) -> Result<StationInfo> {
        let payload = self.request(INFO_PATH, Method::GET, None).await?;
        let info = StationInfo::from_payload(&payload)?;

        tracing::info!(
            host = %self.host(),
            name = %info.name,
            status = %info.status,
            "Station info updated"
        );

        self.info = Some(info.clone());
        Ok(info)
    }

    /// Enables or disables auto-charge.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn set_auto_charge(&mut self, enabled: bool) -> Result<()> {
        let body = json!({ "activated": enabled });
        self.request(AUTO_CHARGE_PATH, Method::POST, Some(&body)).await?;
        Ok(())
    }

    /// Starts or stops charging.
    ///
    /// Only allowed while auto-charge is disabled.
    ///
    /// # Errors
    ///
    /// - [`DeviceError::AutoChargeEnabled`] if the cached snapshot has
    ///   auto-charge enabled; nothing is sent
    /// - any error from the request
    pub async fn set_charging_enabled(&mut self, enabled: bool) -> Result<()> {
        if self
            .info
            .as_ref()
            .is_some_and(|info| !info.is_manual_charging_allowed())
        {
            return Err(DeviceError::AutoChargeEnabled.into());
        }

        let path = if enabled {
            START_CHARGING_PATH
        } else {
            STOP_CHARGING_PATH
        };
        self.request(path, Method::GET, None).await?;
        Ok(())
    }

    /// Sets the max current the station may deliver, in amperes.
    ///
    /// The value must be at least [`MIN_CURRENT`] and at most the cached
    /// `max_station_current`. Without a cached snapshot only the lower bound
    /// is checked.
    ///
    /// # Errors
    ///
    /// Checked in this order, nothing is sent on failure:
    /// - [`DeviceError::SharingModeEnabled`] if the station is in sharing mode
    /// - [`OutOfBoundError::BelowMinimum`] if below [`MIN_CURRENT`]
    /// - [`OutOfBoundError::AboveMaximum`] if above `max_station_current`
    ///
    /// Otherwise, any error from the request.
    pub async fn set_max_current(&mut self, max_current: u32) -> Result<()> {
        check_max_current(self.info.as_ref(), max_current)?;

        let body = json!({ "stationNumber": 1, "current": max_current });
        self.request(MAX_CURRENT_PATH, Method::POST, Some(&body)).await?;
        Ok(())
    }

    /// Enables or disables the high-rate schedule.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn set_high_rate_schedule(&mut self, enabled: bool) -> Result<()> {
        let body = json!({ "activated": enabled });
        self.request(HIGH_RATE_SCHEDULE_PATH, Method::POST, Some(&body)).await?;
        Ok(())
    }

    /// Releases the HTTP client if this session created it.
    ///
    /// A client passed to [`with_client`](Self::with_client) is left alone.
    /// Dropping the session has the same effect.
    pub fn close(&mut self) {
        self.transport.close();
    }

    /// Runs `f` with this session, then closes it.
    ///
    /// The session is closed whatever `f` returns. If `f` panics the session
    /// is dropped during unwinding, which releases an owned client as well.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use technove::Station;
    ///
    /// # async fn example() -> technove::Result<()> {
    /// let name = Station::new("192.168.1.100")
    ///     .scoped(async |station| station.update().await.map(|info| info.name))
    ///     .await?;
    /// println!("{name}");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn scoped<F, R>(mut self, f: F) -> R
    where
        F: AsyncFnOnce(&mut Self) -> R,
    {
        let output = f(&mut self).await;
        self.close();
        output
    }
}

fn check_max_current(info: Option<&StationInfo>, max_current: u32) -> Result<()> {
    if info.is_some_and(|info| !info.is_max_current_configurable()) {
        return Err(DeviceError::SharingModeEnabled.into());
    }

    if max_current < MIN_CURRENT {
        return Err(OutOfBoundError::BelowMinimum {
            min: MIN_CURRENT,
            actual: max_current,
        }
        .into());
    }

    if let Some(info) = info
        && max_current > info.max_station_current
    {
        return Err(OutOfBoundError::AboveMaximum {
            max: info.max_station_current,
            actual: max_current,
        }
        .into());
    }

    Ok(())
}
