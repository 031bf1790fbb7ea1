// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `technove` - An async Rust client for TechnoVE EV charging stations.
//!
//! TechnoVE stations expose a small JSON API over plain HTTP on the local
//! network. This library reads the station state and sends the few commands
//! the station supports, rejecting locally the commands the station would
//! refuse or ignore.
//!
//! # Supported Features
//!
//! - **Status**: Full station snapshot (current, limits, energy, network,
//!   firmware, operational status)
//! - **Auto-charge**: Enable or disable automatic charging
//! - **Manual charging**: Start or stop charging (when auto-charge is off)
//! - **Max current**: Set the current limit (outside sharing mode)
//! - **High-rate schedule**: Enable or disable the high-rate period
//!
//! # Quick Start
//!
//! ```no_run
//! use technove::Station;
//!
//! #[tokio::main]
//! async fn main() -> technove::Result<()> {
//!     let mut station = Station::new("192.168.1.100");
//!
//!     let info = station.update().await?;
//!     println!("{} ({}) is {}", info.name, info.version, info.status);
//!
//!     if info.is_manual_charging_allowed() {
//!         station.set_charging_enabled(true).await?;
//!     }
//!
//!     station.close();
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! ```no_run
//! use std::time::Duration;
//! use technove::{HttpConfig, RetryPolicy, Station};
//!
//! # async fn example() -> technove::Result<()> {
//! let config = HttpConfig::new("192.168.1.100")
//!     .with_timeout(Duration::from_secs(3))
//!     .with_retry_policy(RetryPolicy::new().with_max_attempts(5));
//!
//! let mut station = Station::from_config(config);
//! station.update().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! Every operation returns [`Error`]. Connection failures are retried before
//! they surface; everything else surfaces immediately.
//!
//! ```no_run
//! use technove::{Error, Station};
//!
//! # async fn example() {
//! let mut station = Station::new("192.168.1.100");
//!
//! match station.set_max_current(64).await {
//!     Ok(()) => println!("done"),
//!     Err(Error::OutOfBound(e)) => println!("rejected: {e}"),
//!     Err(e) if e.is_connection() => println!("station unreachable: {e}"),
//!     Err(e) => println!("failed: {e}"),
//! }
//! # }
//! ```

pub mod error;
pub mod protocol;
pub mod response;
mod station;
pub mod types;

pub use error::{ConnectionError, DeviceError, Error, OutOfBoundError, ParseError, Result};
pub use protocol::{HttpClient, HttpConfig, Payload, RetryPolicy};
pub use response::StationInfo;
pub use station::{MIN_CURRENT, Station};
pub use types::Status;
