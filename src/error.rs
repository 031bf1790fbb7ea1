// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `technove` library.
//!
//! [`Error`] is the single error type returned by every fallible operation.
//! Match on it as a whole for coarse handling, or on its variants for
//! fine-grained recovery:
//!
//! - [`Error::Connection`]: the station could not be reached. Already retried
//!   by the transport before it surfaces. [`ConnectionError::Timeout`] is the
//!   timeout case.
//! - [`Error::OutOfBound`]: a requested value is outside what the station
//!   accepts. Nothing was sent.
//! - [`Error::Device`]: the station answered with an error status, returned
//!   no data, or the command conflicts with the station's current mode.
//! - [`Error::Parse`]: the station answered with something we cannot read.

use std::time::Duration;

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// The station rejected the request or refused the command.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),

    /// A requested value is outside the range accepted by the station.
    #[error("value out of bound: {0}")]
    OutOfBound(#[from] OutOfBoundError),

    /// Network-level failure talking to the station.
    #[error("connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// The station's response could not be decoded.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

impl Error {
    /// Returns `true` for network-level failures, timeouts included.
    ///
    /// This is the predicate the transport retries on.
    #[must_use]
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns `true` if the request timed out.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Connection(ConnectionError::Timeout { .. }))
    }

    /// Returns `true` if a value was rejected before being sent.
    #[must_use]
    pub fn is_out_of_bound(&self) -> bool {
        matches!(self, Self::OutOfBound(_))
    }

    /// Returns the HTTP status code of an error response, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Device(DeviceError::UnexpectedResponse { status, .. }) => Some(*status),
            _ => None,
        }
    }

    /// Returns the decoded body of an error response, if any.
    #[must_use]
    pub fn response_body(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Device(DeviceError::UnexpectedResponse { body, .. }) => Some(body),
            _ => None,
        }
    }
}

/// Errors reported by, or about the state of, the station itself.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The station answered with a 4xx or 5xx status.
    ///
    /// `body` holds the decoded JSON error document, or `{"message": ...}`
    /// wrapping the raw text when the station did not answer with JSON.
    #[error("unexpected response from station: HTTP {status}: {body}")]
    UnexpectedResponse {
        /// HTTP status code.
        status: u16,
        /// Decoded response body.
        body: serde_json::Value,
    },

    /// The station answered successfully but with an empty payload.
    #[error("no data was returned by the station")]
    EmptyResponse,

    /// Charging cannot be started or stopped manually in auto-charge mode.
    #[error("cannot start or stop charging when auto-charge is enabled")]
    AutoChargeEnabled,

    /// The max current is managed by the sharing group.
    #[error("cannot set the max current when sharing mode is enabled")]
    SharingModeEnabled,
}

/// A value outside the range the station accepts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OutOfBoundError {
    /// Below the minimum the station accepts.
    #[error("max current needs to be at least {min}, got {actual}")]
    BelowMinimum {
        /// Minimum accepted value.
        min: u32,
        /// The value that was provided.
        actual: u32,
    },

    /// Above the maximum the station is rated for.
    #[error("max current needs to be equal or lower than {max}, got {actual}")]
    AboveMaximum {
        /// Maximum accepted value.
        max: u32,
        /// The value that was provided.
        actual: u32,
    },
}

/// Network-level failures.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The request could not be sent or its response could not be received.
    #[error("error occurred while communicating with station at {host}: {source}")]
    Request {
        /// Station address.
        host: String,
        /// Underlying HTTP client error.
        #[source]
        source: reqwest::Error,
    },

    /// The request did not complete within the configured timeout.
    #[error("timeout occurred while connecting to station at {host} ({} ms)", .timeout.as_millis())]
    Timeout {
        /// Station address.
        host: String,
        /// The timeout that expired.
        timeout: Duration,
    },
}

/// Errors related to decoding station responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The response does not have the expected shape.
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
