// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport layer for talking to a TechnoVE station.
//!
//! The station serves a small JSON API over plain HTTP. This module provides:
//!
//! - [`HttpClient`]: sends one request, bounded by a timeout and retried on
//!   connection failures, and classifies the response
//! - [`HttpConfig`]: address, port, timeout and retry settings
//! - [`RetryPolicy`] and [`retry`]: the retry-with-backoff combinator the
//!   client is built on
//! - [`Payload`]: the decoded body of a successful response

mod http;
mod retry;

pub use http::{HttpClient, HttpConfig};
pub use retry::{RetryPolicy, retry};

/// Decoded body of a successful station response.
///
/// The station answers with JSON for queries and with short plain-text
/// acknowledgements for most commands. Which variant is produced depends on
/// the response `Content-Type`.
///
/// # Examples
///
/// ```
/// use technove::protocol::Payload;
///
/// let payload = Payload::Json(serde_json::json!({"name": "garage"}));
/// assert_eq!(payload.as_json().unwrap()["name"], "garage");
/// assert!(!payload.is_empty());
///
/// assert!(Payload::Text(String::new()).is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Body decoded as JSON.
    Json(serde_json::Value),
    /// Body returned as raw text.
    Text(String),
}

impl Payload {
    /// Returns `true` if the payload carries no data.
    ///
    /// Null, `false`, zero, empty objects, empty arrays and empty strings all
    /// count as empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Json(serde_json::Value::Null | serde_json::Value::Bool(false)) => true,
            Self::Json(serde_json::Value::Number(n)) => n.as_f64().is_some_and(|f| f == 0.0),
            Self::Json(serde_json::Value::Object(map)) => map.is_empty(),
            Self::Json(serde_json::Value::Array(items)) => items.is_empty(),
            Self::Json(serde_json::Value::String(s)) | Self::Text(s) => s.is_empty(),
            Self::Json(_) => false,
        }
    }

    /// Returns the JSON value, if the body was JSON.
    #[must_use]
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    /// Returns the raw text, if the body was not JSON.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Json(_) => None,
        }
    }
}
