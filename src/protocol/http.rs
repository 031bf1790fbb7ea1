// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP transport for TechnoVE stations.

use std::borrow::Cow;
use std::net::Ipv6Addr;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, Response};

use crate::error::{ConnectionError, DeviceError, Error, ParseError, Result};
use crate::protocol::{Payload, RetryPolicy, retry};

const ACCEPT_VALUE: &str = "application/json, text/plain, */*";

// ============================================================================
// HttpConfig - Connection settings for a station
// ============================================================================

/// Configuration for reaching a TechnoVE station.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use technove::protocol::{HttpConfig, RetryPolicy};
///
/// // Simple configuration
/// let config = HttpConfig::new("192.168.1.100");
/// assert_eq!(config.base_url(), "http://192.168.1.100");
///
/// // With all options
/// let config = HttpConfig::new("192.168.1.100")
///     .with_port(8080)
///     .with_timeout(Duration::from_secs(5))
///     .with_retry_policy(RetryPolicy::disabled());
/// assert_eq!(config.base_url(), "http://192.168.1.100:8080");
/// ```
#[derive(Debug, Clone)]
pub struct HttpConfig {
    host: String,
    port: u16,
    timeout: Duration,
    retry_policy: RetryPolicy,
}

impl HttpConfig {
    /// Default HTTP port.
    pub const DEFAULT_PORT: u16 = 80;
    /// Default timeout for a single attempt.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

    /// Creates a new configuration for the station at `host`.
    ///
    /// # Arguments
    ///
    /// * `host` - The hostname or IP address of the station
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            timeout: Self::DEFAULT_TIMEOUT,
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the timeout applied to each attempt.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry policy for connection failures.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the per-attempt timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the retry policy.
    #[must_use]
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Builds the base URL from this configuration.
    #[must_use]
    pub fn base_url(&self) -> String {
        let host = url_host(&self.host);
        if self.port == Self::DEFAULT_PORT {
            format!("http://{host}")
        } else {
            format!("http://{host}:{}", self.port)
        }
    }

    /// Creates an `HttpClient` that builds and owns its connection pool.
    ///
    /// The underlying `reqwest::Client` is created on the first request.
    #[must_use]
    pub fn into_client(self) -> HttpClient {
        HttpClient {
            base_url: self.base_url(),
            config: self,
            client: None,
            owns_client: false,
        }
    }

    /// Creates an `HttpClient` that borrows a caller-supplied `reqwest::Client`.
    ///
    /// [`HttpClient::close`] never releases a borrowed client.
    #[must_use]
    pub fn into_client_with(self, client: Client) -> HttpClient {
        HttpClient {
            base_url: self.base_url(),
            config: self,
            client: Some(client),
            owns_client: false,
        }
    }
}

fn is_json_content_type(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("json")
}

/// Formats `host` for use in a URL, bracketing IPv6 literals.
fn url_host(host: &str) -> Cow<'_, str> {
    if host.parse::<Ipv6Addr>().is_ok() {
        Cow::Owned(format!("[{host}]"))
    } else {
        Cow::Borrowed(host)
    }
}

// ============================================================================
// HttpClient - Request/response handling
// ============================================================================

/// HTTP client for a single TechnoVE station.
///
/// Every request carries `Accept: application/json, text/plain, */*`. Each
/// attempt is bounded by the configured timeout, and connection failures
/// (timeouts included) are retried according to the [`RetryPolicy`].
/// Error responses are never retried.
///
/// # Examples
///
/// ```no_run
/// use reqwest::Method;
/// use technove::protocol::HttpConfig;
///
/// # async fn example() -> technove::Result<()> {
/// let mut client = HttpConfig::new("192.168.1.100").into_client();
/// let payload = client.request("/station/get/info", Method::GET, None).await?;
/// println!("{payload:?}");
/// client.close();
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HttpClient {
    config: HttpConfig,
    base_url: String,
    client: Option<Client>,
    owns_client: bool,
}

impl HttpClient {
    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Returns the base URL of the station.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns `true` if a `reqwest::Client` is currently held.
    #[must_use]
    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }

    /// Returns `true` if the held `reqwest::Client` was created by this
    /// client and will be released by [`close`](Self::close).
    #[must_use]
    pub fn owns_client(&self) -> bool {
        self.owns_client
    }

    /// Sends a request to the station and decodes the response.
    ///
    /// # Arguments
    ///
    /// * `path` - Request path, for example `/station/get/info`
    /// * `method` - HTTP method
    /// * `body` - Optional JSON body
    ///
    /// # Errors
    ///
    /// - [`ConnectionError::Timeout`] if every attempt timed out
    /// - [`ConnectionError::Request`] if the station could not be reached
    /// - [`DeviceError::UnexpectedResponse`] on a 4xx or 5xx status
    /// - [`ParseError::Json`] if a JSON response is malformed
    pub async fn request(
        &mut self,
        path: &str,
        method: Method,
        body: Option<&serde_json::Value>,
    ) -> Result<Payload> {
        let client = self.acquire_client()?;
        let url = format!("{}{path}", self.base_url);

        let this = &*self;
        let client = &client;
        let url = url.as_str();

        retry(this.config.retry_policy(), Error::is_connection, move || {
            this.attempt(client, url, method.clone(), body)
        })
        .await
    }

    /// Releases the `reqwest::Client` if this client created it.
    ///
    /// A borrowed client is left untouched. A later request on an owned
    /// client that was closed creates a fresh one.
    pub fn close(&mut self) {
        if self.owns_client && self.client.take().is_some() {
            tracing::debug!(host = %self.config.host, "Released HTTP client");
        }
    }

    fn acquire_client(&mut self) -> Result<Client> {
        if let Some(client) = &self.client {
            return Ok(client.clone());
        }

        let client = Client::builder()
            .build()
            .map_err(|source| self.connection_error(source))?;

        tracing::debug!(host = %self.config.host, "Created HTTP client");

        self.client = Some(client.clone());
        self.owns_client = true;
        Ok(client)
    }

    async fn attempt(
        &self,
        client: &Client,
        url: &str,
        method: Method,
        body: Option<&serde_json::Value>,
    ) -> Result<Payload> {
        tracing::debug!(method = %method, url = %url, "Sending HTTP request");

        let exchange = async {
            let mut request = client.request(method, url).header(ACCEPT, ACCEPT_VALUE);
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request
                .send()
                .await
                .map_err(|source| self.connection_error(source))?;

            self.decode(response).await
        };

        match tokio::time::timeout(self.config.timeout, exchange).await {
            Ok(result) => result,
            Err(_) => Err(self.timeout_error()),
        }
    }

    async fn decode(&self, response: Response) -> Result<Payload> {
        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(is_json_content_type);

        let text = response
            .text()
            .await
            .map_err(|source| self.connection_error(source))?;

        tracing::debug!(status = status.as_u16(), body = %text, "Received HTTP response");

        if status.is_client_error() || status.is_server_error() {
            let body = if is_json {
                match serde_json::from_str(&text) {
                    Ok(value) => value,
                    Err(_) => serde_json::json!({ "message": text }),
                }
            } else {
                serde_json::json!({ "message": text })
            };

            return Err(DeviceError::UnexpectedResponse {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        if !is_json {
            return Ok(Payload::Text(text));
        }

        if text.trim().is_empty() {
            return Ok(Payload::Json(serde_json::Value::Null));
        }

        serde_json::from_str(&text)
            .map(Payload::Json)
            .map_err(|e| ParseError::Json(e).into())
    }

    fn connection_error(&self, source: reqwest::Error) -> Error {
        if source.is_timeout() {
            return self.timeout_error();
        }

        ConnectionError::Request {
            host: self.config.host.clone(),
            source,
        }
        .into()
    }

    fn timeout_error(&self) -> Error {
        ConnectionError::Timeout {
            host: self.config.host.clone(),
            timeout: self.config.timeout,
        }
        .into()
    }
}
