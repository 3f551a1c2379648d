//! Low-level HTTP transport for the player's command endpoint.
//!
//! Builds the query string, sends one GET with a timeout and returns the raw
//! response body. Parsing lives in `response.rs`, command semantics in
//! `client.rs`.

use std::time::{Duration, Instant};

use reqwest::{Client, Url};

use crate::error::{ClientError, ClientResult};
use crate::protocol_constants::{CMD_PARAM, REQUEST_TIMEOUT_SECS};

/// Builder for a single request against the command endpoint.
///
/// Parameters keep insertion order. Setting a key that is already present
/// replaces its value in place, so caller-supplied extras merged after the
/// command code override it the same way a map update would.
///
/// # Example
/// ```ignore
/// let body = CommandRequestBuilder::new(&client, "http://192.168.1.50/cgi-bin/do")
///     .cmd("ir_code")
///     .param("ir_code", "B748BF00")
///     .send()
///     .await?;
/// ```
pub struct CommandRequestBuilder<'a> {
    client: &'a Client,
    base_url: &'a str,
    params: Vec<(String, String)>,
    timeout: Duration,
}

impl<'a> CommandRequestBuilder<'a> {
    /// Creates a request builder with the default timeout.
    ///
    /// # Arguments
    /// * `client` - The shared HTTP client
    /// * `base_url` - Full command endpoint URL (see `build_command_url`)
    #[must_use]
    pub fn new(client: &'a Client, base_url: &'a str) -> Self {
        Self {
            client,
            base_url,
            params: Vec::new(),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }

    /// Sets the `cmd` parameter.
    #[must_use]
    pub fn cmd(self, cmd: &str) -> Self {
        self.param(CMD_PARAM, cmd)
    }

    /// Sets a query parameter, replacing any earlier value for `key`.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value,
            None => self.params.push((key, value)),
        }
        self
    }

    /// Merges several parameters, in order.
    #[must_use]
    pub fn params<I, K, V>(self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        params
            .into_iter()
            .fold(self, |builder, (k, v)| builder.param(k, v))
    }

    /// Overrides the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the full request URL.
    ///
    /// # Errors
    /// Returns `ClientError::Configuration` if the base URL is not a valid URL.
    pub fn url(&self) -> ClientResult<Url> {
        Url::parse_with_params(self.base_url, &self.params).map_err(|e| {
            ClientError::Configuration(format!("invalid player URL {}: {}", self.base_url, e))
        })
    }

    /// Sends the request and returns the response body.
    ///
    /// # Errors
    /// * `ClientError::Http` on connection failure or timeout
    /// * `ClientError::HttpStatus` if the player answers with a non-success status
    pub async fn send(self) -> ClientResult<String> {
        let url = self.url()?;
        let cmd = self
            .params
            .iter()
            .find(|(k, _)| k == CMD_PARAM)
            .map_or("?", |(_, v)| v.as_str());

        log::debug!("[RVolution] GET {}", url);

        let start = Instant::now();
        let res = self.client.get(url).timeout(self.timeout).send().await;

        log::info!(
            "[RVolution] {} completed in {:?}: {:?}",
            cmd,
            start.elapsed(),
            res.as_ref().map(|r| r.status())
        );

        let res = res?;
        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(ClientError::HttpStatus(status.as_u16(), body));
        }

        log::debug!("[RVolution] Response body: {}", body);
        Ok(body)
    }

    /// Returns the query parameters without sending (for testing).
    #[cfg(test)]
    pub fn into_parts(self) -> (Vec<(String, String)>, Duration) {
        (self.params, self.timeout)
    }
}
