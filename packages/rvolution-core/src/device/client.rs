//! High-level R_volution player client.
//!
//! [`RVolutionClient`] owns (or borrows) the HTTP session, resolves operations
//! to IR codes and turns `command_result` documents into status fields and
//! command outcomes.
//!
//! Two flavours of every call exist:
//! - `try_*` methods return a [`ClientResult`] carrying the failure kind.
//! - The plain methods absorb failures into an empty [`StatusResult`] or
//!   `false`, logging the cause. Callers that poll repeatedly usually want
//!   these.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::Client;

use super::ir_codes::{IrCodeMap, Operation};
use super::request::CommandRequestBuilder;
use super::response::{parse_command_result, StatusResult};
use super::traits::PlayerControl;
use super::utils::build_command_url;
use crate::error::{ClientError, ClientResult, FailureKind};
use crate::protocol_constants::{
    CMD_IR_CODE, CMD_STATUS, IR_CODE_PARAM, LEVEL_PARAM, MAX_VOLUME, REQUEST_TIMEOUT_SECS,
};

// ─────────────────────────────────────────────────────────────────────────────
// Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Builder for [`RVolutionClient`].
///
/// # Example
/// ```ignore
/// let client = RVolutionClient::builder("192.168.1.50")
///     .session(shared_http_client)
///     .timeout(Duration::from_secs(5))
///     .build()?;
/// ```
pub struct RVolutionClientBuilder {
    host: String,
    session: Option<Client>,
    timeout: Duration,
    ir_codes: IrCodeMap,
}

impl RVolutionClientBuilder {
    fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            session: None,
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            ir_codes: IrCodeMap::default(),
        }
    }

    /// Uses a shared, externally owned HTTP session.
    ///
    /// `close()` leaves a shared session untouched.
    #[must_use]
    pub fn session(mut self, session: Client) -> Self {
        self.session = Some(session);
        self
    }

    /// Overrides the per-request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replaces the operation → IR code table.
    #[must_use]
    pub fn ir_codes(mut self, ir_codes: IrCodeMap) -> Self {
        self.ir_codes = ir_codes;
        self
    }

    /// Builds the client, creating an owned session if none was supplied.
    ///
    /// # Errors
    /// * `ClientError::Configuration` if the host is empty
    /// * `ClientError::Http` if the HTTP session cannot be created
    pub fn build(self) -> ClientResult<RVolutionClient> {
        let host = self.host.trim().to_string();
        if host.is_empty() {
            return Err(ClientError::Configuration(
                "player host must not be empty".into(),
            ));
        }

        let (session, owns_session) = match self.session {
            Some(session) => (session, false),
            None => (Client::builder().build()?, true),
        };

        Ok(RVolutionClient {
            base_url: build_command_url(&host),
            host,
            session: RwLock::new(Some(session)),
            owns_session,
            timeout: self.timeout,
            ir_codes: self.ir_codes,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────────────────────────

/// Control client for a single R_volution player.
///
/// Safe to share across tasks; concurrent calls run as independent
/// requests on the same session with no ordering between them.
pub struct RVolutionClient {
    host: String,
    base_url: String,
    session: RwLock<Option<Client>>,
    owns_session: bool,
    timeout: Duration,
    ir_codes: IrCodeMap,
}

impl std::fmt::Debug for RVolutionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RVolutionClient")
            .field("host", &self.host)
            .field("owns_session", &self.owns_session)
            .field("closed", &self.is_closed())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl RVolutionClient {
    /// Starts building a client for the player at `host`.
    #[must_use]
    pub fn builder(host: impl Into<String>) -> RVolutionClientBuilder {
        RVolutionClientBuilder::new(host)
    }

    /// Creates a client with its own session and default settings.
    ///
    /// # Errors
    /// See [`RVolutionClientBuilder::build`].
    pub fn new(host: impl Into<String>) -> ClientResult<Self> {
        Self::builder(host).build()
    }

    /// Creates a client on a shared session.
    ///
    /// # Errors
    /// See [`RVolutionClientBuilder::build`].
    pub fn with_session(host: impl Into<String>, session: Client) -> ClientResult<Self> {
        Self::builder(host).session(session).build()
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Full command endpoint URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub fn ir_codes(&self) -> &IrCodeMap {
        &self.ir_codes
    }

    /// True if `close()` has released the client's own session.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.session.read().is_none()
    }

    /// Releases the session if this client created it.
    ///
    /// Idempotent. A shared session supplied by the caller is left open.
    pub fn close(&self) {
        if !self.owns_session {
            log::debug!(
                "[RVolution] Leaving shared session for {} to its owner",
                self.host
            );
            return;
        }
        if self.session.write().take().is_some() {
            log::debug!("[RVolution] Closed session for {}", self.host);
        }
    }

    fn session(&self) -> ClientResult<Client> {
        self.session.read().clone().ok_or(ClientError::Closed)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Status
    // ─────────────────────────────────────────────────────────────────────────

    /// Fetches the player status.
    ///
    /// A device-reported error does not fail the call: whatever fields the
    /// document carried are returned and the error is logged.
    ///
    /// # Errors
    /// Transport failures, non-success HTTP status, malformed XML, an
    /// unexpected root element, or a closed client.
    pub async fn try_get_status(&self) -> ClientResult<StatusResult> {
        let session = self.session()?;
        let body = CommandRequestBuilder::new(&session, &self.base_url)
            .cmd(CMD_STATUS)
            .timeout(self.timeout)
            .send()
            .await?;

        let response = parse_command_result(&body)?;
        if let Some(ref err) = response.device_error {
            log::warn!(
                "[RVolution] Status from {} reported error: {}",
                self.host,
                err
            );
        }
        Ok(response.status)
    }

    /// Fetches the player status, returning an empty result on any failure.
    pub async fn get_status(&self) -> StatusResult {
        match self.try_get_status().await {
            Ok(status) => status,
            Err(e) => {
                log::error!(
                    "[RVolution] Error retrieving player status from {}: {}",
                    self.host,
                    e
                );
                StatusResult::new()
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Commands
    // ─────────────────────────────────────────────────────────────────────────

    /// Sends an IR command.
    ///
    /// # Arguments
    /// * `operation` - Abstract operation name (translated through the IR
    ///   code table) or a raw IR code
    /// * `params` - Extra query parameters, merged after the code
    ///
    /// # Errors
    /// `ClientError::Device` if the player reports an error, otherwise the
    /// same failures as [`Self::try_get_status`].
    pub async fn try_send_command(
        &self,
        operation: &str,
        params: &[(&str, &str)],
    ) -> ClientResult<()> {
        let session = self.session()?;
        let code = self.ir_codes.translate(operation);
        log::debug!("[RVolution] {} -> ir_code {}", operation, code);

        let body = CommandRequestBuilder::new(&session, &self.base_url)
            .cmd(CMD_IR_CODE)
            .param(IR_CODE_PARAM, code)
            .params(params.iter().copied())
            .timeout(self.timeout)
            .send()
            .await?;

        match parse_command_result(&body)?.device_error {
            Some(err) => Err(ClientError::Device(err)),
            None => Ok(()),
        }
    }

    /// Sends an IR command, returning whether the player accepted it.
    pub async fn send_command(&self, operation: &str, params: &[(&str, &str)]) -> bool {
        match self.try_send_command(operation, params).await {
            Ok(()) => true,
            Err(e) if e.kind() == FailureKind::Device => {
                log::warn!("[RVolution] Command {} rejected: {}", operation, e);
                false
            }
            Err(e) => {
                log::error!("[RVolution] Error sending command {}: {}", operation, e);
                false
            }
        }
    }

    async fn run(&self, operation: Operation, params: &[(&str, &str)]) -> bool {
        self.send_command(operation.name(), params).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Playback Façade
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn play(&self) -> bool {
        self.run(Operation::Play, &[]).await
    }

    pub async fn pause(&self) -> bool {
        self.run(Operation::Pause, &[]).await
    }

    pub async fn stop(&self) -> bool {
        self.run(Operation::Stop, &[]).await
    }

    pub async fn next_track(&self) -> bool {
        self.run(Operation::Next, &[]).await
    }

    pub async fn previous_track(&self) -> bool {
        self.run(Operation::Previous, &[]).await
    }

    /// Sets the absolute volume (0-100, values > 100 are clamped).
    pub async fn set_volume(&self, level: u8) -> bool {
        let clamped = level.min(MAX_VOLUME);
        if clamped != level {
            log::debug!("[RVolution] Volume {} clamped to {}", level, clamped);
        }
        let level = clamped.to_string();
        self.run(Operation::Volume, &[(LEVEL_PARAM, level.as_str())])
            .await
    }

    /// Sends the mute command.
    ///
    /// The player only knows a mute toggle, so `mute` does not reach the
    /// wire; callers track the intended state themselves.
    pub async fn mute(&self, mute: bool) -> bool {
        log::debug!("[RVolution] Mute toggle requested (target muted={})", mute);
        self.run(Operation::Mute, &[]).await
    }
}

#[async_trait]
impl PlayerControl for RVolutionClient {
    async fn get_status(&self) -> StatusResult {
        RVolutionClient::get_status(self).await
    }

    async fn play(&self) -> bool {
        RVolutionClient::play(self).await
    }

    async fn pause(&self) -> bool {
        RVolutionClient::pause(self).await
    }

    async fn stop(&self) -> bool {
        RVolutionClient::stop(self).await
    }

    async fn next_track(&self) -> bool {
        RVolutionClient::next_track(self).await
    }

    async fn previous_track(&self) -> bool {
        RVolutionClient::previous_track(self).await
    }

    async fn set_volume(&self, level: u8) -> bool {
        RVolutionClient::set_volume(self, level).await
    }

    async fn mute(&self, mute: bool) -> bool {
        RVolutionClient::mute(self, mute).await
    }
}
