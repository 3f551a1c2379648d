//! Centralized error types for the R_volution control client.
//!
//! Every device interaction resolves to a [`ClientResult`]. The convenience
//! methods on [`RVolutionClient`](crate::RVolutionClient) fold these errors
//! into empty status / `false` outcomes; the `try_*` methods hand them to the
//! caller so "device unreachable" can be told apart from "device said no".

use thiserror::Error;

/// Trait for error types that provide machine-readable error codes.
pub trait ErrorCode {
    /// Returns a machine-readable error code.
    fn code(&self) -> &'static str;
}

/// Broad failure categories a caller may want to react to differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Connection refused, DNS failure, timeout or non-success HTTP status.
    Transport,
    /// Body was not XML, or not a `command_result` document.
    MalformedResponse,
    /// The device answered but reported an `error` param.
    Device,
    /// The client was configured or used incorrectly.
    Configuration,
}

/// Errors that can occur while talking to an R_volution player.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request to the player failed (includes timeouts).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Player returned a non-success HTTP status.
    #[error("HTTP error {0}: {1}")]
    HttpStatus(u16, String),

    /// Response body could not be parsed as XML.
    #[error("Failed to parse XML response: {0}")]
    Xml(String),

    /// Response parsed, but its root element is not `command_result`.
    #[error("Unexpected response root element: {0}")]
    UnexpectedRoot(String),

    /// Player reported an error for the request.
    #[error("Player error: {0}")]
    Device(String),

    /// The client's own session was released by `close()`.
    #[error("Client session is closed")]
    Closed,

    /// Invalid client or device configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Convenient Result alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Classifies the error into its [`FailureKind`].
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Http(_) | Self::HttpStatus(_, _) | Self::Closed => FailureKind::Transport,
            Self::Xml(_) | Self::UnexpectedRoot(_) => FailureKind::MalformedResponse,
            Self::Device(_) => FailureKind::Device,
            Self::Configuration(_) => FailureKind::Configuration,
        }
    }

    /// Returns true if the request was abandoned because it hit the timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_timeout())
    }
}

impl ErrorCode for ClientError {
    fn code(&self) -> &'static str {
        match self {
            Self::Http(_) => "http_request_failed",
            Self::HttpStatus(_, _) => "http_error_status",
            Self::Xml(_) => "xml_parse_error",
            Self::UnexpectedRoot(_) => "unexpected_root",
            Self::Device(_) => "device_error",
            Self::Closed => "client_closed",
            Self::Configuration(_) => "configuration_error",
        }
    }
}
