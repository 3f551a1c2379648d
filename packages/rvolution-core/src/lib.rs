//! R_volution Core - control library for R_volution media players.
//!
//! Players expose a single HTTP command endpoint (`/cgi-bin/do`) that answers
//! every request with a small `command_result` XML document. This crate wraps
//! that endpoint in an async client and a media-player entity model.
//!
//! # Architecture
//!
//! - [`device`]: HTTP client, request builder, response parser, IR code table
//! - [`player`]: Media-player entity with cached state and display mapping
//! - [`config`]: Serializable device configuration
//! - [`error`]: Centralized error types
//! - [`protocol_constants`]: Wire-level names and defaults
//!
//! # Abstraction Traits
//!
//! [`PlayerControl`](device::PlayerControl) decouples the entity model from
//! the HTTP client so front ends and tests can supply their own
//! implementation.

#![warn(clippy::all)]

pub mod config;
pub mod device;
pub mod error;
pub mod player;
pub mod protocol_constants;

// Re-export commonly used types at the crate root
pub use config::DeviceConfig;
pub use error::{ClientError, ClientResult, ErrorCode, FailureKind};
pub use player::{MediaPlayer, PlayerSnapshot, PlayerState};

// Re-export device types
pub use device::{
    parse_command_result, parse_response, CommandResponse, IrCodeMap, Operation, PlayerControl,
    RVolutionClient, RVolutionClientBuilder, StatusResult, StatusValue,
};
