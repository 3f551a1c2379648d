//! R_volution player control over the HTTP command endpoint.
//!
//! # Module Structure
//!
//! - `client` - `RVolutionClient`, session ownership and the playback façade
//! - `ir_codes` - Operation → IR code translation
//! - `request` - Query building and the single GET round trip
//! - `response` - `command_result` parsing into normalized status fields
//! - `traits` - `PlayerControl` abstraction for testability
//! - `utils` - URL and XML attribute helpers

pub mod client;
pub mod ir_codes;
pub mod request;
pub mod response;
pub mod traits;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use client::{RVolutionClient, RVolutionClientBuilder};
pub use ir_codes::{IrCodeMap, Operation};
pub use response::{parse_command_result, parse_response, CommandResponse, StatusResult, StatusValue};
pub use traits::PlayerControl;
