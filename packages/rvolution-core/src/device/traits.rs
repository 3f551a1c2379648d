//! Trait abstraction over player control.
//!
//! The media-player entity depends on this trait rather than on the HTTP
//! client so it can be driven by a mock in tests.

use async_trait::async_trait;

use super::response::StatusResult;

/// High-level control of one player.
///
/// Every method absorbs failures: status comes back empty and commands
/// return `false` when the player cannot be reached or rejects the request.
#[async_trait]
pub trait PlayerControl: Send + Sync {
    /// Fetches the current player status.
    async fn get_status(&self) -> StatusResult;

    /// Starts or resumes playback.
    async fn play(&self) -> bool;

    /// Pauses playback.
    async fn pause(&self) -> bool;

    /// Stops playback.
    async fn stop(&self) -> bool;

    /// Skips to the next track.
    async fn next_track(&self) -> bool;

    /// Returns to the previous track.
    async fn previous_track(&self) -> bool;

    /// Sets the absolute volume.
    ///
    /// # Arguments
    /// * `level` - Desired volume level (0-100, values > 100 are clamped)
    async fn set_volume(&self, level: u8) -> bool;

    /// Requests a mute change.
    ///
    /// # Arguments
    /// * `mute` - `true` to mute, `false` to unmute
    async fn mute(&self, mute: bool) -> bool;
}
