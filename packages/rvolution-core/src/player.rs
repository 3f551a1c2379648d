//! Media-player entity model.
//!
//! Keeps the last known state of one player and maps raw device status onto
//! a small state enumeration, the way a home-automation front end presents
//! it. Each [`MediaPlayer`] is owned by its caller; there is no registry.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::device::{PlayerControl, StatusResult};
use crate::protocol_constants::{DEFAULT_PLAYER_NAME, MAX_VOLUME};

/// Displayed playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    #[default]
    Off,
    Idle,
    Playing,
    Paused,
}

impl PlayerState {
    /// Maps a raw `player_state` token; unknown or missing tokens are `Off`.
    #[must_use]
    pub fn from_device(raw: Option<&str>) -> Self {
        match raw {
            Some("playing") => Self::Playing,
            Some("paused") => Self::Paused,
            Some("navigator") => Self::Idle,
            _ => Self::Off,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Idle => "idle",
            Self::Playing => "playing",
            Self::Paused => "paused",
        }
    }
}

impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time view of a [`MediaPlayer`], for display or serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    pub name: String,
    pub state: PlayerState,
    pub volume_level: f32,
    pub muted: bool,
}

/// One player as seen by a front end.
pub struct MediaPlayer {
    control: Arc<dyn PlayerControl>,
    host: String,
    raw_state: Option<String>,
    volume: i64,
    muted: bool,
    product_name: Option<String>,
}

impl fmt::Debug for MediaPlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaPlayer")
            .field("host", &self.host)
            .field("raw_state", &self.raw_state)
            .field("volume", &self.volume)
            .field("muted", &self.muted)
            .field("product_name", &self.product_name)
            .finish()
    }
}

impl MediaPlayer {
    /// Creates an entity for the player at `host`, controlled through `control`.
    #[must_use]
    pub fn new(control: Arc<dyn PlayerControl>, host: impl Into<String>) -> Self {
        Self {
            control,
            host: host.into(),
            raw_state: None,
            volume: 0,
            muted: false,
            product_name: None,
        }
    }

    /// Polls the player and merges the fields it reported.
    ///
    /// Fields missing from the reply keep their previous value, so a failed
    /// poll leaves the last known state in place.
    ///
    /// # Returns
    /// `true` if the player reported any status.
    pub async fn update(&mut self) -> bool {
        let status = self.control.get_status().await;
        tracing::debug!(host = %self.host, ?status, "status_update");
        self.apply_status(&status);
        !status.is_empty()
    }

    fn apply_status(&mut self, status: &StatusResult) {
        if let Some(state) = status.state() {
            self.raw_state = Some(state.to_string());
        }
        if let Some(volume) = status.volume() {
            self.volume = volume;
        }
        if let Some(muted) = status.muted() {
            self.muted = muted;
        }
        if let Some(name) = status.product_name() {
            self.product_name = Some(name.to_string());
        }
    }

    /// Product name reported by the player, or a host-based fallback.
    #[must_use]
    pub fn name(&self) -> String {
        match self.product_name {
            Some(ref name) => name.clone(),
            None => format!("{} ({})", DEFAULT_PLAYER_NAME, self.host),
        }
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub fn state(&self) -> PlayerState {
        PlayerState::from_device(self.raw_state.as_deref())
    }

    /// Volume on a 0.0-1.0 scale.
    #[must_use]
    pub fn volume_level(&self) -> f32 {
        self.volume as f32 / f32::from(MAX_VOLUME)
    }

    #[must_use]
    pub fn is_volume_muted(&self) -> bool {
        self.muted
    }

    #[must_use]
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            name: self.name(),
            state: self.state(),
            volume_level: self.volume_level(),
            muted: self.muted,
        }
    }

    pub async fn media_play(&self) -> bool {
        self.control.play().await
    }

    pub async fn media_pause(&self) -> bool {
        self.control.pause().await
    }

    pub async fn media_stop(&self) -> bool {
        self.control.stop().await
    }

    pub async fn media_next_track(&self) -> bool {
        self.control.next_track().await
    }

    pub async fn media_previous_track(&self) -> bool {
        self.control.previous_track().await
    }

    /// Sets volume from a 0.0-1.0 level (truncated to whole percent).
    pub async fn set_volume_level(&self, level: f32) -> bool {
        self.control.set_volume(level_to_percent(level)).await
    }

    /// Sends mute and records `mute` as the current state.
    pub async fn mute_volume(&mut self, mute: bool) -> bool {
        let sent = self.control.mute(mute).await;
        self.muted = mute;
        sent
    }
}

/// Converts a 0.0-1.0 level to whole percent, clamping out-of-range input.
fn level_to_percent(level: f32) -> u8 {
    let scaled = level.clamp(0.0, 1.0) * f32::from(MAX_VOLUME);
    scaled as u8
}
