//! Fixed protocol constants that should NOT be changed.
//!
//! These values are dictated by the player's HTTP control interface and
//! changing them would break communication with the device.

// ─────────────────────────────────────────────────────────────────────────────
// Endpoint
// ─────────────────────────────────────────────────────────────────────────────

/// Path of the single command endpoint on the player.
pub const COMMAND_PATH: &str = "/cgi-bin/do";

/// Query parameter carrying the command kind.
pub const CMD_PARAM: &str = "cmd";

/// `cmd` value for a status query.
pub const CMD_STATUS: &str = "status";

/// `cmd` value for an infrared-equivalent command.
pub const CMD_IR_CODE: &str = "ir_code";

/// Query parameter carrying the IR code of an `ir_code` command.
pub const IR_CODE_PARAM: &str = "ir_code";

/// Query parameter carrying the level of a volume command.
pub const LEVEL_PARAM: &str = "level";

// ─────────────────────────────────────────────────────────────────────────────
// Response Document
// ─────────────────────────────────────────────────────────────────────────────

/// Root element of every valid response.
pub const RESPONSE_ROOT: &str = "command_result";

/// Element carrying one `name`/`value` pair.
pub const PARAM_ELEMENT: &str = "param";

/// Device param holding the raw playback state.
pub const PARAM_PLAYER_STATE: &str = "player_state";

/// Device param holding the volume (0-100).
pub const PARAM_PLAYBACK_VOLUME: &str = "playback_volume";

/// Device param holding the mute flag (`"1"` = muted).
pub const PARAM_PLAYBACK_MUTE: &str = "playback_mute";

/// Device param holding the product name.
pub const PARAM_PRODUCT_NAME: &str = "product_name";

/// Device param reporting a rejected or failed request.
pub const PARAM_ERROR: &str = "error";

// ─────────────────────────────────────────────────────────────────────────────
// HTTP
// ─────────────────────────────────────────────────────────────────────────────

/// Timeout for a single request/response cycle (seconds).
///
/// The player lives on the LAN, so 10 seconds means it is gone.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Highest volume level the player accepts.
pub const MAX_VOLUME: u8 = 100;

/// Display name used when the player has not reported a product name.
pub const DEFAULT_PLAYER_NAME: &str = "R Volution Player";
