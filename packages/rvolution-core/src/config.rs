//! Device configuration.
//!
//! [`DeviceConfig`] is what a front end collects before a client exists:
//! the player's host plus optional transport tuning and IR code overrides.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::device::{IrCodeMap, RVolutionClient};
use crate::error::{ClientError, ClientResult};
use crate::protocol_constants::REQUEST_TIMEOUT_SECS;

/// Configuration for one R_volution player.
///
/// All fields except `host` have sensible defaults.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DeviceConfig {
    /// Player host name or IP address, optionally with a port.
    pub host: String,

    /// Per-request timeout (seconds).
    pub timeout_secs: u64,

    /// Operation → IR code entries added to (or replacing) the default table.
    pub ir_codes: BTreeMap<String, String>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            timeout_secs: REQUEST_TIMEOUT_SECS,
            ir_codes: BTreeMap::new(),
        }
    }
}

impl DeviceConfig {
    /// Creates a configuration for `host` with default settings.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Configuration` if the host is missing or the
    /// timeout is zero.
    pub fn validate(&self) -> ClientResult<()> {
        if self.host.trim().is_empty() {
            return Err(ClientError::Configuration("host is required".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(ClientError::Configuration(
                "timeout_secs must be >= 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Default IR code table with this configuration's overrides applied.
    #[must_use]
    pub fn ir_code_map(&self) -> IrCodeMap {
        IrCodeMap::default().with_codes(self.ir_codes.clone())
    }

    /// Builds a client from this configuration.
    ///
    /// # Arguments
    /// * `session` - Shared HTTP session, or `None` for a client-owned one
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the session cannot be created.
    pub fn client(&self, session: Option<Client>) -> ClientResult<RVolutionClient> {
        self.validate()?;

        let mut builder = RVolutionClient::builder(self.host.as_str())
            .timeout(Duration::from_secs(self.timeout_secs))
            .ir_codes(self.ir_code_map());
        if let Some(session) = session {
            builder = builder.session(session);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_host_fails_validation() {
        let err = DeviceConfig::default().validate().unwrap_err();
        assert!(matches!(err, ClientError::Configuration(ref msg) if msg.contains("host")));
        assert!(DeviceConfig::new("   ").validate().is_err());
    }

    #[test]
    fn zero_timeout_fails_validation() {
        let config = DeviceConfig {
            timeout_secs: 0,
            ..DeviceConfig::new("192.168.1.50")
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: DeviceConfig = serde_json::from_str(r#"{"host": "192.168.1.50"}"#).unwrap();
        assert_eq!(config, DeviceConfig::new("192.168.1.50"));
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let config: DeviceConfig = serde_json::from_str(
            r#"{"host": "player.local", "ir_codes": {"play": "IR_PLAY", "volume": "IR_VOL"}}"#,
        )
        .unwrap();
        let map = config.ir_code_map();

        assert_eq!(map.translate("play"), "IR_PLAY");
        assert_eq!(map.translate("volume"), "IR_VOL");
        assert_eq!(map.translate("stop"), "BF40BF00");
    }

    #[test]
    fn builds_client_from_config() {
        let config = DeviceConfig {
            timeout_secs: 3,
            ..DeviceConfig::new("192.168.1.50")
        };
        let client = config.client(Some(Client::new())).unwrap();

        assert_eq!(client.base_url(), "http://192.168.1.50/cgi-bin/do");
        assert_eq!(client.timeout(), Duration::from_secs(3));
        assert!(DeviceConfig::default().client(None).is_err());
    }
}
