//! Translation from abstract playback operations to IR command codes.
//!
//! The player's command endpoint accepts the same codes as its infrared
//! remote. Known operations are looked up in a table; anything else is sent
//! as-is, so raw codes and future operations work without a table entry.

use std::collections::HashMap;
use std::fmt;

/// Playback operations exposed by the client façade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Play,
    Pause,
    Stop,
    Next,
    Previous,
    /// Absolute volume; carries a `level` parameter.
    Volume,
    Mute,
}

impl Operation {
    /// Abstract operation name used as the lookup key.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Stop => "stop",
            Self::Next => "next",
            Self::Previous => "prev",
            Self::Volume => "volume",
            Self::Mute => "mute",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Default code table (Dune-family IR codes).
const DEFAULT_IR_CODES: &[(&str, &str)] = &[
    ("play", "B748BF00"),
    ("pause", "E11EBF00"),
    ("stop", "BF40BF00"),
    ("next", "E21DBF00"),
    ("prev", "B649BF00"),
    ("mute", "B946BF00"),
    ("volume_up", "AD52BF00"),
    ("volume_down", "AC53BF00"),
    ("power", "BC43BF00"),
];

/// Mapping from abstract operation name to IR code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrCodeMap {
    codes: HashMap<String, String>,
}

impl Default for IrCodeMap {
    fn default() -> Self {
        Self {
            codes: DEFAULT_IR_CODES
                .iter()
                .map(|(op, code)| ((*op).to_string(), (*code).to_string()))
                .collect(),
        }
    }
}

impl IrCodeMap {
    /// Creates a table with no entries; every operation passes through.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            codes: HashMap::new(),
        }
    }

    /// Adds or replaces the code for `operation`.
    #[must_use]
    pub fn with_code(mut self, operation: impl Into<String>, code: impl Into<String>) -> Self {
        self.codes.insert(operation.into(), code.into());
        self
    }

    /// Adds or replaces several codes.
    #[must_use]
    pub fn with_codes<I, K, V>(self, codes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        codes
            .into_iter()
            .fold(self, |map, (op, code)| map.with_code(op, code))
    }

    /// Resolves the wire code for `operation`.
    ///
    /// Never fails: an operation without an entry is its own code.
    #[must_use]
    pub fn translate<'a>(&'a self, operation: &'a str) -> &'a str {
        self.codes.get(operation).map_or(operation, String::as_str)
    }

    /// Returns true if `operation` has a table entry.
    #[must_use]
    pub fn contains(&self, operation: &str) -> bool {
        self.codes.contains_key(operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_operations_are_translated() {
        let map = IrCodeMap::default();
        assert_eq!(map.translate("play"), "B748BF00");
        assert_eq!(map.translate(Operation::Previous.name()), "B649BF00");
        assert_eq!(map.translate(Operation::Mute.name()), "B946BF00");
    }

    #[test]
    fn unknown_operations_pass_through_verbatim() {
        let map = IrCodeMap::default();
        assert_eq!(map.translate("A15EBF00"), "A15EBF00");
        assert_eq!(map.translate("eject"), "eject");
        assert_eq!(map.translate(""), "");
        assert!(!map.contains(Operation::Volume.name()));
        assert_eq!(map.translate(Operation::Volume.name()), "volume");
    }

    #[test]
    fn overrides_replace_defaults() {
        let map = IrCodeMap::default()
            .with_code("play", "IR_PLAY")
            .with_codes([("volume", "IR_VOLUME")]);

        assert_eq!(map.translate("play"), "IR_PLAY");
        assert_eq!(map.translate("volume"), "IR_VOLUME");
        assert_eq!(map.translate("pause"), "E11EBF00");
    }

    #[test]
    fn empty_map_is_identity() {
        let map = IrCodeMap::empty();
        for op in [Operation::Play, Operation::Stop, Operation::Next] {
            assert_eq!(map.translate(op.name()), op.name());
        }
    }
}
