//! `command_result` response parsing.
//!
//! Every reply from the player, whether to a status query or a command, is a
//! document of the form:
//!
//! ```xml
//! <command_result>
//!     <param name="player_state" value="playing"/>
//!     <param name="playback_volume" value="45"/>
//! </command_result>
//! ```
//!
//! Known device params are renamed and typed; everything else is passed
//! through under its original name so undocumented fields are not lost.

use std::collections::btree_map::{self, BTreeMap};
use std::fmt;
use std::num::IntErrorKind;

use quick_xml::encoding::Decoder;
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::{BytesRef, BytesStart, Event};
use quick_xml::reader::Reader;
use serde::Serialize;

use super::utils::{get_xml_attr, get_xml_attrs};
use crate::error::{ClientError, ClientResult};
use crate::protocol_constants::{
    PARAM_ELEMENT, PARAM_ERROR, PARAM_PLAYBACK_MUTE, PARAM_PLAYBACK_VOLUME, PARAM_PLAYER_STATE,
    PARAM_PRODUCT_NAME, RESPONSE_ROOT,
};

/// Normalized field holding the raw playback state token.
pub const FIELD_STATE: &str = "state";
/// Normalized field holding the volume level.
///
/// Stored as `i64`; integers beyond its range saturate at `i64::MIN`/`i64::MAX`.
pub const FIELD_VOLUME: &str = "volume";
/// Normalized field holding the mute flag.
pub const FIELD_MUTED: &str = "muted";
/// Normalized field holding the device-reported product name.
pub const FIELD_PRODUCT_NAME: &str = "product_name";

// ─────────────────────────────────────────────────────────────────────────────
// Status Types
// ─────────────────────────────────────────────────────────────────────────────

/// A single value in a [`StatusResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StatusValue {
    /// Verbatim string value.
    Text(String),
    /// Integer value (volume).
    Integer(i64),
    /// Boolean value (mute).
    Flag(bool),
}

impl StatusValue {
    /// Returns the string value, if this is a [`StatusValue::Text`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer value, if this is a [`StatusValue::Integer`].
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the boolean value, if this is a [`StatusValue::Flag`].
    #[must_use]
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for StatusValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Flag(v) => write!(f, "{v}"),
        }
    }
}

/// Normalized status fields parsed from one response.
///
/// An open mapping: the four recognized fields have typed accessors, any
/// other device param is reachable through [`StatusResult::get`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StatusResult {
    fields: BTreeMap<String, StatusValue>,
}

impl StatusResult {
    /// Creates an empty status result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a field, replacing any previous value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: StatusValue) {
        self.fields.insert(name.into(), value);
    }

    /// Returns the value stored under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&StatusValue> {
        self.fields.get(name)
    }

    /// Raw playback state token (`player_state`).
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.get(FIELD_STATE).and_then(StatusValue::as_str)
    }

    /// Volume level (`playback_volume`).
    #[must_use]
    pub fn volume(&self) -> Option<i64> {
        self.get(FIELD_VOLUME).and_then(StatusValue::as_integer)
    }

    /// Mute flag (`playback_mute`).
    #[must_use]
    pub fn muted(&self) -> Option<bool> {
        self.get(FIELD_MUTED).and_then(StatusValue::as_flag)
    }

    /// Device-reported product name.
    #[must_use]
    pub fn product_name(&self) -> Option<&str> {
        self.get(FIELD_PRODUCT_NAME).and_then(StatusValue::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Iterates over all fields in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, StatusValue> {
        self.fields.iter()
    }
}

impl<'a> IntoIterator for &'a StatusResult {
    type Item = (&'a String, &'a StatusValue);
    type IntoIter = btree_map::Iter<'a, String, StatusValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// A successfully parsed `command_result` document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResponse {
    /// Normalized fields from every complete `param` element.
    pub status: StatusResult,
    /// Last non-empty `error` param, if the player reported one.
    pub device_error: Option<String>,
}

impl CommandResponse {
    /// True unless the player reported an error.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.device_error.is_none()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing
// ─────────────────────────────────────────────────────────────────────────────

/// Parses a response document into its status fields and device error.
///
/// # Errors
/// * [`ClientError::Xml`] if the body is not a well-formed XML document
/// * [`ClientError::UnexpectedRoot`] if the root element is not `command_result`
///
/// A device-reported `error` is not an `Err` here; it is recorded in
/// [`CommandResponse::device_error`] and the remaining params are still
/// collected.
pub fn parse_command_result(xml: &str) -> ClientResult<CommandResponse> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut parser = ResultParser::default();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                parser.element(e, reader.decoder())?;
                parser.depth += 1;
            }
            Ok(Event::Empty(ref e)) => parser.element(e, reader.decoder())?,
            Ok(Event::End(_)) => parser.depth = parser.depth.saturating_sub(1),
            Ok(Event::Text(ref t)) if parser.depth == 0 => {
                if !t.iter().all(u8::is_ascii_whitespace) {
                    return Err(ClientError::Xml("text outside root element".into()));
                }
            }
            Ok(Event::GeneralRef(ref r)) => {
                if parser.depth == 0 {
                    return Err(ClientError::Xml("reference outside root element".into()));
                }
                check_reference(r)?;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ClientError::Xml(format!(
                    "{} at position {}",
                    e,
                    reader.buffer_position()
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    parser.finish()
}

/// Parses a response into `(status, success)`, absorbing every failure.
///
/// Malformed or mismatched documents yield an empty status and `false`;
/// the failure is logged.
pub fn parse_response(xml: &str) -> (StatusResult, bool) {
    match parse_command_result(xml) {
        Ok(response) => {
            let success = response.is_success();
            (response.status, success)
        }
        Err(e) => {
            log::error!("[RVolution] Error parsing XML response: {}", e);
            (StatusResult::new(), false)
        }
    }
}

#[derive(Default)]
struct ResultParser {
    depth: usize,
    root_seen: bool,
    response: CommandResponse,
}

impl ResultParser {
    fn element(&mut self, e: &BytesStart, decoder: Decoder) -> ClientResult<()> {
        if self.depth == 0 {
            if self.root_seen {
                return Err(ClientError::Xml("multiple root elements".into()));
            }
            self.root_seen = true;

            let name = e.name();
            if name.as_ref() != RESPONSE_ROOT.as_bytes() {
                return Err(ClientError::UnexpectedRoot(
                    String::from_utf8_lossy(name.as_ref()).into_owned(),
                ));
            }
            get_xml_attrs(e, decoder)?;
            return Ok(());
        }

        if e.name().as_ref() == PARAM_ELEMENT.as_bytes() {
            self.param(e, decoder)
        } else {
            get_xml_attrs(e, decoder).map(|_| ())
        }
    }

    fn param(&mut self, e: &BytesStart, decoder: Decoder) -> ClientResult<()> {
        let name = get_xml_attr(e, b"name", decoder)?;
        let value = get_xml_attr(e, b"value", decoder)?;
        let (Some(name), Some(value)) = (name, value) else {
            return Ok(());
        };
        if name.is_empty() || value.is_empty() {
            return Ok(());
        }

        let status = &mut self.response.status;
        match name.as_str() {
            PARAM_PLAYER_STATE => status.insert(FIELD_STATE, StatusValue::Text(value)),
            PARAM_PLAYBACK_VOLUME => {
                status.insert(FIELD_VOLUME, StatusValue::Integer(parse_volume(&value)));
            }
            PARAM_PLAYBACK_MUTE => status.insert(FIELD_MUTED, StatusValue::Flag(value == "1")),
            PARAM_PRODUCT_NAME => status.insert(FIELD_PRODUCT_NAME, StatusValue::Text(value)),
            PARAM_ERROR => {
                log::error!("[RVolution] Player error: {}", value);
                self.response.device_error = Some(value);
            }
            _ => status.insert(name, StatusValue::Text(value)),
        }
        Ok(())
    }

    fn finish(self) -> ClientResult<CommandResponse> {
        if !self.root_seen {
            return Err(ClientError::Xml("document has no root element".into()));
        }
        if self.depth > 0 {
            return Err(ClientError::Xml("unclosed element at end of document".into()));
        }
        Ok(self.response)
    }
}

/// Coerces a `playback_volume` value; non-integers become 0.
fn parse_volume(value: &str) -> i64 {
    match value.trim().parse::<i64>() {
        Ok(volume) => volume,
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => i64::MAX,
            IntErrorKind::NegOverflow => i64::MIN,
            _ => {
                log::debug!("[RVolution] Unparsable volume {:?}, using 0", value);
                0
            }
        },
    }
}

/// Accepts only the predefined XML entities and valid character references.
fn check_reference(r: &BytesRef) -> ClientResult<()> {
    let name = std::str::from_utf8(r)
        .map_err(|e| ClientError::Xml(format!("invalid reference: {e}")))?;
    let valid = match name.strip_prefix('#') {
        Some(num) => {
            let code = match num.strip_prefix('x') {
                Some(hex) => u32::from_str_radix(hex, 16),
                None => num.parse(),
            };
            code.ok().and_then(char::from_u32).is_some()
        }
        None => resolve_xml_entity(name).is_some(),
    };
    if valid {
        Ok(())
    } else {
        Err(ClientError::Xml(format!("undefined entity &{name};")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::test_fixtures::*;
    use crate::error::FailureKind;

    #[test]
    fn parses_playing_status() {
        let (status, success) = parse_response(STATUS_PLAYING);

        assert!(success);
        assert_eq!(status.state(), Some("playing"));
        assert_eq!(status.volume(), Some(45));
        assert_eq!(status.len(), 2);
    }

    #[test]
    fn full_status_has_exactly_the_recognized_fields() {
        let (status, success) = parse_response(STATUS_FULL);

        assert!(success);
        assert_eq!(status.len(), 4);
        assert_eq!(status.state(), Some("paused"));
        assert_eq!(status.volume(), Some(30));
        assert_eq!(status.muted(), Some(true));
        assert_eq!(status.product_name(), Some("R_volution PlayerOne 8K"));
    }

    #[test]
    fn empty_command_result_is_success() {
        let (status, success) = parse_response(EMPTY_RESULT);
        assert!(success);
        assert!(status.is_empty());

        let (status, success) = parse_response("<command_result></command_result>");
        assert!(success);
        assert!(status.is_empty());
    }

    #[test]
    fn wrong_root_yields_empty_failure() {
        let (status, success) = parse_response(
            r#"<html><param name="player_state" value="playing"/></html>"#,
        );
        assert!(!success);
        assert!(status.is_empty());

        let err = parse_command_result("<result/>").unwrap_err();
        assert!(matches!(err, ClientError::UnexpectedRoot(ref tag) if tag == "result"));
        assert_eq!(err.kind(), FailureKind::MalformedResponse);
    }

    #[test]
    fn malformed_documents_yield_empty_failure() {
        for body in [
            "",
            "not xml at all",
            "<command_result>",
            r#"<command_result><param name="a" value="b"></command_result>"#,
            "<command_result/><command_result/>",
            r#"<command_result><param name="player_state" value=playing/></command_result>"#,
            r#"<command_result><param name="player_state" value="x" value="y"/></command_result>"#,
            r#"<command_result><param name="player_state" value="&bogus;"/></command_result>"#,
            r#"<command_result><param name="player_state" value="a&nbsp;b"/></command_result>"#,
            r#"<command_result><group kind=x/></command_result>"#,
            "<command_result>&bogus;</command_result>",
        ] {
            let (status, success) = parse_response(body);
            assert!(!success, "expected failure for {body:?}");
            assert!(status.is_empty(), "expected empty status for {body:?}");
            assert!(matches!(
                parse_command_result(body),
                Err(ClientError::Xml(_))
            ));
        }
    }

    #[test]
    fn device_error_forces_failure_but_keeps_fields() {
        let (status, success) = parse_response(ERROR_BUSY);
        assert!(!success);
        assert!(status.is_empty());

        let response = parse_command_result(ERROR_WITH_STATUS).unwrap();
        assert!(!response.is_success());
        assert_eq!(response.device_error.as_deref(), Some("not_ready"));
        assert_eq!(response.status.state(), Some("navigator"));
        assert!(response.status.get("error").is_none());
    }

    #[test]
    fn empty_error_value_is_ignored() {
        let (status, success) = parse_response(
            r#"<command_result><param name="error" value=""/></command_result>"#,
        );
        assert!(success);
        assert!(status.is_empty());
    }

    #[test]
    fn volume_coercion() {
        let volume_of = |value: &str| {
            let xml = format!(
                r#"<command_result><param name="playback_volume" value="{value}"/></command_result>"#
            );
            parse_response(&xml).0.volume()
        };

        assert_eq!(volume_of("0"), Some(0));
        assert_eq!(volume_of("100"), Some(100));
        assert_eq!(volume_of(" 7 "), Some(7));
        assert_eq!(volume_of("-5"), Some(-5));
        assert_eq!(volume_of("loud"), Some(0));
        assert_eq!(volume_of("12.5"), Some(0));
        assert_eq!(volume_of("99999999999999999999"), Some(i64::MAX));
        assert_eq!(volume_of("-99999999999999999999"), Some(i64::MIN));
    }

    #[test]
    fn mute_is_true_only_for_literal_one() {
        let muted_of = |value: &str| {
            let xml = format!(
                r#"<command_result><param name="playback_mute" value="{value}"/></command_result>"#
            );
            parse_response(&xml).0.muted()
        };

        assert_eq!(muted_of("1"), Some(true));
        assert_eq!(muted_of("0"), Some(false));
        assert_eq!(muted_of("true"), Some(false));
        assert_eq!(muted_of("01"), Some(false));
    }

    #[test]
    fn unknown_params_pass_through() {
        let (status, success) = parse_response(
            r#"<command_result>
                <param name="playback_position" value="1234"/>
                <param name="playback_url" value="smb://nas/movie.mkv"/>
            </command_result>"#,
        );

        assert!(success);
        assert_eq!(
            status.get("playback_position"),
            Some(&StatusValue::Text("1234".into()))
        );
        assert_eq!(
            status.get("playback_url").and_then(StatusValue::as_str),
            Some("smb://nas/movie.mkv")
        );
    }

    #[test]
    fn incomplete_params_are_skipped() {
        let (status, success) = parse_response(
            r#"<command_result>
                <param name="player_state"/>
                <param value="45"/>
                <param name="product_name" value=""/>
                <param name="playback_volume" value="12"/>
            </command_result>"#,
        );

        assert!(success);
        assert_eq!(status.len(), 1);
        assert_eq!(status.volume(), Some(12));
    }

    #[test]
    fn duplicate_params_last_wins() {
        let (status, _) = parse_response(
            r#"<command_result>
                <param name="player_state" value="paused"/>
                <param name="player_state" value="playing"/>
            </command_result>"#,
        );
        assert_eq!(status.state(), Some("playing"));
    }

    #[test]
    fn nested_params_and_declaration_are_accepted() {
        let (status, success) = parse_response(
            r#"<?xml version="1.0" encoding="UTF-8"?>
            <command_result>
                <group><param name="product_name" value="Amlogic &quot;Mini&quot;"/></group>
            </command_result>"#,
        );
        assert!(success);
        assert_eq!(status.product_name(), Some(r#"Amlogic "Mini""#));
    }

    #[test]
    fn predefined_entities_and_char_refs_are_accepted() {
        let (status, success) = parse_response(
            r#"<command_result>&amp;&#x41;&#66;<param name="product_name" value="A&lt;B&#x21;"/></command_result>"#,
        );
        assert!(success);
        assert_eq!(status.product_name(), Some("A<B!"));
    }

    #[test]
    fn status_serializes_as_flat_object() {
        let (status, _) = parse_response(STATUS_FULL);
        let json = serde_json::to_value(&status).unwrap();

        assert_eq!(json["state"], "paused");
        assert_eq!(json["volume"], 30);
        assert_eq!(json["muted"], true);
    }
}
