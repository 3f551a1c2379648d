use quick_xml::encoding::Decoder;
use quick_xml::events::BytesStart;

use crate::error::{ClientError, ClientResult};
use crate::protocol_constants::COMMAND_PATH;

/// Builds the command endpoint URL for a player.
///
/// # Arguments
/// * `host` - The player's host, optionally with a port (e.g., "192.168.1.50:8080")
///
/// # Returns
/// A fully-formed HTTP URL string
pub fn build_command_url(host: &str) -> String {
    format!("http://{}{}", host.trim().trim_end_matches('/'), COMMAND_PATH)
}

/// Reads every attribute of an XML element, with XML entities resolved.
///
/// All attributes are checked, so a duplicated or unquoted attribute, or a
/// value with an undefined entity, fails the whole element.
///
/// # Errors
/// Returns `ClientError::Xml` for any malformed attribute.
pub fn get_xml_attrs(
    elem: &BytesStart,
    decoder: Decoder,
) -> ClientResult<Vec<(Vec<u8>, String)>> {
    let mut attrs = Vec::new();
    for attr in elem.attributes() {
        let attr = attr.map_err(|e| ClientError::Xml(format!("malformed attribute: {e}")))?;
        let value = attr
            .decode_and_unescape_value(decoder)
            .map_err(|e| ClientError::Xml(format!("invalid attribute value: {e}")))?;
        attrs.push((attr.key.as_ref().to_vec(), value.into_owned()));
    }
    Ok(attrs)
}

/// Gets an attribute value from an XML element, with XML entities resolved.
///
/// # Arguments
/// * `elem` - The XML element to search
/// * `attr_name` - The attribute name as bytes (e.g., `b"name"`)
/// * `decoder` - Decoder of the reader that produced `elem`
///
/// # Errors
/// Returns `ClientError::Xml` if any attribute of `elem` is malformed.
pub fn get_xml_attr(
    elem: &BytesStart,
    attr_name: &[u8],
    decoder: Decoder,
) -> ClientResult<Option<String>> {
    Ok(get_xml_attrs(elem, decoder)?
        .into_iter()
        .find(|(key, _)| key.as_slice() == attr_name)
        .map(|(_, value)| value))
}
