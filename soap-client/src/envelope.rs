//! SOAP envelope construction and response decoding
//!
//! Pure functions: nothing in here touches the network.

use quick_xml::escape::escape;
use xmltree::{Element, XMLNode};

use crate::error::{Result, SoapError};
use crate::result::ActionResult;
use crate::value::Value;

/// Namespace of the SOAP 1.1 envelope
pub const ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// Encoding style declared on every request envelope
pub const ENCODING_STYLE: &str = "http://schemas.xmlsoap.org/soap/encoding/";

/// Build the request envelope for `action` in the service `namespace`.
///
/// Each parameter becomes one child element of the action element, in the
/// order the iterator yields them. Values are rendered with their `Display`
/// form and XML-escaped.
pub fn encode_request<I, K, V>(namespace: &str, action: &str, params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<Value>,
{
    let arguments: String = params
        .into_iter()
        .map(|(name, value)| {
            let name = name.as_ref();
            let text = value.into().to_string();
            format!("<{name}>{}</{name}>", escape(text.as_str()))
        })
        .collect();

    format!(
        concat!(
            r#"<?xml version="1.0" encoding="utf-8"?>"#,
            r#"<s:Envelope xmlns:s="{envelope}" s:encodingStyle="{encoding}">"#,
            "<s:Body>",
            r#"<u:{action} xmlns:u="{namespace}">{arguments}</u:{action}>"#,
            "</s:Body>",
            "</s:Envelope>"
        ),
        envelope = ENVELOPE_NS,
        encoding = ENCODING_STYLE,
        action = action,
        namespace = escape(namespace),
        arguments = arguments,
    )
}

/// Decode a success response into an [`ActionResult`].
///
/// The first element inside `Body` is taken as the method-response element.
pub fn decode_response(bytes: &[u8]) -> Result<ActionResult> {
    let mut envelope = Element::parse(bytes)
        .map_err(|e| SoapError::MalformedResponse(format!("Invalid XML: {}", e)))?;

    if envelope.name != "Envelope" {
        return Err(SoapError::MalformedResponse(format!(
            "Expected SOAP Envelope, found <{}>",
            envelope.name
        )));
    }

    let body = envelope
        .take_child("Body")
        .ok_or_else(|| SoapError::MalformedResponse("Missing SOAP Body".to_string()))?;

    let response = body
        .children
        .into_iter()
        .find_map(|node| match node {
            XMLNode::Element(element) => Some(element),
            _ => None,
        })
        .ok_or_else(|| SoapError::MalformedResponse("Empty SOAP Body".to_string()))?;

    Ok(ActionResult::new(response))
}
