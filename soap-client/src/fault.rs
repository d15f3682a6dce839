//! SOAP fault parsing
//!
//! A fault body is parsed in two stages. The structured stage expects the
//! standard `Envelope/Body/Fault` shape with a UPnP error inside `detail`.
//! If any piece is missing the body is kept verbatim in
//! [`FaultDetail::Unparsable`], so callers always receive a [`SoapFault`].

use std::fmt;

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::warn;
use xmltree::{Element, XMLNode};

/// Namespace of the `UPnPError` element carried in a fault's `detail`
pub const UPNP_CONTROL_NS: &str = "urn:schemas-upnp-org:control-1-0";

/// The request that produced a fault, kept for diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub url: String,
    pub body: String,
    pub headers: Vec<(String, String)>,
}

/// What could be recovered from a fault response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaultDetail {
    /// A well-formed UPnP fault
    Upnp {
        fault_code: String,
        fault_string: String,
        error_code: String,
        error_description: String,
        /// Inner XML of the `detail` element, verbatim
        detail: String,
    },
    /// The body did not have the expected fault shape
    Unparsable { reason: String, body: String },
}

/// A fault returned by the device together with the request that caused it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapFault {
    pub detail: FaultDetail,
    pub request: RequestContext,
}

impl SoapFault {
    pub fn fault_code(&self) -> Option<&str> {
        match &self.detail {
            FaultDetail::Upnp { fault_code, .. } => Some(fault_code),
            FaultDetail::Unparsable { .. } => None,
        }
    }

    pub fn fault_string(&self) -> Option<&str> {
        match &self.detail {
            FaultDetail::Upnp { fault_string, .. } => Some(fault_string),
            FaultDetail::Unparsable { .. } => None,
        }
    }

    pub fn error_code(&self) -> Option<&str> {
        match &self.detail {
            FaultDetail::Upnp { error_code, .. } => Some(error_code),
            FaultDetail::Unparsable { .. } => None,
        }
    }

    /// Numeric UPnP error code (e.g. 401 for "Invalid Action")
    pub fn error_number(&self) -> Option<u16> {
        self.error_code().and_then(|code| code.parse().ok())
    }

    pub fn error_description(&self) -> Option<&str> {
        match &self.detail {
            FaultDetail::Upnp {
                error_description, ..
            } => Some(error_description),
            FaultDetail::Unparsable { .. } => None,
        }
    }

    /// Raw `detail` block for structured faults
    pub fn raw_detail(&self) -> Option<&str> {
        match &self.detail {
            FaultDetail::Upnp { detail, .. } => Some(detail),
            FaultDetail::Unparsable { .. } => None,
        }
    }

    pub fn is_unparsable(&self) -> bool {
        matches!(self.detail, FaultDetail::Unparsable { .. })
    }

    /// Human-readable summary, `"<errorCode>: <errorDescription>"` for UPnP faults
    pub fn message(&self) -> String {
        match &self.detail {
            FaultDetail::Upnp {
                error_code,
                error_description,
                ..
            } => format!("{}: {}", error_code, error_description),
            FaultDetail::Unparsable { reason, .. } => {
                format!("Unparsable fault response ({})", reason)
            }
        }
    }
}

impl fmt::Display for SoapFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Parse a non-success response body into a [`SoapFault`].
///
/// Never fails: a body without the expected fault shape produces
/// [`FaultDetail::Unparsable`] carrying the raw text.
pub fn parse_fault(body: &str, request: RequestContext) -> SoapFault {
    let detail = match parse_upnp_fault(body) {
        Ok(detail) => detail,
        Err(reason) => {
            warn!(url = %request.url, %reason, "Could not parse SOAP fault body");
            FaultDetail::Unparsable {
                reason,
                body: body.to_string(),
            }
        }
    };

    SoapFault { detail, request }
}

fn parse_upnp_fault(body: &str) -> Result<FaultDetail, String> {
    let envelope =
        Element::parse(body.as_bytes()).map_err(|e| format!("invalid XML: {}", e))?;

    let fault = envelope
        .get_child("Body")
        .and_then(|b| b.get_child("Fault"))
        .ok_or_else(|| "missing Envelope/Body/Fault".to_string())?;

    let fault_code = child_text(fault, "faultcode")?;
    let fault_string = child_text(fault, "faultstring")?;

    let detail = fault
        .get_child("detail")
        .ok_or_else(|| "missing <detail>".to_string())?;

    let upnp_error = detail
        .children
        .iter()
        .filter_map(|node| match node {
            XMLNode::Element(element) => Some(element),
            _ => None,
        })
        .find(|element| element.namespace.as_deref() == Some(UPNP_CONTROL_NS))
        .ok_or_else(|| format!("no element in namespace {} inside <detail>", UPNP_CONTROL_NS))?;

    let error_code = child_text(upnp_error, "errorCode")?;
    let error_description = child_text(upnp_error, "errorDescription")?;

    let raw_detail = raw_inner_xml(body, "detail")
        .ok_or_else(|| "could not locate raw <detail> block".to_string())?;

    Ok(FaultDetail::Upnp {
        fault_code,
        fault_string,
        error_code,
        error_description,
        detail: raw_detail,
    })
}

fn child_text(parent: &Element, name: &str) -> Result<String, String> {
    let child = parent
        .get_child(name)
        .ok_or_else(|| format!("missing <{}>", name))?;

    Ok(child
        .get_text()
        .map(|text| text.trim().to_string())
        .unwrap_or_default())
}

/// Slice the inner XML of the first element with this local name out of the document
fn raw_inner_xml(document: &str, local_name: &str) -> Option<String> {
    let mut reader = Reader::from_str(document);
    let target = local_name.as_bytes();
    let mut start = None;
    let mut nested = 0usize;

    loop {
        let position = reader.buffer_position();
        match reader.read_event().ok()? {
            Event::Start(e) if e.local_name().as_ref() == target => {
                if start.is_none() {
                    start = Some(reader.buffer_position());
                } else {
                    nested += 1;
                }
            }
            Event::Empty(e) if e.local_name().as_ref() == target && start.is_none() => {
                return Some(String::new());
            }
            Event::End(e) if e.local_name().as_ref() == target => {
                if let Some(begin) = start {
                    if nested == 0 {
                        return document.get(begin..position).map(str::to_string);
                    }
                    nested -= 1;
                }
            }
            Event::Eof => return None,
            _ => {}
        }
    }
}
