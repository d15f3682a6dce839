//! SOAP client for TR-064 gateway control
//!
//! This crate implements the action-invocation half of TR-064:
//! building request envelopes, sending them to a service's control URL,
//! and turning the reply into either an [`ActionResult`] or a structured
//! [`SoapFault`].
//!
//! ```rust,no_run
//! use soap_client::SoapClient;
//!
//! let client = SoapClient::new();
//! let result = client.invoke(
//!     "http://192.168.178.1:49000/upnp/control/deviceinfo",
//!     "urn:dslforum-org:service:DeviceInfo:1",
//!     "GetSecurityPort",
//!     Vec::<(&str, &str)>::new(),
//! )?;
//! let port = result.get("NewSecurityPort")?;
//! # Ok::<(), soap_client::SoapError>(())
//! ```

mod envelope;
mod error;
mod fault;
mod result;
mod value;

pub use envelope::{decode_response, encode_request, ENCODING_STYLE, ENVELOPE_NS};
pub use error::{Result, SoapError};
pub use fault::{parse_fault, FaultDetail, RequestContext, SoapFault, UPNP_CONTROL_NS};
pub use result::{ActionResult, LookupError};
pub use value::Value;

use std::time::Duration;
use tracing::{debug, warn};

/// Content type sent with every action request
pub const REQUEST_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// A minimal SOAP client for TR-064 action invocation.
///
/// Holds only the HTTP agent; every call is independent, so a client can be
/// cloned and shared between threads freely.
#[derive(Debug, Clone)]
pub struct SoapClient {
    agent: ureq::Agent,
}

impl SoapClient {
    /// Create a new SOAP client with default timeouts (5s connect, 10s read)
    pub fn new() -> Self {
        Self::with_timeouts(Duration::from_secs(5), Duration::from_secs(10))
    }

    /// Create a SOAP client with explicit connect and read timeouts
    pub fn with_timeouts(connect: Duration, read: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout_connect(connect)
                .timeout_read(read)
                .build(),
        }
    }

    /// Invoke `action` of the service identified by `namespace` at `control_url`.
    ///
    /// # Arguments
    /// * `control_url` - Absolute URL of the service's control endpoint
    /// * `namespace` - Service type URN, e.g. `urn:dslforum-org:service:DeviceInfo:1`
    /// * `action` - Action name, e.g. `GetInfo`
    /// * `params` - Action arguments, sent in iteration order
    ///
    /// # Errors
    /// * [`SoapError::Network`] if the request could not be sent or read
    /// * [`SoapError::UnsupportedContentType`] if the reply is not `text/xml`
    /// * [`SoapError::Fault`] if the device answered with a non-success status
    /// * [`SoapError::MalformedResponse`] if a success body is not a SOAP envelope
    pub fn invoke<I, K, V>(
        &self,
        control_url: &str,
        namespace: &str,
        action: &str,
        params: I,
    ) -> Result<ActionResult>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let body = encode_request(namespace, action, params);
        let headers = vec![
            ("soapaction".to_string(), format!("{}#{}", namespace, action)),
            ("content-type".to_string(), REQUEST_CONTENT_TYPE.to_string()),
        ];

        debug!(url = control_url, namespace, action, "Invoking SOAP action");

        let request = headers
            .iter()
            .fold(self.agent.post(control_url), |request, (name, value)| {
                request.set(name, value)
            });

        // ureq reports 4xx/5xx as errors; faults arrive that way
        let response = match request.send_string(&body) {
            Ok(response) => response,
            Err(ureq::Error::Status(_, response)) => response,
            Err(e) => return Err(SoapError::Network(e.to_string())),
        };

        let status = response.status();
        let content_type = response.header("content-type").unwrap_or_default().to_string();

        if !content_type.to_ascii_lowercase().starts_with("text/xml") {
            warn!(url = control_url, status, %content_type, "Non-XML reply to SOAP action");
            return Err(SoapError::UnsupportedContentType(content_type));
        }

        let text = response
            .into_string()
            .map_err(|e| SoapError::Network(e.to_string()))?;

        if status != 200 {
            debug!(url = control_url, status, "SOAP action returned a fault");
            let request = RequestContext {
                url: control_url.to_string(),
                body,
                headers,
            };
            return Err(parse_fault(&text, request).into());
        }

        decode_response(text.as_bytes())
    }
}

impl Default for SoapClient {
    fn default() -> Self {
        Self::new()
    }
}
