//! Error types for the SOAP client

use thiserror::Error;

use crate::fault::SoapFault;
use crate::result::LookupError;

/// Errors that can occur during SOAP communication
#[derive(Debug, Error)]
pub enum SoapError {
    /// Network or HTTP communication error
    #[error("Network/HTTP error: {0}")]
    Network(String),

    /// The device answered with something other than `text/xml`
    #[error("Unsupported content type: {0:?}")]
    UnsupportedContentType(String),

    /// A success response whose body is not a SOAP envelope
    #[error("Malformed SOAP response: {0}")]
    MalformedResponse(String),

    /// SOAP fault returned by the device
    #[error("SOAP fault: {0}")]
    Fault(Box<SoapFault>),

    /// A value could not be read from an action result
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

impl SoapError {
    /// The fault carried by this error, if the device returned one
    pub fn as_fault(&self) -> Option<&SoapFault> {
        match self {
            SoapError::Fault(fault) => Some(fault),
            _ => None,
        }
    }
}

impl From<SoapFault> for SoapError {
    fn from(fault: SoapFault) -> Self {
        SoapError::Fault(Box::new(fault))
    }
}

/// Convenience result alias for SOAP operations
pub type Result<T> = std::result::Result<T, SoapError>;
