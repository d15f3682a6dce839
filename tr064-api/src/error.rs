use soap_client::{LookupError, SoapError, SoapFault};
use thiserror::Error;
use tr064_discovery::DiscoveryError;

/// Errors surfaced by the gateway facade
///
/// Lower-level failures keep their original type so callers can still reach
/// the SOAP fault detail or the socket error behind a discovery timeout.
#[derive(Debug, Error)]
pub enum ApiError {
    /// SSDP exchange, description fetch or description decoding failed
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    /// Action invocation failed, including SOAP faults
    #[error(transparent)]
    Soap(#[from] SoapError),

    /// No service in the device tree has this `serviceType`
    #[error("No service of type {0:?} in the device tree")]
    UnknownService(String),

    /// The description location or a control URL cannot be resolved
    #[error("Invalid location {location:?}: {reason}")]
    InvalidLocation { location: String, reason: String },

    /// The discovery reply carries no `location` header
    #[error("Discovery reply has no location header")]
    MissingLocation,

    /// A configuration value could not be read
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// The SOAP fault behind this error, if the gateway answered with one
    pub fn as_fault(&self) -> Option<&SoapFault> {
        match self {
            ApiError::Soap(error) => error.as_fault(),
            _ => None,
        }
    }
}

impl From<LookupError> for ApiError {
    fn from(error: LookupError) -> Self {
        ApiError::Soap(SoapError::Lookup(error))
    }
}

/// Type alias for results that can return an ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_error_wraps_into_soap() {
        let error: ApiError = LookupError::NotFound("NewX".to_string()).into();
        assert!(matches!(error, ApiError::Soap(SoapError::Lookup(_))));
        assert!(error.as_fault().is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ApiError::UnknownService("urn:x".to_string()).to_string(),
            "No service of type \"urn:x\" in the device tree"
        );
        assert_eq!(
            ApiError::from(DiscoveryError::MissingField("UDN".to_string())).to_string(),
            "Missing required element <UDN>"
        );
    }
}
