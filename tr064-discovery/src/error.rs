//! Error types for the discovery system.

use std::fmt;
use std::io;
use std::time::Duration;

/// Error type for discovery and description decoding.
///
/// Covers the SSDP exchange, fetching the description document, and turning
/// that document into a device tree.
#[derive(Debug)]
pub enum DiscoveryError {
    /// Socket creation, send or receive failed
    NetworkError(io::Error),
    /// No SSDP reply arrived before the receive timeout
    Timeout { timeout: Duration, source: io::Error },
    /// The SSDP reply or the description document could not be parsed
    ParseError(String),
    /// Fetching the description document over HTTP failed
    HttpError(String),
    /// The description root is not a recognised `root` element
    UnsupportedDocument(String),
    /// A required element is absent from the description
    MissingField(String),
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryError::NetworkError(e) => write!(f, "Network error: {}", e),
            DiscoveryError::Timeout { timeout, .. } => {
                write!(f, "No SSDP reply within {:?}", timeout)
            }
            DiscoveryError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            DiscoveryError::HttpError(msg) => write!(f, "HTTP error: {}", msg),
            DiscoveryError::UnsupportedDocument(msg) => {
                write!(f, "Unsupported description document: {}", msg)
            }
            DiscoveryError::MissingField(name) => {
                write!(f, "Missing required element <{}>", name)
            }
        }
    }
}

impl std::error::Error for DiscoveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DiscoveryError::NetworkError(e) => Some(e),
            DiscoveryError::Timeout { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience Result type alias for discovery operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;
