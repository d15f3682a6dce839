//! Gateway lookup: SSDP probe followed by the description fetch.

use std::time::Duration;

use tracing::{debug, info};

use crate::error::{DiscoveryError, Result};
use crate::ssdp::{SsdpClient, SsdpResponse, DEFAULT_SEARCH_TARGET};

/// Probe the local network for a TR-064 gateway
///
/// Returns the first reply received within `timeout`.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use tr064_discovery::discover;
///
/// let reply = discover(Duration::from_secs(1)).unwrap();
/// println!("Gateway description at {:?}", reply.location());
/// ```
pub fn discover(timeout: Duration) -> Result<SsdpResponse> {
    discover_target(DEFAULT_SEARCH_TARGET, timeout)
}

/// Probe the local network for devices matching `search_target`
pub fn discover_target(search_target: &str, timeout: Duration) -> Result<SsdpResponse> {
    let client = SsdpClient::new(timeout)?;
    let response = client.probe(search_target)?;

    info!(
        status = response.status_code,
        location = response.location().unwrap_or("<none>"),
        "SSDP discovery answered"
    );
    Ok(response)
}

/// Download the description document from `location`
///
/// Any non-success HTTP status is reported as [`DiscoveryError::HttpError`].
pub fn fetch_description(location: &str, timeout: Duration) -> Result<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| DiscoveryError::HttpError(format!("Failed to create HTTP client: {}", e)))?;

    debug!(location, "Fetching device description");

    let response = client
        .get(location)
        .send()
        .and_then(|response| response.error_for_status())
        .map_err(|e| DiscoveryError::HttpError(format!("{}: {}", location, e)))?;

    response
        .text()
        .map_err(|e| DiscoveryError::HttpError(format!("Failed to read description body: {}", e)))
}
