//! TR-064 gateway discovery and device description decoding
//!
//! Finding a gateway is a two-step affair: an SSDP M-SEARCH probe answers
//! with the location of a description document, and that document decodes
//! into a tree of [`Device`]s with their [`Service`]s.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//! use tr064_discovery::{decode, discover, fetch_description};
//!
//! let reply = discover(Duration::from_secs(1))?;
//! if let Some(location) = reply.location() {
//!     let xml = fetch_description(location, Duration::from_secs(5))?;
//!     let device = decode(&xml)?;
//!     for service in device.all_services() {
//!         println!("{} -> {}", service.service_type, service.control_url);
//!     }
//! }
//! # Ok::<(), tr064_discovery::DiscoveryError>(())
//! ```

mod description;
mod device;
mod discovery;
mod error;
mod ssdp;

pub use description::{decode, decode_description, Description, DocumentKind};
pub use device::{Device, Icon, Service, SpecVersion};
pub use discovery::{discover, discover_target, fetch_description};
pub use error::{DiscoveryError, Result};
pub use ssdp::{
    build_probe, parse_ssdp_response, SsdpClient, SsdpResponse, DEFAULT_SEARCH_TARGET,
    SSDP_MULTICAST_ADDR,
};
