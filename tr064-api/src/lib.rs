//! High-level TR-064 client
//!
//! Ties discovery, description decoding and SOAP action invocation together
//! behind a single [`Gateway`] handle.
//!
//! ```no_run
//! use tr064_api::{ClientConfig, Gateway};
//!
//! let config = ClientConfig::from_env()?;
//! let gateway = Gateway::discover(&config)?;
//!
//! let info = gateway.call(
//!     "urn:dslforum-org:service:DeviceInfo:1",
//!     "GetSecurityPort",
//!     Vec::<(&str, &str)>::new(),
//! )?;
//! println!("Security port: {}", info.get("NewSecurityPort")?);
//! # Ok::<(), tr064_api::ApiError>(())
//! ```
//!
//! Connecting to a known location skips the SSDP probe:
//!
//! ```no_run
//! use tr064_api::{ClientConfig, Gateway};
//!
//! let gateway = Gateway::connect("http://192.168.178.1:49000/tr64desc.xml", &ClientConfig::default())?;
//! for service in gateway.services() {
//!     println!("{}", service.service_type);
//! }
//! # Ok::<(), tr064_api::ApiError>(())
//! ```

pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;

pub use config::ClientConfig;
pub use error::{ApiError, Result};
pub use gateway::Gateway;

pub use soap_client::{ActionResult, FaultDetail, LookupError, SoapError, SoapFault, Value};
pub use tr064_discovery::{Description, Device, DiscoveryError, Icon, Service, SpecVersion};
