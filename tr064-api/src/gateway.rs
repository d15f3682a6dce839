//! The gateway facade: locate a device, decode its description, call actions.

use soap_client::{ActionResult, SoapClient, Value};
use tr064_discovery::{
    decode_description, discover_target, fetch_description, Description, Device, Service,
    SpecVersion,
};
use tracing::{debug, info};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};

/// A TR-064 gateway with its decoded device tree
///
/// Built once from a description document; the device tree does not change
/// afterwards. Action calls go through a SOAP client owned by the gateway.
#[derive(Debug, Clone)]
pub struct Gateway {
    location: Url,
    description: Description,
    soap_client: SoapClient,
}

impl Gateway {
    /// Connect to a gateway whose description location is already known
    ///
    /// No discovery probe is sent.
    pub fn connect(location: &str, config: &ClientConfig) -> Result<Self> {
        let location_url = parse_location(location)?;
        let xml = fetch_description(location, config.description_timeout)?;
        let description = decode_description(&xml)?;

        info!(
            %location_url,
            friendly_name = %description.device.friendly_name,
            services = description.device.all_services().len(),
            "Connected to gateway"
        );

        Ok(Self {
            location: location_url,
            description,
            soap_client: SoapClient::with_timeouts(config.connect_timeout, config.read_timeout),
        })
    }

    /// Discover a gateway on the local network, then connect to it
    pub fn discover(config: &ClientConfig) -> Result<Self> {
        let reply = discover_target(&config.search_target, config.discovery_timeout)?;
        let location = reply.location().ok_or(ApiError::MissingLocation)?;

        debug!(location, "Gateway discovered");
        Self::connect(location, config)
    }

    /// URL the description document was fetched from
    pub fn location(&self) -> &Url {
        &self.location
    }

    pub fn description(&self) -> &Description {
        &self.description
    }

    /// Root device of the description
    pub fn device(&self) -> &Device {
        &self.description.device
    }

    pub fn spec_version(&self) -> Option<SpecVersion> {
        self.description.spec_version
    }

    /// Every service in the device tree, depth first
    pub fn services(&self) -> Vec<&Service> {
        self.description.device.all_services()
    }

    pub fn service(&self, service_type: &str) -> Result<&Service> {
        self.description
            .device
            .find_service(service_type)
            .ok_or_else(|| ApiError::UnknownService(service_type.to_string()))
    }

    /// Absolute control URL of `service`
    ///
    /// Relative paths resolve against `URLBase` when the document has one,
    /// otherwise against the description location.
    pub fn control_url(&self, service: &Service) -> Result<Url> {
        let base = match &self.description.url_base {
            Some(url_base) => parse_location(url_base)?,
            None => self.location.clone(),
        };

        base.join(&service.control_url)
            .map_err(|e| ApiError::InvalidLocation {
                location: service.control_url.clone(),
                reason: e.to_string(),
            })
    }

    /// Invoke `action` on the first service of type `service_type`
    ///
    /// The service type doubles as the SOAP namespace of the action.
    pub fn call<I, K, V>(&self, service_type: &str, action: &str, params: I) -> Result<ActionResult>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let service = self.service(service_type)?;
        let control_url = self.control_url(service)?;

        Ok(self
            .soap_client
            .invoke(control_url.as_str(), &service.service_type, action, params)?)
    }
}

fn parse_location(location: &str) -> Result<Url> {
    Url::parse(location).map_err(|e| ApiError::InvalidLocation {
        location: location.to_string(),
        reason: e.to_string(),
    })
}
