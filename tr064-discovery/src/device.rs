//! Device topology model.
//!
//! A [`Device`] is built once from one subtree of the description document
//! and owns its sub-devices, services and icons outright. Sequences keep the
//! order in which the document lists them.

use std::fmt;

use serde::Serialize;

/// A (sub-)device from the description document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Device {
    pub device_type: String,
    pub friendly_name: String,
    pub manufacturer: String,
    pub manufacturer_url: String,
    pub model_description: String,
    pub model_name: String,
    pub model_number: String,
    pub model_url: String,
    /// Unique device name, e.g. `uuid:739f2409-bccb-40e7-8e6c-0896D74C6BF8`
    pub udn: String,
    pub devices: Vec<Device>,
    pub services: Vec<Service>,
    pub icons: Vec<Icon>,
}

/// A remote interface exposed by a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Service {
    /// Service URN, also used as the SOAP namespace for its actions
    pub service_type: String,
    pub service_id: String,
    /// Path (relative to the description location) for action invocation
    pub control_url: String,
    /// Event subscription path; recorded but never used
    pub event_sub_url: String,
    /// Path of the service's action/state-variable schema
    pub scpd_url: String,
}

/// An icon entry; sizes are kept as the document spells them
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Icon {
    pub mimetype: String,
    pub width: String,
    pub height: String,
    pub depth: String,
    pub url: String,
}

/// `specVersion` of the description document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpecVersion {
    pub major: u32,
    pub minor: u32,
}

impl fmt::Display for SpecVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl Device {
    /// Every service in this device tree, depth first.
    ///
    /// A device's own services come before those of its sub-devices.
    pub fn all_services(&self) -> Vec<&Service> {
        let mut services = Vec::new();
        self.collect_services(&mut services);
        services
    }

    fn collect_services<'a>(&'a self, services: &mut Vec<&'a Service>) {
        services.extend(self.services.iter());
        for device in &self.devices {
            device.collect_services(services);
        }
    }

    /// First service in the tree whose `serviceType` equals `service_type`
    pub fn find_service(&self, service_type: &str) -> Option<&Service> {
        self.all_services()
            .into_iter()
            .find(|service| service.service_type == service_type)
    }

    /// First device in the tree (this one included) with the given `deviceType`
    pub fn find_device(&self, device_type: &str) -> Option<&Device> {
        if self.device_type == device_type {
            return Some(self);
        }
        self.devices
            .iter()
            .find_map(|device| device.find_device(device_type))
    }
}
