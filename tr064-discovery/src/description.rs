//! Device description decoding.
//!
//! The description document is a `root` element holding an optional
//! `specVersion`, an optional `URLBase` and one `device`. Devices nest through
//! `deviceList`, and each lists its `serviceList` and `iconList`.
//!
//! Two namespace spellings exist for the device schema. The one used by a
//! document is resolved once from its root element and every lookup in that
//! decode pass is made in it.

use serde::Serialize;
use tracing::debug;
use xmltree::{Element, XMLNode};

use crate::device::{Device, Icon, Service, SpecVersion};
use crate::error::{DiscoveryError, Result};

/// Local name the document element must end with
const ROOT_MARKER: &str = "root";

/// Which schema variant a description document is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DocumentKind {
    /// `urn:schemas-upnp-org:device-1-0` (IGD style)
    UpnpDevice,
    /// `urn:dslforum-org:device-1-0` (TR-064 style)
    DslForumDevice,
}

impl DocumentKind {
    /// Known variants in the order they are tried
    pub const ALL: [DocumentKind; 2] = [DocumentKind::UpnpDevice, DocumentKind::DslForumDevice];

    pub fn namespace(self) -> &'static str {
        match self {
            DocumentKind::UpnpDevice => "urn:schemas-upnp-org:device-1-0",
            DocumentKind::DslForumDevice => "urn:dslforum-org:device-1-0",
        }
    }

    /// Resolve the variant from the document's root element
    pub fn from_root(root: &Element) -> Result<Self> {
        if !root.name.ends_with(ROOT_MARKER) {
            return Err(DiscoveryError::UnsupportedDocument(format!(
                "root element is <{}>, expected <{}>",
                root.name, ROOT_MARKER
            )));
        }

        let namespace = root.namespace.as_deref().unwrap_or_default();
        Self::ALL
            .into_iter()
            .find(|kind| kind.namespace() == namespace)
            .ok_or_else(|| {
                DiscoveryError::UnsupportedDocument(format!(
                    "unknown root namespace {:?}",
                    namespace
                ))
            })
    }
}

/// A decoded description document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Description {
    pub kind: DocumentKind,
    pub spec_version: Option<SpecVersion>,
    /// `URLBase`, present in older UPnP documents
    pub url_base: Option<String>,
    pub device: Device,
}

/// Decode a description document into its root [`Device`].
///
/// # Errors
///
/// * `ParseError` if the document is not well-formed XML
/// * `UnsupportedDocument` if the root is not a known `root` element
/// * `MissingField` naming the first required element that is absent
pub fn decode(xml: &str) -> Result<Device> {
    decode_description(xml).map(|description| description.device)
}

/// Decode a description document, keeping the document-level fields.
pub fn decode_description(xml: &str) -> Result<Description> {
    let root = Element::parse(xml.as_bytes())
        .map_err(|e| DiscoveryError::ParseError(format!("Failed to parse description XML: {}", e)))?;

    let kind = DocumentKind::from_root(&root)?;
    debug!(?kind, "Decoding description document");

    decode_device_document(&root, kind)
}

fn decode_device_document(root: &Element, kind: DocumentKind) -> Result<Description> {
    let ns = kind.namespace();

    let spec_version = find_child(root, ns, "specVersion").and_then(|spec| {
        let version = decode_spec_version(spec, ns);
        if version.is_none() {
            debug!("Ignoring incomplete <specVersion>");
        }
        version
    });

    let url_base = find_child(root, ns, "URLBase").map(element_text);

    let device = find_child(root, ns, "device")
        .ok_or_else(|| DiscoveryError::MissingField("device".to_string()))?;

    Ok(Description {
        kind,
        spec_version,
        url_base,
        device: decode_device(device, ns)?,
    })
}

/// `None` unless both `major` and `minor` are present and numeric
fn decode_spec_version(element: &Element, ns: &str) -> Option<SpecVersion> {
    Some(SpecVersion {
        major: number_field(element, ns, "major")?,
        minor: number_field(element, ns, "minor")?,
    })
}

fn decode_device(element: &Element, ns: &str) -> Result<Device> {
    Ok(Device {
        device_type: required_text(element, ns, "deviceType")?,
        friendly_name: required_text(element, ns, "friendlyName")?,
        manufacturer: required_text(element, ns, "manufacturer")?,
        manufacturer_url: required_text(element, ns, "manufacturerURL")?,
        model_description: required_text(element, ns, "modelDescription")?,
        model_name: required_text(element, ns, "modelName")?,
        model_number: required_text(element, ns, "modelNumber")?,
        model_url: required_text(element, ns, "modelURL")?,
        udn: required_text(element, ns, "UDN")?,
        devices: list_items(element, ns, "deviceList")
            .map(|child| decode_device(child, ns))
            .collect::<Result<Vec<_>>>()?,
        services: list_items(element, ns, "serviceList")
            .map(|child| decode_service(child, ns))
            .collect::<Result<Vec<_>>>()?,
        icons: list_items(element, ns, "iconList")
            .map(|child| decode_icon(child, ns))
            .collect::<Result<Vec<_>>>()?,
    })
}

fn decode_service(element: &Element, ns: &str) -> Result<Service> {
    Ok(Service {
        service_type: required_text(element, ns, "serviceType")?,
        service_id: required_text(element, ns, "serviceId")?,
        control_url: required_text(element, ns, "controlURL")?,
        event_sub_url: required_text(element, ns, "eventSubURL")?,
        scpd_url: required_text(element, ns, "SCPDURL")?,
    })
}

fn decode_icon(element: &Element, ns: &str) -> Result<Icon> {
    Ok(Icon {
        mimetype: required_text(element, ns, "mimetype")?,
        width: required_text(element, ns, "width")?,
        height: required_text(element, ns, "height")?,
        depth: required_text(element, ns, "depth")?,
        url: required_text(element, ns, "url")?,
    })
}

fn child_elements(element: &Element) -> impl Iterator<Item = &Element> {
    element.children.iter().filter_map(|node| match node {
        XMLNode::Element(child) => Some(child),
        _ => None,
    })
}

/// First direct child with this name in namespace `ns`
fn find_child<'a>(element: &'a Element, ns: &str, name: &str) -> Option<&'a Element> {
    child_elements(element)
        .find(|child| child.name == name && child.namespace.as_deref() == Some(ns))
}

/// Entries of an optional list container; an absent container yields nothing
fn list_items<'a>(element: &'a Element, ns: &str, name: &str) -> impl Iterator<Item = &'a Element> {
    find_child(element, ns, name)
        .into_iter()
        .flat_map(child_elements)
}

fn element_text(element: &Element) -> String {
    element
        .get_text()
        .map(|text| text.trim().to_string())
        .unwrap_or_default()
}

fn required_text(element: &Element, ns: &str, name: &str) -> Result<String> {
    find_child(element, ns, name)
        .map(element_text)
        .ok_or_else(|| DiscoveryError::MissingField(name.to_string()))
}

fn number_field(element: &Element, ns: &str, name: &str) -> Option<u32> {
    find_child(element, ns, name)
        .map(element_text)?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_device(ns: &str, extra: &str) -> String {
        format!(
            r#"<?xml version="1.0"?>
<root xmlns="{ns}">
  <specVersion><major>1</major><minor>0</minor></specVersion>
  <device>
    <deviceType>urn:dslforum-org:device:InternetGatewayDevice:1</deviceType>
    <friendlyName>FRITZ!Box 7590</friendlyName>
    <manufacturer>AVM</manufacturer>
    <manufacturerURL>www.avm.de</manufacturerURL>
    <modelDescription>FRITZ!Box 7590</modelDescription>
    <modelName>FRITZ!Box 7590</modelName>
    <modelNumber>avm</modelNumber>
    <modelURL>www.avm.de</modelURL>
    <UDN>uuid:739f2409-bccb-40e7-8e6c-0896D74C6BF8</UDN>
    {extra}
  </device>
</root>"#
        )
    }

    #[test]
    fn test_decode_minimal_document() {
        let description = decode_description(&minimal_device("urn:dslforum-org:device-1-0", "")).unwrap();

        assert_eq!(description.kind, DocumentKind::DslForumDevice);
        assert_eq!(description.spec_version, Some(SpecVersion { major: 1, minor: 0 }));
        assert_eq!(description.url_base, None);

        let device = description.device;
        assert_eq!(device.friendly_name, "FRITZ!Box 7590");
        assert_eq!(device.udn, "uuid:739f2409-bccb-40e7-8e6c-0896D74C6BF8");
        assert!(device.devices.is_empty());
        assert!(device.services.is_empty());
        assert!(device.icons.is_empty());
    }

    #[test]
    fn test_first_known_namespace_selected() {
        let description = decode_description(&minimal_device("urn:schemas-upnp-org:device-1-0", "")).unwrap();
        assert_eq!(description.kind, DocumentKind::UpnpDevice);
    }

    #[test]
    fn test_unknown_namespace_unsupported() {
        let result = decode(&minimal_device("urn:example:device-9-9", ""));
        assert!(matches!(result, Err(DiscoveryError::UnsupportedDocument(_))));
    }

    #[test]
    fn test_missing_namespace_unsupported() {
        let xml = "<root><device><deviceType>x</deviceType></device></root>";
        assert!(matches!(decode(xml), Err(DiscoveryError::UnsupportedDocument(_))));
    }

    #[test]
    fn test_wrong_root_marker_unsupported() {
        let xml = r#"<scpd xmlns="urn:dslforum-org:device-1-0"><device/></scpd>"#;
        match decode(xml) {
            Err(DiscoveryError::UnsupportedDocument(msg)) => assert!(msg.contains("<scpd>")),
            other => panic!("Expected UnsupportedDocument, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_xml_is_parse_error() {
        assert!(matches!(decode("not xml at all"), Err(DiscoveryError::ParseError(_))));
    }

    #[test]
    fn test_missing_required_field_named() {
        let xml = minimal_device("urn:dslforum-org:device-1-0", "")
            .replace("<modelNumber>avm</modelNumber>", "");

        match decode(&xml) {
            Err(DiscoveryError::MissingField(name)) => assert_eq!(name, "modelNumber"),
            other => panic!("Expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_field_in_other_namespace_counts_as_missing() {
        let xml = minimal_device("urn:dslforum-org:device-1-0", "").replace(
            "<UDN>uuid:739f2409-bccb-40e7-8e6c-0896D74C6BF8</UDN>",
            r#"<UDN xmlns="urn:schemas-upnp-org:device-1-0">uuid:x</UDN>"#,
        );

        match decode(&xml) {
            Err(DiscoveryError::MissingField(name)) => assert_eq!(name, "UDN"),
            other => panic!("Expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_service_field_named() {
        let extra = r#"<serviceList><service>
            <serviceType>urn:dslforum-org:service:DeviceInfo:1</serviceType>
            <serviceId>urn:DeviceInfo-com:serviceId:DeviceInfo1</serviceId>
            <controlURL>/upnp/control/deviceinfo</controlURL>
            <eventSubURL>/upnp/control/deviceinfo</eventSubURL>
        </service></serviceList>"#;

        match decode(&minimal_device("urn:dslforum-org:device-1-0", extra)) {
            Err(DiscoveryError::MissingField(name)) => assert_eq!(name, "SCPDURL"),
            other => panic!("Expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_icon_sizes_kept_as_text() {
        let extra = r#"<iconList><icon>
            <mimetype>image/png</mimetype><width>48</width><height>48</height>
            <depth>24bit</depth><url>/icon.png</url>
        </icon></iconList>
        <serviceList><service>
            <serviceType>urn:dslforum-org:service:DeviceInfo:1</serviceType>
            <serviceId>urn:DeviceInfo-com:serviceId:DeviceInfo1</serviceId>
            <controlURL>/upnp/control/deviceinfo</controlURL>
            <eventSubURL>/upnp/control/deviceinfo</eventSubURL>
            <SCPDURL>/deviceinfoSCPD.xml</SCPDURL>
        </service></serviceList>"#;

        let device = decode(&minimal_device("urn:dslforum-org:device-1-0", extra)).unwrap();
        assert_eq!(device.icons[0].width, "48");
        assert_eq!(device.icons[0].depth, "24bit");
        assert_eq!(device.services.len(), 1);
    }

    #[test]
    fn test_missing_icon_field_named() {
        let extra = "<iconList><icon><mimetype>image/gif</mimetype><width>118</width>\
                     <height>119</height><url>/ligd.gif</url></icon></iconList>";

        match decode(&minimal_device("urn:dslforum-org:device-1-0", extra)) {
            Err(DiscoveryError::MissingField(name)) => assert_eq!(name, "depth"),
            other => panic!("Expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_incomplete_spec_version_does_not_block_device() {
        let xml = minimal_device("urn:dslforum-org:device-1-0", "").replace(
            "<specVersion><major>1</major><minor>0</minor></specVersion>",
            "<specVersion><major>1</major></specVersion>",
        );

        let description = decode_description(&xml).unwrap();
        assert_eq!(description.spec_version, None);
        assert_eq!(description.device.model_number, "avm");
    }

    #[test]
    fn test_non_numeric_spec_version_is_none() {
        let xml = minimal_device("urn:dslforum-org:device-1-0", "").replace(
            "<minor>0</minor>",
            "<minor>zero</minor>",
        );

        assert_eq!(decode_description(&xml).unwrap().spec_version, None);
        assert!(decode(&xml).is_ok());
    }

    #[test]
    fn test_url_base_and_missing_spec_version() {
        let xml = minimal_device("urn:schemas-upnp-org:device-1-0", "")
            .replace(
                "<specVersion><major>1</major><minor>0</minor></specVersion>",
                "<URLBase> http://192.168.1.1:5000 </URLBase>",
            );

        let description = decode_description(&xml).unwrap();
        assert_eq!(description.spec_version, None);
        assert_eq!(description.url_base.as_deref(), Some("http://192.168.1.1:5000"));
    }

    #[test]
    fn test_root_without_device_is_missing_field() {
        let xml = r#"<root xmlns="urn:dslforum-org:device-1-0"><specVersion><major>1</major><minor>0</minor></specVersion></root>"#;
        match decode(xml) {
            Err(DiscoveryError::MissingField(name)) => assert_eq!(name, "device"),
            other => panic!("Expected MissingField, got {:?}", other),
        }
    }
}
