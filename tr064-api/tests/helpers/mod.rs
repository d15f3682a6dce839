//! Shared fixtures for gateway tests

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

/// Read a fixture from the discovery crate, which owns the captured documents
pub fn load_fixture(filename: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("../tr064-discovery/tests/fixtures");
    path.push(filename);

    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", filename, e))
}

/// A SOAP envelope wrapping `<u:{action}Response>` with the given arguments
pub fn action_response(namespace: &str, action: &str, args: &[(&str, &str)]) -> String {
    let body: String = args
        .iter()
        .map(|(name, value)| format!("<{0}>{1}</{0}>", name, value))
        .collect();

    format!(
        "<?xml version=\"1.0\"?>\n\
         <s:Envelope xmlns:s=\"http://schemas.xmlsoap.org/soap/envelope/\" \
         s:encodingStyle=\"http://schemas.xmlsoap.org/soap/encoding/\">\
         <s:Body><u:{1}Response xmlns:u=\"{0}\">{2}</u:{1}Response></s:Body></s:Envelope>",
        namespace, action, body
    )
}

/// A UPnP fault envelope
pub fn upnp_fault(error_code: u16, description: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?>\n\
         <s:Envelope xmlns:s=\"http://schemas.xmlsoap.org/soap/envelope/\" \
         s:encodingStyle=\"http://schemas.xmlsoap.org/soap/encoding/\">\
         <s:Body><s:Fault><faultcode>s:Client</faultcode><faultstring>UPnPError</faultstring>\
         <detail><UPnPError xmlns=\"urn:schemas-upnp-org:control-1-0\">\
         <errorCode>{}</errorCode><errorDescription>{}</errorDescription>\
         </UPnPError></detail></s:Fault></s:Body></s:Envelope>",
        error_code, description
    )
}
