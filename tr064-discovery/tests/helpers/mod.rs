//! Test helpers for fixture-based integration tests

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

/// Read a fixture file from `tests/fixtures`
pub fn load_fixture(filename: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/fixtures");
    path.push(filename);

    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", filename, e))
}

/// The FRITZ!Box TR-064 description (`urn:dslforum-org:device-1-0`)
pub fn tr64desc() -> String {
    load_fixture("tr64desc.xml")
}

/// The FRITZ!Box IGD description (`urn:schemas-upnp-org:device-1-0`)
pub fn igddesc() -> String {
    load_fixture("igddesc.xml")
}

/// SSDP reply with CRLF line endings, as it arrives on the wire
pub fn ssdp_reply() -> String {
    load_fixture("ssdp_response.txt")
        .lines()
        .map(|line| format!("{}\r\n", line))
        .collect()
}
