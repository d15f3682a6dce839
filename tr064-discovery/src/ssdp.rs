//! SSDP (Simple Service Discovery Protocol) exchange
//!
//! Discovery here is deliberately one-shot: one M-SEARCH datagram goes out,
//! one reply is read back, and the socket is dropped with the client.

use std::collections::BTreeMap;
use std::io;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, ToSocketAddrs, UdpSocket};
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::error::{DiscoveryError, Result};

/// Well-known SSDP multicast group and port
pub const SSDP_MULTICAST_ADDR: SocketAddrV4 =
    SocketAddrV4::new(Ipv4Addr::new(239, 255, 255, 250), 1900);

/// Search target for TR-064 capable gateways
pub const DEFAULT_SEARCH_TARGET: &str = "urn:dslforum-org:device:InternetGatewayDevice:1";

/// Seconds a device may wait before answering
const MX_SECONDS: u8 = 5;

const MULTICAST_TTL: u32 = 2;
const RECV_BUFFER_SIZE: usize = 4096;

/// A parsed SSDP reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SsdpResponse {
    pub status_code: u16,
    /// Header names are lower-cased, values trimmed
    pub headers: BTreeMap<String, String>,
}

impl SsdpResponse {
    /// Header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// URL of the device description document
    pub fn location(&self) -> Option<&str> {
        self.header("location")
    }

    /// `SERVER` header, naming the device's OS and UPnP stack
    pub fn server(&self) -> Option<&str> {
        self.header("server")
    }

    /// Unique service name of the responder
    pub fn usn(&self) -> Option<&str> {
        self.header("usn")
    }

    /// `ST` header echoed by the responder
    pub fn search_target(&self) -> Option<&str> {
        self.header("st")
    }
}

/// Render the M-SEARCH datagram for `search_target`
pub fn build_probe(search_target: &str) -> String {
    format!(
        "M-SEARCH * HTTP/1.1\r\n\
         Host: {}\r\n\
         Man: \"ssdp:discover\"\r\n\
         MX: {}\r\n\
         ST: {}\r\n\
         \r\n",
        SSDP_MULTICAST_ADDR, MX_SECONDS, search_target
    )
}

/// SSDP client owning one UDP socket for a single probe/reply exchange
#[derive(Debug)]
pub struct SsdpClient {
    socket: UdpSocket,
    timeout: Duration,
}

impl SsdpClient {
    /// Create a new SSDP client whose receive waits at most `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).map_err(DiscoveryError::NetworkError)?;

        socket
            .set_read_timeout(Some(timeout))
            .map_err(DiscoveryError::NetworkError)?;

        socket
            .set_multicast_ttl_v4(MULTICAST_TTL)
            .map_err(DiscoveryError::NetworkError)?;

        Ok(Self { socket, timeout })
    }

    /// Probe the multicast group and return the first reply
    pub fn probe(&self, search_target: &str) -> Result<SsdpResponse> {
        self.probe_to(SSDP_MULTICAST_ADDR, search_target)
    }

    /// Send one probe to `target` and read exactly one reply
    pub fn probe_to<A: ToSocketAddrs>(&self, target: A, search_target: &str) -> Result<SsdpResponse> {
        let request = build_probe(search_target);
        self.socket
            .send_to(request.as_bytes(), target)
            .map_err(DiscoveryError::NetworkError)?;

        debug!(search_target, timeout = ?self.timeout, "Sent M-SEARCH, waiting for reply");

        let mut buffer = [0u8; RECV_BUFFER_SIZE];
        let (size, from) = self.socket.recv_from(&mut buffer).map_err(|e| {
            if is_timeout(&e) {
                DiscoveryError::Timeout {
                    timeout: self.timeout,
                    source: e,
                }
            } else {
                DiscoveryError::NetworkError(e)
            }
        })?;

        debug!(%from, size, "Received SSDP reply");
        parse_ssdp_response(&String::from_utf8_lossy(&buffer[..size]))
    }

    /// Address the probe socket is bound to
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.socket.local_addr().map_err(DiscoveryError::NetworkError)
    }
}

fn is_timeout(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}

/// Parse an SSDP reply from its HTTP-like text
///
/// The first non-blank line must be a status line (`HTTP/1.1 200 OK`);
/// every later non-blank line must be a `name: value` header.
pub fn parse_ssdp_response(response: &str) -> Result<SsdpResponse> {
    let mut lines = response.lines().filter(|line| !line.trim().is_empty());

    let status_line = lines
        .next()
        .ok_or_else(|| DiscoveryError::ParseError("Empty SSDP response".to_string()))?;
    let status_code = parse_status_line(status_line)?;

    let mut headers = BTreeMap::new();
    for line in lines {
        let (name, value) = line.split_once(':').ok_or_else(|| {
            DiscoveryError::ParseError(format!("Malformed SSDP header line: {:?}", line))
        })?;
        headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
    }

    Ok(SsdpResponse {
        status_code,
        headers,
    })
}

fn parse_status_line(line: &str) -> Result<u16> {
    let mut parts = line.split_whitespace();
    let code = match (parts.next(), parts.next()) {
        (Some(version), Some(code)) if version.starts_with("HTTP/") => code,
        _ => {
            return Err(DiscoveryError::ParseError(format!(
                "Invalid SSDP status line: {:?}",
                line
            )))
        }
    };

    code.parse().map_err(|_| {
        DiscoveryError::ParseError(format!("Invalid SSDP status code: {:?}", code))
    })
}
