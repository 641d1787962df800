use std::fmt;
use std::net::IpAddr;

use super::RoundTrip;

#[derive(Debug, Clone)]
pub struct DnsMeasurement {
    pub domain: String,
    pub addrs: Vec<IpAddr>,
}

/// A concrete address:port derived from a resolved address and the URL scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub addr: IpAddr,
    pub port: u16,
}

impl Endpoint {
    pub fn new(addr: IpAddr, port: u16) -> Self {
        Self { addr, port }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.addr {
            IpAddr::V4(v4) => write!(f, "{}:{}", v4, self.port),
            IpAddr::V6(v6) => write!(f, "[{}]:{}", v6, self.port),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TcpConnectMeasurement {
    pub failure: Option<String>,
}

impl TcpConnectMeasurement {
    pub fn success() -> Self {
        Self { failure: None }
    }

    pub fn failure(msg: impl Into<String>) -> Self {
        Self { failure: Some(msg.into()) }
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct TlsHandshakeMeasurement {
    pub failure: Option<String>,
}

impl TlsHandshakeMeasurement {
    pub fn success() -> Self {
        Self { failure: None }
    }

    pub fn failure(msg: impl Into<String>) -> Self {
        Self { failure: Some(msg.into()) }
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Probe outcome for one endpoint. `tls` stays `None` unless a handshake
/// was actually attempted, which requires an encrypted scheme and a
/// successful TCP connect.
#[derive(Debug, Clone)]
pub struct HttpEndpointMeasurement {
    pub endpoint: Endpoint,
    pub tcp: TcpConnectMeasurement,
    pub tls: Option<TlsHandshakeMeasurement>,
}

/// Everything measured for one URL of the chain: the round trip that
/// discovered it, its DNS resolution, and one probe result per address.
#[derive(Debug, Clone)]
pub struct UrlMeasurement {
    pub url: String,
    pub dns: DnsMeasurement,
    pub round_trip: RoundTrip,
    pub endpoints: Vec<HttpEndpointMeasurement>,
}
