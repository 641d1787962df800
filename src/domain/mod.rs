mod chain;
mod error;
mod measurement;
mod scheme;

pub use chain::{RequestRecord, ResponseRecord, RoundTrip};
pub use error::{ErrorClass, ProbeError};
pub use measurement::{
    DnsMeasurement, Endpoint, HttpEndpointMeasurement, TcpConnectMeasurement,
    TlsHandshakeMeasurement, UrlMeasurement,
};
pub use scheme::Scheme;
