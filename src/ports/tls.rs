use crate::domain::ProbeError;
use super::io::BoxedIoStream;

pub struct TlsSession {
    pub stream: BoxedIoStream,
    pub alpn: Option<String>,
}

impl TlsSession {
    pub fn is_h2(&self) -> bool {
        self.alpn.as_deref() == Some("h2")
    }
}

pub trait TlsHandshaker: Send + Sync {
    /// Runs a TLS handshake over an established stream. `host` becomes the
    /// SNI value and the name the peer certificate is verified against.
    fn handshake(
        &self,
        stream: BoxedIoStream,
        host: &str,
    ) -> impl std::future::Future<Output = Result<TlsSession, ProbeError>> + Send;
}
