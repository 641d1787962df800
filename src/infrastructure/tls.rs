use std::sync::Arc;

use rustls::pki_types::ServerName;
use rustls::ClientConfig;
use tokio_rustls::TlsConnector;

use crate::domain::ProbeError;
use crate::ports::{BoxedIoStream, TlsHandshaker, TlsSession};

#[derive(Clone)]
pub struct RustlsTlsHandshaker {
    connector: TlsConnector,
}

impl RustlsTlsHandshaker {
    pub fn new() -> Result<Self, ProbeError> {
        let root_store =
            rustls::RootCertStore::from_iter(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        let mut config = ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();
        config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];
        Ok(Self { connector: TlsConnector::from(Arc::new(config)) })
    }
}

impl TlsHandshaker for RustlsTlsHandshaker {
    async fn handshake(&self, stream: BoxedIoStream, host: &str) -> Result<TlsSession, ProbeError> {
        let server_name = ServerName::try_from(host.to_string())
            .map_err(|_| ProbeError::tls(format!("invalid server name: {}", host)))?;

        let tls_stream = self
            .connector
            .connect(server_name, stream)
            .await
            .map_err(|e| ProbeError::tls(format!("TLS handshake with {} failed: {}", host, e)))?;

        let alpn = {
            let (_, conn) = tls_stream.get_ref();
            conn.alpn_protocol().map(|p| String::from_utf8_lossy(p).to_string())
        };

        Ok(TlsSession { stream: Box::new(tls_stream), alpn })
    }
}
