use crate::domain::ProbeError;
use super::io::BoxedIoStream;

pub struct HttpResponse {
    pub status: u16,
    pub reason: Option<String>,
    pub version: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

pub trait HttpClient: Send + Sync {
    /// One HTTP/1.1 exchange over the given stream. `headers` is the exact
    /// ordered header list to send; the body is read until EOF or
    /// `body_limit` bytes, whichever comes first.
    fn request_h1(
        &self,
        stream: BoxedIoStream,
        method: &str,
        path: &str,
        headers: &[(String, String)],
        body_limit: usize,
    ) -> impl std::future::Future<Output = Result<HttpResponse, ProbeError>> + Send;

    /// Same exchange over an h2 connection (stream must already have
    /// negotiated ALPN "h2"). `url` is the absolute request URL.
    fn request_h2(
        &self,
        stream: BoxedIoStream,
        method: &str,
        url: &str,
        headers: &[(String, String)],
        body_limit: usize,
    ) -> impl std::future::Future<Output = Result<HttpResponse, ProbeError>> + Send;
}
