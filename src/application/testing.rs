//! Fake port implementations shared by the use-case tests.

use std::collections::{HashMap, VecDeque};
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::Duration;

use crate::domain::{ProbeError, RequestRecord, ResponseRecord, RoundTrip, Scheme};
use crate::ports::{
    BoxedIoStream, Clock, DnsResolver, HttpClient, HttpResponse, TcpDialer, TlsHandshaker,
    TlsSession,
};
use super::Config;

pub fn test_config() -> Config {
    Config {
        timeout: Duration::from_secs(1),
        max_redirects: 10,
        body_limit: 1024 * 1024,
        json_output: false,
    }
}

pub fn round_trip(scheme: Scheme, host: &str, url: &str) -> RoundTrip {
    RoundTrip {
        request: RequestRecord {
            method: "GET".to_string(),
            url: url.to_string(),
            scheme,
            host: host.to_string(),
            headers: vec![("Host".to_string(), host.to_string())],
        },
        response: ResponseRecord {
            status: 200,
            reason: Some("OK".to_string()),
            version: "http/1.1".to_string(),
            headers: Vec::new(),
        },
        body: Vec::new(),
    }
}

pub fn response(status: u16, headers: &[(&str, &str)], body: &[u8]) -> HttpResponse {
    HttpResponse {
        status,
        reason: None,
        version: "http/1.1".to_string(),
        headers: headers.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        body: body.to_vec(),
    }
}

pub fn redirect_response(status: u16, location: &str) -> HttpResponse {
    response(status, &[("Location", location)], b"")
}

pub struct NoTimeoutClock;

impl Clock for NoTimeoutClock {
    async fn timeout<F, T>(&self, _duration: Duration, future: F) -> Result<T, ProbeError>
    where
        F: std::future::Future<Output = T> + Send,
        T: Send,
    {
        Ok(future.await)
    }
}

pub struct FakeDnsResolver {
    hosts: HashMap<String, Vec<IpAddr>>,
}

impl FakeDnsResolver {
    pub fn empty() -> Self {
        Self { hosts: HashMap::new() }
    }

    pub fn with_host(host: &str, addrs: &[&str]) -> Self {
        let mut resolver = Self::empty();
        resolver.add_host(host, addrs);
        resolver
    }

    pub fn add_host(&mut self, host: &str, addrs: &[&str]) {
        self.hosts.insert(
            host.to_string(),
            addrs.iter().map(|a| a.parse().unwrap()).collect(),
        );
    }
}

impl DnsResolver for FakeDnsResolver {
    async fn resolve(&self, host: &str) -> Result<Vec<IpAddr>, ProbeError> {
        self.hosts
            .get(host)
            .cloned()
            .ok_or_else(|| ProbeError::dns(format!("DNS lookup failed for '{}'", host)))
    }
}

pub struct FakeTcpDialer {
    refuse: Vec<IpAddr>,
}

impl FakeTcpDialer {
    pub fn new() -> Self {
        Self { refuse: Vec::new() }
    }

    pub fn refusing(addrs: &[&str]) -> Self {
        Self { refuse: addrs.iter().map(|a| a.parse().unwrap()).collect() }
    }
}

impl TcpDialer for FakeTcpDialer {
    async fn connect(&self, ip: IpAddr, port: u16) -> Result<BoxedIoStream, ProbeError> {
        if self.refuse.contains(&ip) {
            return Err(ProbeError::tcp(format!("connection refused: {}:{}", ip, port)));
        }
        let (stream, _peer) = tokio::io::duplex(64);
        Ok(Box::new(stream))
    }
}

pub struct FakeTlsHandshaker {
    fail_hosts: Vec<String>,
}

impl FakeTlsHandshaker {
    pub fn new() -> Self {
        Self { fail_hosts: Vec::new() }
    }

    pub fn failing_for(host: &str) -> Self {
        Self { fail_hosts: vec![host.to_string()] }
    }
}

impl TlsHandshaker for FakeTlsHandshaker {
    async fn handshake(&self, stream: BoxedIoStream, host: &str) -> Result<TlsSession, ProbeError> {
        if self.fail_hosts.iter().any(|h| h == host) {
            return Err(ProbeError::tls(format!("TLS handshake with {} failed", host)));
        }
        Ok(TlsSession { stream, alpn: Some("http/1.1".to_string()) })
    }
}

/// Pops a canned response per request, regardless of protocol.
pub struct FakeHttpClient {
    responses: Mutex<VecDeque<HttpResponse>>,
}

impl FakeHttpClient {
    pub fn scripted(responses: Vec<HttpResponse>) -> Self {
        Self { responses: Mutex::new(responses.into()) }
    }

    fn next(&self) -> Result<HttpResponse, ProbeError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ProbeError::internal("scripted response queue exhausted"))
    }
}

impl HttpClient for FakeHttpClient {
    async fn request_h1(
        &self,
        _stream: BoxedIoStream,
        _method: &str,
        _path: &str,
        _headers: &[(String, String)],
        _body_limit: usize,
    ) -> Result<HttpResponse, ProbeError> {
        self.next()
    }

    async fn request_h2(
        &self,
        _stream: BoxedIoStream,
        _method: &str,
        _url: &str,
        _headers: &[(String, String)],
        _body_limit: usize,
    ) -> Result<HttpResponse, ProbeError> {
        self.next()
    }
}
