use std::collections::HashSet;

use log::debug;

use crate::domain::{ProbeError, RequestRecord, ResponseRecord, RoundTrip};
use crate::ports::{Clock, DnsResolver, HttpClient, HttpResponse, TcpDialer, TlsHandshaker};
use super::{Config, CookieJar, ParsedUrl};

const USER_AGENT: &str = "webprobe/0.1";

/// Follows the redirect chain of a seed URL hop by hop, recording one
/// round trip per hop. The chain is returned in chronological order: the
/// origin request first, the terminal request last. Only the terminal
/// round trip carries a body.
pub struct RedirectChainExplorer<D, T, L, H, C>
where
    D: DnsResolver,
    T: TcpDialer,
    L: TlsHandshaker,
    H: HttpClient,
    C: Clock,
{
    dns: D,
    tcp: T,
    tls: L,
    http: H,
    clock: C,
    config: Config,
}

impl<D, T, L, H, C> RedirectChainExplorer<D, T, L, H, C>
where
    D: DnsResolver,
    T: TcpDialer,
    L: TlsHandshaker,
    H: HttpClient,
    C: Clock,
{
    pub fn new(dns: D, tcp: T, tls: L, http: H, clock: C, config: Config) -> Self {
        Self { dns, tcp, tls, http, clock, config }
    }

    pub async fn explore(&self, seed: &ParsedUrl) -> Result<Vec<RoundTrip>, ProbeError> {
        let mut current = seed.clone();
        let mut jar = CookieJar::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut chain: Vec<RoundTrip> = Vec::new();

        for _ in 0..=self.config.max_redirects {
            if !visited.insert(current.full.clone()) {
                return Err(ProbeError::http(format!(
                    "redirect loop detected at {}",
                    current.full
                )));
            }

            let mut headers: Vec<(String, String)> = vec![
                ("Host".to_string(), current.host_header()),
                ("User-Agent".to_string(), USER_AGENT.to_string()),
                ("Accept".to_string(), "*/*".to_string()),
            ];
            if let Some(cookie) = jar.header_for(&current.host) {
                headers.push(("Cookie".to_string(), cookie));
            }

            let response = self.fetch(&current, &headers).await?;

            for (name, value) in &response.headers {
                if name.eq_ignore_ascii_case("set-cookie") {
                    jar.store(&current.host, value);
                }
            }

            let HttpResponse { status, reason, version, headers: response_headers, body } =
                response;
            let request = RequestRecord {
                method: "GET".to_string(),
                url: current.full.clone(),
                scheme: current.scheme,
                host: current.host.clone(),
                headers,
            };
            let record = ResponseRecord { status, reason, version, headers: response_headers };

            if record.is_redirect() {
                let location = record
                    .header("location")
                    .ok_or_else(|| {
                        ProbeError::http(format!("redirect {} without Location header", status))
                    })?
                    .to_string();
                debug!("hop {}: {} redirects to {}", chain.len(), current.full, location);
                chain.push(RoundTrip { request, response: record, body: Vec::new() });
                current = current.resolve_redirect(&location)?;
                continue;
            }

            debug!(
                "chain complete: {} round trips, final status {}",
                chain.len() + 1,
                status
            );
            chain.push(RoundTrip { request, response: record, body });
            return Ok(chain);
        }

        Err(ProbeError::http(format!(
            "too many redirects (max {})",
            self.config.max_redirects
        )))
    }

    /// One full transaction against `url`: resolve, connect to the first
    /// address, handshake when encrypted, then a GET over whichever
    /// protocol ALPN settled on.
    async fn fetch(
        &self,
        url: &ParsedUrl,
        headers: &[(String, String)],
    ) -> Result<HttpResponse, ProbeError> {
        let t = self.config.timeout;
        let limit = self.config.body_limit;

        let ips = self.clock.timeout(t, self.dns.resolve(&url.host)).await??;
        let ip = ips
            .first()
            .copied()
            .ok_or_else(|| ProbeError::dns(format!("no addresses for {}", url.host)))?;

        let stream = self.clock.timeout(t, self.tcp.connect(ip, url.port)).await??;

        if url.is_https() {
            let session = self.clock.timeout(t, self.tls.handshake(stream, &url.host)).await??;
            if session.is_h2() {
                self.clock
                    .timeout(t, self.http.request_h2(session.stream, "GET", &url.full, headers, limit))
                    .await?
            } else {
                self.clock
                    .timeout(
                        t,
                        self.http.request_h1(session.stream, "GET", &url.path_and_query, headers, limit),
                    )
                    .await?
            }
        } else {
            self.clock
                .timeout(t, self.http.request_h1(stream, "GET", &url.path_and_query, headers, limit))
                .await?
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{
        response, redirect_response, test_config, FakeDnsResolver, FakeHttpClient,
        FakeTcpDialer, FakeTlsHandshaker, NoTimeoutClock,
    };
    use crate::domain::ErrorClass;

    fn explorer(
        dns: FakeDnsResolver,
        http: FakeHttpClient,
    ) -> RedirectChainExplorer<FakeDnsResolver, FakeTcpDialer, FakeTlsHandshaker, FakeHttpClient, NoTimeoutClock>
    {
        RedirectChainExplorer::new(
            dns,
            FakeTcpDialer::new(),
            FakeTlsHandshaker::new(),
            http,
            NoTimeoutClock,
            test_config(),
        )
    }

    #[tokio::test]
    async fn single_hop_chain() {
        let dns = FakeDnsResolver::with_host("example.test", &["93.184.216.34"]);
        let http = FakeHttpClient::scripted(vec![response(200, &[], b"hello world")]);
        let explorer = explorer(dns, http);

        let seed = ParsedUrl::parse("http://example.test/").unwrap();
        let chain = explorer.explore(&seed).await.unwrap();

        assert_eq!(chain.len(), 1);
        let rt = &chain[0];
        assert_eq!(rt.request.method, "GET");
        assert_eq!(rt.request.url, "http://example.test/");
        assert_eq!(rt.request.header("Host"), Some("example.test"));
        assert_eq!(rt.response.status, 200);
        assert_eq!(rt.body, b"hello world");
    }

    #[tokio::test]
    async fn chain_is_chronological_and_body_is_terminal_only() {
        let mut dns = FakeDnsResolver::with_host("a.test", &["10.0.0.1"]);
        dns.add_host("b.test", &["10.0.0.2"]);
        dns.add_host("c.test", &["10.0.0.3"]);
        let http = FakeHttpClient::scripted(vec![
            redirect_response(301, "http://b.test/"),
            redirect_response(302, "http://c.test/"),
            response(200, &[], b"final"),
        ]);
        let explorer = explorer(dns, http);

        let seed = ParsedUrl::parse("http://a.test/").unwrap();
        let chain = explorer.explore(&seed).await.unwrap();

        assert_eq!(chain.len(), 3);
        assert_eq!(chain[0].request.url, "http://a.test/");
        assert_eq!(chain[1].request.url, "http://b.test/");
        assert_eq!(chain[2].request.url, "http://c.test/");

        // each hop's Location is the next hop's request URL
        assert_eq!(chain[0].response.header("location"), Some("http://b.test/"));
        assert_eq!(chain[1].response.header("location"), Some("http://c.test/"));

        assert!(chain[0].body.is_empty());
        assert!(chain[1].body.is_empty());
        assert_eq!(chain[2].body, b"final");
    }

    #[tokio::test]
    async fn cookies_flow_to_the_next_hop() {
        let dns = FakeDnsResolver::with_host("a.test", &["10.0.0.1"]);
        let http = FakeHttpClient::scripted(vec![
            {
                let mut r = redirect_response(302, "/next");
                r.headers.push(("Set-Cookie".to_string(), "sid=42; Path=/".to_string()));
                r
            },
            response(200, &[], b"ok"),
        ]);
        let explorer = explorer(dns, http);

        let seed = ParsedUrl::parse("http://a.test/").unwrap();
        let chain = explorer.explore(&seed).await.unwrap();

        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].request.header("Cookie"), None);
        assert_eq!(chain[1].request.header("Cookie"), Some("sid=42"));
    }

    #[tokio::test]
    async fn redirect_loop_is_a_chain_wide_error() {
        let dns = FakeDnsResolver::with_host("a.test", &["10.0.0.1"]);
        let http = FakeHttpClient::scripted(vec![
            redirect_response(302, "/other"),
            redirect_response(302, "/"),
        ]);
        let explorer = explorer(dns, http);

        let seed = ParsedUrl::parse("http://a.test/").unwrap();
        let e = explorer.explore(&seed).await.unwrap_err();
        assert_eq!(e.class, ErrorClass::Http);
        assert!(e.message.contains("redirect loop"));
    }

    #[tokio::test]
    async fn redirect_without_location_fails() {
        let dns = FakeDnsResolver::with_host("a.test", &["10.0.0.1"]);
        let http = FakeHttpClient::scripted(vec![response(301, &[], b"")]);
        let explorer = explorer(dns, http);

        let seed = ParsedUrl::parse("http://a.test/").unwrap();
        let e = explorer.explore(&seed).await.unwrap_err();
        assert_eq!(e.class, ErrorClass::Http);
        assert!(e.message.contains("without Location"));
    }

    #[tokio::test]
    async fn redirect_limit_is_enforced() {
        let dns = FakeDnsResolver::with_host("a.test", &["10.0.0.1"]);
        // every response redirects somewhere new
        let responses = (0..8)
            .map(|i| redirect_response(302, &format!("/page{}", i)))
            .collect();
        let http = FakeHttpClient::scripted(responses);
        let mut config = test_config();
        config.max_redirects = 3;
        let explorer = RedirectChainExplorer::new(
            dns,
            FakeTcpDialer::new(),
            FakeTlsHandshaker::new(),
            http,
            NoTimeoutClock,
            config,
        );

        let seed = ParsedUrl::parse("http://a.test/").unwrap();
        let e = explorer.explore(&seed).await.unwrap_err();
        assert_eq!(e.class, ErrorClass::Http);
        assert!(e.message.contains("too many redirects"));
    }

    #[tokio::test]
    async fn transport_failure_returns_no_partial_chain() {
        // second hop's host does not resolve
        let dns = FakeDnsResolver::with_host("a.test", &["10.0.0.1"]);
        let http = FakeHttpClient::scripted(vec![
            redirect_response(301, "http://gone.test/"),
            response(200, &[], b"never reached"),
        ]);
        let explorer = explorer(dns, http);

        let seed = ParsedUrl::parse("http://a.test/").unwrap();
        let e = explorer.explore(&seed).await.unwrap_err();
        assert_eq!(e.class, ErrorClass::Dns);
    }
}
