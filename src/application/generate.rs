use log::debug;

use crate::domain::{
    DnsMeasurement, Endpoint, HttpEndpointMeasurement, ProbeError, RoundTrip,
    TcpConnectMeasurement, TlsHandshakeMeasurement, UrlMeasurement,
};
use crate::ports::{Clock, DnsResolver, TcpDialer, TlsHandshaker};
use super::Config;

/// Turns each round trip of an explored chain into a URL measurement:
/// a fresh DNS resolution plus one raw TCP (and, for https, TLS) probe per
/// resolved address. Probe failures are recorded as data; a DNS failure for
/// any URL aborts the whole generation and discards everything.
pub struct EndpointMeasurementGenerator<D, T, L, C>
where
    D: DnsResolver,
    T: TcpDialer,
    L: TlsHandshaker,
    C: Clock,
{
    dns: D,
    tcp: T,
    tls: L,
    clock: C,
    config: Config,
}

impl<D, T, L, C> EndpointMeasurementGenerator<D, T, L, C>
where
    D: DnsResolver,
    T: TcpDialer,
    L: TlsHandshaker,
    C: Clock,
{
    pub fn new(dns: D, tcp: T, tls: L, clock: C, config: Config) -> Self {
        Self { dns, tcp, tls, clock, config }
    }

    pub async fn generate(
        &self,
        round_trips: Vec<RoundTrip>,
    ) -> Result<Vec<UrlMeasurement>, ProbeError> {
        let t = self.config.timeout;
        let mut out = Vec::with_capacity(round_trips.len());

        for rt in round_trips {
            let host = rt.request.host.clone();
            let addrs = self.clock.timeout(t, self.dns.resolve(&host)).await??;
            debug!("{} resolved to {} addresses", host, addrs.len());

            let port = rt.request.scheme.default_port();
            let mut endpoints = Vec::with_capacity(addrs.len());
            for addr in &addrs {
                let endpoint = Endpoint::new(*addr, port);

                let stream = match self
                    .clock
                    .timeout(t, self.tcp.connect(*addr, port))
                    .await
                    .and_then(|r| r)
                {
                    Ok(stream) => stream,
                    Err(e) => {
                        endpoints.push(HttpEndpointMeasurement {
                            endpoint,
                            tcp: TcpConnectMeasurement::failure(e.message),
                            tls: None,
                        });
                        continue;
                    }
                };

                let tls = if rt.request.scheme.is_encrypted() {
                    // SNI carries the hostname, never the bare address.
                    let outcome = match self
                        .clock
                        .timeout(t, self.tls.handshake(stream, &host))
                        .await
                        .and_then(|r| r)
                    {
                        Ok(_session) => TlsHandshakeMeasurement::success(),
                        Err(e) => TlsHandshakeMeasurement::failure(e.message),
                    };
                    Some(outcome)
                } else {
                    None
                };
                // the probe's stream is gone by now: each connection lives
                // only as long as its own endpoint's measurement

                endpoints.push(HttpEndpointMeasurement {
                    endpoint,
                    tcp: TcpConnectMeasurement::success(),
                    tls,
                });
            }

            out.push(UrlMeasurement {
                url: rt.request.url.clone(),
                dns: DnsMeasurement { domain: host, addrs },
                round_trip: rt,
                endpoints,
            });
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{
        round_trip, test_config, FakeDnsResolver, FakeTcpDialer, FakeTlsHandshaker,
        NoTimeoutClock,
    };
    use crate::domain::{ErrorClass, Scheme};

    fn generator(
        dns: FakeDnsResolver,
        tcp: FakeTcpDialer,
        tls: FakeTlsHandshaker,
    ) -> EndpointMeasurementGenerator<FakeDnsResolver, FakeTcpDialer, FakeTlsHandshaker, NoTimeoutClock>
    {
        EndpointMeasurementGenerator::new(dns, tcp, tls, NoTimeoutClock, test_config())
    }

    #[tokio::test]
    async fn one_measurement_per_round_trip_in_order() {
        let mut dns = FakeDnsResolver::with_host("a.test", &["10.0.0.1"]);
        dns.add_host("b.test", &["10.0.0.2"]);
        let generator = generator(dns, FakeTcpDialer::new(), FakeTlsHandshaker::new());

        let rts = vec![
            round_trip(Scheme::Http, "a.test", "http://a.test/"),
            round_trip(Scheme::Http, "b.test", "http://b.test/"),
        ];
        let measurements = generator.generate(rts).await.unwrap();

        assert_eq!(measurements.len(), 2);
        assert_eq!(measurements[0].url, "http://a.test/");
        assert_eq!(measurements[1].url, "http://b.test/");
        assert_eq!(measurements[0].dns.domain, "a.test");
        assert_eq!(measurements[0].round_trip.request.url, "http://a.test/");
    }

    #[tokio::test]
    async fn http_endpoints_use_port_80_and_never_tls() {
        let dns = FakeDnsResolver::with_host("a.test", &["10.0.0.1", "10.0.0.2"]);
        let generator = generator(dns, FakeTcpDialer::new(), FakeTlsHandshaker::new());

        let rts = vec![round_trip(Scheme::Http, "a.test", "http://a.test/")];
        let measurements = generator.generate(rts).await.unwrap();

        let endpoints = &measurements[0].endpoints;
        assert_eq!(endpoints.len(), 2);
        // resolver order is preserved
        assert_eq!(endpoints[0].endpoint.to_string(), "10.0.0.1:80");
        assert_eq!(endpoints[1].endpoint.to_string(), "10.0.0.2:80");
        for ep in endpoints {
            assert!(ep.tcp.is_success());
            assert!(ep.tls.is_none());
        }
    }

    #[tokio::test]
    async fn https_endpoints_use_port_443_and_attempt_tls() {
        let dns = FakeDnsResolver::with_host("s.test", &["10.0.0.1"]);
        let generator = generator(dns, FakeTcpDialer::new(), FakeTlsHandshaker::new());

        let rts = vec![round_trip(Scheme::Https, "s.test", "https://s.test/")];
        let measurements = generator.generate(rts).await.unwrap();

        let ep = &measurements[0].endpoints[0];
        assert_eq!(ep.endpoint.port, 443);
        assert!(ep.tcp.is_success());
        assert!(ep.tls.as_ref().unwrap().is_success());
    }

    #[tokio::test]
    async fn tls_failure_is_recorded_not_propagated() {
        let dns = FakeDnsResolver::with_host("s.test", &["10.0.0.1"]);
        let tls = FakeTlsHandshaker::failing_for("s.test");
        let generator = generator(dns, FakeTcpDialer::new(), tls);

        let rts = vec![round_trip(Scheme::Https, "s.test", "https://s.test/")];
        let measurements = generator.generate(rts).await.unwrap();

        let ep = &measurements[0].endpoints[0];
        assert!(ep.tcp.is_success());
        let tls = ep.tls.as_ref().unwrap();
        assert!(!tls.is_success());
        assert!(tls.failure.as_ref().unwrap().contains("handshake"));
    }

    #[tokio::test]
    async fn tcp_failure_skips_tls_for_that_endpoint_only() {
        let dns = FakeDnsResolver::with_host("s.test", &["10.0.0.1", "10.0.0.2"]);
        let tcp = FakeTcpDialer::refusing(&["10.0.0.1"]);
        let generator = generator(dns, tcp, FakeTlsHandshaker::new());

        let rts = vec![round_trip(Scheme::Https, "s.test", "https://s.test/")];
        let measurements = generator.generate(rts).await.unwrap();

        let endpoints = &measurements[0].endpoints;
        assert_eq!(endpoints.len(), 2);

        let refused = &endpoints[0];
        assert!(!refused.tcp.is_success());
        assert!(refused.tcp.failure.as_ref().unwrap().contains("refused"));
        assert!(refused.tls.is_none());

        let reachable = &endpoints[1];
        assert!(reachable.tcp.is_success());
        assert!(reachable.tls.is_some());
    }

    #[tokio::test]
    async fn dns_failure_anywhere_discards_everything() {
        // first URL resolves fine, second does not
        let dns = FakeDnsResolver::with_host("a.test", &["10.0.0.1"]);
        let generator = generator(dns, FakeTcpDialer::new(), FakeTlsHandshaker::new());

        let rts = vec![
            round_trip(Scheme::Http, "a.test", "http://a.test/"),
            round_trip(Scheme::Http, "gone.test", "http://gone.test/"),
        ];
        let e = generator.generate(rts).await.unwrap_err();
        assert_eq!(e.class, ErrorClass::Dns);
    }
}
