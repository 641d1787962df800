use std::net::IpAddr;

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;

use crate::domain::ProbeError;
use crate::ports::DnsResolver;

#[derive(Clone)]
pub struct HickoryDnsResolver {
    resolver: TokioAsyncResolver,
}

impl HickoryDnsResolver {
    pub fn new() -> Result<Self, ProbeError> {
        // ambient OS resolver configuration when readable, library defaults otherwise
        let resolver = match TokioAsyncResolver::tokio_from_system_conf() {
            Ok(r) => r,
            Err(_) => TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default()),
        };
        Ok(Self { resolver })
    }
}

impl DnsResolver for HickoryDnsResolver {
    async fn resolve(&self, host: &str) -> Result<Vec<IpAddr>, ProbeError> {
        let response = self
            .resolver
            .lookup_ip(host)
            .await
            .map_err(|e| ProbeError::dns(format!("DNS lookup failed for '{}': {}", host, e)))?;
        let addrs: Vec<IpAddr> = response.iter().collect();
        if addrs.is_empty() {
            return Err(ProbeError::dns(format!("no DNS records for '{}'", host)));
        }
        Ok(addrs)
    }
}
