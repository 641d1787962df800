use std::net::IpAddr;

use crate::domain::ProbeError;

pub trait DnsResolver: Send + Sync {
    /// Resolves a hostname to its addresses, in the order the resolver
    /// returned them. An empty answer is an error, not an empty Vec.
    fn resolve(
        &self,
        host: &str,
    ) -> impl std::future::Future<Output = Result<Vec<IpAddr>, ProbeError>> + Send;
}
