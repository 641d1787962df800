use std::time::Duration;

use log::debug;

use crate::domain::ProbeError;
use crate::ports::{Clock, DnsResolver};
use super::ParsedUrl;

/// Validates the seed URL before any fan-out starts: syntax, scheme, and a
/// single resolvability check for the host. An IP-literal host "resolves"
/// to itself and passes.
pub async fn initial_checks<D, C>(
    raw_url: &str,
    dns: &D,
    clock: &C,
    timeout: Duration,
) -> Result<ParsedUrl, ProbeError>
where
    D: DnsResolver,
    C: Clock,
{
    let parsed = ParsedUrl::parse(raw_url)?;
    clock
        .timeout(timeout, dns.resolve(&parsed.host))
        .await?
        .map_err(|_| ProbeError::no_such_host(&parsed.host))?;
    debug!("initial checks passed for {}", parsed.full);
    Ok(parsed)
}
