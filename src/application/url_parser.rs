use url::Url;

use crate::domain::{ProbeError, Scheme};

#[derive(Debug, Clone)]
pub struct ParsedUrl {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
    pub path_and_query: String,
    pub full: String,
}

impl ParsedUrl {
    pub fn parse(input: &str) -> Result<Self, ProbeError> {
        let url = Url::parse(input).map_err(|e| ProbeError::invalid_url(input, e))?;

        let scheme = Scheme::from_str(url.scheme())
            .ok_or_else(|| ProbeError::unsupported_scheme(url.scheme()))?;

        // Unbracketed host: DNS lookups and SNI both want it that way.
        let host = match url.host() {
            Some(url::Host::Domain(d)) => d.to_string(),
            Some(url::Host::Ipv4(a)) => a.to_string(),
            Some(url::Host::Ipv6(a)) => a.to_string(),
            None => return Err(ProbeError::invalid_url(input, "missing host")),
        };

        let port = url.port().unwrap_or_else(|| scheme.default_port());

        let path = url.path();
        let path_and_query = match url.query() {
            Some(q) => format!("{}?{}", path, q),
            None => path.to_string(),
        };
        let path_and_query = if path_and_query.is_empty() { "/".to_string() } else { path_and_query };

        Ok(Self { scheme, host, port, path_and_query, full: url.to_string() })
    }

    pub fn is_https(&self) -> bool {
        self.scheme.is_encrypted()
    }

    /// Host header value: port appended only when non-default, IPv6 literals
    /// re-bracketed.
    pub fn host_header(&self) -> String {
        let host = if self.host.contains(':') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        if self.port == self.scheme.default_port() {
            host
        } else {
            format!("{}:{}", host, self.port)
        }
    }

    /// Resolves a Location header against this URL. Failures here happen
    /// mid-chain, so they surface as exploration errors rather than input
    /// errors.
    pub fn resolve_redirect(&self, location: &str) -> Result<ParsedUrl, ProbeError> {
        let base = Url::parse(&self.full)
            .map_err(|e| ProbeError::http(format!("invalid base URL: {}", e)))?;
        let resolved = base
            .join(location)
            .map_err(|e| ProbeError::http(format!("invalid redirect location '{}': {}", location, e)))?;
        ParsedUrl::parse(resolved.as_str()).map_err(|e| ProbeError::http(e.message))
    }
}
