/// In-memory cookie jar that lives for exactly one redirect chain. Expiry
/// and Path scoping are ignored: nothing outlives the chain, and every
/// request in it is a GET for the URL the server itself redirected to.
#[derive(Debug, Default)]
pub struct CookieJar {
    entries: Vec<CookieEntry>,
}

#[derive(Debug)]
struct CookieEntry {
    domain: String,
    host_only: bool,
    name: String,
    value: String,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one Set-Cookie header received from `host`. Malformed values
    /// are dropped silently, as a browser would.
    pub fn store(&mut self, host: &str, set_cookie: &str) {
        let mut parts = set_cookie.split(';');
        let Some((name, value)) = parts.next().and_then(|nv| nv.split_once('=')) else {
            return;
        };
        let name = name.trim();
        let value = value.trim();
        if name.is_empty() {
            return;
        }

        let mut domain = host.to_ascii_lowercase();
        let mut host_only = true;
        for attr in parts {
            if let Some((k, v)) = attr.split_once('=') {
                if k.trim().eq_ignore_ascii_case("domain") && !v.trim().is_empty() {
                    domain = v.trim().trim_start_matches('.').to_ascii_lowercase();
                    host_only = false;
                }
            }
        }

        self.entries
            .retain(|e| !(e.name == name && e.domain == domain));
        self.entries.push(CookieEntry {
            domain,
            host_only,
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    /// Cookie header value for a request to `host`, or None when no stored
    /// cookie matches.
    pub fn header_for(&self, host: &str) -> Option<String> {
        let host = host.to_ascii_lowercase();
        let pairs: Vec<String> = self
            .entries
            .iter()
            .filter(|e| {
                if e.host_only {
                    host == e.domain
                } else {
                    host == e.domain || host.ends_with(&format!(".{}", e.domain))
                }
            })
            .map(|e| format!("{}={}", e.name, e.value))
            .collect();
        if pairs.is_empty() {
            None
        } else {
            Some(pairs.join("; "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_cookie() {
        let mut jar = CookieJar::new();
        jar.store("example.test", "session=abc123; Path=/; HttpOnly");
        assert_eq!(jar.header_for("example.test").as_deref(), Some("session=abc123"));
    }

    #[test]
    fn cookies_do_not_leak_across_hosts() {
        let mut jar = CookieJar::new();
        jar.store("example.test", "session=abc123");
        assert_eq!(jar.header_for("other.test"), None);
        assert_eq!(jar.header_for("sub.example.test"), None);
    }

    #[test]
    fn domain_attribute_widens_to_subdomains() {
        let mut jar = CookieJar::new();
        jar.store("www.example.test", "id=1; Domain=.example.test");
        assert_eq!(jar.header_for("example.test").as_deref(), Some("id=1"));
        assert_eq!(jar.header_for("login.example.test").as_deref(), Some("id=1"));
        assert_eq!(jar.header_for("example.org"), None);
    }

    #[test]
    fn later_value_replaces_earlier() {
        let mut jar = CookieJar::new();
        jar.store("example.test", "session=first");
        jar.store("example.test", "session=second");
        assert_eq!(jar.header_for("example.test").as_deref(), Some("session=second"));
    }

    #[test]
    fn multiple_cookies_join_in_order() {
        let mut jar = CookieJar::new();
        jar.store("example.test", "a=1");
        jar.store("example.test", "b=2");
        assert_eq!(jar.header_for("example.test").as_deref(), Some("a=1; b=2"));
    }

    #[test]
    fn malformed_set_cookie_is_dropped() {
        let mut jar = CookieJar::new();
        jar.store("example.test", "no-equals-sign");
        jar.store("example.test", "=value-without-name");
        assert_eq!(jar.header_for("example.test"), None);
    }
}
