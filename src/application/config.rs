use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub timeout: Duration,
    pub max_redirects: usize,
    pub body_limit: usize,
    pub json_output: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            timeout: env_duration("WEBPROBE_TIMEOUT", Duration::from_secs(10)),
            max_redirects: env_count("WEBPROBE_MAX_REDIRS", 10),
            body_limit: env_count("WEBPROBE_BODY_LIMIT", 1024 * 1024),
            json_output: false,
        }
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json_output = json;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn env_duration(key: &str, default: Duration) -> Duration {
    std::env::var(key).ok().and_then(|v| parse_duration(&v)).unwrap_or(default)
}

fn env_count(key: &str, default: usize) -> usize {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

// Accepts "500ms", "5s", or a bare number of seconds.
fn parse_duration(v: &str) -> Option<Duration> {
    let v = v.trim();
    if let Some(s) = v.strip_suffix("ms") {
        s.parse::<u64>().ok().map(Duration::from_millis)
    } else if let Some(s) = v.strip_suffix('s') {
        s.parse::<u64>().ok().map(Duration::from_secs)
    } else {
        v.parse::<u64>().ok().map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_forms() {
        assert_eq!(parse_duration("500ms"), Some(Duration::from_millis(500)));
        assert_eq!(parse_duration("5s"), Some(Duration::from_secs(5)));
        assert_eq!(parse_duration("7"), Some(Duration::from_secs(7)));
        assert_eq!(parse_duration(" 3s "), Some(Duration::from_secs(3)));
        assert_eq!(parse_duration("fast"), None);
        assert_eq!(parse_duration(""), None);
    }

    #[test]
    fn json_toggle() {
        let config = Config {
            timeout: Duration::from_secs(10),
            max_redirects: 10,
            body_limit: 1024,
            json_output: false,
        };
        assert!(config.with_json(true).json_output);
    }
}
