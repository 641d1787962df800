use crate::domain::UrlMeasurement;
use crate::ports::Renderer;

/// Plain-text report: one block per URL, one sub-block per endpoint.
pub struct TextRenderer;

impl TextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for TextRenderer {
    fn render(&self, measurements: &[UrlMeasurement]) -> String {
        let mut out = String::new();
        for m in measurements {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("# {}\n", m.url));
            out.push_str(&format!("method:  {}\n", m.round_trip.request.method));
            out.push_str(&format!("url:     {}\n", m.round_trip.request.url));
            out.push_str("headers:\n");
            for (name, value) in &m.round_trip.request.headers {
                out.push_str(&format!("  {}: {}\n", name, value));
            }
            let addrs: Vec<String> = m.dns.addrs.iter().map(|a| a.to_string()).collect();
            out.push_str(&format!("dns:     {} -> {}\n", m.dns.domain, addrs.join(", ")));

            for ep in &m.endpoints {
                out.push_str(&format!("## {}\n", ep.endpoint));
                match &ep.tcp.failure {
                    None => out.push_str("  tcp: ok\n"),
                    Some(f) => out.push_str(&format!("  tcp: {}\n", f)),
                }
                if let Some(tls) = &ep.tls {
                    match &tls.failure {
                        None => out.push_str("  tls: ok\n"),
                        Some(f) => out.push_str(&format!("  tls: {}\n", f)),
                    }
                }
            }
        }
        out
    }
}

pub struct JsonRenderer;

impl JsonRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for JsonRenderer {
    fn render(&self, measurements: &[UrlMeasurement]) -> String {
        let mut out = String::from("[\n");
        for (i, m) in measurements.iter().enumerate() {
            out.push_str("  {\n");
            out.push_str(&format!("    \"url\": {:?},\n", m.url));
            out.push_str(&format!("    \"method\": {:?},\n", m.round_trip.request.method));

            out.push_str("    \"request_headers\": {\n");
            let headers = &m.round_trip.request.headers;
            for (j, (name, value)) in headers.iter().enumerate() {
                let comma = if j + 1 < headers.len() { "," } else { "" };
                out.push_str(&format!("      {:?}: {:?}{}\n", name, value, comma));
            }
            out.push_str("    },\n");

            out.push_str("    \"dns\": {\n");
            out.push_str(&format!("      \"domain\": {:?},\n", m.dns.domain));
            let addrs: Vec<String> =
                m.dns.addrs.iter().map(|a| format!("{:?}", a.to_string())).collect();
            out.push_str(&format!("      \"addrs\": [{}]\n", addrs.join(", ")));
            out.push_str("    },\n");

            out.push_str("    \"endpoints\": [\n");
            for (j, ep) in m.endpoints.iter().enumerate() {
                out.push_str("      {\n");
                out.push_str(&format!("        \"endpoint\": {:?},\n", ep.endpoint.to_string()));
                let tcp = match &ep.tcp.failure {
                    Some(f) => format!("{:?}", f),
                    None => "null".to_string(),
                };
                match &ep.tls {
                    Some(tls) => {
                        out.push_str(&format!("        \"tcp_failure\": {},\n", tcp));
                        let tls_failure = match &tls.failure {
                            Some(f) => format!("{:?}", f),
                            None => "null".to_string(),
                        };
                        out.push_str(&format!("        \"tls_failure\": {}\n", tls_failure));
                    }
                    // key absent entirely when no handshake was attempted
                    None => out.push_str(&format!("        \"tcp_failure\": {}\n", tcp)),
                }
                let comma = if j + 1 < m.endpoints.len() { "," } else { "" };
                out.push_str(&format!("      }}{}\n", comma));
            }
            out.push_str("    ]\n");

            let comma = if i + 1 < measurements.len() { "," } else { "" };
            out.push_str(&format!("  }}{}\n", comma));
        }
        out.push_str("]\n");
        out
    }
}
