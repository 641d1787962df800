use std::process::ExitCode;

use log::debug;
use webprobe::application::{
    initial_checks, Config, EndpointMeasurementGenerator, RedirectChainExplorer,
};
use webprobe::domain::ProbeError;
use webprobe::infrastructure::{
    HickoryDnsResolver, HybridHttpClient, JsonRenderer, RustlsTlsHandshaker, TextRenderer,
    TokioClock, TokioTcpDialer,
};
use webprobe::ports::Renderer;

fn main() -> ExitCode {
    env_logger::init();
    rustls::crypto::ring::default_provider().install_default().ok();

    let args: Vec<String> = std::env::args().collect();

    let (url, json_mode) = match parse_args(&args) {
        Ok(v) => v,
        Err(msg) => {
            eprintln!("{}", msg);
            return ExitCode::from(2);
        }
    };

    let config = Config::from_env().with_json(json_mode);

    let rt = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{}", ProbeError::internal(format!("failed to create runtime: {}", e)));
            return ExitCode::from(1);
        }
    };

    rt.block_on(async_main(&url, config))
}

fn parse_args(args: &[String]) -> Result<(String, bool), String> {
    let mut url = None;
    let mut json = false;

    for arg in args.iter().skip(1) {
        if arg == "--json" || arg == "-j" {
            json = true;
        } else if arg == "--help" || arg == "-h" {
            return Err(usage());
        } else if arg.starts_with('-') {
            return Err(format!("unknown option: {}\n\n{}", arg, usage()));
        } else if url.is_none() {
            url = Some(arg.clone());
        } else {
            return Err(format!("unexpected argument: {}\n\n{}", arg, usage()));
        }
    }

    match url {
        Some(u) if !u.trim().is_empty() => Ok((u, json)),
        _ => Err(usage()),
    }
}

fn usage() -> String {
    "usage: webprobe [--json] <URL>\n\n\
    Follows the redirect chain of URL, then measures DNS resolution and\n\
    raw TCP/TLS reachability for every endpoint behind each discovered URL.\n\n\
    Options:\n  \
      --json, -j    Output as JSON\n\n\
    Environment:\n  \
      WEBPROBE_TIMEOUT      Per-operation timeout (e.g. 5s, 3000ms) [default: 10s]\n  \
      WEBPROBE_MAX_REDIRS   Max redirects to follow [default: 10]\n  \
      WEBPROBE_BODY_LIMIT   Final body read limit in bytes [default: 1048576]"
        .to_string()
}

async fn async_main(url: &str, config: Config) -> ExitCode {
    let dns = match HickoryDnsResolver::new() {
        Ok(d) => d,
        Err(e) => return fail(e),
    };
    let tls = match RustlsTlsHandshaker::new() {
        Ok(t) => t,
        Err(e) => return fail(e),
    };
    let clock = TokioClock::new();

    let seed = match initial_checks(url, &dns, &clock, config.timeout).await {
        Ok(p) => p,
        Err(e) => return fail(e),
    };

    let explorer = RedirectChainExplorer::new(
        dns.clone(),
        TokioTcpDialer::new(),
        tls.clone(),
        HybridHttpClient::new(),
        TokioClock::new(),
        config.clone(),
    );
    let round_trips = match explorer.explore(&seed).await {
        Ok(rts) => rts,
        Err(e) => return fail(e),
    };
    debug!("explore finished with {} round trips", round_trips.len());

    let generator = EndpointMeasurementGenerator::new(
        dns,
        TokioTcpDialer::new(),
        tls,
        TokioClock::new(),
        config.clone(),
    );
    let measurements = match generator.generate(round_trips).await {
        Ok(ms) => ms,
        Err(e) => return fail(e),
    };

    let renderer: Box<dyn Renderer> = if config.json_output {
        Box::new(JsonRenderer::new())
    } else {
        Box::new(TextRenderer::new())
    };
    print!("{}", renderer.render(&measurements));

    ExitCode::SUCCESS
}

fn fail(e: ProbeError) -> ExitCode {
    eprintln!("{}", e);
    ExitCode::from(e.class.exit_code() as u8)
}
