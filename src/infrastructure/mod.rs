mod clock;
mod dns;
mod http;
mod renderer;
mod tcp;
mod tls;

pub use clock::TokioClock;
pub use dns::HickoryDnsResolver;
pub use http::HybridHttpClient;
pub use renderer::{JsonRenderer, TextRenderer};
pub use tcp::TokioTcpDialer;
pub use tls::RustlsTlsHandshaker;
