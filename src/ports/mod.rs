mod clock;
mod dns;
mod http;
mod io;
mod renderer;
mod tcp;
mod tls;

pub use clock::Clock;
pub use dns::DnsResolver;
pub use http::{HttpClient, HttpResponse};
pub use io::{BoxedIoStream, IoStream};
pub use renderer::Renderer;
pub use tcp::TcpDialer;
pub use tls::{TlsHandshaker, TlsSession};
