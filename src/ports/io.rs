use tokio::io::{AsyncRead, AsyncWrite};

/// Anything both ends of the probe can read and write: a plain TCP stream
/// or a TLS stream layered on top of one. Boxing behind this trait lets the
/// HTTP client stay oblivious to which one it got.
pub trait IoStream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> IoStream for T {}

pub type BoxedIoStream = Box<dyn IoStream>;
