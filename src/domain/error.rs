use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Input,
    Dns,
    Tcp,
    Tls,
    Http,
    Timeout,
    Internal,
}

impl ErrorClass {
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorClass::Input => 2,
            ErrorClass::Dns => 3,
            ErrorClass::Tcp => 4,
            ErrorClass::Tls => 5,
            ErrorClass::Http => 6,
            ErrorClass::Timeout => 7,
            ErrorClass::Internal => 1,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            ErrorClass::Input => "INPUT",
            ErrorClass::Dns => "DNS",
            ErrorClass::Tcp => "TCP",
            ErrorClass::Tls => "TLS",
            ErrorClass::Http => "HTTP",
            ErrorClass::Timeout => "TIMEOUT",
            ErrorClass::Internal => "INTERNAL",
        }
    }
}

#[derive(Debug)]
pub struct ProbeError {
    pub class: ErrorClass,
    pub message: String,
}

impl ProbeError {
    pub fn new(class: ErrorClass, message: impl Into<String>) -> Self {
        Self { class, message: message.into() }
    }

    pub fn input(msg: impl Into<String>) -> Self { Self::new(ErrorClass::Input, msg) }
    pub fn dns(msg: impl Into<String>) -> Self { Self::new(ErrorClass::Dns, msg) }
    pub fn tcp(msg: impl Into<String>) -> Self { Self::new(ErrorClass::Tcp, msg) }
    pub fn tls(msg: impl Into<String>) -> Self { Self::new(ErrorClass::Tls, msg) }
    pub fn http(msg: impl Into<String>) -> Self { Self::new(ErrorClass::Http, msg) }
    pub fn timeout(msg: impl Into<String>) -> Self { Self::new(ErrorClass::Timeout, msg) }
    pub fn internal(msg: impl Into<String>) -> Self { Self::new(ErrorClass::Internal, msg) }

    // The three preflight conditions are distinct, named failures.
    pub fn invalid_url(input: &str, detail: impl fmt::Display) -> Self {
        Self::input(format!("invalid URL '{}': {}", input, detail))
    }

    pub fn unsupported_scheme(scheme: &str) -> Self {
        Self::input(format!("unsupported scheme '{}', expected http or https", scheme))
    }

    pub fn no_such_host(host: &str) -> Self {
        Self::dns(format!("no such host: {}", host))
    }

    pub fn format_stderr(&self) -> String {
        format!("error[{}]: {}", self.class.tag(), self.message)
    }
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_stderr())
    }
}

impl std::error::Error for ProbeError {}
