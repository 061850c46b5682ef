use http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Not supported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Invalid recommendlet parameters: {0}")]
    InvalidParams(String),

    #[error("Io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Tls error: {0}")]
    Tls(String),

    #[error("Malformed status line: {0:?}")]
    MalformedStatusLine(String),

    #[error("Malformed header: {0:?}")]
    MalformedHeader(String),

    #[error("{status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Cannot guess charset")]
    UndetectableCharset,

    #[error("Request worker panicked")]
    WorkerPanicked,
}

impl From<openssl::error::ErrorStack> for FetchError {
    fn from(err: openssl::error::ErrorStack) -> Self {
        FetchError::Tls(err.to_string())
    }
}

impl<S> From<openssl::ssl::HandshakeError<S>> for FetchError {
    fn from(err: openssl::ssl::HandshakeError<S>) -> Self {
        let reason = match err {
            openssl::ssl::HandshakeError::SetupFailure(stack) => stack.to_string(),
            openssl::ssl::HandshakeError::Failure(mid) => mid.error().to_string(),
            openssl::ssl::HandshakeError::WouldBlock(mid) => mid.error().to_string(),
        };
        FetchError::Tls(reason)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}
