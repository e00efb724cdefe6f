/// Shared error type used across all Docent crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP: {0}")]
    Http(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("provider {provider}: {message}")]
    Provider { provider: String, message: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("tool arguments: {0}")]
    ToolArguments(String),

    #[error("retrieval: {0}")]
    Retrieval(String),

    #[error("config: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True for transport-level failures (connection, timeout). Only these
    /// are eligible for the completion retry; malformed bodies and
    /// API-reported errors never are.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Timeout(_))
    }
}
