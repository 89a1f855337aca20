use thiserror::Error;

#[derive(Error, Debug)]
pub enum Aria2Error {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Process error: {0}")]
    Process(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Aria2Error {
    /// Whether this failure means the daemon could not be reached at all
    /// (connection refused, host down).
    ///
    /// The liveness probe treats only this class of failure as "not running";
    /// every other failure is propagated to the caller.
    pub fn is_connection_refused(&self) -> bool {
        matches!(self, Aria2Error::Transport(e) if e.is_connect())
    }
}

pub type Result<T> = std::result::Result<T, Aria2Error>;
