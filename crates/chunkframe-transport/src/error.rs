use std::path::PathBuf;

/// Errors that can occur while opening or reading a byte source.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The endpoint string could not be interpreted.
    #[error("invalid endpoint {input:?}: {reason}")]
    InvalidEndpoint { input: String, reason: String },

    /// Failed to connect to a socket endpoint.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        source: std::io::Error,
    },

    /// Failed to open a filesystem path.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An I/O error occurred on an open stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;
