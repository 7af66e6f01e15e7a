/// Errors that can occur while setting up or driving a framing session.
///
/// Malformed input never produces an error: a stream that does not frame
/// ends up as overflow packets instead.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The framing configuration can never produce a packet.
    #[error("invalid framing config: {reason}")]
    InvalidConfig { reason: String },

    /// An I/O error occurred while reading from the byte source.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The byte source reached end of stream.
    #[error("connection closed")]
    ConnectionClosed,
}

impl FrameError {
    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
