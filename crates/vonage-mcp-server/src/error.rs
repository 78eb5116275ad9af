//! Server error types.

/// Failures that end a server session.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Reading a request or writing a response failed.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A response could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience alias used throughout the server crate.
pub type Result<T> = std::result::Result<T, ServerError>;
