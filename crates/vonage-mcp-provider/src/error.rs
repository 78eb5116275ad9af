//! Provider error types.
//!
//! Every call into the Vonage REST API surfaces failures through
//! [`ProviderError`].  Callers in the adapters crate render these as text,
//! so each variant's `Display` output is written to be read by a person.

/// Unified error type for the Vonage provider client.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("{title} (status {status}){}", detail_suffix(.detail))]
    Api {
        status: u16,
        title: String,
        detail: Option<String>,
    },

    /// Credentials required for the call are missing or could not be used.
    #[error("authentication error: {0}")]
    Auth(String),

    /// The client configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<jsonwebtoken::errors::Error> for ProviderError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::Auth(format!("failed to sign application token: {err}"))
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(": {d}"))
        .unwrap_or_default()
}

/// Convenience alias used throughout the provider crate.
pub type Result<T> = std::result::Result<T, ProviderError>;
