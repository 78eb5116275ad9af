//! Adapter and dispatch error types.
//!
//! [`AdapterError`] covers protocol-shape failures (unknown tool, malformed
//! arguments) and is what [`crate::Adapter::execute_tool`] returns.
//! [`DispatchError`] covers everything that can go wrong while sending; tool
//! handlers render it as text instead of propagating it.

use vonage_mcp_provider::ProviderError;

/// Unified error type for vonage-mcp adapters.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// The requested tool does not exist on this adapter.
    #[error("tool not found: `{tool_name}` on adapter `{adapter_id}`")]
    ToolNotFound {
        adapter_id: String,
        tool_name: String,
    },

    /// The parameters supplied to a tool are invalid.
    #[error("invalid parameters for tool `{tool_name}`: {reason}")]
    InvalidParams { tool_name: String, reason: String },
}

/// Convenience alias used throughout the adapters crate.
pub type Result<T> = std::result::Result<T, AdapterError>;

/// Failure taxonomy of a channel dispatch (and of the voice call, which
/// shares its preconditions).
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// A required sender identity is not configured.
    #[error("{0}")]
    Configuration(String),

    /// The destination could not be normalized.
    #[error("Invalid phone number format: {0}")]
    InvalidDestination(String),

    /// The message body is empty.
    #[error("Message is required")]
    MissingMessage,

    /// A voice call is missing its message or originating number.
    #[error("Required parameters missing")]
    MissingParameters,

    /// The provider call itself failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}
