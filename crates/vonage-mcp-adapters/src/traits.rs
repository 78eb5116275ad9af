//! Core adapter trait and supporting types.
//!
//! Every tool group (messaging, voice, account) implements the [`Adapter`]
//! trait, giving the protocol server a uniform way to discover and invoke
//! tools.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AdapterError, Result};

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

/// The category of service an adapter provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterType {
    /// Text messaging over SMS, WhatsApp and RCS.
    Messaging,
    /// Outbound voice calls.
    Voice,
    /// Account, application and number management.
    Account,
}

impl std::fmt::Display for AdapterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Messaging => write!(f, "messaging"),
            Self::Voice => write!(f, "voice"),
            Self::Account => write!(f, "account"),
        }
    }
}

/// The health status of an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// Everything the adapter's tools need is configured.
    Healthy,
    /// Some tools will fail for lack of configuration.
    Degraded,
    /// No tool of this adapter can succeed.
    Unhealthy,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Degraded => write!(f, "degraded"),
            Self::Unhealthy => write!(f, "unhealthy"),
        }
    }
}

/// A tool exposed by an adapter that the agent can invoke.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Machine-readable tool name (e.g. `SMS`, `rcs-send-text`).
    pub name: String,
    /// Short human-readable title.
    pub title: String,
    /// Human-readable description of what the tool does.
    pub description: String,
    /// JSON Schema describing the tool's input parameters.
    pub parameters: Value,
}

/// The textual result of a tool invocation.
///
/// Failures of the underlying provider call are still outputs: they carry a
/// readable description and `is_error` set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutput {
    /// A successful (or informational) result.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    /// A failed result.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Core trait
// ---------------------------------------------------------------------------

/// The universal adapter interface.
///
/// The protocol server discovers available tools via [`Adapter::tools`] and
/// executes them via [`Adapter::execute_tool`].
#[async_trait]
pub trait Adapter: Send + Sync {
    /// Return the unique identifier for this adapter instance.
    fn id(&self) -> &str;

    /// Return the category of service this adapter provides.
    fn adapter_type(&self) -> AdapterType;

    /// Report whether the configuration the tools need is present.
    async fn health_check(&self) -> Result<HealthStatus>;

    /// Return the list of tools this adapter exposes.
    fn tools(&self) -> Vec<ToolDefinition>;

    /// Execute a named tool with the given JSON arguments.
    ///
    /// Returns `Err` only for unknown tools and malformed arguments.
    async fn execute_tool(&self, name: &str, params: Value) -> Result<ToolOutput>;
}

// ---------------------------------------------------------------------------
// Parameter helpers
// ---------------------------------------------------------------------------

/// Read a required string argument.
pub(crate) fn required_str<'a>(params: &'a Value, tool_name: &str, field: &str) -> Result<&'a str> {
    params
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| AdapterError::InvalidParams {
            tool_name: tool_name.to_owned(),
            reason: format!("missing required string field `{field}`"),
        })
}

/// Read an optional string argument.  A present value of another type is an
/// error.
pub(crate) fn optional_str<'a>(
    params: &'a Value,
    tool_name: &str,
    field: &str,
) -> Result<Option<&'a str>> {
    match params.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(AdapterError::InvalidParams {
            tool_name: tool_name.to_owned(),
            reason: format!("field `{field}` must be a string"),
        }),
    }
}

/// Read an optional boolean argument.
pub(crate) fn optional_bool(params: &Value, tool_name: &str, field: &str) -> Result<Option<bool>> {
    match params.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(AdapterError::InvalidParams {
            tool_name: tool_name.to_owned(),
            reason: format!("field `{field}` must be a boolean"),
        }),
    }
}

/// Build the error returned for a tool name an adapter does not own.
pub(crate) fn tool_not_found(adapter_id: &str, tool_name: &str) -> AdapterError {
    AdapterError::ToolNotFound {
        adapter_id: adapter_id.to_owned(),
        tool_name: tool_name.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn required_str_reports_field_name() {
        let params = json!({ "to": "123" });
        assert_eq!(required_str(&params, "SMS", "to").unwrap(), "123");
        let err = required_str(&params, "SMS", "message").unwrap_err();
        assert!(err.to_string().contains("`message`"));
    }

    #[test]
    fn optional_helpers_accept_null_and_reject_wrong_types() {
        let params = json!({ "name": null, "failover": "yes" });
        assert_eq!(optional_str(&params, "t", "name").unwrap(), None);
        assert_eq!(optional_bool(&params, "t", "missing").unwrap(), None);
        assert!(optional_bool(&params, "t", "failover").is_err());
    }

    #[test]
    fn tool_output_constructors() {
        assert!(!ToolOutput::text("ok").is_error);
        assert!(ToolOutput::error("bad").is_error);
    }

    #[test]
    fn display_impls_are_lowercase() {
        assert_eq!(AdapterType::Messaging.to_string(), "messaging");
        assert_eq!(HealthStatus::Degraded.to_string(), "degraded");
    }
}
