//! Send response normalization.
//!
//! The Messages API has spelled its identifier fields both in camelCase and
//! snake_case across revisions.  Both spellings are checked, in order.

use serde_json::Value;

/// Placeholder for an identifier the response did not carry.
pub const UNKNOWN: &str = "unknown";

const MESSAGE_ID_FIELDS: &[&str] = &["messageUUID", "message_uuid"];
const WORKFLOW_ID_FIELDS: &[&str] = &["workflowId", "workflow_id"];

/// Identifiers of an accepted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendResult {
    pub message_uuid: String,
    pub workflow_id: String,
}

/// The first candidate field holding a non-empty string.
pub fn first_present<'a>(value: &'a Value, candidates: &[&str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|field| value.get(*field).and_then(Value::as_str))
        .find(|s| !s.is_empty())
}

/// Extract the message and workflow identifiers from a send response.
pub fn normalize_send_response(response: &Value) -> SendResult {
    let pick = |candidates| first_present(response, candidates).unwrap_or(UNKNOWN).to_owned();
    SendResult {
        message_uuid: pick(MESSAGE_ID_FIELDS),
        workflow_id: pick(WORKFLOW_ID_FIELDS),
    }
}
