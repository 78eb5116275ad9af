//! Wire types for the Vonage REST APIs.
//!
//! Response types keep any fields they do not model in an `extra` map so that
//! echoing a record back to the user does not lose information.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ncco::Ncco;

// ---------------------------------------------------------------------------
// Messages API
// ---------------------------------------------------------------------------

/// A Messages API transport channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Sms,
    Whatsapp,
    Rcs,
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sms => write!(f, "sms"),
            Self::Whatsapp => write!(f, "whatsapp"),
            Self::Rcs => write!(f, "rcs"),
        }
    }
}

/// Message content type.  Only plain text is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Text,
}

/// Body of `POST /v1/messages`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageRequest {
    pub message_type: MessageType,
    pub channel: Channel,
    pub to: String,
    pub from: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failover: Option<Vec<MessageRequest>>,
}

// ---------------------------------------------------------------------------
// Number Insight
// ---------------------------------------------------------------------------

/// Response of the basic Number Insight lookup.
///
/// `status` is `0` on success; any other value means the number could not be
/// resolved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BasicInsight {
    pub status: i64,
    #[serde(default)]
    pub status_message: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub international_format_number: Option<String>,
    #[serde(default)]
    pub national_format_number: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub country_prefix: Option<String>,
}

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

/// Response of `GET /account/get-balance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Balance {
    pub value: f64,
    #[serde(rename = "autoReload", default)]
    pub auto_reload: Option<bool>,
}

// ---------------------------------------------------------------------------
// Applications
// ---------------------------------------------------------------------------

/// Key material returned when an application is created.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationKeys {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
}

/// A Vonage application record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys: Option<ApplicationKeys>,
    #[serde(default)]
    pub capabilities: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST /v2/applications`.
#[derive(Debug, Clone, Serialize)]
pub struct NewApplication {
    pub name: String,
    pub capabilities: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmbeddedApplications {
    #[serde(default)]
    pub applications: Vec<Application>,
}

/// One page of `GET /v2/applications`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationPage {
    #[serde(default)]
    pub page_size: Option<u64>,
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default)]
    pub total_items: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u64>,
    #[serde(rename = "_embedded", default)]
    pub embedded: EmbeddedApplications,
}

// ---------------------------------------------------------------------------
// Numbers
// ---------------------------------------------------------------------------

/// Filter for `GET /account/numbers`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NumberSearch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// `0` starts with, `1` contains, `2` ends with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_pattern: Option<u8>,
}

impl NumberSearch {
    /// Numbers starting with `prefix`.
    pub fn starts_with(prefix: impl Into<String>) -> Self {
        Self {
            pattern: Some(prefix.into()),
            search_pattern: Some(0),
        }
    }
}

/// A number owned by the account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OwnedNumber {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msisdn: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub number_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    #[serde(rename = "moHttpUrl", default, skip_serializing_if = "Option::is_none")]
    pub mo_http_url: Option<String>,
    #[serde(alias = "applicationId", default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(rename = "voiceCallbackType", default, skip_serializing_if = "Option::is_none")]
    pub voice_callback_type: Option<String>,
    #[serde(rename = "voiceCallbackValue", default, skip_serializing_if = "Option::is_none")]
    pub voice_callback_value: Option<String>,
    #[serde(rename = "messagesCallbackType", default, skip_serializing_if = "Option::is_none")]
    pub messages_callback_type: Option<String>,
    #[serde(rename = "messagesCallbackValue", default, skip_serializing_if = "Option::is_none")]
    pub messages_callback_value: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of `GET /account/numbers`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OwnedNumbers {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub numbers: Vec<OwnedNumber>,
}

/// Form body of `POST /number/update`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NumberUpdate {
    pub country: String,
    pub msisdn: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(rename = "moHttpUrl", skip_serializing_if = "Option::is_none")]
    pub mo_http_url: Option<String>,
    #[serde(rename = "voiceCallbackType", skip_serializing_if = "Option::is_none")]
    pub voice_callback_type: Option<String>,
    #[serde(rename = "voiceCallbackValue", skip_serializing_if = "Option::is_none")]
    pub voice_callback_value: Option<String>,
    #[serde(rename = "messagesCallbackType", skip_serializing_if = "Option::is_none")]
    pub messages_callback_type: Option<String>,
    #[serde(rename = "messagesCallbackValue", skip_serializing_if = "Option::is_none")]
    pub messages_callback_value: Option<String>,
}

// ---------------------------------------------------------------------------
// Voice
// ---------------------------------------------------------------------------

/// A call leg endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallEndpoint {
    #[serde(rename = "type")]
    pub endpoint_type: String,
    pub number: String,
}

impl CallEndpoint {
    /// A PSTN phone endpoint.
    pub fn phone(number: impl Into<String>) -> Self {
        Self {
            endpoint_type: "phone".into(),
            number: number.into(),
        }
    }
}

/// Body of `POST /v1/calls`.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundCall {
    pub to: Vec<CallEndpoint>,
    pub from: CallEndpoint,
    pub ncco: Ncco,
}

/// Response of `POST /v1/calls`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallCreated {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_uuid: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
