//! Process configuration.
//!
//! All settings come from environment variables, read once at startup.
//! Blank values are treated as unset.  Missing sender identities are not an
//! error here: they disable the matching channel when a message is sent.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use url::Url;

use crate::error::{ProviderError, Result};

pub const ENV_API_KEY: &str = "VONAGE_API_KEY";
pub const ENV_API_SECRET: &str = "VONAGE_API_SECRET";
pub const ENV_APPLICATION_ID: &str = "VONAGE_APPLICATION_ID";
pub const ENV_PRIVATE_KEY64: &str = "VONAGE_PRIVATE_KEY64";
pub const ENV_VIRTUAL_NUMBER: &str = "VONAGE_VIRTUAL_NUMBER";
pub const ENV_WHATSAPP_NUMBER: &str = "VONAGE_WHATSAPP_NUMBER";
pub const ENV_RCS_SENDER_ID: &str = "RCS_SENDER_ID";
pub const ENV_API_BASE_URL: &str = "VONAGE_API_BASE_URL";
pub const ENV_REST_BASE_URL: &str = "VONAGE_REST_BASE_URL";

/// Default base URL for the JSON APIs (messages, voice, applications, insight).
pub const DEFAULT_API_BASE_URL: &str = "https://api.nexmo.com/";

/// Default base URL for the legacy account and numbers APIs.
pub const DEFAULT_REST_BASE_URL: &str = "https://rest.nexmo.com/";

/// Per-channel originating identities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SenderIdentities {
    /// Virtual number used for SMS, voice calls and SMS failover.
    pub virtual_number: Option<String>,
    /// WhatsApp Business number.
    pub whatsapp_number: Option<String>,
    /// RCS agent sender id.
    pub rcs_sender_id: Option<String>,
}

/// Complete provider configuration.
#[derive(Clone)]
pub struct VonageConfig {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub application_id: Option<String>,
    /// PEM bytes decoded from `VONAGE_PRIVATE_KEY64`.
    pub private_key: Option<Vec<u8>>,
    pub senders: SenderIdentities,
    pub api_base_url: Url,
    pub rest_base_url: Url,
}

impl std::fmt::Debug for VonageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VonageConfig")
            .field("api_key", &self.api_key)
            .field("api_secret", &self.api_secret.as_ref().map(|_| "<redacted>"))
            .field("application_id", &self.application_id)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("senders", &self.senders)
            .field("api_base_url", &self.api_base_url.as_str())
            .field("rest_base_url", &self.rest_base_url.as_str())
            .finish()
    }
}

impl VonageConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| non_blank(lookup(key));

        let private_key = match var(ENV_PRIVATE_KEY64) {
            Some(encoded) => Some(decode_private_key(&encoded)?),
            None => None,
        };

        let api_base_url = base_url(var(ENV_API_BASE_URL), DEFAULT_API_BASE_URL, ENV_API_BASE_URL)?;
        let rest_base_url =
            base_url(var(ENV_REST_BASE_URL), DEFAULT_REST_BASE_URL, ENV_REST_BASE_URL)?;

        Ok(Self {
            api_key: var(ENV_API_KEY),
            api_secret: var(ENV_API_SECRET),
            application_id: var(ENV_APPLICATION_ID),
            private_key,
            senders: SenderIdentities {
                virtual_number: var(ENV_VIRTUAL_NUMBER),
                whatsapp_number: var(ENV_WHATSAPP_NUMBER),
                rcs_sender_id: var(ENV_RCS_SENDER_ID),
            },
            api_base_url,
            rest_base_url,
        })
    }

    /// Names of credential variables that are not set.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.api_key.is_none() {
            missing.push(ENV_API_KEY);
        }
        if self.api_secret.is_none() {
            missing.push(ENV_API_SECRET);
        }
        if self.application_id.is_none() {
            missing.push(ENV_APPLICATION_ID);
        }
        if self.private_key.is_none() {
            missing.push(ENV_PRIVATE_KEY64);
        }
        missing
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn decode_private_key(encoded: &str) -> Result<Vec<u8>> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD.decode(compact).map_err(|e| {
        ProviderError::Config(format!("{ENV_PRIVATE_KEY64} is not valid base64: {e}"))
    })
}

/// Parse a base URL, forcing a trailing slash so relative joins keep any path
/// prefix.
fn base_url(value: Option<String>, default: &str, var_name: &str) -> Result<Url> {
    let raw = value.unwrap_or_else(|| default.to_owned());
    let with_slash = if raw.ends_with('/') {
        raw
    } else {
        format!("{raw}/")
    };
    Url::parse(&with_slash)
        .map_err(|e| ProviderError::Config(format!("{var_name} `{with_slash}` is invalid: {e}")))
}
