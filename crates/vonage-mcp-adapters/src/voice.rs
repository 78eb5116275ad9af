//! Voice adapter: text-to-speech outbound calls.

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, info};
use vonage_mcp_provider::{CallCreated, CallEndpoint, NccoBuilder, OutboundCall, Talk};

use crate::context::VonageServices;
use crate::error::{DispatchError, Result};
use crate::normalizer::normalize;
use crate::traits::{
    Adapter, AdapterType, HealthStatus, ToolDefinition, ToolOutput, required_str, tool_not_found,
};

const TOOL_OUTBOUND_VOICE: &str = "outbound-voice-message";

/// Tool group for outbound voice calls.
pub struct VoiceAdapter {
    id: String,
    services: VonageServices,
}

impl VoiceAdapter {
    pub fn new(id: impl Into<String>, services: VonageServices) -> Self {
        Self {
            id: id.into(),
            services,
        }
    }

    /// Call `to` from the virtual number and read `message` aloud.
    pub async fn send_outbound_voice(
        &self,
        to: &str,
        message: &str,
    ) -> std::result::Result<CallCreated, DispatchError> {
        let ncco = NccoBuilder::new().add_action(Talk::new(message)).build();

        let Some(number) = normalize(self.services.lookup.as_ref(), to).await? else {
            return Err(DispatchError::InvalidDestination(to.to_owned()));
        };
        let from = match self.services.virtual_number() {
            Some(from) if !message.is_empty() => from,
            _ => return Err(DispatchError::MissingParameters),
        };

        let call = OutboundCall {
            to: vec![CallEndpoint::phone(number.as_str())],
            from: CallEndpoint::phone(from),
            ncco,
        };
        debug!(to = %number, "placing outbound call");

        let created = self.services.voice.create_outbound_call(&call).await?;
        info!(uuid = ?created.uuid, status = ?created.status, "outbound call created");
        Ok(created)
    }

    async fn tool_outbound_voice(&self, params: Value) -> Result<ToolOutput> {
        let to = required_str(&params, TOOL_OUTBOUND_VOICE, "to")?;
        let message = required_str(&params, TOOL_OUTBOUND_VOICE, "message")?;

        match self.send_outbound_voice(to, message).await {
            Ok(created) => {
                let body = serde_json::to_string(&created).unwrap_or_default();
                Ok(ToolOutput::text(format!(
                    "Voice Message \"{message}\" sent to {to}: {body}"
                )))
            }
            Err(e) => {
                info!(error = %e, "outbound voice call failed");
                Ok(ToolOutput::error(format!("Error sending voice message: {e}")))
            }
        }
    }
}

#[async_trait]
impl Adapter for VoiceAdapter {
    fn id(&self) -> &str {
        &self.id
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Voice
    }

    async fn health_check(&self) -> Result<HealthStatus> {
        if !self.services.credentials.application {
            return Ok(HealthStatus::Unhealthy);
        }
        if self.services.virtual_number().is_none() {
            return Ok(HealthStatus::Degraded);
        }
        Ok(HealthStatus::Healthy)
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        vec![ToolDefinition {
            name: TOOL_OUTBOUND_VOICE.into(),
            title: "Outbound Voice Message".into(),
            description: "Send an outbound voice message with Vonage".into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "to": {
                        "type": "string",
                        "description": "Number to call"
                    },
                    "message": {
                        "type": "string",
                        "description": "Text to speak when the call is answered"
                    }
                },
                "required": ["to", "message"]
            }),
        }]
    }

    async fn execute_tool(&self, name: &str, params: Value) -> Result<ToolOutput> {
        match name {
            TOOL_OUTBOUND_VOICE => self.tool_outbound_voice(params).await,
            _ => Err(tool_not_found(&self.id, name)),
        }
    }
}
