//! Messaging adapter.
//!
//! Exposes text messaging over SMS, WhatsApp and RCS.  Every tool goes
//! through the same [`Dispatcher`]; tools differ only in channel, failover
//! policy and how the result is worded.

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, info};
use vonage_mcp_provider::Channel;

use crate::context::VonageServices;
use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::response::SendResult;
use crate::traits::{
    Adapter, AdapterType, HealthStatus, ToolDefinition, ToolOutput, optional_bool, required_str,
    tool_not_found,
};

/// Whether a tool attaches an SMS fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailoverMode {
    Never,
    /// Off unless the caller sets `failover: true`.
    Optional,
    Always,
}

struct MessagingTool {
    name: &'static str,
    title: &'static str,
    description: &'static str,
    channel: Channel,
    failover: FailoverMode,
    /// Channel label used in the result text.
    label: &'static str,
    /// What the tool was doing, for error text.
    action: &'static str,
}

const TOOLS: &[MessagingTool] = &[
    MessagingTool {
        name: "SMS",
        title: "SMS message",
        description: "Send SMS messages with Vonage",
        channel: Channel::Sms,
        failover: FailoverMode::Never,
        label: "SMS",
        action: "sending SMS",
    },
    MessagingTool {
        name: "whatsapp-send-text",
        title: "WhatsApp Text Message",
        description: "Send a text message via WhatsApp using Vonage Messages API",
        channel: Channel::Whatsapp,
        failover: FailoverMode::Optional,
        label: "WhatsApp",
        action: "sending WhatsApp message",
    },
    MessagingTool {
        name: "whatsapp-send-text-with-sms-failover",
        title: "WhatsApp Text Message with SMS Failover",
        description: "Send a WhatsApp text message with automatic SMS failover using the Vonage \
                      Messages API failover feature",
        channel: Channel::Whatsapp,
        failover: FailoverMode::Always,
        label: "WhatsApp",
        action: "sending WhatsApp message with failover",
    },
    MessagingTool {
        name: "rcs-send-text",
        title: "RCS Text Message",
        description: "Send a text message via RCS using Vonage Messages API",
        channel: Channel::Rcs,
        failover: FailoverMode::Optional,
        label: "RCS",
        action: "sending RCS message",
    },
    MessagingTool {
        name: "rcs-send-text-with-sms-failover",
        title: "RCS Text Message with SMS Failover",
        description: "Send an RCS text message with automatic SMS failover using the Vonage \
                      Messages API failover feature",
        channel: Channel::Rcs,
        failover: FailoverMode::Always,
        label: "RCS",
        action: "sending RCS message with failover",
    },
];

impl MessagingTool {
    fn schema(&self) -> Value {
        let to_description = match self.channel {
            Channel::Whatsapp if self.failover != FailoverMode::Always => {
                "Recipient WhatsApp number in E.164 format (e.g., +14155552671)"
            }
            _ => "Recipient phone number in E.164 format (e.g., +14155552671)",
        };
        let mut schema = json!({
            "type": "object",
            "properties": {
                "to": {
                    "type": "string",
                    "description": to_description
                },
                "message": {
                    "type": "string",
                    "description": "Text message to send"
                }
            },
            "required": ["to", "message"]
        });
        if self.failover == FailoverMode::Optional {
            schema["properties"]["failover"] = json!({
                "type": "boolean",
                "description": "Fall back to SMS from the virtual number if delivery fails",
                "default": false
            });
        }
        schema
    }

    fn render(&self, to: &str, message: &str, failover: bool, result: &SendResult) -> String {
        if self.channel == Channel::Sms {
            return format!("Message \"{message}\" sent to {to}: {}", result.message_uuid);
        }
        if failover {
            format!(
                "{} message with SMS failover sent to {to}: \"{message}\"\nMessage UUID: {}\nWorkflow ID: {}",
                self.label, result.message_uuid, result.workflow_id
            )
        } else {
            format!(
                "{} message sent to {to}: \"{message}\"\nMessage UUID: {}",
                self.label, result.message_uuid
            )
        }
    }
}

/// Tool group for SMS, WhatsApp and RCS text messages.
pub struct MessagingAdapter {
    id: String,
    services: VonageServices,
    dispatcher: Dispatcher,
}

impl MessagingAdapter {
    pub fn new(id: impl Into<String>, services: VonageServices) -> Self {
        let dispatcher = services.dispatcher();
        Self {
            id: id.into(),
            services,
            dispatcher,
        }
    }

    async fn tool_send(&self, tool: &MessagingTool, params: Value) -> Result<ToolOutput> {
        let to = required_str(&params, tool.name, "to")?;
        let message = required_str(&params, tool.name, "message")?;
        let failover = match tool.failover {
            FailoverMode::Never => false,
            FailoverMode::Always => true,
            FailoverMode::Optional => optional_bool(&params, tool.name, "failover")?.unwrap_or(false),
        };

        debug!(tool = tool.name, to, failover, "executing messaging tool");

        match self.dispatcher.dispatch(tool.channel, to, message, failover).await {
            Ok(result) => Ok(ToolOutput::text(tool.render(to, message, failover, &result))),
            Err(e) => {
                info!(tool = tool.name, error = %e, "messaging tool failed");
                Ok(ToolOutput::error(format!("Error {}: {e}", tool.action)))
            }
        }
    }
}

#[async_trait]
impl Adapter for MessagingAdapter {
    fn id(&self) -> &str {
        &self.id
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Messaging
    }

    async fn health_check(&self) -> Result<HealthStatus> {
        if !self.services.credentials.key_pair && !self.services.credentials.application {
            return Ok(HealthStatus::Unhealthy);
        }
        let configured = self.services.channels.iter().filter(|c| c.is_valid()).count();
        Ok(match configured {
            0 => HealthStatus::Unhealthy,
            n if n == self.services.channels.iter().count() => HealthStatus::Healthy,
            _ => HealthStatus::Degraded,
        })
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        TOOLS
            .iter()
            .map(|tool| ToolDefinition {
                name: tool.name.into(),
                title: tool.title.into(),
                description: tool.description.into(),
                parameters: tool.schema(),
            })
            .collect()
    }

    async fn execute_tool(&self, name: &str, params: Value) -> Result<ToolOutput> {
        match TOOLS.iter().find(|tool| tool.name == name) {
            Some(tool) => self.tool_send(tool, params).await,
            None => Err(tool_not_found(&self.id, name)),
        }
    }
}
