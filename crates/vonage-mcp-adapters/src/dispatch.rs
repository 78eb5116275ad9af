//! Channel dispatch.
//!
//! One routine sends text over any configured channel.  Per-channel
//! differences (sender identity, the error raised when it is missing) live
//! in a single [`ChannelTable`] built once at startup.

use std::sync::Arc;

use tracing::{debug, info, warn};
use vonage_mcp_provider::{Channel, MessageRequest, MessageType, SenderIdentities};

use crate::collaborators::{MessageSender, NumberLookup};
use crate::error::DispatchError;
use crate::normalizer::{FormattedNumber, normalize};
use crate::response::{SendResult, normalize_send_response};

/// Raised when failover is requested but there is no SMS sender.
pub const FAILOVER_SENDER_MISSING: &str = "VONAGE_VIRTUAL_NUMBER required for failover";

// ---------------------------------------------------------------------------
// Channel table
// ---------------------------------------------------------------------------

struct ChannelDescriptor {
    channel: Channel,
    sender: fn(&SenderIdentities) -> Option<&String>,
    missing_sender: &'static str,
}

const CHANNELS: &[ChannelDescriptor] = &[
    ChannelDescriptor {
        channel: Channel::Sms,
        sender: |s| s.virtual_number.as_ref(),
        missing_sender: "VONAGE_VIRTUAL_NUMBER is not set.",
    },
    ChannelDescriptor {
        channel: Channel::Whatsapp,
        sender: |s| s.whatsapp_number.as_ref(),
        missing_sender: "VONAGE_WHATSAPP_NUMBER is not set.",
    },
    ChannelDescriptor {
        channel: Channel::Rcs,
        sender: |s| s.rcs_sender_id.as_ref(),
        missing_sender: "RCS_SENDER_ID is not set.",
    },
];

/// A channel together with its resolved sender identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    pub channel: Channel,
    pub sender: Option<String>,
    /// Message reported when `sender` is unusable.
    pub missing_sender: &'static str,
}

impl ChannelConfig {
    /// The sender identity, if present and non-blank.
    pub fn sender(&self) -> Option<&str> {
        self.sender
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn is_valid(&self) -> bool {
        self.sender().is_some()
    }
}

/// Every supported channel, resolved against the configured senders.
#[derive(Debug, Clone)]
pub struct ChannelTable {
    entries: Vec<ChannelConfig>,
}

impl ChannelTable {
    pub fn from_senders(senders: &SenderIdentities) -> Self {
        let entries = CHANNELS
            .iter()
            .map(|d| ChannelConfig {
                channel: d.channel,
                sender: (d.sender)(senders).cloned(),
                missing_sender: d.missing_sender,
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, channel: Channel) -> Option<&ChannelConfig> {
        self.entries.iter().find(|c| c.channel == channel)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChannelConfig> {
        self.entries.iter()
    }

    /// The SMS sender, which also originates failover messages and calls.
    pub fn virtual_number(&self) -> Option<&str> {
        self.get(Channel::Sms).and_then(ChannelConfig::sender)
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// A message ready to hand to a [`MessageSender`].
///
/// The destination is always a [`FormattedNumber`], so raw user input cannot
/// reach the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct SendRequest {
    pub message_type: MessageType,
    pub channel: Channel,
    pub to: FormattedNumber,
    pub from: String,
    pub text: String,
    pub failover: Option<Vec<SendRequest>>,
}

impl SendRequest {
    fn text(channel: Channel, to: &FormattedNumber, from: &str, text: &str) -> Self {
        Self {
            message_type: MessageType::Text,
            channel,
            to: to.clone(),
            from: from.to_owned(),
            text: text.to_owned(),
            failover: None,
        }
    }

    /// Convert to the provider's wire representation.
    pub fn to_wire(&self) -> MessageRequest {
        MessageRequest {
            message_type: self.message_type,
            channel: self.channel,
            to: self.to.as_str().to_owned(),
            from: self.from.clone(),
            text: self.text.clone(),
            failover: self
                .failover
                .as_ref()
                .map(|entries| entries.iter().map(SendRequest::to_wire).collect()),
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Sends text messages over any channel in its table.
#[derive(Clone)]
pub struct Dispatcher {
    channels: Arc<ChannelTable>,
    lookup: Arc<dyn NumberLookup>,
    sender: Arc<dyn MessageSender>,
}

impl Dispatcher {
    pub fn new(
        channels: Arc<ChannelTable>,
        lookup: Arc<dyn NumberLookup>,
        sender: Arc<dyn MessageSender>,
    ) -> Self {
        Self {
            channels,
            lookup,
            sender,
        }
    }

    /// Send `body` to `destination` over `channel`.
    ///
    /// With `use_failover`, the request carries a single SMS fallback from
    /// the virtual number.  The first failed precondition short-circuits.
    pub async fn dispatch(
        &self,
        channel: Channel,
        destination: &str,
        body: &str,
        use_failover: bool,
    ) -> Result<SendResult, DispatchError> {
        debug!(%channel, failover = use_failover, "dispatching message");

        let config = self.channels.get(channel).ok_or_else(|| {
            DispatchError::Configuration(format!("channel {channel} is not supported"))
        })?;
        let Some(from) = config.sender() else {
            warn!(%channel, "sender identity not configured");
            return Err(DispatchError::Configuration(config.missing_sender.to_owned()));
        };

        let Some(to) = normalize(self.lookup.as_ref(), destination).await? else {
            warn!(%channel, destination, "destination could not be normalized");
            return Err(DispatchError::InvalidDestination(destination.to_owned()));
        };

        if body.is_empty() {
            warn!(%channel, "empty message body");
            return Err(DispatchError::MissingMessage);
        }

        let mut request = SendRequest::text(channel, &to, from, body);
        if use_failover {
            let Some(sms_sender) = self.channels.virtual_number() else {
                warn!(%channel, "failover requested without an SMS sender");
                return Err(DispatchError::Configuration(
                    FAILOVER_SENDER_MISSING.to_owned(),
                ));
            };
            request.failover = Some(vec![SendRequest::text(Channel::Sms, &to, sms_sender, body)]);
        }

        let response = self.sender.send_message(&request).await?;
        let result = normalize_send_response(&response);
        info!(
            %channel,
            message_uuid = %result.message_uuid,
            workflow_id = %result.workflow_id,
            "message accepted"
        );
        Ok(result)
    }
}
