//! Tool adapters for vonage-mcp.
//!
//! Each adapter groups related tools behind the [`Adapter`] trait:
//!
//! - [`MessagingAdapter`]: SMS, WhatsApp and RCS text, optionally with SMS
//!   failover, all through one [`Dispatcher`].
//! - [`VoiceAdapter`]: outbound text-to-speech calls.
//! - [`AccountAdapter`]: balance, applications and owned numbers.
//!
//! Adapters reach the provider only through the traits in
//! [`collaborators`], bundled in a [`VonageServices`] context.

pub mod account;
pub mod collaborators;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod messaging;
pub mod normalizer;
pub mod response;
pub mod traits;
pub mod voice;

use std::sync::Arc;

pub use account::{AccountAdapter, LinkOutcome, LinkRequest, link_number};
pub use collaborators::{AccountManager, MessageSender, NumberLookup, VoiceCaller};
pub use context::{CredentialStatus, VonageServices};
pub use dispatch::{ChannelConfig, ChannelTable, Dispatcher, SendRequest};
pub use error::{AdapterError, DispatchError, Result};
pub use messaging::MessagingAdapter;
pub use normalizer::{FormattedNumber, normalize};
pub use response::{SendResult, normalize_send_response};
pub use traits::{Adapter, AdapterType, HealthStatus, ToolDefinition, ToolOutput};
pub use voice::VoiceAdapter;

/// Every adapter, sharing one set of services.
pub fn vonage_adapters(services: VonageServices) -> Vec<Arc<dyn Adapter>> {
    vec![
        Arc::new(AccountAdapter::new("account", services.clone())),
        Arc::new(MessagingAdapter::new("messaging", services.clone())),
        Arc::new(VoiceAdapter::new("voice", services)),
    ]
}
