//! Vonage provider client for vonage-mcp.
//!
//! Configuration, credentials, wire types and a thin HTTP client for the
//! Vonage Messages, Voice, Number Insight, Account, Applications and Numbers
//! APIs.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod ncco;
pub mod types;

pub use auth::Credentials;
pub use client::VonageClient;
pub use config::{SenderIdentities, VonageConfig};
pub use error::{ProviderError, Result};
pub use ncco::{Ncco, NccoAction, NccoBuilder, Talk};
pub use types::{
    Application, ApplicationKeys, ApplicationPage, Balance, BasicInsight, CallCreated, CallEndpoint, Channel,
    MessageRequest, MessageType, NewApplication, NumberSearch, NumberUpdate, OutboundCall,
    OwnedNumber, OwnedNumbers,
};
