//! Shared services handed to every adapter.

use std::sync::Arc;

use vonage_mcp_provider::{SenderIdentities, VonageClient};

use crate::collaborators::{AccountManager, MessageSender, NumberLookup, VoiceCaller};
use crate::dispatch::{ChannelTable, Dispatcher};

/// Which credential sets are available.  Only presence is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CredentialStatus {
    /// API key and secret.
    pub key_pair: bool,
    /// Application id and private key.
    pub application: bool,
}

/// Collaborators and configuration shared by the tool adapters.
///
/// Built once at startup.  Everything inside is read-only.
#[derive(Clone)]
pub struct VonageServices {
    pub lookup: Arc<dyn NumberLookup>,
    pub sender: Arc<dyn MessageSender>,
    pub voice: Arc<dyn VoiceCaller>,
    pub account: Arc<dyn AccountManager>,
    pub channels: Arc<ChannelTable>,
    pub credentials: CredentialStatus,
}

impl VonageServices {
    /// Assemble services from arbitrary collaborators.
    pub fn new(
        lookup: Arc<dyn NumberLookup>,
        sender: Arc<dyn MessageSender>,
        voice: Arc<dyn VoiceCaller>,
        account: Arc<dyn AccountManager>,
        senders: &SenderIdentities,
        credentials: CredentialStatus,
    ) -> Self {
        Self {
            lookup,
            sender,
            voice,
            account,
            channels: Arc::new(ChannelTable::from_senders(senders)),
            credentials,
        }
    }

    /// Use one Vonage client for every collaborator.
    pub fn from_client(client: Arc<VonageClient>, senders: &SenderIdentities) -> Self {
        let credentials = CredentialStatus {
            key_pair: client.credentials().key_pair().is_ok(),
            application: client.credentials().has_application(),
        };
        Self::new(
            client.clone(),
            client.clone(),
            client.clone(),
            client,
            senders,
            credentials,
        )
    }

    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(
            self.channels.clone(),
            self.lookup.clone(),
            self.sender.clone(),
        )
    }

    /// The SMS sender, also used to originate calls and failover messages.
    pub fn virtual_number(&self) -> Option<&str> {
        self.channels.virtual_number()
    }
}

impl std::fmt::Debug for VonageServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VonageServices")
            .field("channels", &self.channels)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}
