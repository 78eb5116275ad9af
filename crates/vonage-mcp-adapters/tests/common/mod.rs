//! Recording stubs for the collaborator traits.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use vonage_mcp_adapters::{
    AccountManager, CredentialStatus, MessageSender, NumberLookup, SendRequest, VoiceCaller,
    VonageServices,
};
use vonage_mcp_provider::{
    Application, ApplicationPage, Balance, BasicInsight, CallCreated, NewApplication,
    NumberSearch, NumberUpdate, OutboundCall, OwnedNumber, OwnedNumbers, ProviderError, Result,
    SenderIdentities,
};

pub const VIRTUAL_NUMBER: &str = "15550001111";
pub const WHATSAPP_NUMBER: &str = "14157386102";
pub const RCS_SENDER: &str = "VonageBrand";

/// Resolves any input containing digits to those digits.  Input containing
/// `bad` does not resolve.
#[derive(Default)]
pub struct StubLookup {
    pub calls: Mutex<Vec<String>>,
}

#[async_trait]
impl NumberLookup for StubLookup {
    async fn basic_lookup(&self, number: &str) -> Result<BasicInsight> {
        self.calls.lock().unwrap().push(number.to_owned());
        if number.contains("bad") {
            return Ok(BasicInsight {
                status: 3,
                status_message: Some("Invalid request".into()),
                ..BasicInsight::default()
            });
        }
        let digits: String = number.chars().filter(char::is_ascii_digit).collect();
        Ok(BasicInsight {
            status: 0,
            international_format_number: Some(digits),
            ..BasicInsight::default()
        })
    }
}

/// Records every request and answers with a fixed body.
pub struct RecordingSender {
    pub sent: Mutex<Vec<SendRequest>>,
    pub response: Value,
    pub fail: bool,
}

impl Default for RecordingSender {
    fn default() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            response: json!({ "message_uuid": "aaaaaaaa-bbbb-cccc-dddd-0123456789ab" }),
            fail: false,
        }
    }
}

impl RecordingSender {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn responding(response: Value) -> Self {
        Self {
            response,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<SendRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send_message(&self, request: &SendRequest) -> Result<Value> {
        self.sent.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(ProviderError::Api {
                status: 422,
                title: "Invalid sender".into(),
                detail: Some("The `from` parameter is invalid.".into()),
            });
        }
        Ok(self.response.clone())
    }
}

#[derive(Default)]
pub struct RecordingVoice {
    pub calls: Mutex<Vec<OutboundCall>>,
}

#[async_trait]
impl VoiceCaller for RecordingVoice {
    async fn create_outbound_call(&self, call: &OutboundCall) -> Result<CallCreated> {
        self.calls.lock().unwrap().push(call.clone());
        Ok(CallCreated {
            uuid: Some("call-1".into()),
            status: Some("started".into()),
            direction: Some("outbound".into()),
            conversation_uuid: Some("CON-1".into()),
            ..CallCreated::default()
        })
    }
}

/// Serves a fixed set of owned numbers and records searches and updates.
#[derive(Default)]
pub struct StubAccount {
    pub numbers: Vec<OwnedNumber>,
    pub searches: Mutex<Vec<NumberSearch>>,
    pub updates: Mutex<Vec<NumberUpdate>>,
    pub created: Mutex<Vec<NewApplication>>,
}

impl StubAccount {
    pub fn with_numbers(numbers: Vec<OwnedNumber>) -> Self {
        Self {
            numbers,
            ..Self::default()
        }
    }

    pub fn updates(&self) -> Vec<NumberUpdate> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl AccountManager for StubAccount {
    async fn get_balance(&self) -> Result<Balance> {
        Ok(Balance {
            value: 12.3456,
            auto_reload: Some(false),
        })
    }

    async fn list_applications(&self) -> Result<ApplicationPage> {
        Ok(serde_json::from_value(json!({
            "page_size": 10,
            "page": 1,
            "total_items": 1,
            "total_pages": 1,
            "_embedded": { "applications": [{ "id": "app-1", "name": "Demo", "capabilities": {} }] }
        }))?)
    }

    async fn create_application(&self, application: &NewApplication) -> Result<Application> {
        self.created.lock().unwrap().push(application.clone());
        Ok(serde_json::from_value(json!({
            "id": "new-app",
            "name": application.name,
            "capabilities": application.capabilities,
            "keys": { "public_key": "PUBLIC", "private_key": "PRIVATE" }
        }))?)
    }

    async fn get_owned_numbers(&self, search: &NumberSearch) -> Result<OwnedNumbers> {
        self.searches.lock().unwrap().push(search.clone());
        let numbers: Vec<OwnedNumber> = self
            .numbers
            .iter()
            .filter(|n| match (&search.pattern, &n.msisdn) {
                (Some(prefix), Some(msisdn)) => msisdn.starts_with(prefix.as_str()),
                (Some(_), None) => false,
                (None, _) => true,
            })
            .cloned()
            .collect();
        Ok(OwnedNumbers {
            count: numbers.len() as u64,
            numbers,
        })
    }

    async fn update_number(&self, update: &NumberUpdate) -> Result<Value> {
        self.updates.lock().unwrap().push(update.clone());
        Ok(json!({ "error-code": "200", "error-code-label": "success" }))
    }
}

pub fn all_senders() -> SenderIdentities {
    SenderIdentities {
        virtual_number: Some(VIRTUAL_NUMBER.into()),
        whatsapp_number: Some(WHATSAPP_NUMBER.into()),
        rcs_sender_id: Some(RCS_SENDER.into()),
    }
}

pub fn full_credentials() -> CredentialStatus {
    CredentialStatus {
        key_pair: true,
        application: true,
    }
}

/// Stubs wired into a services context, kept so tests can inspect them.
pub struct Harness {
    pub lookup: Arc<StubLookup>,
    pub sender: Arc<RecordingSender>,
    pub voice: Arc<RecordingVoice>,
    pub account: Arc<StubAccount>,
    pub services: VonageServices,
}

impl Harness {
    pub fn new(senders: SenderIdentities) -> Self {
        Self::build(senders, RecordingSender::default(), StubAccount::default())
    }

    pub fn build(senders: SenderIdentities, sender: RecordingSender, account: StubAccount) -> Self {
        let lookup = Arc::new(StubLookup::default());
        let sender = Arc::new(sender);
        let voice = Arc::new(RecordingVoice::default());
        let account = Arc::new(account);
        let services = VonageServices::new(
            lookup.clone(),
            sender.clone(),
            voice.clone(),
            account.clone(),
            &senders,
            full_credentials(),
        );
        Self {
            lookup,
            sender,
            voice,
            account,
            services,
        }
    }
}
