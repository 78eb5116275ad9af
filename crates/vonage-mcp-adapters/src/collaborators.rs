//! Narrow interfaces to the provider.
//!
//! The dispatcher and tool handlers depend only on these traits, so any
//! provider offering equivalent operations can stand in for
//! [`VonageClient`], and tests can substitute recording stubs.

use async_trait::async_trait;
use serde_json::Value;
use vonage_mcp_provider::{
    Application, ApplicationPage, Balance, BasicInsight, CallCreated, NewApplication,
    NumberSearch, NumberUpdate, OutboundCall, OwnedNumbers, Result, VonageClient,
};

use crate::dispatch::SendRequest;

/// Resolves a user-supplied number to its canonical form.
#[async_trait]
pub trait NumberLookup: Send + Sync {
    async fn basic_lookup(&self, number: &str) -> Result<BasicInsight>;
}

/// Sends a multi-channel message.  Returns the provider's raw response.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send_message(&self, request: &SendRequest) -> Result<Value>;
}

/// Originates voice calls.
#[async_trait]
pub trait VoiceCaller: Send + Sync {
    async fn create_outbound_call(&self, call: &OutboundCall) -> Result<CallCreated>;
}

/// Account, application and number management.
#[async_trait]
pub trait AccountManager: Send + Sync {
    async fn get_balance(&self) -> Result<Balance>;
    async fn list_applications(&self) -> Result<ApplicationPage>;
    async fn create_application(&self, application: &NewApplication) -> Result<Application>;
    async fn get_owned_numbers(&self, search: &NumberSearch) -> Result<OwnedNumbers>;
    async fn update_number(&self, update: &NumberUpdate) -> Result<Value>;
}

// ---------------------------------------------------------------------------
// Vonage implementations
// ---------------------------------------------------------------------------

#[async_trait]
impl NumberLookup for VonageClient {
    async fn basic_lookup(&self, number: &str) -> Result<BasicInsight> {
        VonageClient::basic_lookup(self, number).await
    }
}

#[async_trait]
impl MessageSender for VonageClient {
    async fn send_message(&self, request: &SendRequest) -> Result<Value> {
        VonageClient::send_message(self, &request.to_wire()).await
    }
}

#[async_trait]
impl VoiceCaller for VonageClient {
    async fn create_outbound_call(&self, call: &OutboundCall) -> Result<CallCreated> {
        VonageClient::create_outbound_call(self, call).await
    }
}

#[async_trait]
impl AccountManager for VonageClient {
    async fn get_balance(&self) -> Result<Balance> {
        VonageClient::get_balance(self).await
    }

    async fn list_applications(&self) -> Result<ApplicationPage> {
        VonageClient::list_applications(self).await
    }

    async fn create_application(&self, application: &NewApplication) -> Result<Application> {
        VonageClient::create_application(self, application).await
    }

    async fn get_owned_numbers(&self, search: &NumberSearch) -> Result<OwnedNumbers> {
        VonageClient::get_owned_numbers(self, search).await
    }

    async fn update_number(&self, update: &NumberUpdate) -> Result<Value> {
        VonageClient::update_number(self, update).await
    }
}
