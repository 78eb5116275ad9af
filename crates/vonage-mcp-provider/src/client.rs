//! HTTP client for the Vonage REST APIs.
//!
//! [`VonageClient`] is built once at startup and shared by reference.  It
//! holds a single `reqwest::Client` and the validated credentials, and
//! exposes one method per provider operation the tools need.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::auth::Credentials;
use crate::config::VonageConfig;
use crate::error::{ProviderError, Result};
use crate::types::{
    Application, ApplicationPage, Balance, BasicInsight, CallCreated, MessageRequest,
    NewApplication, NumberSearch, NumberUpdate, OutboundCall, OwnedNumbers,
};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Status reported for an embedded failure whose `error-code` is not numeric.
const UNKNOWN_FAILURE_STATUS: u16 = 500;

/// Vonage REST API client.
#[derive(Debug, Clone)]
pub struct VonageClient {
    http: reqwest::Client,
    credentials: Credentials,
    api_base: Url,
    rest_base: Url,
}

impl VonageClient {
    /// Build a client from configuration.
    pub fn new(config: &VonageConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("vonage-mcp/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            credentials: Credentials::from_config(config)?,
            api_base: config.api_base_url.clone(),
            rest_base: config.rest_base_url.clone(),
        })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    // -----------------------------------------------------------------------
    // URL construction
    // -----------------------------------------------------------------------

    fn api_url(&self, path: &str) -> Result<Url> {
        join(&self.api_base, path)
    }

    fn rest_url(&self, path: &str) -> Result<Url> {
        join(&self.rest_base, path)
    }

    // -----------------------------------------------------------------------
    // Request helpers
    // -----------------------------------------------------------------------

    /// Attach the strongest available auth to a Messages API request: an
    /// application JWT when configured, basic auth otherwise.
    fn messages_auth(&self, request: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder> {
        if self.credentials.has_application() {
            Ok(request.bearer_auth(self.credentials.application_token()?))
        } else {
            let (key, secret) = self.credentials.key_pair()?;
            Ok(request.basic_auth(key, Some(secret)))
        }
    }

    fn basic_auth(&self, request: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder> {
        let (key, secret) = self.credentials.key_pair()?;
        Ok(request.basic_auth(key, Some(secret)))
    }

    fn query_auth(&self, request: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder> {
        let (key, secret) = self.credentials.key_pair()?;
        Ok(request.query(&[("api_key", key), ("api_secret", secret)]))
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Basic Number Insight lookup.
    pub async fn basic_lookup(&self, number: &str) -> Result<BasicInsight> {
        let url = self.api_url("ni/basic/json")?;
        debug!(url = %url, "number insight lookup");
        let request = self.query_auth(self.http.get(url))?.query(&[("number", number)]);
        parse_response(request.send().await?).await
    }

    /// Send a message through the Messages API.
    ///
    /// The raw response is returned because its identifier fields are spelled
    /// differently across API revisions.
    pub async fn send_message(&self, message: &MessageRequest) -> Result<Value> {
        let url = self.api_url("v1/messages")?;
        debug!(url = %url, channel = %message.channel, "sending message");
        let request = self.messages_auth(self.http.post(url))?.json(message);
        parse_response(request.send().await?).await
    }

    /// Place an outbound voice call.  Requires application credentials.
    pub async fn create_outbound_call(&self, call: &OutboundCall) -> Result<CallCreated> {
        let url = self.api_url("v1/calls")?;
        debug!(url = %url, "creating outbound call");
        let token = self.credentials.application_token()?;
        let request = self.http.post(url).bearer_auth(token).json(call);
        parse_response(request.send().await?).await
    }

    /// Current account balance.
    pub async fn get_balance(&self) -> Result<Balance> {
        let url = self.rest_url("account/get-balance")?;
        debug!(url = %url, "getting account balance");
        let request = self.query_auth(self.http.get(url))?;
        parse_response(request.send().await?).await
    }

    /// First page of the account's applications.
    pub async fn list_applications(&self) -> Result<ApplicationPage> {
        let url = self.api_url("v2/applications")?;
        debug!(url = %url, "listing applications");
        let request = self.basic_auth(self.http.get(url))?;
        parse_response(request.send().await?).await
    }

    /// Create a new application.
    pub async fn create_application(&self, application: &NewApplication) -> Result<Application> {
        let url = self.api_url("v2/applications")?;
        debug!(url = %url, name = %application.name, "creating application");
        let request = self.basic_auth(self.http.post(url))?.json(application);
        parse_response(request.send().await?).await
    }

    /// Numbers owned by the account, optionally filtered.
    pub async fn get_owned_numbers(&self, search: &NumberSearch) -> Result<OwnedNumbers> {
        let url = self.rest_url("account/numbers")?;
        debug!(url = %url, pattern = ?search.pattern, "listing owned numbers");
        let request = self.query_auth(self.http.get(url))?.query(search);
        parse_response(request.send().await?).await
    }

    /// Update an owned number's configuration.
    pub async fn update_number(&self, update: &NumberUpdate) -> Result<Value> {
        let url = self.rest_url("number/update")?;
        debug!(url = %url, msisdn = %update.msisdn, "updating number");
        let request = self.query_auth(self.http.post(url))?.form(update);
        let body: Value = parse_response(request.send().await?).await?;

        // The numbers API reports some failures inside a 200 response.
        match body.get("error-code").and_then(Value::as_str) {
            Some(code) if code != "200" => Err(ProviderError::Api {
                status: code.parse().unwrap_or(UNKNOWN_FAILURE_STATUS),
                title: body
                    .get("error-code-label")
                    .and_then(Value::as_str)
                    .unwrap_or("number update failed")
                    .to_owned(),
                detail: None,
            }),
            _ => Ok(body),
        }
    }
}

fn join(base: &Url, path: &str) -> Result<Url> {
    base.join(path)
        .map_err(|e| ProviderError::Config(format!("cannot build URL for `{path}`: {e}")))
}

/// Decode a successful response or turn an error response into
/// [`ProviderError::Api`].
async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        let body: Value = serde_json::from_str(&text).unwrap_or(Value::Null);
        let title = ["title", "error-code-label", "error_text"]
            .iter()
            .find_map(|field| body.get(*field).and_then(Value::as_str))
            .map(str::to_owned)
            .or_else(|| status.canonical_reason().map(str::to_owned))
            .unwrap_or_else(|| "request failed".to_owned());
        let detail = body
            .get("detail")
            .and_then(Value::as_str)
            .map(str::to_owned);
        return Err(ProviderError::Api {
            status: status.as_u16(),
            title,
            detail,
        });
    }

    if text.trim().is_empty() {
        return Ok(serde_json::from_value(Value::Object(Default::default()))?);
    }
    Ok(serde_json::from_str(&text)?)
}
