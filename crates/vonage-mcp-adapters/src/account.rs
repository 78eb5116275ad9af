//! Account adapter.
//!
//! Balance, application management and owned-number management.  Linking a
//! number to an application is the only multi-step operation: it looks the
//! number up first and skips the update when nothing would change.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Value, json};
use tracing::{debug, info};
use vonage_mcp_provider::{Application, NewApplication, NumberSearch, NumberUpdate, OwnedNumber};

use crate::collaborators::AccountManager;
use crate::context::VonageServices;
use crate::error::Result;
use crate::traits::{
    Adapter, AdapterType, HealthStatus, ToolDefinition, ToolOutput, optional_str, required_str,
    tool_not_found,
};

const TOOL_BALANCE: &str = "balance";
const TOOL_LIST_APPLICATIONS: &str = "list-applications";
const TOOL_CREATE_APPLICATION: &str = "create-application";
const TOOL_LIST_NUMBERS: &str = "list-purchased-numbers";
const TOOL_LINK_NUMBER: &str = "link-number-to-vonage-application";

// ---------------------------------------------------------------------------
// Number linking
// ---------------------------------------------------------------------------

/// A request to route an owned number to an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRequest {
    pub msisdn: String,
    pub application_id: String,
}

impl LinkRequest {
    /// Whitespace anywhere in `application_id` is dropped; ids are often
    /// pasted with stray spaces or line breaks.
    pub fn new(msisdn: impl Into<String>, application_id: &str) -> Self {
        Self {
            msisdn: msisdn.into(),
            application_id: application_id.chars().filter(|c| !c.is_whitespace()).collect(),
        }
    }
}

/// Result of [`link_number`].
#[derive(Debug, Clone, PartialEq)]
pub enum LinkOutcome {
    /// No owned number matched.
    NotFound,
    /// The number already points at the application; nothing was sent.
    AlreadyLinked,
    /// The update was issued.  Carries the provider's response.
    Linked(Value),
}

/// The update that links `number` to `application_id` while keeping its
/// other callback settings.
pub fn link_update(number: &OwnedNumber, application_id: &str) -> NumberUpdate {
    NumberUpdate {
        country: number.country.clone().unwrap_or_default(),
        msisdn: number.msisdn.clone().unwrap_or_default(),
        app_id: Some(application_id.to_owned()),
        mo_http_url: number.mo_http_url.clone(),
        voice_callback_type: number.voice_callback_type.clone(),
        voice_callback_value: Some(application_id.to_owned()),
        messages_callback_type: number.messages_callback_type.clone(),
        messages_callback_value: number.messages_callback_value.clone(),
    }
}

/// Link an owned number to an application.
///
/// Only the first number matching `msisdn` as a prefix is considered.
pub async fn link_number(
    account: &dyn AccountManager,
    request: &LinkRequest,
) -> vonage_mcp_provider::Result<LinkOutcome> {
    let owned = account
        .get_owned_numbers(&NumberSearch::starts_with(request.msisdn.as_str()))
        .await?;

    let Some(number) = owned.numbers.first() else {
        debug!(msisdn = %request.msisdn, "no owned number matched");
        return Ok(LinkOutcome::NotFound);
    };

    if number.app_id.as_deref() == Some(request.application_id.as_str()) {
        debug!(msisdn = %request.msisdn, "number already linked");
        return Ok(LinkOutcome::AlreadyLinked);
    }

    let response = account
        .update_number(&link_update(number, &request.application_id))
        .await?;
    info!(
        msisdn = %request.msisdn,
        application_id = %request.application_id,
        "number linked to application"
    );
    Ok(LinkOutcome::Linked(response))
}

/// `Vonage App YYYY-MM-DD` for today's UTC date.
pub fn default_application_name() -> String {
    format!("Vonage App {}", Utc::now().format("%Y-%m-%d"))
}

fn render_created_application(application: &Application) -> String {
    let private_key = application
        .keys
        .as_ref()
        .and_then(|k| k.private_key.as_deref())
        .map(|key| format!("Private Key: {key}"))
        .unwrap_or_default();
    let details = serde_json::to_string_pretty(application).unwrap_or_default();
    format!(
        "Application created successfully:\nName: {}\nApplication ID: {}\n{private_key}\n\nFull details: {details}",
        application.name, application.id
    )
}

// ---------------------------------------------------------------------------
// Adapter
// ---------------------------------------------------------------------------

/// Tool group for account, application and number management.
pub struct AccountAdapter {
    id: String,
    services: VonageServices,
}

impl AccountAdapter {
    pub fn new(id: impl Into<String>, services: VonageServices) -> Self {
        Self {
            id: id.into(),
            services,
        }
    }

    fn account(&self) -> &dyn AccountManager {
        self.services.account.as_ref()
    }

    async fn tool_balance(&self) -> Result<ToolOutput> {
        Ok(match self.account().get_balance().await {
            Ok(balance) => ToolOutput::text(format!(
                "Current account balance is {:.2}.",
                balance.value
            )),
            Err(e) => ToolOutput::error(format!("Error getting balance: {e}")),
        })
    }

    async fn tool_list_applications(&self) -> Result<ToolOutput> {
        Ok(match self.account().list_applications().await {
            Ok(page) => ToolOutput::text(format!(
                "Applications: {}",
                serde_json::to_string(&page).unwrap_or_default()
            )),
            Err(e) => ToolOutput::error(format!("Error listing applications: {e}")),
        })
    }

    async fn tool_create_application(&self, params: Value) -> Result<ToolOutput> {
        let name = optional_str(&params, TOOL_CREATE_APPLICATION, "name")?
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(default_application_name);

        let request = NewApplication {
            name,
            capabilities: json!({}),
        };
        Ok(match self.account().create_application(&request).await {
            Ok(application) => {
                info!(id = %application.id, name = %application.name, "application created");
                ToolOutput::text(render_created_application(&application))
            }
            Err(e) => ToolOutput::error(format!("Error creating application: {e}")),
        })
    }

    async fn tool_list_numbers(&self) -> Result<ToolOutput> {
        Ok(
            match self.account().get_owned_numbers(&NumberSearch::default()).await {
                Ok(numbers) => ToolOutput::text(format!(
                    "Numbers: {}",
                    serde_json::to_string(&numbers).unwrap_or_default()
                )),
                Err(e) => ToolOutput::error(format!("Error listing numbers: {e}")),
            },
        )
    }

    async fn tool_link_number(&self, params: Value) -> Result<ToolOutput> {
        let msisdn = required_str(&params, TOOL_LINK_NUMBER, "msisdn")?;
        let application_id = required_str(&params, TOOL_LINK_NUMBER, "applicationId")?;
        let request = LinkRequest::new(msisdn, application_id);

        Ok(match link_number(self.account(), &request).await {
            Ok(LinkOutcome::NotFound) => ToolOutput::text(format!(
                "I could not find the number \"{msisdn}\" attached to your account."
            )),
            Ok(LinkOutcome::AlreadyLinked) => ToolOutput::text(format!(
                "The number \"{msisdn}\" is already linked to the Vonage Application ID {}.",
                request.application_id
            )),
            Ok(LinkOutcome::Linked(response)) => ToolOutput::text(format!(
                "Successfully linked number \"{msisdn}\" to application {}. Response: {response}",
                request.application_id
            )),
            Err(e) => ToolOutput::error(format!("Error linking number: {e}")),
        })
    }
}

#[async_trait]
impl Adapter for AccountAdapter {
    fn id(&self) -> &str {
        &self.id
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Account
    }

    async fn health_check(&self) -> Result<HealthStatus> {
        if self.services.credentials.key_pair {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Unhealthy)
        }
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        let no_params = json!({ "type": "object", "properties": {} });
        vec![
            ToolDefinition {
                name: TOOL_BALANCE.into(),
                title: "Account balance".into(),
                description: "Get your Vonage Account balance".into(),
                parameters: no_params.clone(),
            },
            ToolDefinition {
                name: TOOL_LIST_APPLICATIONS.into(),
                title: "List my applications".into(),
                description: "List out the applications that are attached to my API key".into(),
                parameters: no_params.clone(),
            },
            ToolDefinition {
                name: TOOL_CREATE_APPLICATION.into(),
                title: "Create a new Vonage Application".into(),
                description: "Create a new Vonage application with a specified name".into(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "name": {
                            "type": "string",
                            "description": "The name of the application to create. If not provided, a default name will be generated."
                        }
                    }
                }),
            },
            ToolDefinition {
                name: TOOL_LIST_NUMBERS.into(),
                title: "List the telephone numbers associated with my Vonage Account".into(),
                description: "List of the telephone numbers that are currently associated with \
                              my account and their metadata"
                    .into(),
                parameters: no_params,
            },
            ToolDefinition {
                name: TOOL_LINK_NUMBER.into(),
                title: "Link an owned number to the assigned Vonage Application".into(),
                description: "Link an owned number to the assigned Vonage Application".into(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "msisdn": {
                            "type": "string",
                            "description": "The phone number to link to the Vonage Application, in E.164 format, e.g. +12025550123"
                        },
                        "applicationId": {
                            "type": "string",
                            "description": "The Vonage Application ID to link the number to"
                        }
                    },
                    "required": ["msisdn", "applicationId"]
                }),
            },
        ]
    }

    async fn execute_tool(&self, name: &str, params: Value) -> Result<ToolOutput> {
        debug!(tool = name, "executing account tool");
        match name {
            TOOL_BALANCE => self.tool_balance().await,
            TOOL_LIST_APPLICATIONS => self.tool_list_applications().await,
            TOOL_CREATE_APPLICATION => self.tool_create_application(params).await,
            TOOL_LIST_NUMBERS => self.tool_list_numbers().await,
            TOOL_LINK_NUMBER => self.tool_link_number(params).await,
            _ => Err(tool_not_found(&self.id, name)),
        }
    }
}
