//! End-to-end MCP sessions over an in-memory line transport.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use vonage_mcp_adapters::{
    AccountManager, CredentialStatus, MessageSender, NumberLookup, SendRequest, VoiceCaller,
    VonageServices, vonage_adapters,
};
use vonage_mcp_provider::{
    Application, ApplicationPage, Balance, BasicInsight, CallCreated, NewApplication,
    NumberSearch, NumberUpdate, OutboundCall, OwnedNumbers, ProviderError, Result,
    SenderIdentities,
};
use vonage_mcp_server::{McpServer, serve};

#[derive(Default)]
struct Provider {
    sent: Mutex<Vec<SendRequest>>,
}

#[async_trait]
impl NumberLookup for Provider {
    async fn basic_lookup(&self, number: &str) -> Result<BasicInsight> {
        Ok(BasicInsight {
            status: 0,
            international_format_number: Some(
                number.chars().filter(char::is_ascii_digit).collect(),
            ),
            ..BasicInsight::default()
        })
    }
}

#[async_trait]
impl MessageSender for Provider {
    async fn send_message(&self, request: &SendRequest) -> Result<Value> {
        self.sent.lock().unwrap().push(request.clone());
        Ok(json!({ "messageUUID": "uuid-1", "workflowId": "wf-1" }))
    }
}

#[async_trait]
impl VoiceCaller for Provider {
    async fn create_outbound_call(&self, _call: &OutboundCall) -> Result<CallCreated> {
        Err(ProviderError::Auth("application credentials are not configured".into()))
    }
}

#[async_trait]
impl AccountManager for Provider {
    async fn get_balance(&self) -> Result<Balance> {
        Ok(Balance {
            value: 3.5,
            auto_reload: None,
        })
    }

    async fn list_applications(&self) -> Result<ApplicationPage> {
        Ok(ApplicationPage::default())
    }

    async fn create_application(&self, _application: &NewApplication) -> Result<Application> {
        Err(ProviderError::Api {
            status: 401,
            title: "Unauthorized".into(),
            detail: None,
        })
    }

    async fn get_owned_numbers(&self, _search: &NumberSearch) -> Result<OwnedNumbers> {
        Ok(OwnedNumbers::default())
    }

    async fn update_number(&self, _update: &NumberUpdate) -> Result<Value> {
        Ok(json!({}))
    }
}

fn server(provider: Arc<Provider>) -> McpServer {
    let senders = SenderIdentities {
        virtual_number: Some("15550001111".into()),
        whatsapp_number: Some("14157386102".into()),
        rcs_sender_id: None,
    };
    let services = VonageServices::new(
        provider.clone(),
        provider.clone(),
        provider.clone(),
        provider,
        &senders,
        CredentialStatus {
            key_pair: true,
            application: false,
        },
    );
    McpServer::new(vonage_adapters(services))
}

async fn session(server: &McpServer, input: &str) -> Vec<Value> {
    let mut output = Vec::new();
    serve(server, input.as_bytes(), &mut output).await.unwrap();
    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn full_session_answers_each_request_once() {
    let provider = Arc::new(Provider::default());
    let server = server(provider.clone());

    let input = [
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05"}}"#,
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        "",
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
        r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"SMS","arguments":{"to":"+1 415 555 2671","message":"hello"}}}"#,
    ]
    .join("\n");

    let responses = session(&server, &input).await;
    assert_eq!(responses.len(), 3);

    assert_eq!(responses[0]["id"], 1);
    assert_eq!(
        responses[0]["result"]["serverInfo"]["name"],
        "vonage-mcp-server-api-bindings"
    );

    assert_eq!(responses[1]["id"], 2);
    let tools = responses[1]["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 11);

    assert_eq!(responses[2]["id"], 3);
    assert_eq!(
        responses[2]["result"]["content"][0]["text"],
        "Message \"hello\" sent to +1 415 555 2671: uuid-1"
    );

    let sent = provider.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to.as_str(), "14155552671");
}

#[tokio::test]
async fn tool_failures_keep_the_session_alive() {
    let server = server(Arc::new(Provider::default()));
    let input = [
        r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"rcs-send-text","arguments":{"to":"+44 7700 900000","message":"hi"}}}"#,
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"create-application","arguments":{}}}"#,
        r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"balance"}}"#,
    ]
    .join("\n");

    let responses = session(&server, &input).await;
    assert_eq!(responses.len(), 3);

    assert_eq!(responses[0]["result"]["isError"], true);
    assert_eq!(
        responses[0]["result"]["content"][0]["text"],
        "Error sending RCS message: RCS_SENDER_ID is not set."
    );
    assert_eq!(responses[1]["result"]["isError"], true);
    assert_eq!(
        responses[1]["result"]["content"][0]["text"],
        "Error creating application: Unauthorized (status 401)"
    );
    assert_eq!(
        responses[2]["result"]["content"][0]["text"],
        "Current account balance is 3.50."
    );
}

#[tokio::test]
async fn garbage_line_gets_parse_error_and_loop_continues() {
    let server = server(Arc::new(Provider::default()));
    let input = "{not json\n{\"jsonrpc\":\"2.0\",\"id\":7,\"method\":\"ping\"}\n";

    let responses = session(&server, input).await;
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["error"]["code"], -32700);
    assert_eq!(responses[1]["id"], 7);
    assert_eq!(responses[1]["result"], json!({}));
}

#[tokio::test]
async fn invalid_utf8_line_gets_parse_error_and_loop_continues() {
    let server = server(Arc::new(Provider::default()));
    let mut input = Vec::new();
    input.extend_from_slice(b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n");
    input.extend_from_slice(b"\xff\xfe garbage\n");
    input.extend_from_slice(b"{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}\n");

    let mut output = Vec::new();
    serve(&server, input.as_slice(), &mut output).await.unwrap();
    let responses: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0]["id"], 1);
    assert_eq!(responses[1]["error"]["code"], -32700);
    assert_eq!(responses[2]["id"], 2);
    assert_eq!(responses[2]["result"], json!({}));
}

#[tokio::test]
async fn empty_input_stops_cleanly() {
    let server = server(Arc::new(Provider::default()));
    assert!(session(&server, "").await.is_empty());
}
