//! Trigger and MCP trigger management behavior.

use opsbeacon_client::{
    CreateMcpTrigger, Error, McpCreateResponse, OpsBeaconClient, ToolConfig, ToolInstance,
    ToolOverrides,
};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> OpsBeaconClient {
    OpsBeaconClient::builder()
        .api_domain(server.uri())
        .api_token("test-api-token-12345")
        .build()
        .unwrap()
}

fn tool(name: &str, connection: &str, command: &str) -> ToolInstance {
    ToolInstance {
        instance_id: name.to_string(),
        template_id: name.to_string(),
        overrides: ToolOverrides {
            name: name.to_string(),
            connection: connection.to_string(),
            command: command.to_string(),
            ..Default::default()
        },
    }
}

#[tokio::test]
async fn mcp_listing_filters_by_kind_preserving_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workspace/v2/triggers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "triggers": [
                {"name": "t1", "kind": "mcp"},
                {"name": "t2", "kind": "webHook"},
                {"name": "t3", "kind": "mcp"},
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let all = client.triggers().list().await.unwrap();
    assert_eq!(all.len(), 3);

    let mcp = client.triggers().mcp().await.unwrap();
    let names: Vec<&str> = mcp.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["t1", "t3"]);
}

#[tokio::test]
async fn get_falls_back_to_list_scan_when_direct_lookup_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workspace/v2/triggers/x"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"err": "lookup broken"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/workspace/v2/triggers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "triggers": [{"name": "x", "kind": "mcp", "description": "found via list"}]
        })))
        .mount(&server)
        .await;

    let trigger = client_for(&server).triggers().get("x").await.unwrap();
    assert_eq!(trigger.description, "found via list");
}

#[tokio::test]
async fn get_reports_not_found_when_absent_everywhere() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workspace/v2/triggers/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/workspace/v2/triggers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"triggers": []})))
        .mount(&server)
        .await;

    let err = client_for(&server).triggers().get("ghost").await.unwrap_err();
    match err {
        Error::NotFound { resource, id } => {
            assert_eq!(resource, "Trigger");
            assert_eq!(id, "ghost");
        }
        other => panic!("expected not-found error, got {other:?}"),
    }
}

#[tokio::test]
async fn create_mcp_deduplicates_derived_scopes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/workspace/v2/triggers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "https://triggers.test/mcp/abc",
            "apiToken": "trigger-token"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .triggers()
        .create_mcp(
            CreateMcpTrigger::new("demo-mcp")
                .description("demo")
                .tool_instances(vec![tool("one", "x", "a"), tool("two", "x", "b")]),
        )
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["kind"], "mcp");
    let connections = body["connections"].as_array().unwrap();
    assert_eq!(connections, &vec![json!("x")]);
    let commands = body["commands"].as_array().unwrap();
    assert_eq!(commands.len(), 2);
    assert!(commands.contains(&json!("a")));
    assert!(commands.contains(&json!("b")));
    assert_eq!(body["mcpTriggerInfo"]["toolInstances"].as_array().unwrap().len(), 2);

    match response {
        McpCreateResponse::Created(envelope) => {
            assert_eq!(envelope.name, "demo-mcp");
            assert_eq!(envelope.url, "https://triggers.test/mcp/abc");
            assert_eq!(envelope.api_token.as_deref(), Some("trigger-token"));
            assert!(envelope.success);
        }
        other => panic!("expected created envelope, got {other:?}"),
    }
}

#[tokio::test]
async fn create_mcp_raises_on_server_err_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/workspace/v2/triggers"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"err": "name already taken"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .triggers()
        .create_mcp(CreateMcpTrigger::new("demo-mcp"))
        .await
        .unwrap_err();
    match err {
        Error::Mcp { trigger, message, .. } => {
            assert_eq!(trigger.as_deref(), Some("demo-mcp"));
            assert!(message.contains("name already taken"));
        }
        other => panic!("expected MCP error, got {other:?}"),
    }
}

#[tokio::test]
async fn create_mcp_passes_unrecognized_shapes_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/workspace/v2/triggers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "pending"})))
        .mount(&server)
        .await;

    let response = client_for(&server)
        .triggers()
        .create_mcp(CreateMcpTrigger::new("demo-mcp"))
        .await
        .unwrap();
    match response {
        McpCreateResponse::Other(value) => assert_eq!(value["status"], "pending"),
        other => panic!("expected passthrough, got {other:?}"),
    }
}

#[tokio::test]
async fn mcp_operations_reject_non_mcp_triggers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workspace/v2/triggers/hook"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "hook", "kind": "webHook"
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/workspace/v2/triggers/hook"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .triggers()
        .add_tool("hook", ToolConfig::named("t"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Mcp { .. }));

    let err = client.triggers().remove_tool("hook", "t").await.unwrap_err();
    assert!(matches!(err, Error::Mcp { .. }));
}

#[tokio::test]
async fn remove_tool_reports_not_found_and_issues_no_update() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workspace/v2/triggers/demo-mcp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "demo-mcp",
            "kind": "mcp",
            "mcpTriggerInfo": {"toolInstances": [
                {"instanceId": "i1", "templateId": "i1",
                 "overrides": {"name": "disk_usage", "connection": "dev", "command": "df"}}
            ]}
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/workspace/v2/triggers/demo-mcp"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .triggers()
        .remove_tool("demo-mcp", "ghost")
        .await
        .unwrap_err();
    match err {
        Error::NotFound { resource, id } => {
            assert_eq!(resource, "Tool");
            assert_eq!(id, "ghost");
        }
        other => panic!("expected not-found error, got {other:?}"),
    }
}

#[tokio::test]
async fn remove_tool_updates_with_the_filtered_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workspace/v2/triggers/demo-mcp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "demo-mcp",
            "kind": "mcp",
            "description": "demo",
            "commands": ["df", "uptime"],
            "connections": ["dev"],
            "mcpTriggerInfo": {"toolInstances": [
                {"instanceId": "i1", "templateId": "i1",
                 "overrides": {"name": "disk_usage", "connection": "dev", "command": "df"}},
                {"instanceId": "i2", "templateId": "i2",
                 "overrides": {"name": "uptime", "connection": "dev", "command": "uptime"}}
            ]}
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/workspace/v2/triggers/demo-mcp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "demo-mcp", "kind": "mcp"
        })))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .triggers()
        .remove_tool("demo-mcp", "uptime")
        .await
        .unwrap();

    let put = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.method.as_str() == "PUT")
        .expect("update request");
    let body: Value = serde_json::from_slice(&put.body).unwrap();
    let instances = body["mcpTriggerInfo"]["toolInstances"].as_array().unwrap();
    assert_eq!(instances.len(), 1);
    assert_eq!(instances[0]["overrides"]["name"], "disk_usage");
    // Scopes are recomputed from the remaining tools.
    assert_eq!(body["commands"], json!(["df"]));
    assert_eq!(body["connections"], json!(["dev"]));
}

#[tokio::test]
async fn add_tool_appends_with_generated_identifiers_and_default_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workspace/v2/triggers/demo-mcp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "demo-mcp",
            "kind": "mcp",
            "mcpTriggerInfo": {"toolInstances": [
                {"instanceId": "i1", "templateId": "i1",
                 "overrides": {"name": "disk_usage", "connection": "dev", "command": "df"}}
            ]}
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/workspace/v2/triggers/demo-mcp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "demo-mcp", "kind": "mcp"
        })))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .triggers()
        .add_tool(
            "demo-mcp",
            ToolConfig::default().connection("dev").command("uptime"),
        )
        .await
        .unwrap();

    let put = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.method.as_str() == "PUT")
        .expect("update request");
    let body: Value = serde_json::from_slice(&put.body).unwrap();
    let instances = body["mcpTriggerInfo"]["toolInstances"].as_array().unwrap();
    assert_eq!(instances.len(), 2);

    let appended = &instances[1];
    assert_eq!(appended["overrides"]["name"], "tool_2");
    assert_eq!(appended["overrides"]["command"], "uptime");
    let instance_id = appended["instanceId"].as_str().unwrap();
    assert!(!instance_id.is_empty());
    assert_eq!(appended["templateId"], json!(instance_id));
    assert_ne!(instance_id, "i1");
}

#[tokio::test]
async fn update_preserves_unmodeled_mcp_info_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workspace/v2/triggers/demo-mcp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "demo-mcp",
            "kind": "mcp",
            "mcpTriggerInfo": {
                "toolInstances": [],
                "serverVersion": "2024.6"
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/workspace/v2/triggers/demo-mcp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "demo-mcp", "kind": "mcp"
        })))
        .mount(&server)
        .await;

    client_for(&server)
        .triggers()
        .update_mcp(
            "demo-mcp",
            opsbeacon_client::UpdateMcpTrigger::default().description("updated"),
        )
        .await
        .unwrap();

    let put = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.method.as_str() == "PUT")
        .expect("update request");
    let body: Value = serde_json::from_slice(&put.body).unwrap();
    assert_eq!(body["description"], "updated");
    assert_eq!(body["mcpTriggerInfo"]["serverVersion"], "2024.6");
}

#[tokio::test]
async fn mcp_url_is_none_for_missing_or_non_mcp_triggers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workspace/v2/triggers/hook"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "hook", "kind": "webHook", "triggerUrl": "https://x.test/hook"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/workspace/v2/triggers/live"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "live", "kind": "mcp", "triggerUrl": "https://x.test/mcp/live"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/workspace/v2/triggers/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/workspace/v2/triggers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"triggers": []})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(
        client.triggers().mcp_url("live").await.unwrap().as_deref(),
        Some("https://x.test/mcp/live")
    );
    assert_eq!(client.triggers().mcp_url("hook").await.unwrap(), None);
    assert_eq!(client.triggers().mcp_url("ghost").await.unwrap(), None);
}
