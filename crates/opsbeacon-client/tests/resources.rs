//! Resource accessor behavior: lists, creates, deletes, and command
//! execution.

use opsbeacon_client::{Error, Group, NewUser, OpsBeaconClient, Policy, RunRequest};
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

#[tokio::test]
async fn lists_unwrap_their_named_array_field() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workspace/v2/commands"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "commands": [
                {"id": "cmd-1", "name": "check-disk", "description": "Check disk usage"},
                {"id": "cmd-2", "name": "restart-service"},
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/workspace/v2/connections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "connections": [{"id": "conn-1", "name": "myserver", "type": "ssh"}]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let commands = client.commands().list().await.unwrap();
    assert_eq!(commands.len(), 2);
    assert_eq!(commands[0].name, "check-disk");
    assert_eq!(commands[1].description, "");

    let connections = client.connections().list().await.unwrap();
    assert_eq!(connections[0].kind, "ssh");
}

#[tokio::test]
async fn user_create_and_delete_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/workspace/v2/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "user-9", "email": "ops@example.com", "role": "admin"
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/workspace/v2/users/user-9"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let user = client
        .users()
        .create(NewUser {
            email: "ops@example.com".to_string(),
            role: "admin".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(user.id, "user-9");

    assert!(client.users().delete("user-9").await.unwrap());
}

#[tokio::test]
async fn empty_identifiers_are_rejected_without_a_request() {
    let server = MockServer::start().await;
    // No mocks mounted: any request would come back 404 and fail the
    // variant assertions below.
    let client = client_for(&server);

    assert!(matches!(
        client.users().delete("").await.unwrap_err(),
        Error::Validation { .. }
    ));
    assert!(matches!(
        client.groups().delete("").await.unwrap_err(),
        Error::Validation { .. }
    ));
    assert!(matches!(
        client.users().create(NewUser::default()).await.unwrap_err(),
        Error::Validation { .. }
    ));
    assert!(matches!(
        client.groups().create(Group::default()).await.unwrap_err(),
        Error::Validation { .. }
    ));
    assert!(matches!(
        client.policies().create(Policy::default()).await.unwrap_err(),
        Error::Validation { .. }
    ));

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn policy_get_falls_back_to_list_scan() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workspace/v2/policy/deploy-only"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/workspace/v2/policy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "policies": [{"name": "deploy-only", "commands": ["deploy"], "connections": []}]
        })))
        .mount(&server)
        .await;

    let policy = client_for(&server).policies().get("deploy-only").await.unwrap();
    assert_eq!(policy.commands, vec!["deploy"]);
}

#[tokio::test]
async fn run_string_and_list_args_produce_identical_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/trigger/v1/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .execute()
        .run(RunRequest::structured("myserver", "check-disk").args("--a b"))
        .await
        .unwrap();
    client
        .execute()
        .run(RunRequest::structured("myserver", "check-disk").args(vec!["--a", "b"]))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let first: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let second: Value = serde_json::from_slice(&requests[1].body).unwrap();
    assert_eq!(first, second);
    assert_eq!(first["arguments"], json!(["--a", "b"]));
}

#[tokio::test]
async fn run_without_valid_parameters_issues_no_request() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    let err = client.execute().run(RunRequest::default()).await.unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn run_returns_embedded_error_bodies_as_data() {
    // HTTP 200 with an embedded error is NOT raised: the remote API
    // conflates transport success with operation success and the client
    // preserves that ambiguity for the caller to interpret.
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/trigger/v1/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "command not allowed by policy"
        })))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .execute()
        .run(RunRequest::command_line("myserver: check-disk"))
        .await
        .unwrap();
    assert_eq!(result["success"], json!(false));
    assert_eq!(result["error"], json!("command not allowed by policy"));
}

#[tokio::test]
async fn run_failure_carries_command_and_connection_context() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/trigger/v1/api"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"err": "backend down"})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .execute()
        .run(RunRequest::structured("myserver", "check-disk"))
        .await
        .unwrap_err();
    match err {
        Error::CommandExecution {
            command,
            connection,
            source,
        } => {
            assert_eq!(command.as_deref(), Some("check-disk"));
            assert_eq!(connection.as_deref(), Some("myserver"));
            assert!(source.to_string().contains("backend down"));
        }
        other => panic!("expected command execution error, got {other:?}"),
    }
}
