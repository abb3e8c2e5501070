use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

mod common;

use common::mocks::{sample_answer, sample_results, MockSearchClient, MockSummarizer};
use research_agent::{
    a2a::protocol::{
        CONTENT_TYPE_NOT_SUPPORTED, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST,
        METHOD_NOT_FOUND, PARSE_ERROR, TASK_NOT_CANCELABLE, TASK_NOT_FOUND, UNSUPPORTED_OPERATION,
    },
    api::routes::{create_router, MAX_BODY_BYTES},
    research::{OrchestratorSettings, ResearchOrchestrator, RetryPolicy},
    types::{ResearchError, ResearchResponse},
    AppState, ResearchConfig,
};

// ============= Test Setup =============

fn settings() -> OrchestratorSettings {
    OrchestratorSettings {
        max_results: 5,
        retry: RetryPolicy::default()
            .with_max_retries(1)
            .with_base_delay(Duration::from_millis(1))
            .with_max_delay(Duration::from_millis(2)),
        overall_budget: None,
    }
}

fn create_test_server_with(search: MockSearchClient, summarizer: MockSummarizer) -> TestServer {
    let orchestrator = Arc::new(ResearchOrchestrator::new(
        Arc::new(search),
        Arc::new(summarizer),
        settings(),
    ));
    let state = AppState::new(ResearchConfig::default(), orchestrator);
    TestServer::new(create_router(state)).expect("Failed to create test server")
}

fn create_test_server() -> TestServer {
    create_test_server_with(
        MockSearchClient::returning(sample_results(3)),
        MockSummarizer::returning(sample_answer()),
    )
}

fn failing_server() -> TestServer {
    create_test_server_with(
        MockSearchClient::failing(ResearchError::ProviderUnavailable("down".into())),
        MockSummarizer::returning(sample_answer()),
    )
}

fn send_request(id: Value, task_id: &str, text: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tasks/send",
        "params": {
            "id": task_id,
            "sessionId": "session-1",
            "message": {"role": "user", "parts": [{"type": "text", "text": text}]},
            "acceptedOutputModes": ["text"]
        }
    })
}

fn rpc(id: i64, method: &str, params: Value) -> Value {
    json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params})
}

async fn call(server: &TestServer, body: &Value) -> Value {
    let response = server.post("/").json(body).await;
    response.assert_status_ok();
    response.json::<Value>()
}

fn error_code(response: &Value) -> i64 {
    response["error"]["code"]
        .as_i64()
        .unwrap_or_else(|| panic!("expected an error response, got {}", response))
}

// ============= Health & Discovery =============

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();

    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_text("OK");
}

#[tokio::test]
async fn test_agent_card() {
    let server = create_test_server();

    let response = server.get("/.well-known/agent.json").await;
    response.assert_status_ok();

    let card: Value = response.json();
    assert_eq!(card["name"], "Research Agent");
    assert_eq!(card["url"], "http://localhost:10011/");
    assert_eq!(card["defaultInputModes"], json!(["text", "text/plain"]));
    assert_eq!(card["defaultOutputModes"], json!(["text", "text/plain"]));
    assert_eq!(card["capabilities"]["streaming"], false);
    assert_eq!(card["skills"][0]["id"], "web_researcher");
}

#[tokio::test]
async fn test_openapi_document() {
    let server = create_test_server();

    let response = server.get("/api-docs/openapi.json").await;
    response.assert_status_ok();

    let doc: Value = response.json();
    assert!(doc["paths"]["/api/research"]["post"].is_object());
    assert!(doc["paths"]["/health"]["get"].is_object());
}

// ============= REST Research =============

#[tokio::test]
async fn test_research_endpoint() {
    let server = create_test_server();

    let response = server
        .post("/api/research")
        .json(&json!({"task_id": "rest-1", "query": "quantum computing"}))
        .await;
    response.assert_status_ok();

    let body: ResearchResponse = response.json();
    assert_eq!(body.task_id, "rest-1");
    assert_eq!(body.status, "completed");
    assert_eq!(body.answer, sample_answer());
}

#[tokio::test]
async fn test_research_endpoint_generates_task_id() {
    let server = create_test_server();

    let response = server
        .post("/api/research")
        .json(&json!({"query": "quantum computing"}))
        .await;
    response.assert_status_ok();

    let body: ResearchResponse = response.json();
    assert!(!body.task_id.is_empty());
}

#[tokio::test]
async fn test_research_endpoint_rejects_blank_query() {
    let server = create_test_server();

    let response = server
        .post("/api/research")
        .json(&json!({"query": "   "}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["kind"], "invalid_query");
}

#[tokio::test]
async fn test_research_endpoint_missing_query_is_bad_request() {
    let server = create_test_server();

    let response = server
        .post("/api/research")
        .json(&json!({"task_id": "rest-2"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["kind"], "invalid_query");
    assert!(body["error"].as_str().unwrap().contains("query"));
}

#[tokio::test]
async fn test_research_endpoint_non_json_is_bad_request() {
    let server = create_test_server();

    let response = server.post("/api/research").text("quantum computing").await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["kind"], "invalid_query");
}

#[tokio::test]
async fn test_research_endpoint_reports_unavailable() {
    let server = failing_server();

    let response = server
        .post("/api/research")
        .json(&json!({"query": "quantum computing"}))
        .await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = response.json();
    assert_eq!(body["kind"], "research_unavailable");
    assert!(body["error"].as_str().unwrap().contains("searching"));
}

// ============= A2A tasks/send =============

#[tokio::test]
async fn test_send_task_completes_with_artifact() {
    let server = create_test_server();

    let response = call(&server, &send_request(json!(1), "task-1", "quantum computing")).await;

    assert_eq!(response["jsonrpc"], "2.0");
    assert_eq!(response["id"], 1);
    assert!(response.get("error").is_none());

    let task = &response["result"];
    assert_eq!(task["id"], "task-1");
    assert_eq!(task["sessionId"], "session-1");
    assert_eq!(task["status"]["state"], "completed");
    assert_eq!(task["history"].as_array().unwrap().len(), 1);

    let artifact = &task["artifacts"][0];
    assert_eq!(artifact["name"], "research");
    assert_eq!(artifact["parts"][0]["type"], "text");
    assert_eq!(
        artifact["parts"][0]["text"],
        "Quantum computers use qubits.\n\nSources:\nhttps://example.com/article-1"
    );
    assert_eq!(
        artifact["metadata"]["answer"]["citations"][0]["url"],
        "https://example.com/article-1"
    );
}

#[tokio::test]
async fn test_send_task_echoes_string_id() {
    let server = create_test_server();

    let response = call(&server, &send_request(json!("req-abc"), "task-s", "topic")).await;

    assert_eq!(response["id"], "req-abc");
    assert_eq!(response["result"]["status"]["state"], "completed");
}

#[tokio::test]
async fn test_send_task_rejects_incompatible_output_modes() {
    let server = create_test_server();
    let mut request = send_request(json!(2), "task-2", "topic");
    request["params"]["acceptedOutputModes"] = json!(["image/png"]);

    let response = call(&server, &request).await;

    assert_eq!(error_code(&response), CONTENT_TYPE_NOT_SUPPORTED);
    assert_eq!(response["id"], 2);
}

#[tokio::test]
async fn test_send_task_rejects_non_text_part() {
    let server = create_test_server();
    let mut request = send_request(json!(3), "task-3", "ignored");
    request["params"]["message"]["parts"] = json!([{"type": "data", "data": {"q": "topic"}}]);

    let response = call(&server, &request).await;

    assert_eq!(error_code(&response), INVALID_PARAMS);
}

#[tokio::test]
async fn test_send_task_blank_query_is_invalid_params() {
    let server = create_test_server();

    let response = call(&server, &send_request(json!(4), "task-4", "  ")).await;

    assert_eq!(error_code(&response), INVALID_PARAMS);
    assert_eq!(response["error"]["data"]["kind"], "invalid_query");
}

#[tokio::test]
async fn test_send_task_failure_is_internal_error_and_recorded() {
    let server = failing_server();

    let response = call(&server, &send_request(json!(5), "task-5", "topic")).await;

    assert_eq!(error_code(&response), INTERNAL_ERROR);
    assert_eq!(response["error"]["data"]["kind"], "research_unavailable");
    assert_eq!(response["error"]["data"]["phase"], "searching");

    let stored = call(&server, &rpc(6, "tasks/get", json!({"id": "task-5"}))).await;
    assert_eq!(stored["result"]["status"]["state"], "failed");
    assert_eq!(stored["result"]["status"]["message"]["role"], "agent");
}

#[tokio::test]
async fn test_send_task_missing_params_is_invalid_params() {
    let server = create_test_server();

    let response = call(&server, &rpc(7, "tasks/send", json!({"id": "task-7"}))).await;

    assert_eq!(error_code(&response), INVALID_PARAMS);
}

// ============= A2A tasks/get & tasks/cancel =============

#[tokio::test]
async fn test_get_task_after_send() {
    let server = create_test_server();
    call(&server, &send_request(json!(1), "task-g", "topic")).await;

    let response = call(&server, &rpc(2, "tasks/get", json!({"id": "task-g"}))).await;
    let task = &response["result"];
    assert_eq!(task["status"]["state"], "completed");
    assert_eq!(task["artifacts"].as_array().unwrap().len(), 1);
    assert!(task["history"].as_array().unwrap().is_empty());

    let response = call(
        &server,
        &rpc(3, "tasks/get", json!({"id": "task-g", "historyLength": 5})),
    )
    .await;
    assert_eq!(response["result"]["history"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_follow_up_send_appends_history() {
    let server = create_test_server();
    call(&server, &send_request(json!(1), "task-h", "first question")).await;
    let response = call(&server, &send_request(json!(2), "task-h", "second question")).await;

    let task = &response["result"];
    let history = task["history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1]["parts"][0]["text"], "second question");
    assert_eq!(task["artifacts"].as_array().unwrap().len(), 2);
    assert_eq!(task["artifacts"][1]["index"], 1);
}

#[tokio::test]
async fn test_concurrent_sends_to_same_task_keep_both_turns() {
    let server = create_test_server_with(
        MockSearchClient::returning(sample_results(2)).with_delay(Duration::from_millis(100)),
        MockSummarizer::returning(sample_answer()),
    );

    let first = send_request(json!(1), "task-r", "first question");
    let second = send_request(json!(2), "task-r", "second question");
    let (a, b) = tokio::join!(call(&server, &first), call(&server, &second));
    assert_eq!(a["result"]["status"]["state"], "completed");
    assert_eq!(b["result"]["status"]["state"], "completed");

    let stored = call(
        &server,
        &rpc(3, "tasks/get", json!({"id": "task-r", "historyLength": 10})),
    )
    .await;
    let task = &stored["result"];
    assert_eq!(task["history"].as_array().unwrap().len(), 2);

    let mut indexes: Vec<i64> = task["artifacts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|artifact| artifact["index"].as_i64().unwrap())
        .collect();
    indexes.sort();
    assert_eq!(indexes, vec![0, 1]);
}

#[tokio::test]
async fn test_get_unknown_task() {
    let server = create_test_server();

    let response = call(&server, &rpc(1, "tasks/get", json!({"id": "missing"}))).await;

    assert_eq!(error_code(&response), TASK_NOT_FOUND);
}

#[tokio::test]
async fn test_cancel_task() {
    let server = create_test_server();
    call(&server, &send_request(json!(1), "task-c", "topic")).await;

    let known = call(&server, &rpc(2, "tasks/cancel", json!({"id": "task-c"}))).await;
    assert_eq!(error_code(&known), TASK_NOT_CANCELABLE);

    let unknown = call(&server, &rpc(3, "tasks/cancel", json!({"id": "nope"}))).await;
    assert_eq!(error_code(&unknown), TASK_NOT_FOUND);
}

// ============= JSON-RPC envelope =============

#[tokio::test]
async fn test_malformed_json_is_parse_error() {
    let server = create_test_server();

    let response = server.post("/").text("{not json").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(error_code(&body), PARSE_ERROR);
    assert!(body["id"].is_null());
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let server = create_test_server();

    let response = server
        .post("/")
        .bytes(vec![b' '; MAX_BODY_BYTES + 1].into())
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_wrong_version_is_invalid_request() {
    let server = create_test_server();
    let request = json!({"jsonrpc": "1.0", "id": 9, "method": "tasks/get", "params": {"id": "x"}});

    let response = call(&server, &request).await;

    assert_eq!(error_code(&response), INVALID_REQUEST);
    assert_eq!(response["id"], 9);
}

#[tokio::test]
async fn test_missing_method_is_invalid_request() {
    let server = create_test_server();

    let response = call(&server, &json!({"jsonrpc": "2.0", "id": 10})).await;

    assert_eq!(error_code(&response), INVALID_REQUEST);
}

#[tokio::test]
async fn test_unknown_method() {
    let server = create_test_server();

    let response = call(&server, &rpc(11, "tasks/explode", json!({}))).await;

    assert_eq!(error_code(&response), METHOD_NOT_FOUND);
}

#[tokio::test]
async fn test_streaming_methods_unsupported() {
    let server = create_test_server();

    for method in [
        "tasks/sendSubscribe",
        "tasks/resubscribe",
        "tasks/pushNotification/set",
        "tasks/pushNotification/get",
    ] {
        let response = call(&server, &rpc(12, method, json!({"id": "task"}))).await;
        assert_eq!(error_code(&response), UNSUPPORTED_OPERATION, "{}", method);
    }
}
