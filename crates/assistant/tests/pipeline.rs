//! End-to-end pipeline tests against mock backend and completion servers.

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{any, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use shopmate_assistant::completion::{APOLOGY_REPLY, MISSING_CREDENTIAL_REPLY, CompletionClient};
use shopmate_assistant::gateway::BackendClient;
use shopmate_assistant::{Assistant, BackendConfig, CompletionConfig, UserContext};
use shopmate_core::UserId;

fn backend_client(server: &MockServer) -> BackendClient {
    BackendClient::new(&BackendConfig {
        base_url: server.uri(),
    })
    .expect("backend client")
}

fn completion_client(server: &MockServer) -> CompletionClient {
    CompletionClient::new(Some(&CompletionConfig {
        api_key: SecretString::from("sk-test-1"),
        api_url: format!("{}/v1/chat/completions", server.uri()),
        model: "gpt-4o-mini".to_string(),
    }))
}

fn completion_reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [
            { "message": { "role": "assistant", "content": text } }
        ]
    }))
}

fn widget_brief() -> serde_json::Value {
    json!({
        "_id": "P1",
        "name": "WidgetX",
        "price": 49.99,
        "description": "Search listing blurb.",
        "quantity": 3,
        "shipping": true
    })
}

fn widget_detail() -> serde_json::Value {
    json!({
        "_id": "P1",
        "name": "WidgetX",
        "price": 49.99,
        "description": "Full widget detail record.",
        "category": { "_id": "c1", "name": "Widgets" },
        "quantity": 3,
        "shipping": true
    })
}

/// Extract the user-turn prompt from a captured completion request.
fn user_prompt(request: &Request) -> String {
    let body: serde_json::Value = serde_json::from_slice(&request.body).expect("json body");
    body["messages"][1]["content"]
        .as_str()
        .expect("user content")
        .to_string()
}

async fn captured_prompt(completion_server: &MockServer) -> String {
    let requests = completion_server
        .received_requests()
        .await
        .expect("request recording enabled");
    assert_eq!(requests.len(), 1, "expected exactly one completion call");
    user_prompt(requests.first().expect("one request"))
}

#[tokio::test]
async fn missing_credential_answers_without_any_network_call() {
    let backend = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backend)
        .await;

    let assistant = Assistant::new(backend_client(&backend), CompletionClient::new(None));

    let reply = assistant
        .ask_about_products("Tell me about WidgetX", None)
        .await;
    assert_eq!(reply, MISSING_CREDENTIAL_REPLY);
}

#[tokio::test]
async fn specific_product_query_prompts_with_single_detail_record() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/search"))
        .and(query_param("search", "WidgetX"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([widget_brief()])))
        .expect(1)
        .mount(&backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/product/P1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(widget_detail()))
        .expect(1)
        .mount(&backend)
        .await;

    let completion = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(completion_reply("WidgetX is a sturdy widget."))
        .expect(1)
        .mount(&completion)
        .await;

    let assistant = Assistant::new(backend_client(&backend), completion_client(&completion));
    let reply = assistant
        .ask_about_products("Tell me about WidgetX", None)
        .await;
    assert_eq!(reply, "WidgetX is a sturdy widget.");

    let prompt = captured_prompt(&completion).await;
    // The detail record, not the search listing, reaches the prompt.
    assert!(prompt.contains("Full widget detail record."));
    assert!(!prompt.contains("Search listing blurb."));
}

#[tokio::test]
async fn failed_detail_fetch_falls_back_to_search_results() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([widget_brief()])))
        .mount(&backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/product/P1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&backend)
        .await;

    let completion = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion_reply("ok"))
        .mount(&completion)
        .await;

    let assistant = Assistant::new(backend_client(&backend), completion_client(&completion));
    assistant
        .ask_about_products("Tell me about WidgetX", None)
        .await;

    let prompt = captured_prompt(&completion).await;
    assert!(prompt.contains("Search listing blurb."));
}

#[tokio::test]
async fn empty_search_falls_back_to_full_listing() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([widget_brief()])))
        .expect(1)
        .mount(&backend)
        .await;

    let completion = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion_reply("ok"))
        .mount(&completion)
        .await;

    let assistant = Assistant::new(backend_client(&backend), completion_client(&completion));
    assistant
        .ask_about_products("Tell me about a product you do not sell", None)
        .await;

    let prompt = captured_prompt(&completion).await;
    assert!(prompt.contains("WidgetX"));
}

#[tokio::test]
async fn anonymous_general_query_omits_order_block() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([widget_brief()])))
        .mount(&backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/orders/by/user/u-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&backend)
        .await;

    let completion = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion_reply("we sell widgets"))
        .mount(&completion)
        .await;

    let assistant = Assistant::new(backend_client(&backend), completion_client(&completion));
    let reply = assistant
        .ask_about_products("What products do you have?", None)
        .await;
    assert_eq!(reply, "we sell widgets");

    let prompt = captured_prompt(&completion).await;
    assert!(!prompt.contains("Here is the user's order history:"));
}

#[tokio::test]
async fn authenticated_query_fetches_orders_with_bearer_credential() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([widget_brief()])))
        .mount(&backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/orders/by/user/u-1"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "_id": "o-1",
            "createdAt": "2026-01-15T10:30:00.000Z",
            "status": "Shipped",
            "amount": 104.48,
            "products": [ { "name": "WidgetX", "price": 49.99, "count": 2 } ]
        }])))
        .expect(1)
        .mount(&backend)
        .await;

    let completion = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion_reply("your order shipped"))
        .mount(&completion)
        .await;

    let user = UserContext {
        id: UserId::new("u-1"),
        token: SecretString::from("tok-123"),
    };
    let assistant = Assistant::new(backend_client(&backend), completion_client(&completion));
    let reply = assistant
        .ask_about_products("What products do you have?", Some(&user))
        .await;
    assert_eq!(reply, "your order shipped");

    let prompt = captured_prompt(&completion).await;
    assert!(prompt.contains("Here is the user's order history:"));
    assert!(prompt.contains("\"status\": \"Shipped\""));
}

#[tokio::test]
async fn completion_http_error_degrades_to_apology() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&backend)
        .await;

    let completion = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&completion)
        .await;

    let assistant = Assistant::new(backend_client(&backend), completion_client(&completion));
    let reply = assistant.ask_about_products("anything", None).await;
    assert_eq!(reply, APOLOGY_REPLY);
}

#[tokio::test]
async fn completion_transport_error_degrades_to_apology() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&backend)
        .await;

    // Nothing listens on the completion address.
    let unreachable = CompletionClient::new(Some(&CompletionConfig {
        api_key: SecretString::from("sk-test-1"),
        api_url: "http://127.0.0.1:9/v1/chat/completions".to_string(),
        model: "gpt-4o-mini".to_string(),
    }));

    let assistant = Assistant::new(backend_client(&backend), unreachable);
    let reply = assistant.ask_about_products("anything", None).await;
    assert_eq!(reply, APOLOGY_REPLY);
}

#[tokio::test]
async fn backend_outage_still_produces_an_answer() {
    let backend = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .mount(&backend)
        .await;

    let completion = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion_reply("sorry, catalog is thin today"))
        .mount(&completion)
        .await;

    let assistant = Assistant::new(backend_client(&backend), completion_client(&completion));
    let reply = assistant
        .ask_about_products("What products do you have?", None)
        .await;
    assert_eq!(reply, "sorry, catalog is thin today");

    // The gateway degraded to an empty listing rather than aborting.
    let prompt = captured_prompt(&completion).await;
    assert!(prompt.contains("[]"));
}
