// HTTP client behaviour against a local mock server:
// - bearer header only when a token is persisted
// - JSON and non-JSON error classification
// - raw text passthrough on success
// - cookie jar use follows `with_credentials`

mod common;

use common::{UNREACHABLE_URL, api_url, client_for};
use keystone_client::infra::api_client::{HttpMethod, RequestOptions};
use keystone_client::infra::errors::{ApiError, RawBody};
use keystone_client::infra::storage::{KeyValueStore, MemoryStore};
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn attaches_bearer_token_when_persisted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ping"))
        .and(header("authorization", "Bearer abc"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let kv = MemoryStore::new();
    kv.set("auth_token", "abc").unwrap();
    let client = client_for(&api_url(&server), &kv);

    let body: Value = client.get("/ping").await.unwrap();
    assert_eq!(body, json!({"ok": true}));
}

#[tokio::test]
async fn omits_authorization_without_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = client_for(&api_url(&server), &MemoryStore::new());
    let _: Value = client.get("ping").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn token_written_later_is_picked_up() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let kv = MemoryStore::new();
    let client = client_for(&api_url(&server), &kv);
    let _: Value = client.get("/ping").await.unwrap();
    kv.set("auth_token", "late").unwrap();
    let _: Value = client.get("/ping").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
    assert_eq!(
        requests[1].headers.get("authorization").unwrap(),
        "Bearer late"
    );
}

#[tokio::test]
async fn json_error_uses_message_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"message": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&api_url(&server), &MemoryStore::new());
    let err = client
        .post::<Value, _>("/auth/login", &json!({"email": "a@b.com"}))
        .await
        .unwrap_err();

    let http = err.as_http().expect("http error");
    assert_eq!(http.status, 401);
    assert_eq!(http.message, "Invalid credentials");
    assert_eq!(
        http.raw_body,
        RawBody::Json(json!({"message": "Invalid credentials"}))
    );
    assert_eq!(err.to_string(), "Invalid credentials");
}

#[tokio::test]
async fn json_error_without_message_gets_generic_text() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/items/1"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"errors": {"id": ["bad"]}})),
        )
        .mount(&server)
        .await;

    let client = client_for(&api_url(&server), &MemoryStore::new());
    let err = client.delete::<Value>("/items/1").await.unwrap_err();

    assert_eq!(err.status(), Some(422));
    assert_eq!(err.to_string(), "An error occurred");
}

#[tokio::test]
async fn non_json_error_keeps_text_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ping"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let client = client_for(&api_url(&server), &MemoryStore::new());
    let err = client.get::<Value>("/ping").await.unwrap_err();

    let http = err.as_http().expect("http error");
    assert_eq!(http.status, 502);
    assert_eq!(http.message, "An error occurred");
    assert_eq!(http.raw_body.as_text(), Some("Bad Gateway"));
}

#[tokio::test]
async fn non_json_success_returns_raw_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(&server)
        .await;

    let client = client_for(&api_url(&server), &MemoryStore::new());
    let text: String = client.get("/health").await.unwrap();
    assert_eq!(text, "OK");
}

#[tokio::test]
async fn empty_text_success_returns_empty_string() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ping"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("content-type", "text/plain"),
        )
        .mount(&server)
        .await;

    let client = client_for(&api_url(&server), &MemoryStore::new());
    let text: String = client.get("/ping").await.unwrap();
    assert_eq!(text, "");
}

#[tokio::test]
async fn cookies_are_sent_only_with_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/session"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "sid=1; Path=/")
                .set_body_string("set"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/check"))
        .and(header("cookie", "sid=1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("with-cookie"))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/check"))
        .respond_with(ResponseTemplate::new(200).set_body_string("no-cookie"))
        .mount(&server)
        .await;

    let client = client_for(&api_url(&server), &MemoryStore::new());
    let _: String = client.get("/session").await.unwrap();

    let with: String = client.get("/check").await.unwrap();
    assert_eq!(with, "with-cookie");

    let options = RequestOptions::new(HttpMethod::Get).with_credentials(false);
    let without: String = client.request("/check", options).await.unwrap();
    assert_eq!(without, "no-cookie");
}

#[tokio::test]
async fn convenience_verbs_send_json_bodies() {
    let server = MockServer::start().await;
    for verb in ["PUT", "PATCH"] {
        Mock::given(method(verb))
            .and(path("/api/profile"))
            .and(body_json(json!({"name": "A"})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = client_for(&api_url(&server), &MemoryStore::new());
    let body = json!({"name": "A"});
    client.put::<(), _>("/profile", &body).await.unwrap();
    client.patch::<(), _>("/profile", &body).await.unwrap();
}

#[tokio::test]
async fn custom_headers_are_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ping"))
        .and(header("x-request-id", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(1)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&api_url(&server), &MemoryStore::new());
    let options = RequestOptions::new(HttpMethod::Get)
        .header("X-Request-Id", "42")
        .with_credentials(false);
    let value: u32 = client.request("/ping", options).await.unwrap();
    assert_eq!(value, 1);
}

#[tokio::test]
async fn unexpected_success_shape_is_an_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .mount(&server)
        .await;

    let client = client_for(&api_url(&server), &MemoryStore::new());
    let err = client
        .get::<keystone_model::User>("/auth/me")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(200));
    assert_eq!(
        err.as_http().map(|e| e.raw_body.clone()),
        Some(RawBody::Json(json!({"id": 1})))
    );
}

#[tokio::test]
async fn transport_failure_is_a_network_error() {
    let client = client_for(UNREACHABLE_URL, &MemoryStore::new());
    let err = client.get::<Value>("/ping").await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)), "got {err:?}");
    assert_eq!(err.status(), None);
}
