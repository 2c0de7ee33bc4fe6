mod common;

use common::{UNREACHABLE_URL, api_url, service_for, stored_token};
use keystone_client::domains::auth::SessionApi;
use keystone_client::infra::storage::{KeyValueStore, MemoryStore};
use keystone_client::infra::testing::fixtures::user_json;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn login_persists_server_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"email": "a@b.com", "password": "pw"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"user": user_json("1"), "token": "t1"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let kv = MemoryStore::new();
    let service = service_for(&api_url(&server), &kv);

    let response = service.login("a@b.com", "pw").await.unwrap();

    assert_eq!(response.user.id, "1");
    assert_eq!(response.token, "t1");
    assert_eq!(stored_token(&kv).as_deref(), Some("t1"));
    assert!(service.has_token());
}

#[tokio::test]
async fn rejected_login_leaves_no_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"message": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    let kv = MemoryStore::new();
    let service = service_for(&api_url(&server), &kv);

    let err = service.login("a@b.com", "wrong").await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(err.to_string(), "Invalid credentials");
    assert_eq!(stored_token(&kv), None);
}

#[tokio::test]
async fn rejected_login_keeps_previous_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({})))
        .mount(&server)
        .await;

    let kv = MemoryStore::with_entries([("auth_token", "old")]);
    let service = service_for(&api_url(&server), &kv);

    assert!(service.login("a@b.com", "wrong").await.is_err());
    assert_eq!(stored_token(&kv).as_deref(), Some("old"));
}

#[tokio::test]
async fn register_sends_name_and_persists_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .and(body_json(
            json!({"email": "a@b.com", "password": "pw", "name": "A"}),
        ))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"user": user_json("7"), "token": "t7"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let kv = MemoryStore::new();
    let service = service_for(&api_url(&server), &kv);

    let response = service.register("a@b.com", "pw", "A").await.unwrap();

    assert_eq!(response.user.id, "7");
    assert_eq!(stored_token(&kv).as_deref(), Some("t7"));
}

#[tokio::test]
async fn duplicate_registration_surfaces_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(json!({"message": "Email already registered"})),
        )
        .mount(&server)
        .await;

    let kv = MemoryStore::new();
    let service = service_for(&api_url(&server), &kv);

    let err = service.register("a@b.com", "pw", "A").await.unwrap_err();
    assert_eq!(err.status(), Some(409));
    assert_eq!(err.to_string(), "Email already registered");
    assert!(kv.is_empty());
}

#[tokio::test]
async fn logout_clears_token_after_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .and(header("authorization", "Bearer t1"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let kv = MemoryStore::with_entries([("auth_token", "t1")]);
    let service = service_for(&api_url(&server), &kv);

    service.logout().await.unwrap();
    assert_eq!(stored_token(&kv), None);
}

#[tokio::test]
async fn logout_clears_token_after_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let kv = MemoryStore::with_entries([("auth_token", "t1")]);
    let service = service_for(&api_url(&server), &kv);

    service.logout().await.unwrap();
    assert_eq!(stored_token(&kv), None);
}

#[tokio::test]
async fn logout_clears_token_when_server_unreachable() {
    let kv = MemoryStore::with_entries([("auth_token", "t1")]);
    let service = service_for(UNREACHABLE_URL, &kv);

    service.logout().await.unwrap();
    assert_eq!(stored_token(&kv), None);
    assert!(!service.has_token());
}

#[tokio::test]
async fn current_user_uses_persisted_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("1")))
        .expect(1)
        .mount(&server)
        .await;

    let kv = MemoryStore::with_entries([("auth_token", "abc")]);
    let service = service_for(&api_url(&server), &kv);

    let user = service.current_user().await.unwrap();
    assert_eq!(user.id, "1");
    assert_eq!(user.email, "a@b.com");
}

#[tokio::test]
async fn current_user_rejection_is_surfaced_without_side_effects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid token"})),
        )
        .mount(&server)
        .await;

    let kv = MemoryStore::with_entries([("auth_token", "stale")]);
    let service = service_for(&api_url(&server), &kv);

    let err = service.current_user().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.to_string(), "Invalid token");
    // Dropping the token is the controller's call
    assert_eq!(stored_token(&kv).as_deref(), Some("stale"));

    service.forget_token().unwrap();
    assert_eq!(kv.get("auth_token"), None);
}
