#![allow(dead_code)]

use std::sync::Arc;

use keystone_client::domains::auth::{SessionService, TOKEN_STORAGE_KEY, TokenStore};
use keystone_client::infra::api_client::ApiClient;
use keystone_client::infra::storage::{KeyValueStore, MemoryStore};
use wiremock::MockServer;

/// Base URL mimicking the `/api` prefix of the real deployment
pub fn api_url(server: &MockServer) -> String {
    format!("{}/api", server.uri())
}

pub fn client_for(base_url: &str, kv: &MemoryStore) -> ApiClient {
    ApiClient::new(base_url, TokenStore::new(Arc::new(kv.clone())))
        .expect("client should build")
}

pub fn service_for(base_url: &str, kv: &MemoryStore) -> SessionService {
    SessionService::new(client_for(base_url, kv))
}

pub fn stored_token(kv: &MemoryStore) -> Option<String> {
    kv.get(TOKEN_STORAGE_KEY)
}

/// An address nothing listens on, for transport failures
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:9/api";
