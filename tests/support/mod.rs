#![allow(dead_code)]

use chrono::{Duration, Utc};
use member_rs_client::{AccessToken, ApiClient, ClientConfig, Navigator, TokenProvider, TokenStore};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use wiremock::MockServer;

pub const TEST_TOKEN: &str = "test-token";

/// Client pointed at `server` with an unexpired token already stored
pub fn client_with_token(server: &MockServer) -> (ApiClient, TokenStore) {
    let store = TokenStore::in_memory();
    store.set(&AccessToken::new(TEST_TOKEN, Utc::now() + Duration::hours(1)));
    let client = ApiClient::new(ClientConfig::new(server.uri()), Arc::new(store.clone())).unwrap();
    (client, store)
}

pub fn client_without_token(server: &MockServer) -> (ApiClient, TokenStore) {
    let store = TokenStore::in_memory();
    let client = ApiClient::new(ClientConfig::new(server.uri()), Arc::new(store.clone())).unwrap();
    (client, store)
}

pub fn breadcrumb() -> Value {
    json!({
        "from_ip": "127.0.0.1",
        "by_user": "user1",
        "at_time": "2024-01-01T00:00:00Z",
        "correlation_id": "corr-123"
    })
}

pub fn control_record(id: &str, name: &str) -> Value {
    json!({
        "_id": id,
        "name": name,
        "description": "Test description",
        "status": "active",
        "created": breadcrumb(),
        "saved": breadcrumb()
    })
}

pub fn page(items: Vec<Value>, limit: u32, next_cursor: Option<&str>) -> Value {
    json!({
        "items": items,
        "limit": limit,
        "has_more": next_cursor.is_some(),
        "next_cursor": next_cursor
    })
}

/// Navigator that records every navigation instead of performing it
pub struct RecordingNavigator {
    path: String,
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn at(path: &str) -> Arc<Self> {
        Arc::new(Self {
            path: path.to_string(),
            visits: Mutex::new(Vec::new()),
        })
    }

    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        self.path.clone()
    }

    fn navigate(&self, url: &str) {
        self.visits.lock().unwrap().push(url.to_string());
    }
}
