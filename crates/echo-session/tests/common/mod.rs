//! Shared fixtures for session integration tests.

#![allow(dead_code)]

use echo_http::{ApiClient, RetryPolicy};
use echo_session::{Routes, SessionContext, SessionStore};
use echo_storage::{MemoryStorage, SessionMirror};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::MockServer;

pub struct Harness {
    pub store: SessionStore,
    pub context: Arc<SessionContext>,
    pub storage: MemoryStorage,
    pub redirects: Arc<Mutex<Vec<String>>>,
}

/// Build a store over `storage` talking to `server`.
pub fn harness_with(server: &MockServer, storage: MemoryStorage) -> Harness {
    let context = Arc::new(SessionContext::hydrate(
        SessionMirror::new(Box::new(storage.clone())),
        Routes::default(),
    ));

    let redirects = Arc::new(Mutex::new(Vec::new()));
    let seen = redirects.clone();
    context.set_unauthorized_callback(Box::new(move |route| seen.lock().push(route.to_string())));

    let policy = RetryPolicy {
        timeout: Duration::from_secs(5),
        retry_count: 0,
        retry_delay: Duration::from_millis(10),
    };
    let client = ApiClient::new(&server.uri(), policy, context.clone()).unwrap();

    Harness {
        store: SessionStore::new(client, context.clone()),
        context,
        storage,
        redirects,
    }
}

pub fn harness(server: &MockServer) -> Harness {
    harness_with(server, MemoryStorage::new())
}

pub fn user_json(id: &str, email: &str) -> Value {
    json!({"id": id, "email": email, "created_at": "2024-03-01T12:00:00"})
}

pub fn token_json(token: &str, id: &str, email: &str) -> Value {
    json!({
        "access_token": token,
        "token_type": "bearer",
        "user": user_json(id, email),
    })
}
