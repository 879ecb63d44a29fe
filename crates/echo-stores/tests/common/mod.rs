//! Shared fixtures for store integration tests.

#![allow(dead_code)]

use echo_http::{ApiClient, RetryPolicy};
use echo_session::{Routes, SessionContext};
use echo_storage::{ClientStorage, MemoryStorage, SessionMirror, StorageKeys};
use echo_stores::{EchoWallStore, TimeCapsuleStore};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::MockServer;

pub struct Harness {
    pub capsules: TimeCapsuleStore,
    pub echoes: EchoWallStore,
    pub context: Arc<SessionContext>,
    pub storage: MemoryStorage,
}

/// Stores wired to `server` with a signed-in session holding credential `t1`.
pub fn signed_in(server: &MockServer) -> Harness {
    let storage = MemoryStorage::new();
    storage.set(StorageKeys::ACCESS_TOKEN, "t1").unwrap();
    storage
        .set(
            StorageKeys::USER,
            &json!({"id": "u1", "email": "a@x.com", "created_at": "2024-01-01T00:00:00"})
                .to_string(),
        )
        .unwrap();

    let context = Arc::new(SessionContext::hydrate(
        SessionMirror::new(Box::new(storage.clone())),
        Routes::default(),
    ));
    let policy = RetryPolicy {
        timeout: Duration::from_secs(5),
        retry_count: 0,
        retry_delay: Duration::from_millis(10),
    };
    let client = ApiClient::new(&server.uri(), policy, context.clone()).unwrap();

    Harness {
        capsules: TimeCapsuleStore::new(client.clone()),
        echoes: EchoWallStore::new(client),
        context,
        storage,
    }
}

pub fn capsule_json(id: &str, title: &str, status: &str) -> Value {
    json!({
        "id": id,
        "user_id": "u1",
        "title": title,
        "content": "C",
        "unlock_date": null,
        "unlock_condition": null,
        "status": status,
        "is_public": status == "public",
        "created_at": "2024-01-01T00:00:00",
        "updated_at": "2024-01-01T00:00:00"
    })
}

pub fn echo_json(id: &str, is_matched: bool) -> Value {
    json!({
        "id": id,
        "user_id": "u1",
        "content": "hello",
        "emotion_tag": "happy",
        "is_matched": is_matched,
        "created_at": "2024-01-01T00:00:00"
    })
}

pub fn match_json(id: &str, echo_id: &str, matched_echo_id: &str) -> Value {
    json!({
        "id": id,
        "echo_id": echo_id,
        "matched_echo_id": matched_echo_id,
        "matched_at": "2024-01-02T00:00:00",
        "echo": echo_json(echo_id, true),
        "matched_echo": echo_json(matched_echo_id, true)
    })
}
