//! Shared test utilities for access-layer integration tests.

#![allow(dead_code)]

use echo_http::{ApiClient, RetryPolicy, SessionAccessor};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wiremock::MockServer;

/// Session stand-in that records 401 notifications.
#[derive(Default)]
pub struct FakeSession {
    token: Mutex<Option<String>>,
    unauthorized: AtomicUsize,
}

impl FakeSession {
    pub fn with_token(token: &str) -> Arc<Self> {
        Arc::new(Self {
            token: Mutex::new(Some(token.to_string())),
            unauthorized: AtomicUsize::new(0),
        })
    }

    pub fn anonymous() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn unauthorized_calls(&self) -> usize {
        self.unauthorized.load(Ordering::SeqCst)
    }

    pub fn token(&self) -> Option<String> {
        self.token.lock().clone()
    }
}

impl SessionAccessor for FakeSession {
    fn credential(&self) -> Option<String> {
        self.token.lock().clone()
    }

    fn on_unauthorized(&self) {
        *self.token.lock() = None;
        self.unauthorized.fetch_add(1, Ordering::SeqCst);
    }
}

/// Policy with short delays so retry tests stay fast.
pub fn fast_policy(retry_count: u32) -> RetryPolicy {
    RetryPolicy {
        timeout: Duration::from_secs(5),
        retry_count,
        retry_delay: Duration::from_millis(10),
    }
}

pub fn client_for(server: &MockServer, session: Arc<FakeSession>, retry_count: u32) -> ApiClient {
    ApiClient::new(&server.uri(), fast_policy(retry_count), session).unwrap()
}
