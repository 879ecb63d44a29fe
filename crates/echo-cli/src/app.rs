//! Composition root: storage, session, access layer and stores.

use anyhow::{Context, Result};
use echo_config::{Config, Paths};
use echo_http::ApiClient;
use echo_session::{Routes, SessionContext, SessionStore};
use echo_storage::create_session_mirror;
use echo_stores::{EchoWallStore, TimeCapsuleStore};
use std::sync::Arc;
use tracing::debug;

pub struct App {
    pub context: Arc<SessionContext>,
    pub session: SessionStore,
    pub capsules: TimeCapsuleStore,
    pub echoes: EchoWallStore,
}

impl App {
    pub fn build(config: &Config, paths: &Paths) -> Result<Self> {
        paths.ensure_dirs()?;

        let storage_file = paths.storage_file();
        let mirror = create_session_mirror(&storage_file)
            .with_context(|| format!("Failed to open session storage at {}", storage_file.display()))?;

        let context = Arc::new(SessionContext::hydrate(mirror, Routes::from(config)));
        context.set_unauthorized_callback(Box::new(|route| {
            eprintln!("Session expired. Sign in again (redirect: {route}).");
        }));
        context.set_state_callback(Box::new(|payload| {
            debug!(phase = ?payload.phase, user_id = ?payload.user_id, "Session phase changed");
        }));

        let client = ApiClient::from_config(config, context.clone())
            .context("Invalid API base URL")?;
        debug!(base_url = %client.base_url(), "API client ready");

        Ok(Self {
            session: SessionStore::new(client.clone(), context.clone()),
            capsules: TimeCapsuleStore::new(client.clone()),
            echoes: EchoWallStore::new(client),
            context,
        })
    }
}
