//! Session store: the auth flows against the Echo backend.
//!
//! Every flow that obtains or validates a credential self-heals: when it
//! fails, the session is torn down with [`SessionStore::logout`] before the
//! error is returned.

use crate::context::SessionContext;
use crate::SessionResult;
use echo_http::{ApiClient, ApiRequest};
use echo_types::{AuthToken, Identity, MessageResponse};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct ChangePasswordRequest<'a> {
    old_password: &'a str,
    new_password: &'a str,
}

/// Auth flows over a shared [`SessionContext`].
#[derive(Clone)]
pub struct SessionStore {
    client: ApiClient,
    context: Arc<SessionContext>,
}

impl SessionStore {
    /// Create a new session store.
    ///
    /// `client` should have been built with `context` as its session accessor
    /// so that the bearer credential and 401 handling line up.
    pub fn new(client: ApiClient, context: Arc<SessionContext>) -> Self {
        Self { client, context }
    }

    pub fn context(&self) -> &Arc<SessionContext> {
        &self.context
    }

    /// Login with email and password.
    ///
    /// Sends a form-encoded `username`/`password` pair to `/auth/login`.
    pub async fn login(&self, email: &str, password: &str) -> SessionResult<Identity> {
        debug!(email = %email, "Attempting login");
        self.context.begin_auth()?;

        let request = ApiRequest::post("/auth/login")
            .form([("username", email), ("password", password)]);
        match self.authenticate(request).await {
            Ok(identity) => {
                info!(user_id = %identity.id, "Login successful");
                Ok(identity)
            }
            Err(e) => {
                warn!(error = %e, "Login failed");
                self.logout().await;
                Err(e)
            }
        }
    }

    /// Create an account and sign in with it.
    pub async fn register(&self, email: &str, password: &str) -> SessionResult<Identity> {
        debug!(email = %email, "Attempting registration");
        self.context.begin_auth()?;

        let request = ApiRequest::post("/auth/register").json(&RegisterRequest { email, password });
        let outcome = match request {
            Ok(request) => self.authenticate(request).await,
            Err(e) => Err(e.into()),
        };
        match outcome {
            Ok(identity) => {
                info!(user_id = %identity.id, "Registration successful");
                Ok(identity)
            }
            Err(e) => {
                warn!(error = %e, "Registration failed");
                self.logout().await;
                Err(e)
            }
        }
    }

    /// Exchange the current credential for a fresh one.
    pub async fn refresh_session(&self) -> SessionResult<Identity> {
        self.context.begin_auth()?;

        match self.authenticate(ApiRequest::post("/auth/refresh")).await {
            Ok(identity) => {
                info!(user_id = %identity.id, "Session refreshed");
                Ok(identity)
            }
            Err(e) => {
                warn!(error = %e, "Session refresh failed");
                self.logout().await;
                Err(e)
            }
        }
    }

    async fn authenticate(&self, request: ApiRequest) -> SessionResult<Identity> {
        let token: AuthToken = self.client.send(request).await?;
        self.context.establish(&token)?;
        Ok(token.user)
    }

    /// Logout.
    ///
    /// The backend call is best effort and skipped when no credential is
    /// held; local and durable state are cleared regardless. Never fails.
    pub async fn logout(&self) {
        if !self.context.is_authenticated() {
            debug!("No credential held, skipping backend logout");
        } else if let Err(e) = self
            .client
            .send::<serde_json::Value>(ApiRequest::post("/auth/logout"))
            .await
        {
            debug!(error = %e, "Backend logout failed, clearing local session anyway");
        }

        self.context.clear();
        info!("Logged out");
    }

    /// Reload the identity from `/auth/me`.
    pub async fn fetch_current_user(&self) -> SessionResult<Identity> {
        let result: SessionResult<Identity> = async {
            let identity: Identity = self.client.send(ApiRequest::get("/auth/me")).await?;
            self.context.replace_identity(&identity)?;
            Ok(identity)
        }
        .await;

        if let Err(e) = &result {
            warn!(error = %e, "Fetching current user failed");
            self.logout().await;
        }
        result
    }

    /// Change the account password. The cached credential is left as is.
    pub async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> SessionResult<MessageResponse> {
        let request = ApiRequest::post("/auth/change-password").json(&ChangePasswordRequest {
            old_password,
            new_password,
        })?;
        Ok(self.client.send(request).await?)
    }

    /// Ask the backend to send a password reset message to `email`.
    pub async fn request_password_reset(&self, email: &str) -> SessionResult<MessageResponse> {
        let request = ApiRequest::post("/auth/forgot-password").query("email", email);
        Ok(self.client.send(request).await?)
    }
}
