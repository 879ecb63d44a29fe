//! In-memory session state mirrored to durable storage.
//!
//! [`SessionContext`] is the single owner of the identity and credential.
//! It is shared (behind an `Arc`) by the [`SessionStore`](crate::SessionStore)
//! and by the access layer, which reaches it through [`SessionAccessor`].

use crate::auth_fsm::{
    SessionMachine, SessionMachineInput, SessionPhase, SessionStateChangedPayload,
};
use crate::guard::{check_route, GuardDecision, RouteAccess, Routes};
use crate::{SessionError, SessionResult};
use echo_http::SessionAccessor;
use echo_storage::SessionMirror;
use echo_types::{AuthToken, Identity};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

/// Callback type for phase change notifications.
pub type SessionStateCallback = Box<dyn Fn(SessionStateChangedPayload) + Send + Sync>;

/// Callback type for the redirect signalled when a call ends in 401.
/// Receives the login route.
pub type UnauthorizedCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Point-in-time view of the session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    pub identity: Option<Identity>,
    pub credential: Option<String>,
    pub is_authenticated: bool,
}

#[derive(Debug, Default)]
struct SessionState {
    identity: Option<Identity>,
    credential: Option<String>,
}

/// Owner of the session.
///
/// Memory and durable storage are updated in the same critical section, so
/// observers never see one without the other.
pub struct SessionContext {
    mirror: SessionMirror,
    state: Mutex<SessionState>,
    fsm: Mutex<SessionMachine>,
    routes: Routes,
    state_callback: Mutex<Option<SessionStateCallback>>,
    unauthorized_callback: Mutex<Option<UnauthorizedCallback>>,
}

impl SessionContext {
    /// Build a context from whatever durable storage holds.
    ///
    /// The credential is trusted as-is until the next protected call. An
    /// identity snapshot that no longer parses hydrates as `None`.
    pub fn hydrate(mirror: SessionMirror, routes: Routes) -> Self {
        let credential = match mirror.get_access_token() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Failed to read stored credential");
                None
            }
        };
        let identity = match mirror.get_user() {
            Ok(identity) => identity,
            Err(e) => {
                warn!(error = %e, "Stored identity snapshot is unreadable, ignoring it");
                None
            }
        };

        let mut fsm = SessionMachine::new();
        if credential.is_some() {
            if let Err(e) = fsm.consume(&SessionMachineInput::Hydrated) {
                warn!(error = ?e, "Could not mark hydrated session as authenticated");
            }
            info!(
                user_id = identity.as_ref().map(|i| i.id.as_str()).unwrap_or("unknown"),
                "Session hydrated from storage"
            );
        } else {
            debug!("No stored session");
        }

        Self {
            mirror,
            state: Mutex::new(SessionState {
                identity,
                credential,
            }),
            fsm: Mutex::new(fsm),
            routes,
            state_callback: Mutex::new(None),
            unauthorized_callback: Mutex::new(None),
        }
    }

    /// Set a callback to be notified of phase changes.
    pub fn set_state_callback(&self, callback: SessionStateCallback) {
        *self.state_callback.lock() = Some(callback);
    }

    /// Set the callback that performs navigation after a 401.
    pub fn set_unauthorized_callback(&self, callback: UnauthorizedCallback) {
        *self.unauthorized_callback.lock() = Some(callback);
    }

    pub fn snapshot(&self) -> Session {
        let state = self.state.lock();
        Session {
            identity: state.identity.clone(),
            credential: state.credential.clone(),
            is_authenticated: state.credential.is_some(),
        }
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state.lock().identity.clone()
    }

    /// Computed from credential presence, never stored.
    pub fn is_authenticated(&self) -> bool {
        self.state.lock().credential.is_some()
    }

    pub fn phase(&self) -> SessionPhase {
        SessionPhase::from(self.fsm.lock().state())
    }

    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    /// Guard decision for navigating to a route with `access`.
    pub fn check_route(&self, access: RouteAccess) -> GuardDecision {
        check_route(access, self.is_authenticated(), &self.routes)
    }

    /// Mark an auth call as in flight.
    pub(crate) fn begin_auth(&self) -> SessionResult<()> {
        self.transition(&SessionMachineInput::AuthRequested)
    }

    /// Install a freshly issued credential and identity.
    pub(crate) fn establish(&self, token: &AuthToken) -> SessionResult<()> {
        {
            let mut state = self.state.lock();
            self.mirror.set_session(&token.access_token, &token.user)?;
            state.credential = Some(token.access_token.clone());
            state.identity = Some(token.user.clone());
        }
        self.transition(&SessionMachineInput::AuthSucceeded)
    }

    /// Replace the identity snapshot, keeping the credential.
    pub(crate) fn replace_identity(&self, identity: &Identity) -> SessionResult<()> {
        let mut state = self.state.lock();
        self.mirror.set_user(identity)?;
        state.identity = Some(identity.clone());
        Ok(())
    }

    /// Drop identity and credential from memory and durable storage.
    ///
    /// Never fails; a storage error is logged and the in-memory state is
    /// cleared regardless.
    pub fn clear(&self) {
        {
            let mut state = self.state.lock();
            state.credential = None;
            state.identity = None;
            if let Err(e) = self.mirror.clear_session() {
                warn!(error = %e, "Failed to clear stored session");
            }
        }
        if let Err(e) = self.transition(&SessionMachineInput::Cleared) {
            warn!(error = %e, "Session clear transition rejected");
        }
    }

    fn transition(&self, input: &SessionMachineInput) -> SessionResult<()> {
        let mut fsm = self.fsm.lock();
        let old_phase = SessionPhase::from(fsm.state());

        fsm.consume(input).map_err(|_| {
            SessionError::InvalidStateTransition(format!(
                "Cannot apply {:?} in state {:?}",
                input,
                fsm.state()
            ))
        })?;

        let new_phase = SessionPhase::from(fsm.state());
        drop(fsm);

        if old_phase != new_phase {
            debug!(old_phase = ?old_phase, new_phase = ?new_phase, "Session phase transition");
            self.notify_state_change(new_phase);
        }

        Ok(())
    }

    fn notify_state_change(&self, phase: SessionPhase) {
        let (user_id, email) = self
            .identity()
            .map(|i| (Some(i.id), Some(i.email)))
            .unwrap_or((None, None));

        let cb = self.state_callback.lock();
        if let Some(callback) = cb.as_ref() {
            callback(SessionStateChangedPayload {
                phase,
                user_id,
                email,
            });
        }
    }
}

impl SessionAccessor for SessionContext {
    fn credential(&self) -> Option<String> {
        self.state.lock().credential.clone()
    }

    fn on_unauthorized(&self) {
        info!(login_route = %self.routes.login, "Session rejected by backend, signing out");
        self.clear();

        let cb = self.unauthorized_callback.lock();
        if let Some(callback) = cb.as_ref() {
            callback(&self.routes.login);
        }
    }
}
