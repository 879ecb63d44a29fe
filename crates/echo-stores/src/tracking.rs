//! Loading/error bookkeeping shared by the domain stores.

use echo_http::{HttpError, HttpResult};
use parking_lot::Mutex;
use std::future::Future;

/// Transient flags every store exposes next to its collections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionStatus {
    /// True while an action is in flight.
    pub loading: bool,
    /// Message of the most recent failed action, cleared when an action starts.
    pub error: Option<String>,
}

pub(crate) trait HasStatus {
    fn status_mut(&mut self) -> &mut ActionStatus;
}

/// RAII guard for an in-flight action.
///
/// Sets `loading` and clears `error` on creation; resets `loading` when
/// dropped, whichever way the action ends.
pub(crate) struct LoadingGuard<'a, S: HasStatus> {
    state: &'a Mutex<S>,
}

impl<'a, S: HasStatus> LoadingGuard<'a, S> {
    pub(crate) fn begin(state: &'a Mutex<S>) -> Self {
        {
            let mut guard = state.lock();
            let status = guard.status_mut();
            status.loading = true;
            status.error = None;
        }
        Self { state }
    }
}

impl<S: HasStatus> Drop for LoadingGuard<'_, S> {
    fn drop(&mut self) {
        self.state.lock().status_mut().loading = false;
    }
}

/// Record a failed action's message on the store.
pub(crate) fn record_failure<S: HasStatus>(
    state: &Mutex<S>,
    action: &'static str,
    error: &HttpError,
    fallback: &str,
) {
    tracing::warn!(action, error = %error, "Store action failed");
    state.lock().status_mut().error = Some(error.user_message(fallback));
}

/// Run one store action under a [`LoadingGuard`], recording its failure.
///
/// Collection mutations belong inside `call` so they land before `loading`
/// is reset.
pub(crate) async fn tracked<S, T, F>(
    state: &Mutex<S>,
    action: &'static str,
    fallback: &str,
    call: F,
) -> HttpResult<T>
where
    S: HasStatus,
    F: Future<Output = HttpResult<T>>,
{
    let _loading = LoadingGuard::begin(state);
    let result = call.await;
    if let Err(e) = &result {
        record_failure(state, action, e, fallback);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Probe {
        status: ActionStatus,
    }

    impl HasStatus for Probe {
        fn status_mut(&mut self) -> &mut ActionStatus {
            &mut self.status
        }
    }

    #[test]
    fn test_guard_resets_loading_on_drop() {
        let state = Mutex::new(Probe::default());
        state.lock().status.error = Some("old".to_string());

        let guard = LoadingGuard::begin(&state);
        assert!(state.lock().status.loading);
        assert!(state.lock().status.error.is_none());

        drop(guard);
        assert!(!state.lock().status.loading);
    }

    #[test]
    fn test_guard_resets_loading_on_early_return() {
        fn failing(state: &Mutex<Probe>) -> Result<(), HttpError> {
            let _loading = LoadingGuard::begin(state);
            Err(HttpError::from_status(500, ""))
        }

        let state = Mutex::new(Probe::default());
        assert!(failing(&state).is_err());
        assert!(!state.lock().status.loading);
    }

    #[test]
    fn test_record_failure_prefers_detail() {
        let state = Mutex::new(Probe::default());

        let err = HttpError::from_status(403, r#"{"detail": "Not your capsule"}"#);
        record_failure(&state, "update", &err, "Failed to update");
        assert_eq!(state.lock().status.error.as_deref(), Some("Not your capsule"));

        let err = HttpError::from_status(502, "bad gateway");
        record_failure(&state, "update", &err, "Failed to update");
        assert_eq!(state.lock().status.error.as_deref(), Some("Failed to update"));
    }
}
