//! Seam between the access layer and whoever owns the session.

/// What the access layer needs from the session.
///
/// The owner of the session implements this; tests substitute a fake.
pub trait SessionAccessor: Send + Sync {
    /// Current bearer credential, if any.
    fn credential(&self) -> Option<String>;

    /// Called once per call that ends in HTTP 401. Implementations clear the
    /// durable credential and identity and signal navigation to the
    /// unauthenticated entry point.
    fn on_unauthorized(&self);
}

/// Accessor for callers that never authenticate (public feeds, probes).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSession;

impl SessionAccessor for NoSession {
    fn credential(&self) -> Option<String> {
        None
    }

    fn on_unauthorized(&self) {
        tracing::debug!("Unauthorized response without a session");
    }
}
