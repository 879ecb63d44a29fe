//! Session handling for the Echo client.
//!
//! This crate provides:
//! - [`SessionContext`]: the owned identity + credential, hydrated from and mirrored to durable storage
//! - [`SessionStore`]: login, registration, logout, refresh and password flows
//! - Explicit FSM-based session phase tracking
//! - A route guard for auth-only and guest-only routes

mod auth_fsm;
mod context;
mod error;
mod guard;
mod session;

pub use auth_fsm::session_machine;
pub use auth_fsm::{
    SessionMachine, SessionMachineInput, SessionMachineState, SessionPhase,
    SessionStateChangedPayload,
};
pub use context::{Session, SessionContext, SessionStateCallback, UnauthorizedCallback};
pub use error::{SessionError, SessionResult};
pub use guard::{check_route, GuardDecision, RouteAccess, Routes};
pub use session::SessionStore;
