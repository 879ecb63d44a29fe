//! Session phase state machine using rust-fsm.
//!
//! ## State Diagram
//!
//! ```text
//! ┌─────────────────┐
//! │    Anonymous    │ (initial)
//! └────────┬────────┘
//!          │ AuthRequested                Hydrated (stored credential)
//!          ▼                                   │
//! ┌─────────────────┐   AuthSucceeded   ┌──────▼──────────┐
//! │ Authenticating  │ ────────────────► │  Authenticated  │
//! └────────┬────────┘ ◄──────────────── └────────┬────────┘
//!          │            AuthRequested            │
//!          │ Cleared                             │ Cleared
//!          ▼                                     ▼
//!      Anonymous                             Anonymous
//! ```
//!
//! Every phase accepts `AuthRequested`, `AuthSucceeded` and `Cleared` so that
//! overlapping calls apply in response-arrival order instead of being rejected.
//! `Hydrated` is only valid from `Anonymous`.

use rust_fsm::*;
use serde::{Deserialize, Serialize};

state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub session_machine(Anonymous)

    Anonymous => {
        Hydrated => Authenticated,
        AuthRequested => Authenticating,
        AuthSucceeded => Authenticated,
        Cleared => Anonymous
    },
    Authenticating => {
        AuthRequested => Authenticating,
        AuthSucceeded => Authenticated,
        Cleared => Anonymous
    },
    Authenticated => {
        AuthRequested => Authenticating,
        AuthSucceeded => Authenticated,
        Cleared => Anonymous
    }
}

pub use session_machine::Input as SessionMachineInput;
pub use session_machine::State as SessionMachineState;
pub use session_machine::StateMachine as SessionMachine;

/// Session phase for external consumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Anonymous,
    /// A login, registration or refresh is in flight.
    Authenticating,
    Authenticated,
}

impl SessionPhase {
    /// Returns true while an auth call is in flight.
    pub fn is_transient(&self) -> bool {
        matches!(self, SessionPhase::Authenticating)
    }
}

impl From<&SessionMachineState> for SessionPhase {
    fn from(state: &SessionMachineState) -> Self {
        match state {
            SessionMachineState::Anonymous => SessionPhase::Anonymous,
            SessionMachineState::Authenticating => SessionPhase::Authenticating,
            SessionMachineState::Authenticated => SessionPhase::Authenticated,
        }
    }
}

/// Payload for session phase change events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStateChangedPayload {
    pub phase: SessionPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
