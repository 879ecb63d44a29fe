//! Domain stores for the Echo client.
//!
//! Each store owns its collections plus a transient [`ActionStatus`]. Actions
//! go through the shared [`echo_http::ApiClient`], mutate collections when the
//! response arrives, and always leave `loading == false` once they settle.

pub mod echo_wall;
pub mod time_capsule;
mod tracking;

pub use echo_wall::{EchoWallState, EchoWallStore, DEFAULT_RECENT_LIMIT};
pub use time_capsule::{CapsuleState, TimeCapsuleStore};
pub use tracking::ActionStatus;
