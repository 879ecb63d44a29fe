//! Domain types shared by the Echo client crates.
//!
//! These mirror the JSON shapes returned by the Echo backend. Field names
//! follow the wire format except where noted (`owner_id` is `user_id` on the
//! wire).

mod capsule;
mod echo;
mod identity;
mod response;
pub mod timestamp;

pub use capsule::{CapsuleDraft, CapsulePatch, CapsuleStatus, TimeCapsule};
pub use echo::{Echo, EchoDraft, EchoMatch, EmotionTag, ManualMatchRequest, DEFAULT_EMOTION_TYPE};
pub use identity::{AuthToken, Identity};
pub use response::MessageResponse;
