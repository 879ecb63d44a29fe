//! Storage key constants.

/// Slot names used by the session mirror.
pub struct StorageKeys;

impl StorageKeys {
    /// Bearer credential
    pub const ACCESS_TOKEN: &'static str = "access_token";

    /// Identity snapshot (JSON)
    pub const USER: &'static str = "user";
}
