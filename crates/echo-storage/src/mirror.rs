//! Typed access to the durable session slots.

use crate::{ClientStorage, StorageError, StorageKeys, StorageResult};
use echo_types::Identity;

/// High-level API over the two session slots: the bearer credential and the
/// serialized identity snapshot.
pub struct SessionMirror {
    storage: Box<dyn ClientStorage>,
}

impl SessionMirror {
    /// Create a new mirror with the given storage backend
    pub fn new(storage: Box<dyn ClientStorage>) -> Self {
        Self { storage }
    }

    /// Store the bearer credential
    pub fn set_access_token(&self, token: &str) -> StorageResult<()> {
        self.storage.set(StorageKeys::ACCESS_TOKEN, token)
    }

    /// Retrieve the bearer credential
    pub fn get_access_token(&self) -> StorageResult<Option<String>> {
        self.storage.get(StorageKeys::ACCESS_TOKEN)
    }

    /// Store the identity snapshot
    pub fn set_user(&self, identity: &Identity) -> StorageResult<()> {
        let json = serde_json::to_string(identity)
            .map_err(|e| StorageError::Encoding(e.to_string()))?;
        self.storage.set(StorageKeys::USER, &json)
    }

    /// Retrieve the identity snapshot.
    ///
    /// A snapshot that no longer parses yields `StorageError::Encoding`.
    pub fn get_user(&self) -> StorageResult<Option<Identity>> {
        match self.storage.get(StorageKeys::USER)? {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| StorageError::Encoding(e.to_string())),
            None => Ok(None),
        }
    }

    /// Store both slots after a successful authentication.
    pub fn set_session(&self, token: &str, identity: &Identity) -> StorageResult<()> {
        self.set_access_token(token)?;
        self.set_user(identity)?;
        tracing::debug!(user_id = %identity.id, "Session mirrored to durable storage");
        Ok(())
    }

    /// Check if a credential is stored
    pub fn has_session(&self) -> StorageResult<bool> {
        self.storage.has(StorageKeys::ACCESS_TOKEN)
    }

    /// Clear both slots.
    ///
    /// Both deletes are attempted even when the first one fails; the first
    /// error is returned.
    pub fn clear_session(&self) -> StorageResult<()> {
        let token = self.storage.delete(StorageKeys::ACCESS_TOKEN);
        let user = self.storage.delete(StorageKeys::USER);
        token?;
        user?;
        tracing::debug!("Session slots cleared");
        Ok(())
    }
}
