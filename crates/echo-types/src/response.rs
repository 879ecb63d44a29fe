use serde::{Deserialize, Serialize};

/// Generic acknowledgement returned by action endpoints.
///
/// `success` is kept optional: callers gating local mutations on it must treat
/// an absent flag as "not confirmed".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl MessageResponse {
    /// True only when the backend explicitly reported success.
    pub fn confirmed(&self) -> bool {
        self.success == Some(true)
    }
}
