//! Time capsule store.
//!
//! Holds two disjoint collections: the caller's own capsules ("mine") and the
//! read-only public feed. They are fetched independently and never merged.

use crate::tracking::{tracked, ActionStatus, HasStatus};
use chrono::Utc;
use echo_http::{ApiClient, ApiRequest, HttpResult};
use echo_types::{CapsuleDraft, CapsulePatch, CapsuleStatus, MessageResponse, TimeCapsule};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

const CREATE_FAILED: &str = "Failed to create capsule";
const FETCH_FAILED: &str = "Failed to fetch capsules";
const UPDATE_FAILED: &str = "Failed to update capsule";
const UNLOCK_FAILED: &str = "Failed to unlock capsule";
const PUBLISH_FAILED: &str = "Failed to publish capsule";
const DELETE_FAILED: &str = "Failed to delete capsule";

/// Snapshot of the store.
#[derive(Debug, Clone, Default)]
pub struct CapsuleState {
    pub mine: Vec<TimeCapsule>,
    pub public_feed: Vec<TimeCapsule>,
    pub status: ActionStatus,
}

impl HasStatus for CapsuleState {
    fn status_mut(&mut self) -> &mut ActionStatus {
        &mut self.status
    }
}

impl CapsuleState {
    /// Advance the entry in "mine" with `id`, if present.
    fn advance(&mut self, id: &str, target: CapsuleStatus) {
        if let Some(capsule) = self.mine.iter_mut().find(|c| c.id == id) {
            if !capsule.advance_to(target) {
                debug!(capsule_id = %id, status = %capsule.status, target = %target, "Capsule already past target status");
            }
        }
    }
}

/// Store for the caller's time capsules and the public feed.
#[derive(Clone)]
pub struct TimeCapsuleStore {
    client: ApiClient,
    state: Arc<Mutex<CapsuleState>>,
}

impl TimeCapsuleStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: Arc::new(Mutex::new(CapsuleState::default())),
        }
    }

    pub fn snapshot(&self) -> CapsuleState {
        self.state.lock().clone()
    }

    pub fn mine(&self) -> Vec<TimeCapsule> {
        self.state.lock().mine.clone()
    }

    pub fn public_feed(&self) -> Vec<TimeCapsule> {
        self.state.lock().public_feed.clone()
    }

    pub fn loading(&self) -> bool {
        self.state.lock().status.loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.lock().status.error.clone()
    }

    /// Capsules in "mine" that are still locked.
    pub fn locked_capsules(&self) -> Vec<TimeCapsule> {
        self.with_status(CapsuleStatus::Locked)
    }

    /// Capsules in "mine" that are unlocked but not yet public.
    pub fn unlocked_capsules(&self) -> Vec<TimeCapsule> {
        self.with_status(CapsuleStatus::Unlocked)
    }

    pub fn my_capsule_count(&self) -> usize {
        self.state.lock().mine.len()
    }

    fn with_status(&self, status: CapsuleStatus) -> Vec<TimeCapsule> {
        self.state
            .lock()
            .mine
            .iter()
            .filter(|c| c.status == status)
            .cloned()
            .collect()
    }

    /// Whether `capsule` may be unlocked now.
    ///
    /// True only for a locked capsule whose `unlock_date` has passed.
    /// Condition-gated capsules are decided by the backend and yield `false`.
    pub fn can_unlock(&self, capsule: &TimeCapsule) -> bool {
        capsule.can_unlock_at(Utc::now())
    }

    /// Create a capsule and prepend it to "mine".
    pub async fn create(&self, draft: &CapsuleDraft) -> HttpResult<TimeCapsule> {
        tracked(&self.state, "create_capsule", CREATE_FAILED, async {
            let request = ApiRequest::post("/time-capsules/").json(draft)?;
            let capsule: TimeCapsule = self.client.send(request).await?;
            self.state.lock().mine.insert(0, capsule.clone());
            Ok(capsule)
        })
        .await
    }

    /// Replace "mine", optionally filtered by status on the backend.
    pub async fn fetch_mine(&self, status: Option<CapsuleStatus>) -> HttpResult<Vec<TimeCapsule>> {
        tracked(&self.state, "fetch_my_capsules", FETCH_FAILED, async {
            let mut request = ApiRequest::get("/time-capsules/");
            if let Some(status) = status {
                request = request.query("status", status);
            }
            let capsules: Vec<TimeCapsule> = self.client.send(request).await?;
            self.state.lock().mine = capsules.clone();
            Ok(capsules)
        })
        .await
    }

    /// Replace the public feed.
    pub async fn fetch_public(&self) -> HttpResult<Vec<TimeCapsule>> {
        tracked(&self.state, "fetch_public_capsules", FETCH_FAILED, async {
            let capsules: Vec<TimeCapsule> = self
                .client
                .send(ApiRequest::get("/time-capsules/public"))
                .await?;
            self.state.lock().public_feed = capsules.clone();
            Ok(capsules)
        })
        .await
    }

    /// Fetch a single capsule. Neither collection is touched.
    pub async fn fetch_one(&self, id: &str) -> HttpResult<TimeCapsule> {
        tracked(&self.state, "fetch_capsule", FETCH_FAILED, async {
            self.client
                .send(ApiRequest::get(format!("/time-capsules/{id}")))
                .await
        })
        .await
    }

    /// Update a capsule; the entry in "mine" is replaced by the backend's copy.
    pub async fn update(&self, id: &str, patch: &CapsulePatch) -> HttpResult<TimeCapsule> {
        tracked(&self.state, "update_capsule", UPDATE_FAILED, async {
            let request = ApiRequest::put(format!("/time-capsules/{id}")).json(patch)?;
            let capsule: TimeCapsule = self.client.send(request).await?;
            let mut state = self.state.lock();
            if let Some(entry) = state.mine.iter_mut().find(|c| c.id == id) {
                *entry = capsule.clone();
            }
            Ok(capsule)
        })
        .await
    }

    /// Ask the backend to unlock a capsule. The local entry only moves to
    /// `unlocked` when the backend explicitly reports success.
    pub async fn unlock(&self, id: &str) -> HttpResult<MessageResponse> {
        tracked(&self.state, "unlock_capsule", UNLOCK_FAILED, async {
            let response: MessageResponse = self
                .client
                .send(ApiRequest::post(format!("/time-capsules/{id}/unlock")))
                .await?;
            if response.confirmed() {
                self.state.lock().advance(id, CapsuleStatus::Unlocked);
            } else {
                debug!(capsule_id = %id, message = %response.message, "Unlock not confirmed");
            }
            Ok(response)
        })
        .await
    }

    /// Publish a capsule to the public feed. On confirmed success the local
    /// entry becomes `public` with `is_public` set.
    pub async fn publish(&self, id: &str) -> HttpResult<MessageResponse> {
        tracked(&self.state, "publish_capsule", PUBLISH_FAILED, async {
            let response: MessageResponse = self
                .client
                .send(ApiRequest::post(format!("/time-capsules/{id}/publish")))
                .await?;
            if response.confirmed() {
                self.state.lock().advance(id, CapsuleStatus::Public);
            } else {
                debug!(capsule_id = %id, message = %response.message, "Publish not confirmed");
            }
            Ok(response)
        })
        .await
    }

    /// Delete a capsule and drop the entry with that id from "mine".
    pub async fn delete(&self, id: &str) -> HttpResult<MessageResponse> {
        tracked(&self.state, "delete_capsule", DELETE_FAILED, async {
            let response: MessageResponse = self
                .client
                .send(ApiRequest::delete(format!("/time-capsules/{id}")))
                .await?;
            self.state.lock().mine.retain(|c| c.id != id);
            Ok(response)
        })
        .await
    }
}
