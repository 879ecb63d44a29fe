//! Echo wall store: the caller's echoes and matches, the recent public feed,
//! and the emotion-tag catalog.

use crate::tracking::{record_failure, tracked, ActionStatus, HasStatus};
use echo_http::{ApiClient, ApiRequest, HttpResult};
use echo_types::{
    Echo, EchoDraft, EchoMatch, EmotionTag, ManualMatchRequest, MessageResponse,
    DEFAULT_EMOTION_TYPE,
};
use parking_lot::Mutex;
use std::sync::Arc;

/// Number of echoes fetched by [`EchoWallStore::fetch_recent`] when no limit is given.
pub const DEFAULT_RECENT_LIMIT: u32 = 20;

const SEND_FAILED: &str = "Failed to send echo";
const FETCH_FAILED: &str = "Failed to fetch echoes";
const MATCH_FAILED: &str = "Failed to create match";

/// Snapshot of the store.
#[derive(Debug, Clone, Default)]
pub struct EchoWallState {
    pub mine: Vec<Echo>,
    pub matches: Vec<EchoMatch>,
    pub recent: Vec<Echo>,
    pub emotion_tags: Vec<EmotionTag>,
    pub status: ActionStatus,
}

impl HasStatus for EchoWallState {
    fn status_mut(&mut self) -> &mut ActionStatus {
        &mut self.status
    }
}

impl EchoWallState {
    fn emotion(&self, tag: &str) -> Option<&EmotionTag> {
        self.emotion_tags.iter().find(|e| e.value == tag)
    }
}

#[derive(Clone)]
pub struct EchoWallStore {
    client: ApiClient,
    state: Arc<Mutex<EchoWallState>>,
}

impl EchoWallStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: Arc::new(Mutex::new(EchoWallState::default())),
        }
    }

    pub fn snapshot(&self) -> EchoWallState {
        self.state.lock().clone()
    }

    pub fn mine(&self) -> Vec<Echo> {
        self.state.lock().mine.clone()
    }

    pub fn matches(&self) -> Vec<EchoMatch> {
        self.state.lock().matches.clone()
    }

    pub fn recent(&self) -> Vec<Echo> {
        self.state.lock().recent.clone()
    }

    pub fn emotion_tags(&self) -> Vec<EmotionTag> {
        self.state.lock().emotion_tags.clone()
    }

    pub fn loading(&self) -> bool {
        self.state.lock().status.loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.lock().status.error.clone()
    }

    /// Echoes in "mine" that have been paired.
    pub fn matched_echoes(&self) -> Vec<Echo> {
        self.partition(true)
    }

    /// Echoes in "mine" still waiting for a match.
    pub fn unmatched_echoes(&self) -> Vec<Echo> {
        self.partition(false)
    }

    pub fn match_count(&self) -> usize {
        self.state.lock().matches.len()
    }

    fn partition(&self, matched: bool) -> Vec<Echo> {
        self.state
            .lock()
            .mine
            .iter()
            .filter(|e| e.is_matched == matched)
            .cloned()
            .collect()
    }

    /// Display label for `tag`, or the tag itself when the catalog lacks it
    /// or carries an empty label.
    pub fn emotion_label(&self, tag: &str) -> String {
        self.state
            .lock()
            .emotion(tag)
            .map(|e| e.label.as_str())
            .filter(|label| !label.is_empty())
            .unwrap_or(tag)
            .to_string()
    }

    /// Category for `tag`, or `"default"` when the catalog lacks it or
    /// carries an empty category.
    pub fn emotion_type(&self, tag: &str) -> String {
        self.state
            .lock()
            .emotion(tag)
            .map(|e| e.kind.as_str())
            .filter(|kind| !kind.is_empty())
            .unwrap_or(DEFAULT_EMOTION_TYPE)
            .to_string()
    }

    /// Post an echo and prepend it to "mine".
    pub async fn create_echo(&self, content: &str, emotion_tag: Option<&str>) -> HttpResult<Echo> {
        tracked(&self.state, "create_echo", SEND_FAILED, async {
            let draft = EchoDraft {
                content: content.to_string(),
                emotion_tag: emotion_tag.map(str::to_string),
            };
            let request = ApiRequest::post("/echo-wall/").json(&draft)?;
            let echo: Echo = self.client.send(request).await?;
            self.state.lock().mine.insert(0, echo.clone());
            Ok(echo)
        })
        .await
    }

    pub async fn fetch_mine(&self) -> HttpResult<Vec<Echo>> {
        tracked(&self.state, "fetch_my_echoes", FETCH_FAILED, async {
            let echoes: Vec<Echo> = self
                .client
                .send(ApiRequest::get("/echo-wall/my-echoes"))
                .await?;
            self.state.lock().mine = echoes.clone();
            Ok(echoes)
        })
        .await
    }

    pub async fn fetch_matches(&self) -> HttpResult<Vec<EchoMatch>> {
        tracked(&self.state, "fetch_my_matches", FETCH_FAILED, async {
            let matches: Vec<EchoMatch> = self
                .client
                .send(ApiRequest::get("/echo-wall/my-matches"))
                .await?;
            self.state.lock().matches = matches.clone();
            Ok(matches)
        })
        .await
    }

    /// Replace the recent public feed. `None` uses [`DEFAULT_RECENT_LIMIT`].
    pub async fn fetch_recent(&self, limit: Option<u32>) -> HttpResult<Vec<Echo>> {
        let limit = limit.unwrap_or(DEFAULT_RECENT_LIMIT);
        tracked(&self.state, "fetch_recent_echoes", FETCH_FAILED, async {
            let request = ApiRequest::get("/echo-wall/recent").query("limit", limit);
            let echoes: Vec<Echo> = self.client.send(request).await?;
            self.state.lock().recent = echoes.clone();
            Ok(echoes)
        })
        .await
    }

    /// Replace the emotion catalog. Leaves `loading` alone but still
    /// records `error` on failure.
    pub async fn fetch_emotion_tags(&self) -> HttpResult<Vec<EmotionTag>> {
        let result: HttpResult<Vec<EmotionTag>> = self
            .client
            .send(ApiRequest::get("/echo-wall/emotions"))
            .await;
        match &result {
            Ok(tags) => self.state.lock().emotion_tags = tags.clone(),
            Err(e) => record_failure(&self.state, "fetch_emotion_tags", e, FETCH_FAILED),
        }
        result
    }

    /// Pair two echoes by hand, then reload the full matches collection.
    pub async fn create_manual_match(
        &self,
        echo_id: &str,
        matched_echo_id: &str,
    ) -> HttpResult<MessageResponse> {
        tracked(&self.state, "create_manual_match", MATCH_FAILED, async {
            let body = ManualMatchRequest {
                echo_id: echo_id.to_string(),
                matched_echo_id: matched_echo_id.to_string(),
            };
            let request = ApiRequest::post("/echo-wall/manual-match").json(&body)?;
            let response: MessageResponse = self.client.send(request).await?;
            self.fetch_matches().await?;
            Ok(response)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use echo_http::{NoSession, RetryPolicy};

    fn echo(id: &str, is_matched: bool) -> Echo {
        Echo {
            id: id.to_string(),
            owner_id: "u1".to_string(),
            content: "hello".to_string(),
            emotion_tag: None,
            is_matched,
            created_at: Utc::now(),
        }
    }

    fn store() -> EchoWallStore {
        let client = ApiClient::new(
            "http://localhost:8000/api",
            RetryPolicy::default(),
            Arc::new(NoSession),
        )
        .unwrap();
        EchoWallStore::new(client)
    }

    #[test]
    fn test_partitions() {
        let store = store();
        store.state.lock().mine = vec![echo("a", true), echo("b", false), echo("c", true)];

        let matched: Vec<_> = store.matched_echoes().into_iter().map(|e| e.id).collect();
        assert_eq!(matched, vec!["a", "c"]);
        let unmatched: Vec<_> = store.unmatched_echoes().into_iter().map(|e| e.id).collect();
        assert_eq!(unmatched, vec!["b"]);
        assert_eq!(store.match_count(), 0);
    }

    #[test]
    fn test_emotion_lookups_fall_back() {
        let store = store();
        store.state.lock().emotion_tags = vec![EmotionTag {
            value: "happy".to_string(),
            label: "Happy".to_string(),
            kind: "primary".to_string(),
        }];

        assert_eq!(store.emotion_label("happy"), "Happy");
        assert_eq!(store.emotion_type("happy"), "primary");
        assert_eq!(store.emotion_label("wistful"), "wistful");
        assert_eq!(store.emotion_type("wistful"), "default");
    }

    #[test]
    fn test_empty_catalog_fields_fall_back() {
        let store = store();
        store.state.lock().emotion_tags = vec![EmotionTag {
            value: "numb".to_string(),
            label: String::new(),
            kind: String::new(),
        }];

        assert_eq!(store.emotion_label("numb"), "numb");
        assert_eq!(store.emotion_type("numb"), "default");
    }

    #[test]
    fn test_lookups_on_empty_catalog() {
        let store = store();
        assert_eq!(store.emotion_label(""), "");
        assert_eq!(store.emotion_type("anything"), DEFAULT_EMOTION_TYPE);
    }
}
