use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category reported for tags missing from the emotion catalog.
pub const DEFAULT_EMOTION_TYPE: &str = "default";

/// A short anonymous message posted to the echo wall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Echo {
    pub id: String,
    #[serde(rename = "user_id")]
    pub owner_id: String,
    pub content: String,
    #[serde(default)]
    pub emotion_tag: Option<String>,
    #[serde(default)]
    pub is_matched: bool,
    #[serde(with = "crate::timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Payload for posting an echo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EchoDraft {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion_tag: Option<String>,
}

/// A backend-computed pairing of two echoes.
///
/// `echo` and `matched_echo` are snapshots supplied by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchoMatch {
    pub id: String,
    pub echo_id: String,
    pub matched_echo_id: String,
    #[serde(with = "crate::timestamp")]
    pub matched_at: DateTime<Utc>,
    #[serde(default)]
    pub echo: Option<Echo>,
    #[serde(default)]
    pub matched_echo: Option<Echo>,
}

/// Body of `POST /echo-wall/manual-match`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualMatchRequest {
    pub echo_id: String,
    pub matched_echo_id: String,
}

/// Entry of the emotion-tag catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionTag {
    pub value: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_with_embedded_snapshots() {
        let m: EchoMatch = serde_json::from_value(serde_json::json!({
            "id": "m1",
            "echo_id": "e1",
            "matched_echo_id": "e2",
            "matched_at": "2024-03-01T12:00:00Z",
            "echo": {
                "id": "e1",
                "user_id": "u1",
                "content": "hello?",
                "emotion_tag": "lonely",
                "is_matched": true,
                "created_at": "2024-03-01T11:00:00Z"
            }
        }))
        .unwrap();

        assert_eq!(m.echo.as_ref().map(|e| e.owner_id.as_str()), Some("u1"));
        assert!(m.matched_echo.is_none());
    }

    #[test]
    fn emotion_tag_uses_type_on_the_wire() {
        let tag: EmotionTag =
            serde_json::from_str(r#"{"value": "happy", "label": "Happy", "type": "primary"}"#)
                .unwrap();
        assert_eq!(tag.kind, "primary");
        let json = serde_json::to_value(&tag).unwrap();
        assert_eq!(json["type"], "primary");
    }

    #[test]
    fn draft_without_tag_omits_it() {
        let draft = EchoDraft {
            content: "anyone there?".to_string(),
            emotion_tag: None,
        };
        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            serde_json::json!({"content": "anyone there?"})
        );
    }
}
