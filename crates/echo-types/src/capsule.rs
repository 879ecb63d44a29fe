use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a time capsule.
///
/// Ordered: `Locked < Unlocked < Public`. The client only ever moves a capsule
/// forward along this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapsuleStatus {
    Locked,
    Unlocked,
    Public,
}

impl CapsuleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CapsuleStatus::Locked => "locked",
            CapsuleStatus::Unlocked => "unlocked",
            CapsuleStatus::Public => "public",
        }
    }
}

impl std::fmt::Display for CapsuleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CapsuleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "locked" => Ok(CapsuleStatus::Locked),
            "unlocked" => Ok(CapsuleStatus::Unlocked),
            "public" => Ok(CapsuleStatus::Public),
            other => Err(format!("unknown capsule status: {other}")),
        }
    }
}

/// A user-authored note gated by a date or a free-form condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeCapsule {
    pub id: String,
    #[serde(rename = "user_id")]
    pub owner_id: String,
    pub title: String,
    pub content: String,
    #[serde(default, with = "crate::timestamp::option")]
    pub unlock_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub unlock_condition: Option<String>,
    pub status: CapsuleStatus,
    #[serde(default)]
    pub is_public: bool,
    #[serde(with = "crate::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl TimeCapsule {
    /// Whether the capsule may be unlocked at `now` based on local information.
    ///
    /// Only date-gated capsules can be decided here. A capsule that relies on
    /// `unlock_condition` alone always yields `false`; the backend evaluates
    /// conditions.
    pub fn can_unlock_at(&self, now: DateTime<Utc>) -> bool {
        if self.status != CapsuleStatus::Locked {
            return false;
        }
        match self.unlock_date {
            Some(unlock_date) => now > unlock_date,
            None => false,
        }
    }

    /// Move the capsule forward to `target`. Returns `false` (and leaves the
    /// capsule untouched) when `target` is not ahead of the current status.
    pub fn advance_to(&mut self, target: CapsuleStatus) -> bool {
        if target <= self.status {
            return false;
        }
        self.status = target;
        if target == CapsuleStatus::Public {
            self.is_public = true;
        }
        true
    }
}

/// Payload for creating a capsule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CapsuleDraft {
    pub title: String,
    pub content: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::timestamp::option"
    )]
    pub unlock_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlock_condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

impl CapsuleDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn unlock_on(mut self, date: DateTime<Utc>) -> Self {
        self.unlock_date = Some(date);
        self
    }

    pub fn unlock_when(mut self, condition: impl Into<String>) -> Self {
        self.unlock_condition = Some(condition.into());
        self
    }

    pub fn public(mut self, is_public: bool) -> Self {
        self.is_public = Some(is_public);
        self
    }
}

/// Partial update for a capsule. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapsulePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::timestamp::option"
    )]
    pub unlock_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlock_condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CapsuleStatus>,
}

impl CapsulePatch {
    pub fn is_empty(&self) -> bool {
        *self == CapsulePatch::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn capsule(status: CapsuleStatus, unlock_date: Option<DateTime<Utc>>) -> TimeCapsule {
        let now = Utc::now();
        TimeCapsule {
            id: "c1".to_string(),
            owner_id: "u1".to_string(),
            title: "T".to_string(),
            content: "C".to_string(),
            unlock_date,
            unlock_condition: None,
            status,
            is_public: status == CapsuleStatus::Public,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn can_unlock_requires_locked_status() {
        let past = Some(Utc::now() - Duration::days(1));
        assert!(capsule(CapsuleStatus::Locked, past).can_unlock_at(Utc::now()));
        assert!(!capsule(CapsuleStatus::Unlocked, past).can_unlock_at(Utc::now()));
        assert!(!capsule(CapsuleStatus::Public, past).can_unlock_at(Utc::now()));
    }

    #[test]
    fn can_unlock_requires_a_date() {
        let mut gated = capsule(CapsuleStatus::Locked, None);
        gated.unlock_condition = Some("when I get the job".to_string());
        assert!(!gated.can_unlock_at(Utc::now()));
    }

    #[test]
    fn can_unlock_is_strictly_after_the_date() {
        let date = Utc::now();
        let c = capsule(CapsuleStatus::Locked, Some(date));
        assert!(!c.can_unlock_at(date));
        assert!(!c.can_unlock_at(date - Duration::seconds(1)));
        assert!(c.can_unlock_at(date + Duration::milliseconds(1)));
    }

    #[test]
    fn advance_never_regresses() {
        let mut c = capsule(CapsuleStatus::Public, None);
        assert!(!c.advance_to(CapsuleStatus::Unlocked));
        assert_eq!(c.status, CapsuleStatus::Public);

        let mut c = capsule(CapsuleStatus::Locked, None);
        assert!(c.advance_to(CapsuleStatus::Unlocked));
        assert!(!c.is_public);
        assert!(c.advance_to(CapsuleStatus::Public));
        assert!(c.is_public);
    }

    #[test]
    fn capsule_reads_user_id_as_owner() {
        let c: TimeCapsule = serde_json::from_value(serde_json::json!({
            "id": "c1",
            "user_id": "u1",
            "title": "T",
            "content": "C",
            "unlock_date": null,
            "unlock_condition": "graduation",
            "status": "locked",
            "is_public": false,
            "created_at": "2024-01-01T00:00:00",
            "updated_at": "2024-01-01T00:00:00+00:00"
        }))
        .unwrap();

        assert_eq!(c.owner_id, "u1");
        assert_eq!(c.unlock_condition.as_deref(), Some("graduation"));
        assert!(c.unlock_date.is_none());
    }

    #[test]
    fn patch_omits_unset_fields() {
        let patch = CapsulePatch {
            title: Some("New".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({"title": "New"}));
        assert!(!patch.is_empty());
        assert!(CapsulePatch::default().is_empty());
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Locked".parse::<CapsuleStatus>(), Ok(CapsuleStatus::Locked));
        assert!("archived".parse::<CapsuleStatus>().is_err());
        assert_eq!(CapsuleStatus::Public.to_string(), "public");
    }
}
