//! Job application record and funnel status.
//!
//! # Invariants
//! - `created_at` is set once by the store and never patched.
//! - `last_update` is refreshed by the store on every successful update.
//! - `applied_date` is caller-owned; the store does not derive it from
//!   `status` transitions.

use super::document::Document;
use super::{merge, EntityId, Record, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Funnel position of one application.
///
/// Declaration order is funnel order: `Researching` through `Offer`, with
/// `Rejected` and `Withdrawn` as terminal off-ramps.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Researching,
    Applied,
    Screen,
    Technical,
    Loop,
    Offer,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 8] = [
        Self::Researching,
        Self::Applied,
        Self::Screen,
        Self::Technical,
        Self::Loop,
        Self::Offer,
        Self::Rejected,
        Self::Withdrawn,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Researching => "researching",
            Self::Applied => "applied",
            Self::Screen => "screen",
            Self::Technical => "technical",
            Self::Loop => "loop",
            Self::Offer => "offer",
            Self::Rejected => "rejected",
            Self::Withdrawn => "withdrawn",
        }
    }

    /// Case-insensitive inverse of [`Self::as_str`].
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value))
    }

    /// Whether the application left the funnel for good.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Offer | Self::Rejected | Self::Withdrawn)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: EntityId,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(default)]
    pub status: ApplicationStatus,
    /// Buckets the application into a campaign week. `null` until applied.
    pub applied_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referral_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hiring_manager: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_url: Option<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story_fit: Option<String>,
    pub last_update: Timestamp,
    pub created_at: Timestamp,
}

/// Fields accepted by `add_application`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewApplication {
    pub company: String,
    pub role: String,
    pub team: Option<String>,
    pub status: ApplicationStatus,
    pub applied_date: Option<NaiveDate>,
    pub referral_path: Option<String>,
    pub hiring_manager: Option<String>,
    pub job_url: Option<String>,
    pub notes: String,
    pub story_fit: Option<String>,
}

impl NewApplication {
    pub fn new(company: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            role: role.into(),
            ..Self::default()
        }
    }
}

/// Partial update for an application.
///
/// Nullable fields use `Some(None)` to clear the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationPatch {
    pub company: Option<String>,
    pub role: Option<String>,
    pub team: Option<Option<String>>,
    pub status: Option<ApplicationStatus>,
    pub applied_date: Option<Option<NaiveDate>>,
    pub referral_path: Option<Option<String>>,
    pub hiring_manager: Option<Option<String>>,
    pub job_url: Option<Option<String>>,
    pub notes: Option<String>,
    pub story_fit: Option<Option<String>>,
}

impl Record for Application {
    type Draft = NewApplication;
    type Patch = ApplicationPatch;

    const COLLECTION: &'static str = "applications";

    fn create(id: EntityId, now: Timestamp, draft: NewApplication) -> Self {
        Self {
            id,
            company: draft.company,
            role: draft.role,
            team: draft.team,
            status: draft.status,
            applied_date: draft.applied_date,
            referral_path: draft.referral_path,
            hiring_manager: draft.hiring_manager,
            job_url: draft.job_url,
            notes: draft.notes,
            story_fit: draft.story_fit,
            last_update: now,
            created_at: now,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn apply(&mut self, patch: ApplicationPatch, now: Timestamp) {
        merge(&mut self.company, patch.company);
        merge(&mut self.role, patch.role);
        merge(&mut self.team, patch.team);
        merge(&mut self.status, patch.status);
        merge(&mut self.applied_date, patch.applied_date);
        merge(&mut self.referral_path, patch.referral_path);
        merge(&mut self.hiring_manager, patch.hiring_manager);
        merge(&mut self.job_url, patch.job_url);
        merge(&mut self.notes, patch.notes);
        merge(&mut self.story_fit, patch.story_fit);
        self.last_update = now;
    }

    fn items(doc: &Document) -> &[Self] {
        &doc.applications
    }

    fn items_mut(doc: &mut Document) -> &mut Vec<Self> {
        &mut doc.applications
    }
}

#[cfg(test)]
mod tests {
    use super::{Application, ApplicationPatch, ApplicationStatus, NewApplication};
    use crate::model::Record;
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn status_parse_accepts_any_case() {
        assert_eq!(ApplicationStatus::parse(" Loop "), Some(ApplicationStatus::Loop));
        assert_eq!(ApplicationStatus::parse("offer"), Some(ApplicationStatus::Offer));
        assert_eq!(ApplicationStatus::parse("ghosted"), None);
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_value(ApplicationStatus::Technical).unwrap();
        assert_eq!(json, "technical");
        assert_eq!(ApplicationStatus::ALL.len(), 8);
    }

    #[test]
    fn patch_merges_fields_and_refreshes_last_update() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 1, 3, 8, 0, 0).unwrap();
        let mut app = Application::create(
            "id-1".to_string(),
            created,
            NewApplication {
                team: Some("infra".to_string()),
                ..NewApplication::new("Acme", "SRE")
            },
        );

        app.apply(
            ApplicationPatch {
                status: Some(ApplicationStatus::Applied),
                applied_date: Some(NaiveDate::from_ymd_opt(2024, 1, 3)),
                team: Some(None),
                ..ApplicationPatch::default()
            },
            later,
        );

        assert_eq!(app.status, ApplicationStatus::Applied);
        assert_eq!(app.applied_date, NaiveDate::from_ymd_opt(2024, 1, 3));
        assert_eq!(app.team, None);
        assert_eq!(app.company, "Acme");
        assert_eq!(app.created_at, created);
        assert_eq!(app.last_update, later);
    }

    #[test]
    fn serialization_uses_camel_case_wire_fields() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let app = Application::create("abc".to_string(), now, NewApplication::new("Acme", "PM"));
        let json = serde_json::to_value(&app).unwrap();

        assert_eq!(json["id"], "abc");
        assert_eq!(json["status"], "researching");
        assert!(json["appliedDate"].is_null());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("lastUpdate").is_some());
        assert!(json.get("team").is_none());
    }
}
