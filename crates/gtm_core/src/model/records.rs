//! Story, mock interview, drill and networking contact records.

use super::document::Document;
use super::{merge, EntityId, Record, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// STAR-format behavioral story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: EntityId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub situation: String,
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewStory {
    pub title: String,
    pub situation: String,
    pub task: String,
    pub action: String,
    pub result: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoryPatch {
    pub title: Option<String>,
    pub situation: Option<String>,
    pub task: Option<String>,
    pub action: Option<String>,
    pub result: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl Record for Story {
    type Draft = NewStory;
    type Patch = StoryPatch;

    const COLLECTION: &'static str = "stories";

    fn create(id: EntityId, now: Timestamp, draft: NewStory) -> Self {
        Self {
            id,
            title: draft.title,
            situation: draft.situation,
            task: draft.task,
            action: draft.action,
            result: draft.result,
            tags: draft.tags,
            created_at: now,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn apply(&mut self, patch: StoryPatch, _now: Timestamp) {
        merge(&mut self.title, patch.title);
        merge(&mut self.situation, patch.situation);
        merge(&mut self.task, patch.task);
        merge(&mut self.action, patch.action);
        merge(&mut self.result, patch.result);
        merge(&mut self.tags, patch.tags);
    }

    fn items(doc: &Document) -> &[Self] {
        &doc.stories
    }

    fn items_mut(doc: &mut Document) -> &mut Vec<Self> {
        &mut doc.stories
    }
}

/// Interview format practiced in a mock session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MockInterviewType {
    #[default]
    Behavioral,
    Technical,
    SystemDesign,
    Case,
    /// Catch-all so imported data with unknown formats still decodes.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockInterview {
    pub id: EntityId,
    pub date: NaiveDate,
    #[serde(rename = "type", default)]
    pub kind: MockInterviewType,
    #[serde(default)]
    pub partner: String,
    #[serde(default)]
    pub topic: String,
    /// Self-assessed score, 1..=5.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default)]
    pub feedback: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMockInterview {
    pub date: NaiveDate,
    pub kind: MockInterviewType,
    pub partner: String,
    pub topic: String,
    pub rating: Option<u8>,
    pub feedback: String,
}

impl NewMockInterview {
    pub fn new(date: NaiveDate, kind: MockInterviewType) -> Self {
        Self {
            date,
            kind,
            partner: String::new(),
            topic: String::new(),
            rating: None,
            feedback: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockInterviewPatch {
    pub date: Option<NaiveDate>,
    pub kind: Option<MockInterviewType>,
    pub partner: Option<String>,
    pub topic: Option<String>,
    pub rating: Option<Option<u8>>,
    pub feedback: Option<String>,
}

const MAX_MOCK_RATING: u8 = 5;

fn clamp_rating(rating: Option<u8>) -> Option<u8> {
    rating.map(|value| value.clamp(1, MAX_MOCK_RATING))
}

impl Record for MockInterview {
    type Draft = NewMockInterview;
    type Patch = MockInterviewPatch;

    const COLLECTION: &'static str = "mockInterviews";

    fn create(id: EntityId, now: Timestamp, draft: NewMockInterview) -> Self {
        Self {
            id,
            date: draft.date,
            kind: draft.kind,
            partner: draft.partner,
            topic: draft.topic,
            rating: clamp_rating(draft.rating),
            feedback: draft.feedback,
            created_at: now,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn apply(&mut self, patch: MockInterviewPatch, _now: Timestamp) {
        merge(&mut self.date, patch.date);
        merge(&mut self.kind, patch.kind);
        merge(&mut self.partner, patch.partner);
        merge(&mut self.topic, patch.topic);
        merge(&mut self.rating, patch.rating.map(clamp_rating));
        merge(&mut self.feedback, patch.feedback);
    }

    fn items(doc: &Document) -> &[Self] {
        &doc.mock_interviews
    }

    fn items_mut(doc: &mut Document) -> &mut Vec<Self> {
        &mut doc.mock_interviews
    }
}

/// One practice drill session (pitch, whiteboard, negotiation, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drill {
    pub id: EntityId,
    pub date: NaiveDate,
    #[serde(default)]
    pub drill_type: String,
    #[serde(default)]
    pub elements_completed: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub notes: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDrill {
    pub date: NaiveDate,
    pub drill_type: String,
    pub elements_completed: Vec<String>,
    pub duration_minutes: Option<u32>,
    pub notes: String,
}

impl NewDrill {
    pub fn new(date: NaiveDate, drill_type: impl Into<String>) -> Self {
        Self {
            date,
            drill_type: drill_type.into(),
            elements_completed: Vec::new(),
            duration_minutes: None,
            notes: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrillPatch {
    pub date: Option<NaiveDate>,
    pub drill_type: Option<String>,
    pub elements_completed: Option<Vec<String>>,
    pub duration_minutes: Option<Option<u32>>,
    pub notes: Option<String>,
}

impl Record for Drill {
    type Draft = NewDrill;
    type Patch = DrillPatch;

    const COLLECTION: &'static str = "drills";

    fn create(id: EntityId, now: Timestamp, draft: NewDrill) -> Self {
        Self {
            id,
            date: draft.date,
            drill_type: draft.drill_type,
            elements_completed: draft.elements_completed,
            duration_minutes: draft.duration_minutes,
            notes: draft.notes,
            created_at: now,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn apply(&mut self, patch: DrillPatch, _now: Timestamp) {
        merge(&mut self.date, patch.date);
        merge(&mut self.drill_type, patch.drill_type);
        merge(&mut self.elements_completed, patch.elements_completed);
        merge(&mut self.duration_minutes, patch.duration_minutes);
        merge(&mut self.notes, patch.notes);
    }

    fn items(doc: &Document) -> &[Self] {
        &doc.drills
    }

    fn items_mut(doc: &mut Document) -> &mut Vec<Self> {
        &mut doc.drills
    }
}

/// Outreach progress for one networking contact.
///
/// `Identified` is the initial state; only contacts past it count toward the
/// weekly networking metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    #[default]
    Identified,
    Contacted,
    Responded,
    Met,
    Referred,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkingContact {
    pub id: EntityId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub status: ContactStatus,
    pub last_contact: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewNetworkingContact {
    pub name: String,
    pub company: String,
    pub role: Option<String>,
    pub status: ContactStatus,
    pub last_contact: Option<NaiveDate>,
    pub notes: String,
}

impl NewNetworkingContact {
    pub fn new(name: impl Into<String>, company: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            company: company.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkingContactPatch {
    pub name: Option<String>,
    pub company: Option<String>,
    pub role: Option<Option<String>>,
    pub status: Option<ContactStatus>,
    pub last_contact: Option<Option<NaiveDate>>,
    pub notes: Option<String>,
}

impl Record for NetworkingContact {
    type Draft = NewNetworkingContact;
    type Patch = NetworkingContactPatch;

    const COLLECTION: &'static str = "networkingContacts";

    fn create(id: EntityId, now: Timestamp, draft: NewNetworkingContact) -> Self {
        Self {
            id,
            name: draft.name,
            company: draft.company,
            role: draft.role,
            status: draft.status,
            last_contact: draft.last_contact,
            notes: draft.notes,
            created_at: now,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn apply(&mut self, patch: NetworkingContactPatch, _now: Timestamp) {
        merge(&mut self.name, patch.name);
        merge(&mut self.company, patch.company);
        merge(&mut self.role, patch.role);
        merge(&mut self.status, patch.status);
        merge(&mut self.last_contact, patch.last_contact);
        merge(&mut self.notes, patch.notes);
    }

    fn items(doc: &Document) -> &[Self] {
        &doc.networking_contacts
    }

    fn items_mut(doc: &mut Document) -> &mut Vec<Self> {
        &mut doc.networking_contacts
    }
}

#[cfg(test)]
mod tests {
    use super::{MockInterview, MockInterviewPatch, MockInterviewType, NewMockInterview};
    use crate::model::Record;
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn mock_rating_is_clamped_to_scale() {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let mut mock = MockInterview::create(
            "m1".to_string(),
            now,
            NewMockInterview {
                rating: Some(9),
                ..NewMockInterview::new(date, MockInterviewType::Technical)
            },
        );
        assert_eq!(mock.rating, Some(5));

        mock.apply(
            MockInterviewPatch {
                rating: Some(Some(0)),
                ..MockInterviewPatch::default()
            },
            now,
        );
        assert_eq!(mock.rating, Some(1));
    }

    #[test]
    fn unknown_mock_type_decodes_as_other() {
        let kind: MockInterviewType = serde_json::from_str("\"panel\"").unwrap();
        assert_eq!(kind, MockInterviewType::Other);
        let kind: MockInterviewType = serde_json::from_str("\"system_design\"").unwrap();
        assert_eq!(kind, MockInterviewType::SystemDesign);
    }
}
