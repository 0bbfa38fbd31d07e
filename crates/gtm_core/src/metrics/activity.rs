use crate::model::document::Document;
use crate::model::{EntityId, Timestamp};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityKind {
    Application,
    Story,
    MockInterview,
    Drill,
    NetworkingContact,
}

/// One entry of the recent-activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    pub kind: ActivityKind,
    pub id: EntityId,
    pub summary: String,
    pub created_at: Timestamp,
}

/// Newest-first feed across all id-addressed collections, at most `limit`.
///
/// Records created at the same instant keep collection order.
pub fn recent_activity(doc: &Document, limit: usize) -> Vec<ActivityItem> {
    let mut items = Vec::with_capacity(doc.record_count());

    items.extend(doc.applications.iter().map(|app| ActivityItem {
        kind: ActivityKind::Application,
        id: app.id.clone(),
        summary: format!("{}: {} ({})", app.company, app.role, app.status.as_str()),
        created_at: app.created_at,
    }));
    items.extend(doc.stories.iter().map(|story| ActivityItem {
        kind: ActivityKind::Story,
        id: story.id.clone(),
        summary: story.title.clone(),
        created_at: story.created_at,
    }));
    items.extend(doc.mock_interviews.iter().map(|mock| ActivityItem {
        kind: ActivityKind::MockInterview,
        id: mock.id.clone(),
        summary: if mock.partner.is_empty() {
            format!("Mock interview: {}", mock.topic)
        } else {
            format!("Mock interview with {}: {}", mock.partner, mock.topic)
        },
        created_at: mock.created_at,
    }));
    items.extend(doc.drills.iter().map(|drill| ActivityItem {
        kind: ActivityKind::Drill,
        id: drill.id.clone(),
        summary: format!(
            "{} drill ({} elements)",
            drill.drill_type,
            drill.elements_completed.len()
        ),
        created_at: drill.created_at,
    }));
    items.extend(doc.networking_contacts.iter().map(|contact| ActivityItem {
        kind: ActivityKind::NetworkingContact,
        id: contact.id.clone(),
        summary: format!("{} at {}", contact.name, contact.company),
        created_at: contact.created_at,
    }));

    items.sort_by(|left, right| right.created_at.cmp(&left.created_at));
    items.truncate(limit);
    items
}
