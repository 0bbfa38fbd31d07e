use super::calendar::{week_date_range, WeekRange};
use super::{percent, CAMPAIGN_WEEKS};
use crate::model::document::Document;
use crate::model::records::ContactStatus;
use serde::Serialize;

/// Weekly target category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricCategory {
    Applications,
    MockInterviews,
    Drills,
    Networking,
}

impl MetricCategory {
    pub const ALL: [MetricCategory; 4] = [
        Self::Applications,
        Self::MockInterviews,
        Self::Drills,
        Self::Networking,
    ];
}

/// Counts are `u64` so sums over categories and weeks cannot overflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub actual: u64,
    pub target: u64,
}

impl Progress {
    pub fn percent(&self) -> u32 {
        percent(self.actual, self.target)
    }
}

/// Actual vs. target for one campaign week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyMetrics {
    pub range: WeekRange,
    pub applications: Progress,
    pub mock_interviews: Progress,
    pub drills: Progress,
    pub networking: Progress,
}

impl WeeklyMetrics {
    pub fn category(&self, category: MetricCategory) -> Progress {
        match category {
            MetricCategory::Applications => self.applications,
            MetricCategory::MockInterviews => self.mock_interviews,
            MetricCategory::Drills => self.drills,
            MetricCategory::Networking => self.networking,
        }
    }

    pub fn total(&self) -> Progress {
        MetricCategory::ALL
            .iter()
            .map(|category| self.category(*category))
            .fold(Progress::default(), |sum, item| Progress {
                actual: sum.actual + item.actual,
                target: sum.target + item.target,
            })
    }

    pub fn completion_percent(&self, category: MetricCategory) -> u32 {
        self.category(category).percent()
    }
}

/// Counts the week's activity against the document's weekly targets.
///
/// - Applications by `appliedDate`.
/// - Mock interviews and drills by `date`.
/// - Contacts past `identified` by `lastContact`.
pub fn weekly_metrics(doc: &Document, week: u32) -> WeeklyMetrics {
    let range = week_date_range(doc.settings.start_date, week);
    let targets = doc.settings.weekly_targets;

    let applications = count(doc.applications.iter().filter(|app| {
        app.applied_date
            .is_some_and(|applied| range.contains(applied))
    }));
    let mock_interviews = count(
        doc.mock_interviews
            .iter()
            .filter(|mock| range.contains(mock.date)),
    );
    let drills = count(doc.drills.iter().filter(|drill| range.contains(drill.date)));
    let networking = count(doc.networking_contacts.iter().filter(|contact| {
        contact.status != ContactStatus::Identified
            && contact
                .last_contact
                .is_some_and(|contacted| range.contains(contacted))
    }));

    WeeklyMetrics {
        range,
        applications: Progress {
            actual: applications,
            target: u64::from(targets.applications),
        },
        mock_interviews: Progress {
            actual: mock_interviews,
            target: u64::from(targets.mock_interviews),
        },
        drills: Progress {
            actual: drills,
            target: u64::from(targets.drills),
        },
        networking: Progress {
            actual: networking,
            target: u64::from(targets.networking),
        },
    }
}

/// Campaign-to-date completion percentage over weeks
/// `1..=min(current_week, CAMPAIGN_WEEKS)`.
pub fn overall_progress(doc: &Document, current_week: u32) -> u32 {
    let last_week = current_week.clamp(1, CAMPAIGN_WEEKS);
    let actual: u64 = (1..=last_week)
        .map(|week| weekly_metrics(doc, week).total().actual)
        .sum();
    let target = doc.settings.weekly_targets.total() * u64::from(last_week);
    percent(actual, target)
}

fn count<I: Iterator>(items: I) -> u64 {
    u64::try_from(items.count()).unwrap_or(u64::MAX)
}
