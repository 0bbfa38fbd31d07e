use crate::model::application::ApplicationStatus;
use crate::model::document::Document;
use serde::Serialize;
use std::collections::BTreeMap;

/// Application tally per status, always holding all eight statuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PipelineFunnel {
    counts: BTreeMap<ApplicationStatus, usize>,
}

impl PipelineFunnel {
    pub fn count(&self, status: ApplicationStatus) -> usize {
        self.counts.get(&status).copied().unwrap_or(0)
    }

    /// Statuses in funnel order with their counts.
    pub fn iter(&self) -> impl Iterator<Item = (ApplicationStatus, usize)> + '_ {
        self.counts.iter().map(|(status, count)| (*status, *count))
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Applications still moving through the funnel.
    pub fn in_flight(&self) -> usize {
        self.iter()
            .filter(|(status, _)| !status.is_terminal())
            .map(|(_, count)| count)
            .sum()
    }
}

pub fn pipeline_funnel(doc: &Document) -> PipelineFunnel {
    let mut counts: BTreeMap<ApplicationStatus, usize> = ApplicationStatus::ALL
        .iter()
        .map(|status| (*status, 0))
        .collect();
    for app in &doc.applications {
        *counts.entry(app.status).or_insert(0) += 1;
    }
    PipelineFunnel { counts }
}

#[cfg(test)]
mod tests {
    use super::pipeline_funnel;
    use crate::model::application::{Application, ApplicationStatus, NewApplication};
    use crate::model::document::{Document, WeeklyTargets};
    use crate::model::Record;
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn funnel_is_zero_filled_and_sums_to_total() {
        let mut doc = Document::skeleton(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            WeeklyTargets::default(),
        );
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        for (index, status) in [
            ApplicationStatus::Applied,
            ApplicationStatus::Applied,
            ApplicationStatus::Rejected,
        ]
        .into_iter()
        .enumerate()
        {
            doc.applications.push(Application::create(
                format!("a{index}"),
                now,
                NewApplication {
                    status,
                    ..NewApplication::new("Acme", "Engineer")
                },
            ));
        }

        let funnel = pipeline_funnel(&doc);
        assert_eq!(funnel.iter().count(), 8);
        assert_eq!(funnel.count(ApplicationStatus::Applied), 2);
        assert_eq!(funnel.count(ApplicationStatus::Offer), 0);
        assert_eq!(funnel.total(), doc.applications.len());
        assert_eq!(funnel.in_flight(), 2);

        let json = serde_json::to_value(&funnel).unwrap();
        assert_eq!(json["rejected"], 1);
        assert_eq!(json["loop"], 0);
    }
}
