//! Canonical tracker document: every collection plus settings.
//!
//! The document is the sole unit of persistence and synchronization. It is
//! written whole and replaced whole; there is no field-level merge.

use super::application::Application;
use super::records::{Drill, MockInterview, NetworkingContact, Story};
use super::rhythm::DailyRhythm;
use super::{merge, Record};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Collection keys that must be present as arrays in a persisted document.
pub const COLLECTION_KEYS: [&str; 6] = [
    "applications",
    "stories",
    "mockInterviews",
    "drills",
    "networkingContacts",
    "dailyRhythm",
];

/// Key of the settings singleton in a persisted document.
pub const SETTINGS_KEY: &str = "settings";

/// Per-category weekly goals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyTargets {
    pub applications: u32,
    pub mock_interviews: u32,
    pub drills: u32,
    pub networking: u32,
}

impl Default for WeeklyTargets {
    fn default() -> Self {
        Self {
            applications: 5,
            mock_interviews: 2,
            drills: 5,
            networking: 5,
        }
    }
}

impl WeeklyTargets {
    /// Sum of all four targets, widened so it cannot overflow.
    pub fn total(&self) -> u64 {
        [
            self.applications,
            self.mock_interviews,
            self.drills,
            self.networking,
        ]
        .into_iter()
        .map(u64::from)
        .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Anchor of campaign week 1.
    pub start_date: NaiveDate,
    pub weekly_targets: WeeklyTargets,
}

/// Shallow merge for the settings singleton.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub start_date: Option<NaiveDate>,
    pub weekly_targets: Option<WeeklyTargets>,
}

impl Settings {
    pub fn apply(&mut self, patch: SettingsPatch) {
        merge(&mut self.start_date, patch.start_date);
        merge(&mut self.weekly_targets, patch.weekly_targets);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub applications: Vec<Application>,
    pub stories: Vec<Story>,
    pub mock_interviews: Vec<MockInterview>,
    pub drills: Vec<Drill>,
    pub networking_contacts: Vec<NetworkingContact>,
    pub daily_rhythm: Vec<DailyRhythm>,
    pub settings: Settings,
}

impl Document {
    /// Empty document whose campaign starts at `start_date`.
    pub fn skeleton(start_date: NaiveDate, weekly_targets: WeeklyTargets) -> Self {
        Self {
            applications: Vec::new(),
            stories: Vec::new(),
            mock_interviews: Vec::new(),
            drills: Vec::new(),
            networking_contacts: Vec::new(),
            daily_rhythm: Vec::new(),
            settings: Settings {
                start_date,
                weekly_targets,
            },
        }
    }

    pub fn find<R: Record>(&self, id: &str) -> Option<&R> {
        R::items(self).iter().find(|item| item.id() == id)
    }

    pub fn rhythm_for(&self, date: NaiveDate) -> Option<&DailyRhythm> {
        self.daily_rhythm.iter().find(|rhythm| rhythm.date == date)
    }

    /// Returns the record for `date`, creating an empty one on first use.
    pub fn rhythm_entry(&mut self, date: NaiveDate) -> &mut DailyRhythm {
        let index = match self
            .daily_rhythm
            .iter()
            .position(|rhythm| rhythm.date == date)
        {
            Some(index) => index,
            None => {
                self.daily_rhythm.push(DailyRhythm::new(date));
                self.daily_rhythm.len() - 1
            }
        };
        &mut self.daily_rhythm[index]
    }

    /// Number of records across the five id-addressed collections.
    pub fn record_count(&self) -> usize {
        self.applications.len()
            + self.stories.len()
            + self.mock_interviews.len()
            + self.drills.len()
            + self.networking_contacts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{Document, SettingsPatch, WeeklyTargets, COLLECTION_KEYS, SETTINGS_KEY};
    use chrono::NaiveDate;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn skeleton_serializes_every_collection_key() {
        let doc = Document::skeleton(start(), WeeklyTargets::default());
        let json = serde_json::to_value(&doc).unwrap();
        for key in COLLECTION_KEYS {
            assert!(json[key].is_array(), "missing collection {key}");
        }
        assert!(json[SETTINGS_KEY].is_object());
        assert_eq!(json["settings"]["startDate"], "2024-01-01");
        assert_eq!(json["settings"]["weeklyTargets"]["mockInterviews"], 2);
    }

    #[test]
    fn rhythm_entry_creates_at_most_one_record_per_date() {
        let mut doc = Document::skeleton(start(), WeeklyTargets::default());
        doc.rhythm_entry(start()).deep_work = true;
        doc.rhythm_entry(start()).practice = true;

        assert_eq!(doc.daily_rhythm.len(), 1);
        let rhythm = doc.rhythm_for(start()).unwrap();
        assert!(rhythm.deep_work && rhythm.practice);
    }

    #[test]
    fn target_total_does_not_overflow() {
        let targets = WeeklyTargets {
            applications: u32::MAX,
            mock_interviews: u32::MAX,
            drills: 1,
            networking: 0,
        };
        assert_eq!(targets.total(), 2 * u64::from(u32::MAX) + 1);
        assert_eq!(WeeklyTargets::default().total(), 17);
    }

    #[test]
    fn settings_patch_is_shallow() {
        let mut doc = Document::skeleton(start(), WeeklyTargets::default());
        let later = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        doc.settings.apply(SettingsPatch {
            start_date: Some(later),
            ..SettingsPatch::default()
        });
        assert_eq!(doc.settings.start_date, later);
        assert_eq!(doc.settings.weekly_targets, WeeklyTargets::default());
    }
}
