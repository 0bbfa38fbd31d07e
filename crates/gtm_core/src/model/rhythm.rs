//! Daily rhythm checklist keyed by calendar date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One of the four fixed daily activity blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RhythmBlock {
    DeepWork,
    Applications,
    Practice,
    Debrief,
}

impl RhythmBlock {
    pub const ALL: [RhythmBlock; 4] = [
        Self::DeepWork,
        Self::Applications,
        Self::Practice,
        Self::Debrief,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DeepWork => "deepWork",
            Self::Applications => "applications",
            Self::Practice => "practice",
            Self::Debrief => "debrief",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "deepWork" | "deep_work" | "deep-work" => Some(Self::DeepWork),
            "applications" => Some(Self::Applications),
            "practice" => Some(Self::Practice),
            "debrief" => Some(Self::Debrief),
            _ => None,
        }
    }
}

/// Checklist for one calendar date. Never deleted once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRhythm {
    pub date: NaiveDate,
    #[serde(default)]
    pub deep_work: bool,
    #[serde(default)]
    pub applications: bool,
    #[serde(default)]
    pub practice: bool,
    #[serde(default)]
    pub debrief: bool,
    #[serde(default)]
    pub notes: String,
}

/// Partial merge applied by `update_rhythm`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RhythmPatch {
    pub deep_work: Option<bool>,
    pub applications: Option<bool>,
    pub practice: Option<bool>,
    pub debrief: Option<bool>,
    pub notes: Option<String>,
}

impl DailyRhythm {
    /// Empty checklist for `date`.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            deep_work: false,
            applications: false,
            practice: false,
            debrief: false,
            notes: String::new(),
        }
    }

    pub fn block(&self, block: RhythmBlock) -> bool {
        match block {
            RhythmBlock::DeepWork => self.deep_work,
            RhythmBlock::Applications => self.applications,
            RhythmBlock::Practice => self.practice,
            RhythmBlock::Debrief => self.debrief,
        }
    }

    pub fn toggle(&mut self, block: RhythmBlock) {
        let slot = match block {
            RhythmBlock::DeepWork => &mut self.deep_work,
            RhythmBlock::Applications => &mut self.applications,
            RhythmBlock::Practice => &mut self.practice,
            RhythmBlock::Debrief => &mut self.debrief,
        };
        *slot = !*slot;
    }

    pub fn apply(&mut self, patch: RhythmPatch) {
        super::merge(&mut self.deep_work, patch.deep_work);
        super::merge(&mut self.applications, patch.applications);
        super::merge(&mut self.practice, patch.practice);
        super::merge(&mut self.debrief, patch.debrief);
        super::merge(&mut self.notes, patch.notes);
    }

    /// All four blocks done. Notes do not count.
    pub fn is_complete(&self) -> bool {
        RhythmBlock::ALL.iter().all(|block| self.block(*block))
    }

    pub fn completed_blocks(&self) -> usize {
        RhythmBlock::ALL
            .iter()
            .filter(|block| self.block(**block))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::{DailyRhythm, RhythmBlock, RhythmPatch};
    use chrono::NaiveDate;

    #[test]
    fn toggle_and_patch_drive_completion() {
        let mut rhythm = DailyRhythm::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        rhythm.toggle(RhythmBlock::DeepWork);
        rhythm.apply(RhythmPatch {
            applications: Some(true),
            practice: Some(true),
            ..RhythmPatch::default()
        });
        assert_eq!(rhythm.completed_blocks(), 3);
        assert!(!rhythm.is_complete());

        rhythm.toggle(RhythmBlock::Debrief);
        assert!(rhythm.is_complete());

        rhythm.toggle(RhythmBlock::Debrief);
        assert!(!rhythm.is_complete());
    }

    #[test]
    fn parse_accepts_wire_and_snake_names() {
        assert_eq!(RhythmBlock::parse("deepWork"), Some(RhythmBlock::DeepWork));
        assert_eq!(RhythmBlock::parse("deep_work"), Some(RhythmBlock::DeepWork));
        assert_eq!(RhythmBlock::parse("lunch"), None);
    }
}
