use super::CAMPAIGN_WEEKS;
use chrono::{Days, NaiveDate};
use serde::Serialize;

const DAYS_PER_WEEK: i64 = 7;

/// Inclusive seven-day window of one campaign week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekRange {
    pub week: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// 1-based campaign week containing `today`.
///
/// Dates before the campaign start report week 1.
pub fn current_week(start: NaiveDate, today: NaiveDate) -> u32 {
    let days = (today - start).num_days();
    let week = days.div_euclid(DAYS_PER_WEEK) + 1;
    u32::try_from(week.max(1)).unwrap_or(u32::MAX)
}

/// Window for `week`, starting `(week - 1) * 7` days after `start`.
pub fn week_date_range(start: NaiveDate, week: u32) -> WeekRange {
    let week = week.max(1);
    let offset = u64::from(week - 1) * DAYS_PER_WEEK as u64;
    let week_start = start
        .checked_add_days(Days::new(offset))
        .unwrap_or(NaiveDate::MAX);
    let week_end = week_start
        .checked_add_days(Days::new(DAYS_PER_WEEK as u64 - 1))
        .unwrap_or(NaiveDate::MAX);
    WeekRange {
        week,
        start: week_start,
        end: week_end,
    }
}

/// Days left in `week` counting `today` itself; 0 once the week is over.
pub fn days_remaining_in_week(start: NaiveDate, week: u32, today: NaiveDate) -> u32 {
    let range = week_date_range(start, week);
    let remaining = (range.end - today).num_days() + 1;
    u32::try_from(remaining.max(0)).unwrap_or(u32::MAX)
}

/// Ranges of every campaign week, in order.
pub fn campaign_weeks(start: NaiveDate) -> Vec<WeekRange> {
    (1..=CAMPAIGN_WEEKS)
        .map(|week| week_date_range(start, week))
        .collect()
}
