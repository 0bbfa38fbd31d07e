use crate::model::document::Document;
use crate::model::rhythm::DailyRhythm;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Consecutive fully complete days ending today.
///
/// The walk starts at `today`, so an incomplete or missing record for today
/// yields 0 regardless of earlier days.
pub fn rhythm_streak(doc: &Document, today: NaiveDate) -> u32 {
    let by_date: HashMap<NaiveDate, &DailyRhythm> = doc
        .daily_rhythm
        .iter()
        .map(|rhythm| (rhythm.date, rhythm))
        .collect();

    let mut streak = 0;
    let mut day = today;
    while by_date.get(&day).is_some_and(|rhythm| rhythm.is_complete()) {
        streak += 1;
        match day.pred_opt() {
            Some(previous) => day = previous,
            None => break,
        }
    }
    streak
}
