//! Derived metrics over the tracker document.
//!
//! # Responsibility
//! - Compute campaign weeks, weekly progress, the pipeline funnel, overall
//!   progress, the rhythm streak and the recent-activity feed.
//!
//! # Invariants
//! - Every function is pure: output depends only on the document and the
//!   calendar date passed in.
//! - The campaign horizon is capped at [`CAMPAIGN_WEEKS`].

mod activity;
mod calendar;
mod pipeline;
mod streak;
mod weekly;

pub use activity::{recent_activity, ActivityItem, ActivityKind};
pub use calendar::{
    campaign_weeks, current_week, days_remaining_in_week, week_date_range, WeekRange,
};
pub use pipeline::{pipeline_funnel, PipelineFunnel};
pub use streak::rhythm_streak;
pub use weekly::{overall_progress, weekly_metrics, MetricCategory, Progress, WeeklyMetrics};

/// Number of weeks a campaign runs.
pub const CAMPAIGN_WEEKS: u32 = 6;

/// `round(100 * actual / target)`, or 0 when there is no target.
/// Saturates at `u32::MAX` for absurd ratios.
pub fn percent(actual: u64, target: u64) -> u32 {
    if target == 0 {
        return 0;
    }
    // Float-to-int `as` saturates.
    (actual as f64 * 100.0 / target as f64).round() as u32
}
