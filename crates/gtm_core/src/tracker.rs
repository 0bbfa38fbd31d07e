//! Read/write facade over the store and the derived metrics.
//!
//! # Responsibility
//! - Give presentation code one surface for commands and dashboard getters.
//! - Evaluate every derived metric at the injected clock's current date.

use crate::clock::Clock;
use crate::config::TrackerConfig;
use crate::db::DbResult;
use crate::metrics::{
    current_week, days_remaining_in_week, overall_progress, pipeline_funnel, recent_activity,
    rhythm_streak, week_date_range, weekly_metrics, ActivityItem, PipelineFunnel, WeekRange,
    WeeklyMetrics,
};
use crate::model::application::{ApplicationPatch, NewApplication};
use crate::model::document::{Document, SettingsPatch};
use crate::model::records::{
    DrillPatch, MockInterviewPatch, NetworkingContactPatch, NewDrill, NewMockInterview,
    NewNetworkingContact, NewStory, StoryPatch,
};
use crate::model::rhythm::{RhythmBlock, RhythmPatch};
use crate::model::EntityId;
use crate::notify::{ChangeBus, NoopSignal};
use crate::storage::{MemoryKvStore, SqliteKvStore};
use crate::store::{StoreBindings, TrackerStore};
use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// Entries shown by [`GtmTracker::dashboard`].
pub const DASHBOARD_ACTIVITY_LIMIT: usize = 10;

/// Everything the dashboard renders, computed from one document snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub today: NaiveDate,
    pub current_week: u32,
    pub days_remaining_in_week: u32,
    pub this_week: WeeklyMetrics,
    pub pipeline: PipelineFunnel,
    pub overall_progress: u32,
    pub rhythm_streak: u32,
    pub recent_activity: Vec<ActivityItem>,
}

pub struct GtmTracker {
    store: TrackerStore,
    clock: Arc<dyn Clock>,
}

impl GtmTracker {
    /// Attaches to the bindings and completes hydration.
    pub fn open(bindings: StoreBindings, config: &TrackerConfig) -> Self {
        let clock = bindings.clock.clone();
        Self {
            store: TrackerStore::open(bindings, config),
            clock,
        }
    }

    /// Attaches without loading; see [`TrackerStore::attach`].
    pub fn attach(bindings: StoreBindings, config: &TrackerConfig) -> Self {
        let clock = bindings.clock.clone();
        Self {
            store: TrackerStore::attach(bindings, config),
            clock,
        }
    }

    /// Single-context tracker backed by process memory.
    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        Self::open(
            StoreBindings {
                storage: Arc::new(MemoryKvStore::new()),
                bus: ChangeBus::new(),
                signal: Arc::new(NoopSignal),
                clock,
            },
            &TrackerConfig::default(),
        )
    }

    /// Single-context tracker persisted in a SQLite file.
    pub fn open_sqlite(
        path: impl AsRef<Path>,
        clock: Arc<dyn Clock>,
        config: &TrackerConfig,
    ) -> DbResult<Self> {
        let storage = SqliteKvStore::open(path)?;
        Ok(Self::open(
            StoreBindings {
                storage: Arc::new(storage),
                bus: ChangeBus::new(),
                signal: Arc::new(NoopSignal),
                clock,
            },
            config,
        ))
    }

    pub fn store(&self) -> &TrackerStore {
        &self.store
    }

    pub fn is_loading(&self) -> bool {
        self.store.is_loading()
    }

    pub fn hydrate(&self) {
        self.store.hydrate();
    }

    pub fn document(&self) -> Document {
        self.store.document()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn add_application(&self, draft: NewApplication) -> EntityId {
        self.store.add_application(draft)
    }

    pub fn update_application(&self, id: &str, patch: ApplicationPatch) {
        self.store.update_application(id, patch);
    }

    pub fn delete_application(&self, id: &str) {
        self.store.delete_application(id);
    }

    pub fn add_story(&self, draft: NewStory) -> EntityId {
        self.store.add_story(draft)
    }

    pub fn update_story(&self, id: &str, patch: StoryPatch) {
        self.store.update_story(id, patch);
    }

    pub fn delete_story(&self, id: &str) {
        self.store.delete_story(id);
    }

    pub fn add_mock_interview(&self, draft: NewMockInterview) -> EntityId {
        self.store.add_mock_interview(draft)
    }

    pub fn update_mock_interview(&self, id: &str, patch: MockInterviewPatch) {
        self.store.update_mock_interview(id, patch);
    }

    pub fn delete_mock_interview(&self, id: &str) {
        self.store.delete_mock_interview(id);
    }

    pub fn add_drill(&self, draft: NewDrill) -> EntityId {
        self.store.add_drill(draft)
    }

    pub fn update_drill(&self, id: &str, patch: DrillPatch) {
        self.store.update_drill(id, patch);
    }

    pub fn delete_drill(&self, id: &str) {
        self.store.delete_drill(id);
    }

    pub fn add_networking_contact(&self, draft: NewNetworkingContact) -> EntityId {
        self.store.add_networking_contact(draft)
    }

    pub fn update_networking_contact(&self, id: &str, patch: NetworkingContactPatch) {
        self.store.update_networking_contact(id, patch);
    }

    pub fn delete_networking_contact(&self, id: &str) {
        self.store.delete_networking_contact(id);
    }

    pub fn toggle_rhythm_item(&self, date: NaiveDate, block: RhythmBlock) {
        self.store.toggle_rhythm_item(date, block);
    }

    pub fn update_rhythm(&self, date: NaiveDate, patch: RhythmPatch) {
        self.store.update_rhythm(date, patch);
    }

    pub fn update_settings(&self, patch: SettingsPatch) {
        self.store.update_settings(patch);
    }

    pub fn export_data(&self) -> String {
        self.store.export_data()
    }

    pub fn import_data(&self, json: &str) -> bool {
        self.store.import_data(json)
    }

    pub fn clear_all_data(&self) {
        self.store.clear_all_data();
    }

    pub fn current_week(&self) -> u32 {
        current_week(self.store.settings().start_date, self.today())
    }

    pub fn week_date_range(&self, week: u32) -> WeekRange {
        week_date_range(self.store.settings().start_date, week)
    }

    pub fn current_week_range(&self) -> WeekRange {
        self.week_date_range(self.current_week())
    }

    pub fn days_remaining_in_week(&self) -> u32 {
        let start = self.store.settings().start_date;
        let today = self.today();
        days_remaining_in_week(start, current_week(start, today), today)
    }

    pub fn weekly_metrics(&self, week: u32) -> WeeklyMetrics {
        weekly_metrics(&self.store.document(), week)
    }

    pub fn current_week_metrics(&self) -> WeeklyMetrics {
        self.weekly_metrics(self.current_week())
    }

    pub fn pipeline_funnel(&self) -> PipelineFunnel {
        pipeline_funnel(&self.store.document())
    }

    pub fn overall_progress(&self) -> u32 {
        overall_progress(&self.store.document(), self.current_week())
    }

    pub fn recent_activity(&self, limit: usize) -> Vec<ActivityItem> {
        recent_activity(&self.store.document(), limit)
    }

    pub fn rhythm_streak(&self) -> u32 {
        rhythm_streak(&self.store.document(), self.today())
    }

    /// Computes every dashboard metric from a single snapshot.
    pub fn dashboard(&self) -> Dashboard {
        let doc = self.store.document();
        let today = self.today();
        let week = current_week(doc.settings.start_date, today);

        Dashboard {
            today,
            current_week: week,
            days_remaining_in_week: days_remaining_in_week(doc.settings.start_date, week, today),
            this_week: weekly_metrics(&doc, week),
            pipeline: pipeline_funnel(&doc),
            overall_progress: overall_progress(&doc, week),
            rhythm_streak: rhythm_streak(&doc, today),
            recent_activity: recent_activity(&doc, DASHBOARD_ACTIVITY_LIMIT),
        }
    }
}
