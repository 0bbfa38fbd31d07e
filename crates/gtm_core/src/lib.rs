//! Local-first job-search campaign tracker core.
//! This crate is the single source of truth for tracker document invariants.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod notify;
pub mod storage;
pub mod store;
pub mod tracker;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{TrackerConfig, DEFAULT_STORAGE_KEY};
pub use logging::{init_logging, init_stderr_logging, logging_status, LogSink};
pub use model::application::{
    Application, ApplicationPatch, ApplicationStatus, NewApplication,
};
pub use model::document::{Document, Settings, SettingsPatch, WeeklyTargets};
pub use model::records::{
    ContactStatus, Drill, DrillPatch, MockInterview, MockInterviewPatch, MockInterviewType,
    NetworkingContact, NetworkingContactPatch, NewDrill, NewMockInterview, NewNetworkingContact,
    NewStory, Story, StoryPatch,
};
pub use model::rhythm::{DailyRhythm, RhythmBlock, RhythmPatch};
pub use model::{EntityId, Record, Timestamp};
pub use notify::{
    ChangeBus, ExternalChangeSignal, HubEndpoint, Listener, NoopSignal, SignalHub, Subscription,
};
pub use storage::{
    KeyValueStore, MemoryKvStore, PersistenceAdapter, SqliteKvStore, StorageError, StorageResult,
};
pub use store::{ImportError, Observer, StoreBindings, TrackerStore};
pub use tracker::{Dashboard, GtmTracker};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
