use gtm_core::{
    Application, ApplicationStatus, ChangeBus, FixedClock, GtmTracker, KeyValueStore,
    NewApplication, RhythmBlock, SignalHub, SqliteKvStore, StoreBindings, TrackerConfig,
    TrackerStore, DEFAULT_STORAGE_KEY,
};
use chrono::NaiveDate;
use std::sync::Arc;
use tempfile::TempDir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn tracker_document_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tracker.sqlite3");
    let clock = Arc::new(FixedClock::at_date(date(2024, 1, 3)));

    let id = {
        let tracker =
            GtmTracker::open_sqlite(&path, clock.clone(), &TrackerConfig::default()).unwrap();
        tracker.toggle_rhythm_item(date(2024, 1, 3), RhythmBlock::DeepWork);
        tracker.add_application(NewApplication {
            status: ApplicationStatus::Applied,
            ..NewApplication::new("Acme", "SRE")
        })
    };

    let reopened = GtmTracker::open_sqlite(&path, clock, &TrackerConfig::default()).unwrap();
    let app = reopened.store().get::<Application>(&id).unwrap();
    assert_eq!(app.company, "Acme");
    assert_eq!(app.status, ApplicationStatus::Applied);
    assert!(reopened.store().rhythm_for(date(2024, 1, 3)).unwrap().deep_work);

    let storage = SqliteKvStore::open(&path).unwrap();
    assert_eq!(storage.keys().unwrap(), vec![DEFAULT_STORAGE_KEY.to_string()]);
}

#[test]
fn storage_keys_isolate_documents_in_one_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tracker.sqlite3");
    let clock = Arc::new(FixedClock::at_date(date(2024, 1, 3)));

    let work = GtmTracker::open_sqlite(
        &path,
        clock.clone(),
        &TrackerConfig::with_storage_key("campaign-work"),
    )
    .unwrap();
    let side = GtmTracker::open_sqlite(
        &path,
        clock,
        &TrackerConfig::with_storage_key("campaign-side"),
    )
    .unwrap();

    work.add_application(NewApplication::new("Acme", "SRE"));

    assert_eq!(work.document().applications.len(), 1);
    assert!(side.document().applications.is_empty());
}

#[test]
fn two_connections_converge_through_the_signal_hub() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tracker.sqlite3");
    let clock = Arc::new(FixedClock::at_date(date(2024, 1, 3)));
    let hub = SignalHub::new();
    let config = TrackerConfig::default();

    let open_view = || {
        TrackerStore::open(
            StoreBindings {
                storage: Arc::new(SqliteKvStore::open(&path).unwrap()),
                bus: ChangeBus::new(),
                signal: Arc::new(hub.endpoint()),
                clock: clock.clone(),
            },
            &config,
        )
    };
    let first = open_view();
    let second = open_view();

    let id = first.add_application(NewApplication::new("Globex", "Staff SWE"));

    assert_eq!(second.document(), first.document());
    assert!(second.get::<Application>(&id).is_some());

    let raw = SqliteKvStore::open(&path)
        .unwrap()
        .get(DEFAULT_STORAGE_KEY)
        .unwrap()
        .unwrap();
    assert!(raw.contains("\"Globex\""));
}
