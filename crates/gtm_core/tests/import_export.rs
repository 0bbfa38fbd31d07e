use chrono::{NaiveDate, TimeZone, Utc};
use gtm_core::{
    Application, ApplicationStatus, ChangeBus, FixedClock, GtmTracker, KeyValueStore, MemoryKvStore,
    MockInterviewType, NewApplication, NewDrill, NewMockInterview, NewNetworkingContact,
    NewStory, NoopSignal, RhythmBlock, StoreBindings, TrackerConfig, TrackerStore,
};
use std::sync::Arc;

fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2024, 1, 10, 9, 30, 0).unwrap(),
    ))
}

/// Passes the collection shape check but leaves out optional text fields.
const SPARSE_DOC: &str = r#"{
    "applications": [{
        "id": "lr8x1k0abcdefghi",
        "company": "Acme",
        "role": "SRE",
        "status": "applied",
        "appliedDate": "2024-01-08",
        "lastUpdate": "2024-01-08T12:00:00Z",
        "createdAt": "2024-01-08T12:00:00Z"
    }],
    "stories": [{"id": "s1", "title": "Outage", "createdAt": "2024-01-08T12:00:00Z"}],
    "mockInterviews": [{"id": "m1", "date": "2024-01-09", "createdAt": "2024-01-09T12:00:00Z"}],
    "drills": [{"id": "d1", "date": "2024-01-09", "createdAt": "2024-01-09T12:00:00Z"}],
    "networkingContacts": [{"id": "c1", "name": "Ana", "createdAt": "2024-01-09T12:00:00Z"}],
    "dailyRhythm": [{"date": "2024-01-09", "deepWork": true}],
    "settings": {
        "startDate": "2024-01-08",
        "weeklyTargets": {"applications": 5, "mockInterviews": 2, "drills": 5, "networking": 5}
    }
}"#;

fn seeded_tracker() -> GtmTracker {
    let tracker = GtmTracker::in_memory(clock());
    let day = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
    tracker.add_application(NewApplication {
        status: ApplicationStatus::Loop,
        applied_date: Some(day),
        job_url: Some("https://jobs.example.com/42".to_string()),
        ..NewApplication::new("Acme", "Principal Engineer")
    });
    tracker.add_story(NewStory {
        title: "Cut p99 latency".to_string(),
        tags: vec!["performance".to_string()],
        ..NewStory::default()
    });
    tracker.add_mock_interview(NewMockInterview {
        rating: Some(4),
        ..NewMockInterview::new(day, MockInterviewType::SystemDesign)
    });
    tracker.add_drill(NewDrill {
        elements_completed: vec!["hook".to_string(), "ask".to_string()],
        ..NewDrill::new(day, "pitch")
    });
    tracker.add_networking_contact(NewNetworkingContact::new("Sam", "Acme"));
    tracker.toggle_rhythm_item(day, RhythmBlock::Debrief);
    tracker
}

#[test]
fn export_then_import_round_trips_identically() {
    let tracker = seeded_tracker();
    let before = tracker.document();

    let exported = tracker.export_data();
    assert!(exported.contains('\n'), "export should be pretty-printed");
    assert!(tracker.import_data(&exported));

    assert_eq!(tracker.document(), before);
    assert_eq!(tracker.export_data(), exported);
}

#[test]
fn export_imports_into_a_fresh_tracker() {
    let source = seeded_tracker();
    let target = GtmTracker::in_memory(clock());

    assert!(target.import_data(&source.export_data()));
    assert_eq!(target.document(), source.document());
}

#[test]
fn import_of_garbage_returns_false_and_keeps_document() {
    let tracker = seeded_tracker();
    let before = tracker.document();

    assert!(!tracker.import_data("not json"));
    assert!(!tracker.import_data("{}"));
    assert!(!tracker.import_data(r#"{"applications": "nope"}"#));
    assert!(!tracker.import_data("[1, 2, 3]"));

    assert_eq!(tracker.document(), before);
}

#[test]
fn rejected_import_does_not_write_storage() {
    let storage = Arc::new(MemoryKvStore::new());
    let store = TrackerStore::open(
        StoreBindings {
            storage: storage.clone(),
            bus: ChangeBus::new(),
            signal: Arc::new(NoopSignal),
            clock: clock(),
        },
        &TrackerConfig::default(),
    );

    assert!(!store.import_data("not json"));
    assert!(storage.get(store.storage_key()).unwrap().is_none());
}

#[test]
fn exported_wire_shape_uses_camel_case_collections() {
    let exported = seeded_tracker().export_data();
    let value: serde_json::Value = serde_json::from_str(&exported).unwrap();

    for key in [
        "applications",
        "stories",
        "mockInterviews",
        "drills",
        "networkingContacts",
        "dailyRhythm",
    ] {
        assert!(value[key].is_array(), "missing {key}");
    }
    assert_eq!(value["applications"][0]["status"], "loop");
    assert_eq!(value["applications"][0]["appliedDate"], "2024-01-10");
    assert_eq!(value["mockInterviews"][0]["type"], "system_design");
    assert_eq!(value["dailyRhythm"][0]["debrief"], true);
    assert_eq!(value["settings"]["startDate"], "2024-01-10");
}

#[test]
fn import_accepts_records_missing_free_text_fields() {
    let tracker = GtmTracker::in_memory(clock());

    assert!(tracker.import_data(SPARSE_DOC));

    let doc = tracker.document();
    let app = &doc.applications[0];
    assert_eq!(app.company, "Acme");
    assert_eq!(app.notes, "");
    assert_eq!(app.status, ApplicationStatus::Applied);
    assert!(doc.stories[0].tags.is_empty());
    assert_eq!(doc.mock_interviews[0].kind, MockInterviewType::Behavioral);
    assert!(doc.drills[0].elements_completed.is_empty());
    assert_eq!(doc.networking_contacts[0].company, "");
    assert!(doc.daily_rhythm[0].deep_work);
    assert!(!doc.daily_rhythm[0].debrief);
}

#[test]
fn sparse_stored_document_is_loaded_not_replaced() {
    let storage = Arc::new(MemoryKvStore::new());
    let config = TrackerConfig::default();
    storage.set(&config.storage_key, SPARSE_DOC).unwrap();

    let store = TrackerStore::open(
        StoreBindings {
            storage: storage.clone(),
            bus: ChangeBus::new(),
            signal: Arc::new(NoopSignal),
            clock: clock(),
        },
        &config,
    );
    store.add_story(NewStory {
        title: "Migration".to_string(),
        ..NewStory::default()
    });

    assert!(store.get::<Application>("lr8x1k0abcdefghi").is_some());
    assert_eq!(store.document().stories.len(), 2);
    let stored = storage.get(&config.storage_key).unwrap().unwrap();
    assert!(stored.contains("\"Acme\""));
}
