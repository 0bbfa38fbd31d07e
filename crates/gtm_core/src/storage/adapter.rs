//! Whole-document load/save over a [`KeyValueStore`].
//!
//! # Invariants
//! - `load` never fails: absent, unreadable or unparsable data yields the
//!   default skeleton.
//! - `save` issues exactly one substrate write per call.

use super::{KeyValueStore, StorageResult};
use crate::config::TrackerConfig;
use crate::model::document::{Document, WeeklyTargets};
use chrono::NaiveDate;
use log::{debug, warn};
use std::sync::Arc;

#[derive(Clone)]
pub struct PersistenceAdapter {
    storage: Arc<dyn KeyValueStore>,
    key: String,
    default_targets: WeeklyTargets,
}

impl PersistenceAdapter {
    pub fn new(storage: Arc<dyn KeyValueStore>, config: &TrackerConfig) -> Self {
        Self {
            storage,
            key: config.storage_key.clone(),
            default_targets: config.default_targets,
        }
    }

    /// Storage key the document lives under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Empty document used for first runs and corrupt data.
    pub fn skeleton(&self, today: NaiveDate) -> Document {
        Document::skeleton(today, self.default_targets)
    }

    /// Reads the persisted document, substituting the skeleton on any failure.
    pub fn load(&self, today: NaiveDate) -> Document {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(
                    "event=document_load module=storage status=empty key={}",
                    self.key
                );
                return self.skeleton(today);
            }
            Err(err) => {
                warn!(
                    "event=document_load module=storage status=error key={} error_code=read_failed error={}",
                    self.key, err
                );
                return self.skeleton(today);
            }
        };

        match serde_json::from_str::<Document>(&raw) {
            Ok(doc) => {
                debug!(
                    "event=document_load module=storage status=ok key={} records={}",
                    self.key,
                    doc.record_count()
                );
                doc
            }
            Err(err) => {
                warn!(
                    "event=document_load module=storage status=error key={} error_code=corrupt_document bytes={} error={}",
                    self.key,
                    raw.len(),
                    err
                );
                self.skeleton(today)
            }
        }
    }

    /// Serializes and writes the whole document.
    pub fn save(&self, doc: &Document) -> StorageResult<()> {
        let raw = serde_json::to_string(doc)?;
        self.storage.set(&self.key, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::PersistenceAdapter;
    use crate::config::TrackerConfig;
    use crate::model::document::Document;
    use crate::storage::{KeyValueStore, MemoryKvStore, StorageError, StorageResult};
    use chrono::NaiveDate;
    use std::sync::Arc;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Err(StorageError::Unavailable("quota".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Unavailable("quota".to_string()))
        }

        fn remove(&self, _key: &str) -> StorageResult<()> {
            Ok(())
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    #[test]
    fn load_returns_skeleton_when_empty_or_corrupt() {
        let storage = Arc::new(MemoryKvStore::new());
        let config = TrackerConfig::default();
        let adapter = PersistenceAdapter::new(storage.clone(), &config);
        let expected = Document::skeleton(today(), config.default_targets);

        assert_eq!(adapter.load(today()), expected);

        storage.set(&config.storage_key, "{not json").unwrap();
        assert_eq!(adapter.load(today()), expected);

        storage
            .set(&config.storage_key, r#"{"applications": []}"#)
            .unwrap();
        assert_eq!(adapter.load(today()), expected);
    }

    #[test]
    fn load_returns_skeleton_when_substrate_read_fails() {
        let adapter = PersistenceAdapter::new(Arc::new(BrokenStore), &TrackerConfig::default());
        assert!(adapter.load(today()).applications.is_empty());
        assert!(adapter.save(&adapter.skeleton(today())).is_err());
    }

    #[test]
    fn save_then_load_returns_same_document() {
        let adapter =
            PersistenceAdapter::new(Arc::new(MemoryKvStore::new()), &TrackerConfig::default());
        let mut doc = adapter.skeleton(today());
        doc.rhythm_entry(today()).debrief = true;

        adapter.save(&doc).unwrap();
        assert_eq!(adapter.load(NaiveDate::MIN), doc);
    }
}
