//! Tracker data store: the single owner of the canonical document.
//!
//! # Responsibility
//! - Expose typed commands over every collection, rhythm and settings.
//! - Persist the whole document after every committed command.
//! - Signal same-context listeners, other contexts and local observers.
//! - Re-read storage when another view reports a change.
//!
//! # Invariants
//! - Every command is read-current -> compute-next -> persist-next, run to
//!   completion under the state lock. Nothing suspends.
//! - Commands on an unknown id are silent no-ops: nothing is written and
//!   nobody is notified.
//! - Commands never return errors. Storage failures are logged and the
//!   in-memory document still advances.
//! - Concurrent writers in different contexts resolve last-write-wins.

mod import;

pub use import::{parse_import, ImportError};

use crate::clock::Clock;
use crate::config::TrackerConfig;
use crate::model::application::{Application, ApplicationPatch, NewApplication};
use crate::model::document::{Document, Settings, SettingsPatch};
use crate::model::records::{
    Drill, DrillPatch, MockInterview, MockInterviewPatch, NetworkingContact,
    NetworkingContactPatch, NewDrill, NewMockInterview, NewNetworkingContact, NewStory, Story,
    StoryPatch,
};
use crate::model::rhythm::{DailyRhythm, RhythmBlock, RhythmPatch};
use crate::model::{new_entity_id, EntityId, Record, Timestamp};
use crate::notify::{ChangeBus, ExternalChangeSignal, Subscription};
use crate::storage::{KeyValueStore, PersistenceAdapter};
use chrono::NaiveDate;
use log::{debug, error, info, warn};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// Callback fired with the new document after every visible change.
pub type Observer = Arc<dyn Fn(&Document) + Send + Sync>;

/// Host bindings a store is attached to.
#[derive(Clone)]
pub struct StoreBindings {
    pub storage: Arc<dyn KeyValueStore>,
    pub bus: ChangeBus,
    pub signal: Arc<dyn ExternalChangeSignal>,
    pub clock: Arc<dyn Clock>,
}

/// One view's handle on the tracker document.
///
/// Several stores may be attached to the same storage key; each keeps a
/// private copy reconciled through change notifications.
pub struct TrackerStore {
    inner: Arc<StoreInner>,
    _subscriptions: Vec<Subscription>,
}

struct StoreInner {
    adapter: PersistenceAdapter,
    bus: ChangeBus,
    signal: Arc<dyn ExternalChangeSignal>,
    clock: Arc<dyn Clock>,
    state: Mutex<StoreState>,
    observers: Mutex<BTreeMap<u64, Observer>>,
    next_observer: AtomicU64,
}

struct StoreState {
    doc: Document,
    hydrated: bool,
}

impl TrackerStore {
    /// Attaches a store without reading storage yet.
    ///
    /// Until [`TrackerStore::hydrate`] runs, `is_loading()` is true and reads
    /// see a placeholder skeleton.
    pub fn attach(bindings: StoreBindings, config: &TrackerConfig) -> Self {
        let adapter = PersistenceAdapter::new(bindings.storage, config);
        let placeholder = adapter.skeleton(bindings.clock.today());
        let inner = Arc::new(StoreInner {
            adapter,
            bus: bindings.bus,
            signal: bindings.signal,
            clock: bindings.clock,
            state: Mutex::new(StoreState {
                doc: placeholder,
                hydrated: false,
            }),
            observers: Mutex::new(BTreeMap::new()),
            next_observer: AtomicU64::new(0),
        });

        let key = inner.adapter.key().to_string();
        let subscriptions = vec![
            inner.bus.subscribe(&key, reload_listener(&inner, "bus")),
            inner.signal.listen(&key, reload_listener(&inner, "external")),
        ];

        Self {
            inner,
            _subscriptions: subscriptions,
        }
    }

    /// Attaches and hydrates in one step.
    pub fn open(bindings: StoreBindings, config: &TrackerConfig) -> Self {
        let store = Self::attach(bindings, config);
        store.hydrate();
        store
    }

    /// Completes the initial load. Later calls are no-ops.
    pub fn hydrate(&self) {
        if self.is_loading() {
            self.inner.reload("hydrate");
        }
    }

    /// True until the first load from storage has completed.
    pub fn is_loading(&self) -> bool {
        !self.inner.lock_state().hydrated
    }

    /// Re-reads storage, firing observers if the document changed.
    pub fn refresh(&self) {
        self.inner.reload("refresh");
    }

    pub fn storage_key(&self) -> &str {
        self.inner.adapter.key()
    }

    /// Registers an observer until the returned handle is dropped.
    pub fn watch(&self, observer: Observer) -> Subscription {
        let id = self.inner.next_observer.fetch_add(1, Ordering::Relaxed);
        self.inner
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, observer);

        let weak = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner
                    .observers
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .remove(&id);
            }
        })
    }

    /// Snapshot of the current document.
    pub fn document(&self) -> Document {
        self.inner.lock_state().doc.clone()
    }

    pub fn settings(&self) -> Settings {
        self.inner.lock_state().doc.settings.clone()
    }

    pub fn get<R: Record>(&self, id: &str) -> Option<R> {
        self.inner.lock_state().doc.find::<R>(id).cloned()
    }

    pub fn list<R: Record>(&self) -> Vec<R> {
        R::items(&self.inner.lock_state().doc).to_vec()
    }

    pub fn rhythm_for(&self, date: NaiveDate) -> Option<DailyRhythm> {
        self.inner.lock_state().doc.rhythm_for(date).cloned()
    }

    /// Appends a new record and returns its freshly minted id.
    pub fn add<R: Record>(&self, draft: R::Draft) -> EntityId {
        let mut created = None;
        self.inner.commit("add", R::COLLECTION, |doc, now| {
            let id = new_entity_id(now);
            R::items_mut(doc).push(R::create(id.clone(), now, draft));
            created = Some(id);
            true
        });
        created.unwrap_or_default()
    }

    /// Merges `patch` into the record with `id`; no-op when absent.
    pub fn update<R: Record>(&self, id: &str, patch: R::Patch) {
        self.inner.commit("update", R::COLLECTION, |doc, now| {
            match R::items_mut(doc).iter_mut().find(|item| item.id() == id) {
                Some(item) => {
                    item.apply(patch, now);
                    true
                }
                None => false,
            }
        });
    }

    /// Removes the record with `id`; repeated deletes are no-ops.
    pub fn delete<R: Record>(&self, id: &str) {
        self.inner.commit("delete", R::COLLECTION, |doc, _| {
            let items = R::items_mut(doc);
            let before = items.len();
            items.retain(|item| item.id() != id);
            items.len() != before
        });
    }

    pub fn add_application(&self, draft: NewApplication) -> EntityId {
        self.add::<Application>(draft)
    }

    pub fn update_application(&self, id: &str, patch: ApplicationPatch) {
        self.update::<Application>(id, patch);
    }

    pub fn delete_application(&self, id: &str) {
        self.delete::<Application>(id);
    }

    pub fn add_story(&self, draft: NewStory) -> EntityId {
        self.add::<Story>(draft)
    }

    pub fn update_story(&self, id: &str, patch: StoryPatch) {
        self.update::<Story>(id, patch);
    }

    pub fn delete_story(&self, id: &str) {
        self.delete::<Story>(id);
    }

    pub fn add_mock_interview(&self, draft: NewMockInterview) -> EntityId {
        self.add::<MockInterview>(draft)
    }

    pub fn update_mock_interview(&self, id: &str, patch: MockInterviewPatch) {
        self.update::<MockInterview>(id, patch);
    }

    pub fn delete_mock_interview(&self, id: &str) {
        self.delete::<MockInterview>(id);
    }

    pub fn add_drill(&self, draft: NewDrill) -> EntityId {
        self.add::<Drill>(draft)
    }

    pub fn update_drill(&self, id: &str, patch: DrillPatch) {
        self.update::<Drill>(id, patch);
    }

    pub fn delete_drill(&self, id: &str) {
        self.delete::<Drill>(id);
    }

    pub fn add_networking_contact(&self, draft: NewNetworkingContact) -> EntityId {
        self.add::<NetworkingContact>(draft)
    }

    pub fn update_networking_contact(&self, id: &str, patch: NetworkingContactPatch) {
        self.update::<NetworkingContact>(id, patch);
    }

    pub fn delete_networking_contact(&self, id: &str) {
        self.delete::<NetworkingContact>(id);
    }

    /// Flips one block of the checklist for `date`, creating the record first
    /// if needed.
    pub fn toggle_rhythm_item(&self, date: NaiveDate, block: RhythmBlock) {
        self.inner.commit("toggle", "dailyRhythm", |doc, _| {
            doc.rhythm_entry(date).toggle(block);
            true
        });
    }

    /// Merges `patch` into the checklist for `date`, creating it if needed.
    pub fn update_rhythm(&self, date: NaiveDate, patch: RhythmPatch) {
        self.inner.commit("update", "dailyRhythm", |doc, _| {
            doc.rhythm_entry(date).apply(patch);
            true
        });
    }

    pub fn update_settings(&self, patch: SettingsPatch) {
        self.inner.commit("update", "settings", |doc, _| {
            doc.settings.apply(patch);
            true
        });
    }

    /// Pretty-printed JSON of the whole document.
    pub fn export_data(&self) -> String {
        let doc = self.document();
        match serde_json::to_string_pretty(&doc) {
            Ok(json) => json,
            Err(err) => {
                error!(
                    "event=export module=store status=error error_code=serialize_failed error={}",
                    err
                );
                String::new()
            }
        }
    }

    /// Replaces the whole document with an exported payload.
    ///
    /// Returns `false` and leaves the current document untouched when the
    /// payload fails the shape check.
    pub fn import_data(&self, json: &str) -> bool {
        let imported = match parse_import(json) {
            Ok(doc) => doc,
            Err(err) => {
                warn!(
                    "event=import module=store status=rejected error_code={} error={}",
                    err.code(),
                    err
                );
                return false;
            }
        };

        let records = imported.record_count();
        self.inner.commit("import", "document", move |doc, _| {
            *doc = imported;
            true
        });
        info!("event=import module=store status=ok records={records}");
        true
    }

    /// Resets to an empty document whose campaign starts today.
    pub fn clear_all_data(&self) {
        let today = self.inner.clock.today();
        let skeleton = self.inner.adapter.skeleton(today);
        self.inner.commit("clear", "document", move |doc, _| {
            *doc = skeleton;
            true
        });
    }
}

impl StoreInner {
    fn lock_state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs one command. `compute` returns false for a no-op.
    fn commit<F>(&self, command: &'static str, target: &'static str, compute: F) -> bool
    where
        F: FnOnce(&mut Document, Timestamp) -> bool,
    {
        if !self.lock_state().hydrated {
            self.reload("hydrate");
        }

        let now = self.clock.now();
        let (next, persisted) = {
            let mut state = self.lock_state();
            let mut next = state.doc.clone();
            if !compute(&mut next, now) {
                debug!(
                    "event=command module=store status=noop command={} target={}",
                    command, target
                );
                return false;
            }

            let persisted = match self.adapter.save(&next) {
                Ok(()) => true,
                Err(err) => {
                    error!(
                        "event=command module=store status=error command={} target={} error_code=persist_failed error={}",
                        command, target, err
                    );
                    false
                }
            };
            state.doc = next.clone();
            (next, persisted)
        };

        debug!(
            "event=command module=store status=ok command={} target={} persisted={}",
            command, target, persisted
        );
        if persisted {
            let key = self.adapter.key();
            self.bus.notify(key);
            self.signal.publish(key);
        }
        self.notify_observers(&next);
        true
    }

    fn reload(&self, source: &'static str) {
        let loaded = self.adapter.load(self.clock.today());
        let changed = {
            let mut state = self.lock_state();
            let was_hydrated = state.hydrated;
            state.hydrated = true;
            if was_hydrated && state.doc == loaded {
                false
            } else {
                state.doc = loaded.clone();
                true
            }
        };

        debug!(
            "event=reload module=store source={} changed={}",
            source, changed
        );
        if changed {
            self.notify_observers(&loaded);
        }
    }

    fn notify_observers(&self, doc: &Document) {
        let observers: Vec<Observer> = self
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        for observer in observers {
            observer(doc);
        }
    }
}

fn reload_listener(inner: &Arc<StoreInner>, source: &'static str) -> crate::notify::Listener {
    let weak: Weak<StoreInner> = Arc::downgrade(inner);
    Arc::new(move |_key| {
        if let Some(inner) = weak.upgrade() {
            inner.reload(source);
        }
    })
}
