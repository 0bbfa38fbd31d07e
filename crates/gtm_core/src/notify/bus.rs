use super::{Listener, Subscription};
use log::trace;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

type Registry = BTreeMap<String, BTreeMap<u64, Listener>>;

/// Same-context publish/subscribe registry.
///
/// Writes made in the current context never trigger the host's
/// cross-context signal, so writers call [`ChangeBus::notify`] themselves.
/// Cloning yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct ChangeBus {
    inner: Arc<BusInner>,
}

#[derive(Default)]
struct BusInner {
    next_id: AtomicU64,
    listeners: Mutex<Registry>,
}

impl ChangeBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` for `key` until the returned handle is dropped.
    pub fn subscribe(&self, key: &str, listener: Listener) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key.to_string())
            .or_default()
            .insert(id, listener);

        let weak: Weak<BusInner> = Arc::downgrade(&self.inner);
        let key = key.to_string();
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.remove(&key, id);
            }
        })
    }

    /// Invokes every listener registered for `key` in this context.
    pub fn notify(&self, key: &str) {
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .map(|by_id| by_id.values().cloned().collect())
            .unwrap_or_default();

        trace!(
            "event=bus_notify module=notify key={} listeners={}",
            key,
            listeners.len()
        );
        for listener in listeners {
            listener(key);
        }
    }

    pub fn listener_count(&self, key: &str) -> usize {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .map_or(0, BTreeMap::len)
    }
}

impl BusInner {
    fn remove(&self, key: &str, id: u64) {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(by_id) = listeners.get_mut(key) {
            by_id.remove(&id);
            if by_id.is_empty() {
                listeners.remove(key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ChangeBus;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn notify_reaches_only_matching_key() {
        let bus = ChangeBus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let _sub = bus.subscribe(
            "a",
            Arc::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        bus.notify("a");
        bus.notify("b");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dropping_or_unsubscribing_removes_listener() {
        let bus = ChangeBus::new();
        let first = bus.subscribe("k", Arc::new(|_| {}));
        let second = bus.subscribe("k", Arc::new(|_| {}));
        assert_eq!(bus.listener_count("k"), 2);

        first.unsubscribe();
        assert_eq!(bus.listener_count("k"), 1);
        drop(second);
        assert_eq!(bus.listener_count("k"), 0);
    }

    #[test]
    fn listener_may_subscribe_during_notify() {
        let bus = ChangeBus::new();
        let nested = bus.clone();
        let held = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = held.clone();
        let _sub = bus.subscribe(
            "k",
            Arc::new(move |key| {
                let sub = nested.subscribe(key, Arc::new(|_| {}));
                sink.lock().unwrap().push(sub);
            }),
        );

        bus.notify("k");
        assert_eq!(bus.listener_count("k"), 2);
    }
}
