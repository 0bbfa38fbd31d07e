//! Cross-context change signal port and bindings.
//!
//! A "context" is one independently running view of the same substrate
//! (another window, another process). The host's native signal fires in
//! every context except the one that wrote, so a writer's own listeners
//! are reached only through [`super::ChangeBus`].

use super::{Listener, Subscription};
use log::trace;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// Port for the host's "this key changed elsewhere" signal.
pub trait ExternalChangeSignal: Send + Sync {
    /// Announces a committed write of `key` to other contexts.
    fn publish(&self, key: &str);

    /// Registers `listener` for writes of `key` made in other contexts.
    fn listen(&self, key: &str, listener: Listener) -> Subscription;
}

/// Binding for single-context hosts.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSignal;

impl ExternalChangeSignal for NoopSignal {
    fn publish(&self, _key: &str) {}

    fn listen(&self, _key: &str, _listener: Listener) -> Subscription {
        Subscription::detached()
    }
}

/// In-process stand-in for the host signal, connecting several contexts.
///
/// Each context takes its own [`HubEndpoint`]; a publish from one endpoint
/// reaches listeners of every other endpoint and never its own.
#[derive(Clone, Default)]
pub struct SignalHub {
    inner: Arc<HubInner>,
}

#[derive(Default)]
struct HubInner {
    next_endpoint: AtomicU64,
    next_listener: AtomicU64,
    listeners: Mutex<BTreeMap<u64, HubListener>>,
}

struct HubListener {
    endpoint: u64,
    key: String,
    callback: Listener,
}

impl SignalHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the signal binding for one new context.
    pub fn endpoint(&self) -> HubEndpoint {
        HubEndpoint {
            id: self.inner.next_endpoint.fetch_add(1, Ordering::Relaxed),
            hub: self.inner.clone(),
        }
    }
}

/// One context's view of a [`SignalHub`].
pub struct HubEndpoint {
    id: u64,
    hub: Arc<HubInner>,
}

impl ExternalChangeSignal for HubEndpoint {
    fn publish(&self, key: &str) {
        let targets: Vec<Listener> = self
            .hub
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|entry| entry.endpoint != self.id && entry.key == key)
            .map(|entry| entry.callback.clone())
            .collect();

        trace!(
            "event=signal_publish module=notify endpoint={} key={} receivers={}",
            self.id,
            key,
            targets.len()
        );
        for callback in targets {
            callback(key);
        }
    }

    fn listen(&self, key: &str, listener: Listener) -> Subscription {
        let listener_id = self.hub.next_listener.fetch_add(1, Ordering::Relaxed);
        self.hub
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                listener_id,
                HubListener {
                    endpoint: self.id,
                    key: key.to_string(),
                    callback: listener,
                },
            );

        let weak: Weak<HubInner> = Arc::downgrade(&self.hub);
        Subscription::new(move || {
            if let Some(hub) = weak.upgrade() {
                hub.listeners
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .remove(&listener_id);
            }
        })
    }
}
