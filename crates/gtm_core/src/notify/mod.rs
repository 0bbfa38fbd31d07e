//! Change notification keyed by storage key.
//!
//! # Responsibility
//! - Deliver same-context change notifications explicitly (`ChangeBus`).
//! - Define the port for the host's cross-context signal
//!   (`ExternalChangeSignal`), which never echoes a context's own writes.
//!
//! # Invariants
//! - Listeners run outside internal locks and may re-enter the bus.
//! - A notification carries only the key; receivers re-read storage.
//! - Delivery is best-effort with no acknowledgement or ordering guarantee
//!   across contexts.

mod bus;
mod external;

pub use bus::ChangeBus;
pub use external::{ExternalChangeSignal, HubEndpoint, NoopSignal, SignalHub};

use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Callback invoked with the key that changed.
pub type Listener = Arc<dyn Fn(&str) + Send + Sync>;

/// Registration handle returned by `subscribe`/`listen`.
///
/// Dropping the handle unsubscribes, as does calling [`Subscription::unsubscribe`].
#[must_use = "dropping a Subscription unsubscribes the listener immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub(crate) fn new(cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Handle that owns no registration.
    pub fn detached() -> Self {
        Self { cancel: None }
    }

    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl Debug for Subscription {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
