//! In-memory document store with change notification.
//!
//! The store is the single authoritative holder of the live
//! [`PortfolioDocument`]. Consumers read snapshots and write wholesale
//! replacements; every write synchronously notifies all subscribed
//! observers, in subscription order, before returning.

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::document::PortfolioDocument;

/// An observer callback, invoked with the new document on every write.
pub type Observer = Box<dyn Fn(&PortfolioDocument) + Send + Sync>;

/// Handle returned by [`DocumentStore::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription(u64);

/// Single authoritative accessor for the current portfolio document.
///
/// Constructed once per process and shared (typically behind an `Arc`);
/// there are no implicit singletons. All operations are synchronous and
/// never suspend. Observers must not subscribe or unsubscribe from within
/// a notification callback.
pub struct DocumentStore {
    /// The live document.
    document: Mutex<PortfolioDocument>,
    /// Subscribed observers, in subscription order.
    observers: Mutex<Vec<(u64, Observer)>>,
    /// Next subscription token.
    next_token: AtomicU64,
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let observer_count = self.observers.lock().map(|o| o.len()).unwrap_or(0);
        f.debug_struct("DocumentStore")
            .field("observers", &observer_count)
            .finish_non_exhaustive()
    }
}

impl DocumentStore {
    /// Create a store holding the given initial document.
    #[must_use]
    pub fn new(initial: PortfolioDocument) -> Self {
        Self {
            document: Mutex::new(initial),
            observers: Mutex::new(Vec::new()),
            next_token: AtomicU64::new(1),
        }
    }

    /// Get a snapshot of the current document.
    ///
    /// Repeated calls without intervening writes return equal documents.
    #[must_use]
    pub fn read(&self) -> PortfolioDocument {
        match self.document.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replace the current document and notify all observers.
    ///
    /// Notification is synchronous: every observer sees the new document
    /// before this method returns. No shape validation is performed.
    pub fn write(&self, new_document: PortfolioDocument) {
        match self.document.lock() {
            Ok(mut guard) => *guard = new_document.clone(),
            Err(poisoned) => *poisoned.into_inner() = new_document.clone(),
        }
        debug!("document replaced, notifying observers");
        self.notify(&new_document);
    }

    /// Register an observer to be invoked on every write.
    ///
    /// Returns a handle that can be passed to [`unsubscribe`](Self::unsubscribe).
    pub fn subscribe(&self, observer: Observer) -> Subscription {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        match self.observers.lock() {
            Ok(mut guard) => guard.push((token, observer)),
            Err(poisoned) => poisoned.into_inner().push((token, observer)),
        }
        Subscription(token)
    }

    /// Remove a previously registered observer.
    ///
    /// Unsubscribing twice is a no-op.
    pub fn unsubscribe(&self, subscription: Subscription) {
        let mut guard = match self.observers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.retain(|(token, _)| *token != subscription.0);
    }

    /// Get the number of currently subscribed observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        match self.observers.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Call every observer once with the new document, in subscription
    /// order. A panicking observer does not prevent later observers from
    /// running.
    fn notify(&self, document: &PortfolioDocument) {
        let guard = match self.observers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        for (token, observer) in guard.iter() {
            let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| observer(document)));
            if outcome.is_err() {
                warn!("observer {token} panicked during notification");
            }
        }
    }
}
