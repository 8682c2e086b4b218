// ── State subscriptions ──
//
// Subscription handle vended by the `Store`.

use std::sync::Arc;

use tokio::sync::watch;

use super::AppState;

/// A subscription to the store.
///
/// Holds the snapshot last seen and waits for the next one via
/// [`changed()`](Self::changed).
pub struct StateStream {
    current: Arc<AppState>,
    receiver: watch::Receiver<Arc<AppState>>,
}

impl StateStream {
    pub(crate) fn new(receiver: watch::Receiver<Arc<AppState>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// Snapshot captured at creation or at the last `changed()`.
    pub fn current(&self) -> &Arc<AppState> {
        &self.current
    }

    /// Wait for the next dispatch that changed state.
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<AppState>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }
}
