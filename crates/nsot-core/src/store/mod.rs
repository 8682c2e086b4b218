// ── Store ──
//
// Single write point for console state. Every dispatch runs the root
// reducer while holding the watch channel's write lock, so one reducer
// pass completes before the next begins and subscribers only ever see
// whole snapshots.

mod action;
mod app_state;
mod resource;
pub mod selectors;
mod stream;

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, trace};

pub use action::{Action, Notification, NotificationLevel, RelatedAction, UiAction};
pub use app_state::{AppState, Reducer, RelatedNetworks, UiState};
pub use resource::{Resource, ResourceAction, ResourceError, ResourceKind, ResourceState};
pub use stream::StateStream;

/// Observes every dispatch after the reducer ran.
///
/// `changed` is false when the reducer returned the previous state.
pub trait Middleware: Send + Sync {
    fn after_dispatch(&self, action: &Action, state: &AppState, changed: bool);
}

/// Logs each dispatched action and the resulting route.
#[derive(Debug, Default)]
pub struct DispatchLogger;

impl Middleware for DispatchLogger {
    fn after_dispatch(&self, action: &Action, state: &AppState, changed: bool) {
        if changed {
            debug!(action = %action.name(), route = %state.route(), "dispatch");
        } else {
            trace!(action = %action.name(), "dispatch (no change)");
        }
    }
}

/// Owns the current [`AppState`] and notifies subscribers on change.
pub struct Store {
    state: watch::Sender<Arc<AppState>>,
    middleware: Vec<Box<dyn Middleware>>,
}

impl Store {
    /// Empty store at the home route, with dispatch logging.
    pub fn new() -> Self {
        Self::with_state(AppState::default())
    }

    pub fn with_state(initial: AppState) -> Self {
        let (state, _) = watch::channel(Arc::new(initial));
        Self {
            state,
            middleware: vec![Box::new(DispatchLogger)],
        }
    }

    #[must_use]
    pub fn with_middleware(mut self, middleware: impl Middleware + 'static) -> Self {
        self.middleware.push(Box::new(middleware));
        self
    }

    /// Fold `action` into the state. Returns whether anything changed.
    pub fn dispatch(&self, action: Action) -> bool {
        let mut changed = false;
        self.state.send_if_modified(|state| {
            let next = AppState::reduce(state, &action);
            changed = !Arc::ptr_eq(&next, state);
            *state = next;
            for m in &self.middleware {
                m.after_dispatch(&action, state, changed);
            }
            changed
        });
        changed
    }

    /// Current snapshot (cheap `Arc` clone).
    pub fn state(&self) -> Arc<AppState> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> StateStream {
        StateStream::new(self.state.subscribe())
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::model::EntityId;
    use crate::router::Route;

    #[derive(Default)]
    struct Counter {
        seen: Arc<AtomicUsize>,
        changed: Arc<AtomicUsize>,
    }

    impl Middleware for Counter {
        fn after_dispatch(&self, _action: &Action, _state: &AppState, changed: bool) {
            self.seen.fetch_add(1, Ordering::SeqCst);
            if changed {
                self.changed.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn middleware_sees_every_dispatch() {
        let counter = Counter::default();
        let (seen, changed) = (Arc::clone(&counter.seen), Arc::clone(&counter.changed));
        let store = Store::new().with_middleware(counter);

        assert!(store.dispatch(Action::Navigate(Route::Devices)));
        assert!(!store.dispatch(Action::Navigate(Route::Devices)));

        assert_eq!(seen.load(Ordering::SeqCst), 2);
        assert_eq!(changed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn subscribers_wake_on_change_only() {
        let store = Store::new();
        let mut sub = store.subscribe();

        store.dispatch(Action::GoBack);
        store.dispatch(Action::Navigate(Route::Network(EntityId::new(3))));

        let snap = sub.changed().await.unwrap();
        assert_eq!(snap.route().path(), "/networks/3");
        assert!(Arc::ptr_eq(sub.current(), &store.state()));
    }
}
