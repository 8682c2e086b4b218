// ── Root state and reducer ──
//
// `AppState` composes every slice behind its own `Arc`. The root reducer
// runs each slice reducer and reuses the previous `AppState` when none of
// them produced a new slice.

use std::sync::Arc;

use nsot_api::NetworkRelation;

use crate::model::{Attribute, Change, Device, EntityId, Interface, Network, Site, User};
use crate::router::{Location, Route};

use super::action::{Action, Notification, RelatedAction, UiAction};
use super::resource::{ResourceError, ResourceState};

/// A pure state transition over one slice.
pub trait Reducer {
    /// Fold `action` into `state`. Actions the slice doesn't handle
    /// must return `state` itself (same `Arc`).
    fn reduce(state: &Arc<Self>, action: &Action) -> Arc<Self>;
}

// ── Related networks ────────────────────────────────────────────────

/// Result of the last tree lookup around a network.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RelatedNetworks {
    pub network_id: Option<EntityId>,
    pub relation: Option<NetworkRelation>,
    pub networks: Vec<Network>,
    pub is_fetching: bool,
    pub error: Option<ResourceError>,
}

impl RelatedNetworks {
    /// The lookup currently held, if it is for `id`/`relation`.
    pub fn is_for(&self, id: EntityId, relation: NetworkRelation) -> bool {
        self.network_id == Some(id) && self.relation == Some(relation)
    }
}

impl Reducer for RelatedNetworks {
    fn reduce(state: &Arc<Self>, action: &Action) -> Arc<Self> {
        let Action::Related(related) = action else {
            return Arc::clone(state);
        };
        match related {
            RelatedAction::Request {
                network_id,
                relation,
            } => Arc::new(Self {
                network_id: Some(*network_id),
                relation: Some(*relation),
                networks: Vec::new(),
                is_fetching: true,
                error: None,
            }),
            // Late answers for a lookup that was since replaced are dropped.
            RelatedAction::Success {
                network_id,
                relation,
                networks,
            } if state.is_for(*network_id, *relation) => Arc::new(Self {
                networks: networks.clone(),
                is_fetching: false,
                error: None,
                ..(**state).clone()
            }),
            RelatedAction::Failure {
                network_id,
                relation,
                error,
            } if state.is_for(*network_id, *relation) => Arc::new(Self {
                is_fetching: false,
                error: Some(error.clone()),
                ..(**state).clone()
            }),
            RelatedAction::Success { .. } | RelatedAction::Failure { .. } => Arc::clone(state),
        }
    }
}

// ── UI slice ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UiState {
    pub user: Option<User>,
    pub site: Option<Site>,
    /// A form submission is awaiting its response.
    pub submitting: bool,
    pub notification: Option<Notification>,
}

impl Reducer for UiState {
    fn reduce(state: &Arc<Self>, action: &Action) -> Arc<Self> {
        let Action::Ui(ui) = action else {
            return Arc::clone(state);
        };
        let mut next = (**state).clone();
        match ui {
            UiAction::SessionEstablished { user, site } => {
                next.user.clone_from(user);
                next.site.clone_from(site);
            }
            UiAction::SubmitStarted => next.submitting = true,
            UiAction::SubmitFinished => next.submitting = false,
            UiAction::Notify(notification) => next.notification = Some(notification.clone()),
            UiAction::DismissNotification => {
                if next.notification.is_none() {
                    return Arc::clone(state);
                }
                next.notification = None;
            }
        }
        Arc::new(next)
    }
}

// ── Location slice ──────────────────────────────────────────────────

impl Reducer for Location {
    fn reduce(state: &Arc<Self>, action: &Action) -> Arc<Self> {
        let next = match action {
            Action::Navigate(route) => state.pushed(route),
            Action::GoBack => state.popped(),
            _ => None,
        };
        next.map_or_else(|| Arc::clone(state), Arc::new)
    }
}

// ── AppState ────────────────────────────────────────────────────────

/// The whole console state: one field per slice.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub devices: Arc<ResourceState<Device>>,
    pub networks: Arc<ResourceState<Network>>,
    pub attributes: Arc<ResourceState<Attribute>>,
    pub changes: Arc<ResourceState<Change>>,
    pub interfaces: Arc<ResourceState<Interface>>,
    pub related: Arc<RelatedNetworks>,
    pub location: Arc<Location>,
    pub ui: Arc<UiState>,
}

impl AppState {
    /// Initial state positioned at `route`.
    pub fn at(route: Route) -> Self {
        Self {
            location: Arc::new(Location::new(route)),
            ..Self::default()
        }
    }

    pub fn route(&self) -> &Route {
        &self.location.current
    }

    fn same_slices(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.devices, &other.devices)
            && Arc::ptr_eq(&self.networks, &other.networks)
            && Arc::ptr_eq(&self.attributes, &other.attributes)
            && Arc::ptr_eq(&self.changes, &other.changes)
            && Arc::ptr_eq(&self.interfaces, &other.interfaces)
            && Arc::ptr_eq(&self.related, &other.related)
            && Arc::ptr_eq(&self.location, &other.location)
            && Arc::ptr_eq(&self.ui, &other.ui)
    }
}

impl Reducer for AppState {
    fn reduce(state: &Arc<Self>, action: &Action) -> Arc<Self> {
        let next = Self {
            devices: ResourceState::reduce(&state.devices, action),
            networks: ResourceState::reduce(&state.networks, action),
            attributes: ResourceState::reduce(&state.attributes, action),
            changes: ResourceState::reduce(&state.changes, action),
            interfaces: ResourceState::reduce(&state.interfaces, action),
            related: RelatedNetworks::reduce(&state.related, action),
            location: Location::reduce(&state.location, action),
            ui: UiState::reduce(&state.ui, action),
        };
        if next.same_slices(state) {
            Arc::clone(state)
        } else {
            Arc::new(next)
        }
    }
}
