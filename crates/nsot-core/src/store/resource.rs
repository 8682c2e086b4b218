// ── Per-resource state slices ──
//
// One `ResourceState<T>` per entity type, folded by a single generic
// reducer over the fifteen list/get/create/update/delete lifecycle
// actions.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use strum::{Display, EnumIter};

use crate::command::{Command, CommandResult};
use crate::error::CoreError;
use crate::model::{Attribute, Change, Device, EntityId, Interface, Network, Page};
use crate::pagination::{PageInfo, PageRequest};

use super::{Action, AppState, Reducer};

// ── ResourceKind ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum ResourceKind {
    Device,
    Network,
    Attribute,
    Change,
    Interface,
}

impl ResourceKind {
    /// Plural path segment, as used by both the API and the router.
    pub fn segment(self) -> &'static str {
        match self {
            Self::Device => "devices",
            Self::Network => "networks",
            Self::Attribute => "attributes",
            Self::Change => "changes",
            Self::Interface => "interfaces",
        }
    }

    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "devices" => Some(Self::Device),
            "networks" => Some(Self::Network),
            "attributes" => Some(Self::Attribute),
            "changes" => Some(Self::Change),
            "interfaces" => Some(Self::Interface),
            _ => None,
        }
    }

    /// Whether the router has list/detail screens for this kind.
    pub fn is_routable(self) -> bool {
        !matches!(self, Self::Interface)
    }

    /// Changes are an append-only audit log.
    pub fn is_read_only(self) -> bool {
        matches!(self, Self::Change)
    }
}

// ── ResourceError ───────────────────────────────────────────────────

/// The storable part of a failed request.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceError {
    pub message: String,
    pub status: Option<u16>,
    /// Raw server `error.message` value, for field-level extraction.
    pub detail: Option<serde_json::Value>,
}

impl From<&CoreError> for ResourceError {
    fn from(err: &CoreError) -> Self {
        Self {
            message: err.to_string(),
            status: err.status(),
            detail: err.detail().cloned(),
        }
    }
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

// ── ResourceAction ──────────────────────────────────────────────────

/// Lifecycle descriptors for one resource type.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceAction<T> {
    ListRequest,
    ListSuccess(Page<T>),
    ListFailure(ResourceError),
    GetRequest(EntityId),
    GetSuccess(T),
    GetFailure(EntityId, ResourceError),
    CreateRequest,
    CreateSuccess(T),
    CreateFailure(ResourceError),
    UpdateRequest(EntityId),
    UpdateSuccess(T),
    UpdateFailure(ResourceError),
    DeleteRequest(EntityId),
    DeleteSuccess(EntityId),
    DeleteFailure(ResourceError),
}

impl<T> ResourceAction<T> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ListRequest => "list_request",
            Self::ListSuccess(_) => "list_success",
            Self::ListFailure(_) => "list_failure",
            Self::GetRequest(_) => "get_request",
            Self::GetSuccess(_) => "get_success",
            Self::GetFailure(..) => "get_failure",
            Self::CreateRequest => "create_request",
            Self::CreateSuccess(_) => "create_success",
            Self::CreateFailure(_) => "create_failure",
            Self::UpdateRequest(_) => "update_request",
            Self::UpdateSuccess(_) => "update_success",
            Self::UpdateFailure(_) => "update_failure",
            Self::DeleteRequest(_) => "delete_request",
            Self::DeleteSuccess(_) => "delete_success",
            Self::DeleteFailure(_) => "delete_failure",
        }
    }
}

// ── Resource trait ──────────────────────────────────────────────────

/// Binds an entity type to its kind, its store slice, its action
/// variant, and its read command creators.
pub trait Resource: Clone + fmt::Debug + Send + Sync + 'static {
    const KIND: ResourceKind;

    fn id(&self) -> EntityId;

    /// Wrap a lifecycle action in the root [`Action`].
    fn wrap(action: ResourceAction<Self>) -> Action;

    /// The lifecycle action addressed to this resource, if any.
    fn extract(action: &Action) -> Option<&ResourceAction<Self>>;

    fn select(state: &AppState) -> &Arc<ResourceState<Self>>;

    /// Command fetching one page of this resource.
    fn fetch(page: PageRequest) -> Command;

    /// Command fetching a single entity.
    fn get(id: EntityId) -> Command;

    /// Wrap an entity in the matching [`CommandResult`] variant.
    fn into_result(self) -> CommandResult;
}

macro_rules! impl_resource {
    ($ty:ty, $kind:ident, $variant:ident, $field:ident, $fetch:path, $get:path) => {
        impl Resource for $ty {
            const KIND: ResourceKind = ResourceKind::$kind;

            fn id(&self) -> EntityId {
                self.id
            }

            fn wrap(action: ResourceAction<Self>) -> Action {
                Action::$variant(action)
            }

            fn extract(action: &Action) -> Option<&ResourceAction<Self>> {
                match action {
                    Action::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            fn select(state: &AppState) -> &Arc<ResourceState<Self>> {
                &state.$field
            }

            fn fetch(page: PageRequest) -> Command {
                $fetch(page)
            }

            fn get(id: EntityId) -> Command {
                $get(id)
            }

            fn into_result(self) -> CommandResult {
                CommandResult::$variant(self)
            }
        }
    };
}

impl_resource!(Device, Device, Device, devices, crate::command::fetch_devices, crate::command::get_device);
impl_resource!(Network, Network, Network, networks, crate::command::fetch_networks, crate::command::get_network);
impl_resource!(
    Attribute,
    Attribute,
    Attribute,
    attributes,
    crate::command::fetch_attributes,
    crate::command::get_attribute
);
impl_resource!(Change, Change, Change, changes, crate::command::fetch_changes, crate::command::get_change);
impl_resource!(
    Interface,
    Interface,
    Interface,
    interfaces,
    crate::command::fetch_interfaces,
    crate::command::get_interface
);

// ── ResourceState ───────────────────────────────────────────────────

/// Store slice for one resource type.
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ResourceState<T> {
    /// Current page, in server order.
    pub items: Vec<T>,
    /// The entity shown by the detail view.
    pub item: Option<T>,
    pub is_fetching: bool,
    pub is_fetching_item: bool,
    /// Id of the most recent get. Answers for any other id are stale.
    pub requested_item: Option<EntityId>,
    pub is_creating: bool,
    pub is_updating: bool,
    pub is_deleting: bool,
    /// Set by the most recent failure, cleared by the next success.
    pub error: Option<ResourceError>,
    /// `None` until the first list succeeds.
    pub pagination: Option<PageInfo>,
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            item: None,
            is_fetching: false,
            is_fetching_item: false,
            requested_item: None,
            is_creating: false,
            is_updating: false,
            is_deleting: false,
            error: None,
            pagination: None,
        }
    }
}

impl<T: Resource> ResourceState<T> {
    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.items.iter().find(|e| e.id() == id)
    }

    /// The selected item, only if it is `id`.
    pub fn item_for(&self, id: EntityId) -> Option<&T> {
        self.item.as_ref().filter(|e| e.id() == id)
    }

    pub fn is_busy(&self) -> bool {
        self.is_fetching
            || self.is_fetching_item
            || self.is_creating
            || self.is_updating
            || self.is_deleting
    }

    /// Whether a get for some other id was requested after `id`.
    fn is_superseded(&self, id: EntityId) -> bool {
        self.requested_item.is_some_and(|latest| latest != id)
    }

    /// Whether the get for `id` is the one in flight.
    pub fn is_loading_item(&self, id: EntityId) -> bool {
        self.is_fetching_item && self.requested_item == Some(id)
    }

    fn replace(&mut self, entity: &T) {
        let id = entity.id();
        if let Some(slot) = self.items.iter_mut().find(|e| e.id() == id) {
            *slot = entity.clone();
        }
    }

    /// Apply one lifecycle action, producing the next slice.
    fn apply(&self, action: &ResourceAction<T>) -> Self {
        let mut next = self.clone();
        match action {
            ResourceAction::ListRequest => next.is_fetching = true,
            ResourceAction::ListSuccess(page) => {
                next.items.clone_from(&page.items);
                next.pagination = Some(page.info);
                next.is_fetching = false;
                next.error = None;
            }
            ResourceAction::ListFailure(err) => {
                next.is_fetching = false;
                next.error = Some(err.clone());
            }
            ResourceAction::GetRequest(id) => {
                next.is_fetching_item = true;
                next.requested_item = Some(*id);
            }
            ResourceAction::GetSuccess(entity) => {
                next.replace(entity);
                // A stale answer only refreshes the list entry.
                if !next.is_superseded(entity.id()) {
                    next.item = Some(entity.clone());
                    next.is_fetching_item = false;
                    next.error = None;
                }
            }
            ResourceAction::GetFailure(id, err) => {
                if !next.is_superseded(*id) {
                    next.is_fetching_item = false;
                    next.error = Some(err.clone());
                }
            }
            ResourceAction::CreateRequest => next.is_creating = true,
            ResourceAction::CreateSuccess(entity) => {
                next.items.push(entity.clone());
                next.item = Some(entity.clone());
                if let Some(info) = next.pagination.as_mut() {
                    info.count = info.count.saturating_add(1);
                }
                next.is_creating = false;
                next.error = None;
            }
            ResourceAction::CreateFailure(err) => {
                next.is_creating = false;
                next.error = Some(err.clone());
            }
            ResourceAction::UpdateRequest(_) => next.is_updating = true,
            ResourceAction::UpdateSuccess(entity) => {
                next.replace(entity);
                if next.item.as_ref().is_some_and(|e| e.id() == entity.id()) {
                    next.item = Some(entity.clone());
                }
                next.is_updating = false;
                next.error = None;
            }
            ResourceAction::UpdateFailure(err) => {
                next.is_updating = false;
                next.error = Some(err.clone());
            }
            ResourceAction::DeleteRequest(_) => next.is_deleting = true,
            ResourceAction::DeleteSuccess(id) => {
                let before = next.items.len();
                next.items.retain(|e| e.id() != *id);
                if next.items.len() < before {
                    if let Some(info) = next.pagination.as_mut() {
                        info.count = info.count.saturating_sub(1);
                    }
                }
                if next.item.as_ref().is_some_and(|e| e.id() == *id) {
                    next.item = None;
                }
                next.is_deleting = false;
                next.error = None;
            }
            ResourceAction::DeleteFailure(err) => {
                next.is_deleting = false;
                next.error = Some(err.clone());
            }
        }
        next
    }
}

impl<T: Resource> Reducer for ResourceState<T> {
    fn reduce(state: &Arc<Self>, action: &Action) -> Arc<Self> {
        match T::extract(action) {
            Some(own) => Arc::new(state.apply(own)),
            None => Arc::clone(state),
        }
    }
}
