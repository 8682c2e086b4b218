// ── Typed selectors ──
//
// Read helpers used by screens. Each takes the whole `AppState` so
// callers never reach into slices directly.

use nsot_api::NetworkRelation;

use crate::model::{EntityId, Interface, Network};
use crate::pagination::{PageInfo, PageRequest};

use super::{AppState, Resource, ResourceState};

pub fn slice<T: Resource>(state: &AppState) -> &ResourceState<T> {
    T::select(state)
}

/// The selected detail entity, only if it is `id`.
pub fn item<T: Resource>(state: &AppState, id: EntityId) -> Option<&T> {
    T::select(state).item_for(id)
}

/// Whether a detail view for `id` still has to fetch. An in-flight
/// request for some other id does not count.
pub fn needs_item<T: Resource>(state: &AppState, id: EntityId) -> bool {
    let slice = T::select(state);
    !slice.is_loading_item(id) && slice.item_for(id).is_none()
}

/// Whether `page` still has to be fetched. A failed list is retried.
pub fn needs_page<T: Resource>(state: &AppState, page: PageRequest) -> bool {
    let slice = T::select(state);
    if slice.is_fetching {
        return false;
    }
    match (slice.pagination, &slice.error) {
        (Some(info), None) => !info.matches(page),
        _ => true,
    }
}

pub fn pagination<T: Resource>(state: &AppState) -> Option<PageInfo> {
    T::select(state).pagination
}

/// Server-side total for a resource, once any page of it has loaded.
pub fn total<T: Resource>(state: &AppState) -> Option<u64> {
    T::select(state).pagination.map(|p| p.count)
}

pub fn device_interfaces(state: &AppState, device_id: EntityId) -> Vec<&Interface> {
    state
        .interfaces
        .items
        .iter()
        .filter(|i| i.device_id == device_id)
        .collect()
}

/// Networks related to `id` by `relation`, if that lookup is loaded.
pub fn related_networks(
    state: &AppState,
    id: EntityId,
    relation: NetworkRelation,
) -> Option<&[Network]> {
    let related = &state.related;
    (related.is_for(id, relation) && !related.is_fetching).then_some(related.networks.as_slice())
}
