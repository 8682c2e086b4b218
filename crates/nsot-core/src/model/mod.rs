// ── Domain model ──
//
// Canonical types consumed by the store and the UI. Built from the wire
// types in `nsot_api::types` by `crate::convert`.

mod attribute;
mod change;
mod device;
mod entity_id;
mod interface;
mod network;
mod site;

pub use attribute::{Attribute, ResourceName};
pub use change::{Change, ChangeEvent, FieldChange};
pub use device::Device;
pub use entity_id::{EntityId, InvalidEntityId};
pub use interface::Interface;
pub use network::{Network, NetworkState};
pub use site::{Site, User};

use crate::pagination::PageInfo;

/// Attribute key/value pairs in server order.
pub type Attributes = indexmap::IndexMap<String, serde_json::Value>;

/// One page of converted list results.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub info: PageInfo,
}
