use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::EntityId;

/// Resource type an attribute definition applies to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum ResourceName {
    Device,
    Network,
    Interface,
    Circuit,
}

/// Schema for a metadata key on one resource type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Attribute {
    pub id: EntityId,
    pub name: String,
    /// `None` when the server reports a resource type this client
    /// doesn't know.
    pub resource_name: Option<ResourceName>,
    pub description: String,
    pub required: bool,
    pub display: bool,
    pub multi: bool,
    pub constraints: serde_json::Value,
    pub site_id: Option<EntityId>,
}
