use serde::{Deserialize, Serialize};

use super::{Attributes, EntityId};

/// A network device (switch, router, server). Identified by hostname
/// within a site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: EntityId,
    pub hostname: String,
    pub attributes: Attributes,
    pub site_id: Option<EntityId>,
}
