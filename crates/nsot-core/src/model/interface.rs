use serde::{Deserialize, Serialize};

use super::{Attributes, EntityId};

/// A network interface on a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interface {
    pub id: EntityId,
    pub device_id: EntityId,
    pub device_hostname: Option<String>,
    pub name: String,
    pub description: String,
    /// IANA ifType number (6 = ethernetCsmacd).
    pub if_type: Option<u32>,
    pub mac_address: Option<String>,
    /// Mbps.
    pub speed: Option<u64>,
    pub parent_id: Option<EntityId>,
    /// Assigned host addresses in CIDR form.
    pub addresses: Vec<String>,
    /// Networks containing those addresses.
    pub networks: Vec<String>,
    pub attributes: Attributes,
}
