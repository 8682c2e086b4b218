use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::{Attributes, EntityId};

/// Allocation state of a network or address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum NetworkState {
    Allocated,
    Assigned,
    Orphaned,
    Reserved,
}

/// An IPv4/IPv6 network or host address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub id: EntityId,
    pub network_address: String,
    pub prefix_length: u8,
    pub attributes: Attributes,
    pub site_id: Option<EntityId>,
    pub state: Option<NetworkState>,
    pub parent_id: Option<EntityId>,
    /// True for single host addresses (`/32`, `/128`).
    pub is_ip: bool,
    pub ip_version: Option<String>,
}

impl Network {
    /// `network_address/prefix_length`, e.g. `10.0.0.0/24`.
    pub fn cidr(&self) -> String {
        format!("{}/{}", self.network_address, self.prefix_length)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn cidr_joins_address_and_prefix() {
        let net = Network {
            id: EntityId::new(1),
            network_address: "2001:db8::".into(),
            prefix_length: 32,
            attributes: Attributes::new(),
            site_id: None,
            state: None,
            parent_id: None,
            is_ip: false,
            ip_version: Some("6".into()),
        };
        assert_eq!(net.cidr(), "2001:db8::/32");
    }

    #[test]
    fn state_parses_case_insensitively() {
        assert_eq!("Reserved".parse::<NetworkState>().unwrap(), NetworkState::Reserved);
        assert_eq!(NetworkState::Allocated.to_string(), "allocated");
    }
}
