// ── Command API ──
//
// Every server round trip is described by a `Command` value. The
// controller executes it and dispatches the request, success and failure
// actions; nothing here performs I/O. The free functions below are the
// per-resource action creators.

pub mod requests;

use nsot_api::NetworkRelation;

use crate::model::{Attribute, Change, Device, EntityId, Interface, Network};
use crate::store::ResourceKind;

pub use requests::{
    CreateAttributeRequest, CreateDeviceRequest, CreateNetworkRequest, ListParams,
    UpdateAttributeRequest, UpdateDeviceRequest, UpdateNetworkRequest,
};

/// All API calls the console makes.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // ── Devices ──────────────────────────────────────────────────────
    FetchDevices(ListParams),
    GetDevice(EntityId),
    CreateDevice(CreateDeviceRequest),
    UpdateDevice {
        id: EntityId,
        request: UpdateDeviceRequest,
    },
    DeleteDevice(EntityId),
    /// Interfaces of one device, into the interface slice.
    FetchDeviceInterfaces(EntityId),

    // ── Networks ─────────────────────────────────────────────────────
    FetchNetworks(ListParams),
    GetNetwork(EntityId),
    CreateNetwork(CreateNetworkRequest),
    UpdateNetwork {
        id: EntityId,
        request: UpdateNetworkRequest,
    },
    DeleteNetwork(EntityId),
    FetchRelatedNetworks {
        id: EntityId,
        relation: NetworkRelation,
    },

    // ── Attributes ───────────────────────────────────────────────────
    FetchAttributes(ListParams),
    GetAttribute(EntityId),
    CreateAttribute(CreateAttributeRequest),
    UpdateAttribute {
        id: EntityId,
        request: UpdateAttributeRequest,
    },
    DeleteAttribute(EntityId),

    // ── Changes (read-only) ──────────────────────────────────────────
    FetchChanges(ListParams),
    GetChange(EntityId),

    // ── Interfaces ───────────────────────────────────────────────────
    FetchInterfaces(ListParams),
    GetInterface(EntityId),
}

impl Command {
    /// Resource slice this command drives.
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::FetchDevices(_)
            | Self::GetDevice(_)
            | Self::CreateDevice(_)
            | Self::UpdateDevice { .. }
            | Self::DeleteDevice(_) => ResourceKind::Device,
            Self::FetchNetworks(_)
            | Self::GetNetwork(_)
            | Self::CreateNetwork(_)
            | Self::UpdateNetwork { .. }
            | Self::DeleteNetwork(_)
            | Self::FetchRelatedNetworks { .. } => ResourceKind::Network,
            Self::FetchAttributes(_)
            | Self::GetAttribute(_)
            | Self::CreateAttribute(_)
            | Self::UpdateAttribute { .. }
            | Self::DeleteAttribute(_) => ResourceKind::Attribute,
            Self::FetchChanges(_) | Self::GetChange(_) => ResourceKind::Change,
            Self::FetchDeviceInterfaces(_) | Self::FetchInterfaces(_) | Self::GetInterface(_) => {
                ResourceKind::Interface
            }
        }
    }

    /// Whether the command writes to the server.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::CreateDevice(_)
                | Self::UpdateDevice { .. }
                | Self::DeleteDevice(_)
                | Self::CreateNetwork(_)
                | Self::UpdateNetwork { .. }
                | Self::DeleteNetwork(_)
                | Self::CreateAttribute(_)
                | Self::UpdateAttribute { .. }
                | Self::DeleteAttribute(_)
        )
    }
}

/// What a successfully executed command produced. The store already
/// holds the data; this is for callers that chain on the result.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    /// A list page landed; `count` is the server total.
    Listed { count: u64 },
    Device(Device),
    Network(Network),
    Attribute(Attribute),
    Change(Change),
    Interface(Interface),
    Related(Vec<Network>),
    Deleted { kind: ResourceKind, id: EntityId },
}

impl CommandResult {
    /// Id of the entity produced by a get/create/update.
    pub fn entity_id(&self) -> Option<EntityId> {
        match self {
            Self::Device(d) => Some(d.id),
            Self::Network(n) => Some(n.id),
            Self::Attribute(a) => Some(a.id),
            Self::Change(c) => Some(c.id),
            Self::Interface(i) => Some(i.id),
            Self::Deleted { id, .. } => Some(*id),
            Self::Listed { .. } | Self::Related(_) => None,
        }
    }
}

// ── Action creators ─────────────────────────────────────────────────

pub fn fetch_devices(params: impl Into<ListParams>) -> Command {
    Command::FetchDevices(params.into())
}

pub fn get_device(id: EntityId) -> Command {
    Command::GetDevice(id)
}

pub fn create_device(request: CreateDeviceRequest) -> Command {
    Command::CreateDevice(request)
}

pub fn update_device(id: EntityId, request: UpdateDeviceRequest) -> Command {
    Command::UpdateDevice { id, request }
}

pub fn delete_device(id: EntityId) -> Command {
    Command::DeleteDevice(id)
}

pub fn fetch_device_interfaces(id: EntityId) -> Command {
    Command::FetchDeviceInterfaces(id)
}

pub fn fetch_networks(params: impl Into<ListParams>) -> Command {
    Command::FetchNetworks(params.into())
}

pub fn get_network(id: EntityId) -> Command {
    Command::GetNetwork(id)
}

pub fn create_network(request: CreateNetworkRequest) -> Command {
    Command::CreateNetwork(request)
}

pub fn update_network(id: EntityId, request: UpdateNetworkRequest) -> Command {
    Command::UpdateNetwork { id, request }
}

pub fn delete_network(id: EntityId) -> Command {
    Command::DeleteNetwork(id)
}

pub fn fetch_related_networks(id: EntityId, relation: NetworkRelation) -> Command {
    Command::FetchRelatedNetworks { id, relation }
}

pub fn fetch_attributes(params: impl Into<ListParams>) -> Command {
    Command::FetchAttributes(params.into())
}

pub fn get_attribute(id: EntityId) -> Command {
    Command::GetAttribute(id)
}

pub fn create_attribute(request: CreateAttributeRequest) -> Command {
    Command::CreateAttribute(request)
}

pub fn update_attribute(id: EntityId, request: UpdateAttributeRequest) -> Command {
    Command::UpdateAttribute { id, request }
}

pub fn delete_attribute(id: EntityId) -> Command {
    Command::DeleteAttribute(id)
}

pub fn fetch_changes(params: impl Into<ListParams>) -> Command {
    Command::FetchChanges(params.into())
}

pub fn get_change(id: EntityId) -> Command {
    Command::GetChange(id)
}

pub fn fetch_interfaces(params: impl Into<ListParams>) -> Command {
    Command::FetchInterfaces(params.into())
}

pub fn get_interface(id: EntityId) -> Command {
    Command::GetInterface(id)
}

/// Delete command for any writable kind.
pub fn delete(kind: ResourceKind, id: EntityId) -> Option<Command> {
    match kind {
        ResourceKind::Device => Some(delete_device(id)),
        ResourceKind::Network => Some(delete_network(id)),
        ResourceKind::Attribute => Some(delete_attribute(id)),
        ResourceKind::Change | ResourceKind::Interface => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::PageRequest;

    #[test]
    fn creators_build_descriptors() {
        let cmd = fetch_devices(PageRequest { page: 2, limit: 10 });
        match &cmd {
            Command::FetchDevices(params) => {
                assert_eq!(params.page.offset(), 20);
                assert!(params.query.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(cmd.kind(), ResourceKind::Device);
        assert!(!cmd.is_mutation());
        assert!(delete_network(EntityId::new(1)).is_mutation());
    }

    #[test]
    fn read_only_kinds_have_no_delete() {
        assert!(delete(ResourceKind::Change, EntityId::new(1)).is_none());
        assert_eq!(
            delete(ResourceKind::Attribute, EntityId::new(1)),
            Some(Command::DeleteAttribute(EntityId::new(1)))
        );
    }

    #[test]
    fn blank_query_is_dropped() {
        let params = ListParams::page(PageRequest::first(10)).with_query("   ");
        assert!(params.query.is_none());
        let params = ListParams::page(PageRequest::first(10)).with_query(" vendor=juniper ");
        assert_eq!(params.query.as_deref(), Some("vendor=juniper"));
    }
}
