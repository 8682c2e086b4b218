// ── API-to-domain type conversions ──
//
// Bridges raw `nsot_api::types` responses into canonical
// `nsot_core::model` types, and command requests back into wire bodies.
// Unknown enum strings become `None` rather than failing the whole page.

use chrono::{DateTime, Utc};

use nsot_api::types::{
    AttributeCreate, AttributeResponse, AttributeUpdate, ChangeResponse, DeviceCreate,
    DeviceResponse, DeviceUpdate, InterfaceResponse, NetworkCreate, NetworkResponse,
    NetworkUpdate, SiteResponse, UserResponse,
};

use crate::command::requests::{
    CreateAttributeRequest, CreateDeviceRequest, CreateNetworkRequest, UpdateAttributeRequest,
    UpdateDeviceRequest, UpdateNetworkRequest,
};
use crate::model::{
    Attribute, Change, Device, EntityId, FieldChange, Interface, Network, Page, Site, User,
};
use crate::pagination::PageInfo;

// ── Helpers ────────────────────────────────────────────────────────

fn id(raw: u64) -> EntityId {
    EntityId::new(raw)
}

/// Epoch seconds to `DateTime<Utc>`; out-of-range values clamp to the epoch.
fn epoch_to_datetime(epoch: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(epoch, 0).unwrap_or(DateTime::UNIX_EPOCH)
}

// ── Pages ──────────────────────────────────────────────────────────

impl<W, T: From<W>> From<nsot_api::Page<W>> for Page<T> {
    fn from(page: nsot_api::Page<W>) -> Self {
        Self {
            info: PageInfo {
                count: page.count,
                limit: page.limit,
                offset: page.offset.unwrap_or(0),
            },
            items: page.results.into_iter().map(T::from).collect(),
        }
    }
}

// ── Responses ──────────────────────────────────────────────────────

impl From<DeviceResponse> for Device {
    fn from(d: DeviceResponse) -> Self {
        Self {
            id: id(d.id),
            hostname: d.hostname,
            attributes: d.attributes,
            site_id: d.site_id.map(id),
        }
    }
}

impl From<NetworkResponse> for Network {
    fn from(n: NetworkResponse) -> Self {
        Self {
            id: id(n.id),
            network_address: n.network_address,
            prefix_length: n.prefix_length,
            attributes: n.attributes,
            site_id: n.site_id.map(id),
            state: n.state.and_then(|s| s.parse().ok()),
            parent_id: n.parent_id.map(id),
            is_ip: n.is_ip,
            ip_version: n.ip_version,
        }
    }
}

impl From<AttributeResponse> for Attribute {
    fn from(a: AttributeResponse) -> Self {
        Self {
            id: id(a.id),
            name: a.name,
            resource_name: a.resource_name.parse().ok(),
            description: a.description,
            required: a.required,
            display: a.display,
            multi: a.multi,
            constraints: a.constraints,
            site_id: a.site_id.map(id),
        }
    }
}

impl From<UserResponse> for User {
    fn from(u: UserResponse) -> Self {
        Self {
            id: id(u.id),
            email: u.email,
        }
    }
}

impl From<SiteResponse> for Site {
    fn from(s: SiteResponse) -> Self {
        Self {
            id: id(s.id),
            name: s.name,
            description: s.description,
        }
    }
}

impl From<ChangeResponse> for Change {
    fn from(c: ChangeResponse) -> Self {
        Self {
            id: id(c.id),
            user: c.user.into(),
            event: c.event.parse().ok(),
            resource_name: c.resource_name,
            resource_id: id(c.resource_id),
            change_at: epoch_to_datetime(c.change_at),
            site_id: c.site.map(|s| id(s.id)),
            resource: c.resource,
            diff: c
                .resource_diff
                .into_iter()
                .map(|(field, d)| FieldChange {
                    field,
                    old: d.old,
                    new: d.new,
                })
                .collect(),
        }
    }
}

impl From<InterfaceResponse> for Interface {
    fn from(i: InterfaceResponse) -> Self {
        Self {
            id: id(i.id),
            device_id: id(i.device),
            device_hostname: i.device_hostname,
            name: i.name,
            description: i.description,
            if_type: i.if_type,
            mac_address: i.mac_address,
            speed: i.speed,
            parent_id: i.parent_id.map(id),
            addresses: i.addresses,
            networks: i.networks,
            attributes: i.attributes,
        }
    }
}

// ── Requests ───────────────────────────────────────────────────────

impl From<&CreateDeviceRequest> for DeviceCreate {
    fn from(r: &CreateDeviceRequest) -> Self {
        Self {
            hostname: r.hostname.clone(),
            attributes: r.attributes.clone(),
            site_id: r.site_id.map(EntityId::get),
        }
    }
}

impl From<&UpdateDeviceRequest> for DeviceUpdate {
    fn from(r: &UpdateDeviceRequest) -> Self {
        Self {
            hostname: r.hostname.clone(),
            attributes: r.attributes.clone(),
        }
    }
}

impl From<&CreateNetworkRequest> for NetworkCreate {
    fn from(r: &CreateNetworkRequest) -> Self {
        Self {
            cidr: r.cidr.clone(),
            attributes: r.attributes.clone(),
            state: r.state.map(|s| s.to_string()),
            site_id: r.site_id.map(EntityId::get),
        }
    }
}

impl From<&UpdateNetworkRequest> for NetworkUpdate {
    fn from(r: &UpdateNetworkRequest) -> Self {
        Self {
            attributes: r.attributes.clone(),
            state: r.state.map(|s| s.to_string()),
        }
    }
}

impl From<&CreateAttributeRequest> for AttributeCreate {
    fn from(r: &CreateAttributeRequest) -> Self {
        Self {
            name: r.name.clone(),
            resource_name: r.resource_name.to_string(),
            description: r.description.clone(),
            required: r.required,
            display: r.display,
            multi: r.multi,
            site_id: r.site_id.map(EntityId::get),
        }
    }
}

impl From<&UpdateAttributeRequest> for AttributeUpdate {
    fn from(r: &UpdateAttributeRequest) -> Self {
        Self {
            description: r.description.clone(),
            required: r.required,
            display: r.display,
            multi: r.multi,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{ChangeEvent, NetworkState, ResourceName};
    use serde_json::json;

    #[test]
    fn change_diff_and_timestamp() {
        let raw: ChangeResponse = serde_json::from_value(json!({
            "id": 3,
            "user": {"id": 1, "email": "admin@example.com"},
            "event": "Update",
            "resource_name": "Device",
            "resource_id": 7,
            "change_at": 1_700_000_000,
            "site": {"id": 1, "name": "Site 1", "description": ""},
            "resource_diff": {"hostname": {"old": "sw1", "new": "core1"}}
        }))
        .unwrap();
        let change = Change::from(raw);
        assert_eq!(change.event, Some(ChangeEvent::Update));
        assert_eq!(change.change_at.timestamp(), 1_700_000_000);
        assert_eq!(change.site_id, Some(EntityId::new(1)));
        assert_eq!(change.diff[0].field, "hostname");
        assert_eq!(change.diff[0].new, json!("core1"));
    }

    #[test]
    fn unknown_enum_strings_become_none() {
        let net: NetworkResponse = serde_json::from_value(json!({
            "id": 1, "network_address": "10.0.0.0", "prefix_length": 8, "state": "limbo"
        }))
        .unwrap();
        assert_eq!(Network::from(net).state, None);

        let attr: AttributeResponse = serde_json::from_value(json!({
            "id": 1, "name": "vendor", "resource_name": "Circuit"
        }))
        .unwrap();
        assert_eq!(Attribute::from(attr).resource_name, Some(ResourceName::Circuit));
    }

    #[test]
    fn network_request_states_are_lowercase() {
        let body = NetworkCreate::from(&CreateNetworkRequest {
            cidr: "10.0.0.0/24".into(),
            attributes: crate::model::Attributes::new(),
            state: Some(NetworkState::Reserved),
            site_id: Some(EntityId::new(1)),
        });
        assert_eq!(body.state.as_deref(), Some("reserved"));
        assert_eq!(body.site_id, Some(1));
    }

    #[test]
    fn bare_page_offset_defaults_to_zero() {
        let page: Page<Device> = nsot_api::Page::<DeviceResponse> {
            results: vec![],
            count: 0,
            limit: None,
            offset: None,
        }
        .into();
        assert_eq!(page.info.offset, 0);
    }
}
