// ── Typed request structs for Command payloads ──

use serde::{Deserialize, Serialize};

use crate::model::{Attributes, EntityId, NetworkState, ResourceName};
use crate::pagination::PageRequest;

// ── Lists ──────────────────────────────────────────────────────────

/// Which rows a list command asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListParams {
    pub page: PageRequest,
    /// Set query (`"vendor=juniper -owner=neteng"`). When present the
    /// server answers every match in one unpaginated list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl ListParams {
    pub fn page(page: PageRequest) -> Self {
        Self { page, query: None }
    }

    /// Blank queries are dropped.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        self.query = (!query.trim().is_empty()).then(|| query.trim().to_owned());
        self
    }
}

impl From<PageRequest> for ListParams {
    fn from(page: PageRequest) -> Self {
        Self::page(page)
    }
}

// ── Device ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateDeviceRequest {
    pub hostname: String,
    pub attributes: Attributes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_id: Option<EntityId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateDeviceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,
}

// ── Network ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateNetworkRequest {
    /// `address/prefix`, e.g. `10.0.0.0/24`.
    pub cidr: String,
    pub attributes: Attributes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<NetworkState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_id: Option<EntityId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateNetworkRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<NetworkState>,
}

// ── Attribute ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct CreateAttributeRequest {
    pub name: String,
    pub resource_name: ResourceName,
    pub description: String,
    pub required: bool,
    pub display: bool,
    pub multi: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_id: Option<EntityId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateAttributeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi: Option<bool>,
}
