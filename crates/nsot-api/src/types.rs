// Wire types for the NSoT REST API.
//
// These mirror the server's `to_dict()` representations field for field.
// `nsot-core` converts them into canonical domain types.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Attribute key/value pairs as the server sends them, in document order.
pub type Attributes = IndexMap<String, Value>;

// ── Pagination ───────────────────────────────────────────────────────

/// A page of results.
///
/// List endpoints answer either with a paginated envelope
/// `{results, count, limit, offset}` or, when no `limit` was requested,
/// with a bare JSON array. Both decode into a `Page`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub results: Vec<T>,
    pub count: u64,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PageRepr<T> {
    Bare(Vec<T>),
    Paged {
        results: Vec<T>,
        #[serde(default)]
        count: Option<u64>,
        #[serde(default)]
        limit: Option<u64>,
        #[serde(default)]
        offset: Option<u64>,
    },
}

impl<T> From<PageRepr<T>> for Page<T> {
    fn from(repr: PageRepr<T>) -> Self {
        match repr {
            PageRepr::Paged {
                results,
                count,
                limit,
                offset,
            } => {
                let count = count.unwrap_or(results.len() as u64);
                Self {
                    results,
                    count,
                    limit,
                    offset,
                }
            }
            PageRepr::Bare(results) => Self {
                count: results.len() as u64,
                results,
                limit: None,
                offset: None,
            },
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Page<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        PageRepr::deserialize(deserializer).map(Into::into)
    }
}

// ── Errors ───────────────────────────────────────────────────────────

/// `{"error": {"message": ..., "code": 400}}`
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub message: Value,
    #[serde(default)]
    pub code: Option<u16>,
}

// ── Sites / users ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteResponse {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: u64,
    pub email: String,
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceResponse {
    pub id: u64,
    pub hostname: String,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub site_id: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeviceCreate {
    pub hostname: String,
    pub attributes: Attributes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_id: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DeviceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,
}

// ── Networks ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkResponse {
    pub id: u64,
    pub network_address: String,
    pub prefix_length: u8,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub site_id: Option<u64>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub parent_id: Option<u64>,
    #[serde(default)]
    pub is_ip: bool,
    #[serde(default)]
    pub ip_version: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NetworkCreate {
    pub cidr: String,
    pub attributes: Attributes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_id: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NetworkUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

// ── Attributes ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct AttributeResponse {
    pub id: u64,
    pub name: String,
    pub resource_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub display: bool,
    #[serde(default)]
    pub multi: bool,
    #[serde(default)]
    pub constraints: Value,
    #[serde(default)]
    pub site_id: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct AttributeCreate {
    pub name: String,
    pub resource_name: String,
    pub description: String,
    pub required: bool,
    pub display: bool,
    pub multi: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_id: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AttributeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi: Option<bool>,
}

// ── Changes ──────────────────────────────────────────────────────────

/// One field of a change's `resource_diff`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDiff {
    #[serde(default)]
    pub old: Value,
    #[serde(default)]
    pub new: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeResponse {
    pub id: u64,
    pub user: UserResponse,
    pub event: String,
    pub resource_name: String,
    pub resource_id: u64,
    /// Seconds since the Unix epoch.
    pub change_at: i64,
    #[serde(default)]
    pub site: Option<SiteResponse>,
    #[serde(default)]
    pub resource: Option<Value>,
    #[serde(default)]
    pub resource_diff: IndexMap<String, FieldDiff>,
}

// ── Interfaces ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceResponse {
    pub id: u64,
    pub device: u64,
    #[serde(default)]
    pub device_hostname: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "type")]
    pub if_type: Option<u32>,
    #[serde(default)]
    pub mac_address: Option<String>,
    #[serde(default)]
    pub speed: Option<u64>,
    #[serde(default)]
    pub parent_id: Option<u64>,
    #[serde(default)]
    pub addresses: Vec<String>,
    #[serde(default)]
    pub networks: Vec<String>,
    #[serde(default)]
    pub attributes: Attributes,
}

// ── Assignments ──────────────────────────────────────────────────────

/// An address bound to an interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentResponse {
    pub id: u64,
    pub device: u64,
    #[serde(default)]
    pub hostname: Option<String>,
    pub interface: u64,
    #[serde(default)]
    pub interface_name: Option<String>,
    pub address: String,
}

// ── Values ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueResponse {
    pub id: u64,
    pub name: String,
    pub value: Value,
    pub attribute: u64,
    pub resource_name: String,
    pub resource_id: u64,
}

// ── Authentication ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub(crate) struct AuthenticateRequest<'a> {
    pub email: &'a str,
    pub secret_key: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AuthenticateResponse {
    pub auth_token: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn page_from_envelope() {
        let page: Page<u32> = serde_json::from_value(json!({
            "results": [1, 2],
            "count": 12,
            "limit": 2,
            "offset": 4
        }))
        .unwrap();
        assert_eq!(page.results, vec![1, 2]);
        assert_eq!(page.count, 12);
        assert_eq!(page.limit, Some(2));
        assert_eq!(page.offset, Some(4));
    }

    #[test]
    fn page_from_bare_array() {
        let page: Page<u32> = serde_json::from_value(json!([7, 8, 9])).unwrap();
        assert_eq!(page.count, 3);
        assert_eq!(page.limit, None);
    }

    #[test]
    fn device_attributes_keep_server_order() {
        let raw = r#"{
            "id": 1,
            "hostname": "sw1",
            "site_id": 1,
            "attributes": {"vendor": "juniper", "owner": "neteng", "hw_type": "switch"}
        }"#;
        let device: DeviceResponse = serde_json::from_str(raw).unwrap();
        let keys: Vec<&str> = device.attributes.keys().map(String::as_str).collect();
        assert_eq!(keys, ["vendor", "owner", "hw_type"]);
    }

    #[test]
    fn error_body_accepts_field_map() {
        let body: ErrorBody = serde_json::from_value(json!({
            "error": {"message": {"hostname": ["This field is required."]}, "code": 400}
        }))
        .unwrap();
        assert_eq!(body.error.code, Some(400));
        assert!(body.error.message.is_object());
    }
}
