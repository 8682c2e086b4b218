// ── Create and edit forms ──
//
// Raw text the user typed into a create or edit dialog, validated into
// typed command requests. Server-side failures come back as `SubmissionError`
// carrying the one message the dialog should show.

use std::net::IpAddr;

use serde_json::Value;
use thiserror::Error;

use crate::command::requests::{
    CreateAttributeRequest, CreateDeviceRequest, CreateNetworkRequest, UpdateAttributeRequest,
    UpdateDeviceRequest, UpdateNetworkRequest,
};
use crate::error::CoreError;
use crate::model::{Attribute, Attributes, Device, EntityId, Network, ResourceName};

/// Field names checked, in order, when picking a message out of a
/// field-keyed error response.
pub const ERROR_KEYS: [&str; 4] = ["hostname", "name", "resource_name", "__all__"];

// ── Errors ──────────────────────────────────────────────────────────

/// Client-side validation failure. Nothing was sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("invalid CIDR '{0}': expected address/prefix")]
    InvalidCidr(String),

    #[error("unknown resource type '{0}'")]
    UnknownResourceName(String),

    #[error("invalid attribute '{0}': expected key=value")]
    InvalidAttribute(String),
}

/// Why a form submission did not produce an entity.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The server (or the transport) refused the request. `message` is
    /// what [`extract_message`] found; `None` for shapes it doesn't know.
    #[error("submission rejected: {source}")]
    Rejected {
        message: Option<String>,
        #[source]
        source: CoreError,
    },
}

impl SubmissionError {
    /// Text for the dialog's error line, if there is one.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Invalid(e) => Some(e.to_string()),
            Self::Rejected { message, .. } => message.clone(),
        }
    }
}

impl From<CoreError> for SubmissionError {
    fn from(source: CoreError) -> Self {
        let message = source.detail().and_then(extract_message);
        Self::Rejected { message, source }
    }
}

/// Pick the user-facing message out of a server `error.message` value.
///
/// A plain string is used as-is. A field map yields the value of the
/// first key in [`ERROR_KEYS`] it contains. Anything else is `None`.
pub fn extract_message(detail: &Value) -> Option<String> {
    match detail {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => ERROR_KEYS
            .iter()
            .find_map(|key| map.get(*key))
            .map(message_text),
        _ => None,
    }
}

fn message_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(message_text).collect::<Vec<_>>().join(" "),
        other => other.to_string(),
    }
}

// ── Field helpers ───────────────────────────────────────────────────

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { field });
    }
    Ok(trimmed.to_owned())
}

/// Parse `key=value` lines into attributes. Blank lines are skipped; a
/// key given more than once collects its values into a list.
pub fn parse_attributes(text: &str) -> Result<Attributes, ValidationError> {
    let mut attributes = Attributes::new();
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let Some((key, value)) = line.split_once('=') else {
            return Err(ValidationError::InvalidAttribute(line.to_owned()));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(ValidationError::InvalidAttribute(line.to_owned()));
        }
        let value = Value::String(value.trim().to_owned());
        match attributes.get_mut(key) {
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                attributes.insert(key.to_owned(), value);
            }
        }
    }
    Ok(attributes)
}

/// Render attributes back into the `key=value` lines `parse_attributes` reads.
pub fn format_attributes(attributes: &Attributes) -> String {
    let mut lines = Vec::with_capacity(attributes.len());
    for (key, value) in attributes {
        match value {
            Value::Array(values) => {
                lines.extend(values.iter().map(|v| format!("{key}={}", message_text(v))));
            }
            other => lines.push(format!("{key}={}", message_text(other))),
        }
    }
    lines.join("\n")
}

/// Check `address/prefix` with a prefix that fits the address family.
pub fn validate_cidr(raw: &str) -> Result<String, ValidationError> {
    let cidr = required("cidr", raw)?;
    let invalid = || ValidationError::InvalidCidr(cidr.clone());

    let (address, prefix) = cidr.split_once('/').ok_or_else(invalid)?;
    let address: IpAddr = address.parse().map_err(|_| invalid())?;
    let prefix: u8 = prefix.parse().map_err(|_| invalid())?;
    let max = if address.is_ipv4() { 32 } else { 128 };
    if prefix > max {
        return Err(invalid());
    }
    Ok(cidr)
}

// ── Forms ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceForm {
    pub hostname: String,
    /// `key=value` lines.
    pub attributes: String,
}

impl DeviceForm {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            attributes: String::new(),
        }
    }

    pub fn to_request(&self, site_id: EntityId) -> Result<CreateDeviceRequest, ValidationError> {
        Ok(CreateDeviceRequest {
            hostname: required("hostname", &self.hostname)?,
            attributes: parse_attributes(&self.attributes)?,
            site_id: Some(site_id),
        })
    }

    /// Full replacement of hostname and attributes.
    pub fn to_update(&self) -> Result<UpdateDeviceRequest, ValidationError> {
        Ok(UpdateDeviceRequest {
            hostname: Some(required("hostname", &self.hostname)?),
            attributes: Some(parse_attributes(&self.attributes)?),
        })
    }
}

impl From<&Device> for DeviceForm {
    fn from(device: &Device) -> Self {
        Self {
            hostname: device.hostname.clone(),
            attributes: format_attributes(&device.attributes),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkForm {
    pub cidr: String,
    pub attributes: String,
}

impl NetworkForm {
    pub fn new(cidr: impl Into<String>) -> Self {
        Self {
            cidr: cidr.into(),
            attributes: String::new(),
        }
    }

    pub fn to_request(&self, site_id: EntityId) -> Result<CreateNetworkRequest, ValidationError> {
        Ok(CreateNetworkRequest {
            cidr: validate_cidr(&self.cidr)?,
            attributes: parse_attributes(&self.attributes)?,
            state: None,
            site_id: Some(site_id),
        })
    }

    /// The CIDR of an existing network is fixed; only attributes change.
    pub fn to_update(&self) -> Result<UpdateNetworkRequest, ValidationError> {
        Ok(UpdateNetworkRequest {
            attributes: Some(parse_attributes(&self.attributes)?),
            state: None,
        })
    }
}

impl From<&Network> for NetworkForm {
    fn from(network: &Network) -> Self {
        Self {
            cidr: network.cidr(),
            attributes: format_attributes(&network.attributes),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct AttributeForm {
    pub name: String,
    /// One of `Device`, `Network`, `Interface`, `Circuit`.
    pub resource_name: String,
    pub description: String,
    pub required: bool,
    pub display: bool,
    pub multi: bool,
}

impl AttributeForm {
    pub fn to_request(&self, site_id: EntityId) -> Result<CreateAttributeRequest, ValidationError> {
        let name = required("name", &self.name)?;
        let raw = required("resource_name", &self.resource_name)?;
        let resource_name: ResourceName = raw
            .parse()
            .map_err(|_| ValidationError::UnknownResourceName(raw.clone()))?;
        Ok(CreateAttributeRequest {
            name,
            resource_name,
            description: self.description.trim().to_owned(),
            required: self.required,
            display: self.display,
            multi: self.multi,
            site_id: Some(site_id),
        })
    }

    /// Name and resource type are fixed once created.
    pub fn to_update(&self) -> UpdateAttributeRequest {
        UpdateAttributeRequest {
            description: Some(self.description.trim().to_owned()),
            required: Some(self.required),
            display: Some(self.display),
            multi: Some(self.multi),
        }
    }
}

impl From<&Attribute> for AttributeForm {
    fn from(attribute: &Attribute) -> Self {
        Self {
            name: attribute.name.clone(),
            resource_name: attribute
                .resource_name
                .map(|r| r.to_string())
                .unwrap_or_default(),
            description: attribute.description.clone(),
            required: attribute.required,
            display: attribute.display,
            multi: attribute.multi,
        }
    }
}

// ── Dialog lifecycle ────────────────────────────────────────────────

/// Where a create dialog is in its submit cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DialogPhase {
    #[default]
    Closed,
    /// Editable, showing the last submission's message if it failed.
    Open { error: Option<String> },
    /// Exactly one request is in flight; input is locked.
    Submitting,
}

impl DialogPhase {
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Open { error } => error.as_deref(),
            _ => None,
        }
    }

    pub fn open() -> Self {
        Self::Open { error: None }
    }

    /// Start a submission. Returns `false` (and stays put) unless the
    /// dialog is open and idle.
    pub fn begin_submit(&mut self) -> bool {
        if matches!(self, Self::Open { .. }) {
            *self = Self::Submitting;
            true
        } else {
            false
        }
    }

    /// Apply the outcome of the in-flight submission.
    pub fn finish(&mut self, outcome: Result<(), Option<String>>) {
        if !self.is_submitting() {
            return;
        }
        *self = match outcome {
            Ok(()) => Self::Closed,
            Err(error) => Self::Open { error },
        };
    }

    pub fn close(&mut self) {
        if !self.is_submitting() {
            *self = Self::Closed;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn all_key_wins_when_alone() {
        let detail = json!({"__all__": "Hostname already exists for this site."});
        assert_eq!(
            extract_message(&detail).as_deref(),
            Some("Hostname already exists for this site.")
        );
    }

    #[test]
    fn key_order_is_fixed() {
        let detail = json!({"__all__": "generic", "hostname": ["This field is required."]});
        assert_eq!(extract_message(&detail).as_deref(), Some("This field is required."));
    }

    #[test]
    fn unknown_shapes_have_no_message() {
        assert_eq!(extract_message(&json!({"cidr": "bad"})), None);
        assert_eq!(extract_message(&json!(42)), None);
        assert_eq!(extract_message(&json!(null)), None);
        assert_eq!(extract_message(&json!("Endpoint not found.")).as_deref(), Some("Endpoint not found."));
    }

    #[test]
    fn rejected_submission_carries_extracted_message() {
        let err = SubmissionError::from(CoreError::Api {
            message: "resource_name: bad".into(),
            status: Some(400),
            detail: Some(json!({"resource_name": ["\"Bogus\" is not a valid choice."]})),
        });
        assert_eq!(err.message().as_deref(), Some("\"Bogus\" is not a valid choice."));

        let err = SubmissionError::from(CoreError::Timeout);
        assert_eq!(err.message(), None);
    }

    #[test]
    fn device_form_requires_hostname() {
        let err = DeviceForm::new("   ").to_request(EntityId::new(1)).unwrap_err();
        assert_eq!(err, ValidationError::Required { field: "hostname" });

        let req = DeviceForm::new(" sw1 ").to_request(EntityId::new(3)).unwrap();
        assert_eq!(req.hostname, "sw1");
        assert_eq!(req.site_id, Some(EntityId::new(3)));
        assert!(req.attributes.is_empty());
    }

    #[test]
    fn attribute_lines_collect_repeats() {
        let attrs = parse_attributes("vendor=juniper\n\n owner = neteng \nrole=core\nrole=edge").unwrap();
        assert_eq!(attrs["vendor"], json!("juniper"));
        assert_eq!(attrs["owner"], json!("neteng"));
        assert_eq!(attrs["role"], json!(["core", "edge"]));
        assert_eq!(format_attributes(&attrs), "vendor=juniper\nowner=neteng\nrole=core\nrole=edge");

        assert_eq!(
            parse_attributes("vendor").unwrap_err(),
            ValidationError::InvalidAttribute("vendor".into())
        );
        assert!(parse_attributes("=x").is_err());
    }

    #[test]
    fn edit_form_round_trips_a_device() {
        let device = Device {
            id: EntityId::new(7),
            hostname: "sw1".into(),
            attributes: parse_attributes("vendor=juniper\nrole=core\nrole=edge").unwrap(),
            site_id: Some(EntityId::new(1)),
        };
        let mut form = DeviceForm::from(&device);
        assert_eq!(form.attributes, "vendor=juniper\nrole=core\nrole=edge");

        form.hostname = "core1".into();
        let update = form.to_update().unwrap();
        assert_eq!(update.hostname.as_deref(), Some("core1"));
        assert_eq!(update.attributes.unwrap(), device.attributes);

        form.hostname = " ".into();
        assert_eq!(
            form.to_update().unwrap_err(),
            ValidationError::Required { field: "hostname" }
        );
    }

    #[test]
    fn cidr_validation() {
        assert_eq!(validate_cidr(" 10.0.0.0/24 ").unwrap(), "10.0.0.0/24");
        assert_eq!(validate_cidr("2001:db8::/48").unwrap(), "2001:db8::/48");
        assert!(validate_cidr("10.0.0.0").is_err());
        assert!(validate_cidr("10.0.0.0/33").is_err());
        assert!(validate_cidr("nope/8").is_err());
        assert_eq!(
            validate_cidr("").unwrap_err(),
            ValidationError::Required { field: "cidr" }
        );
    }

    #[test]
    fn attribute_form_checks_resource_name() {
        let mut form = AttributeForm {
            name: "vendor".into(),
            resource_name: "Gadget".into(),
            ..AttributeForm::default()
        };
        assert_eq!(
            form.to_request(EntityId::new(1)).unwrap_err(),
            ValidationError::UnknownResourceName("Gadget".into())
        );

        form.resource_name = "Device".into();
        form.display = true;
        let req = form.to_request(EntityId::new(1)).unwrap();
        assert_eq!(req.resource_name, ResourceName::Device);
        assert!(req.display);
    }

    #[test]
    fn dialog_stays_open_on_failure() {
        let mut phase = DialogPhase::open();
        assert!(phase.begin_submit());
        assert!(!phase.begin_submit());

        phase.close();
        assert!(phase.is_submitting());

        phase.finish(Err(Some("Hostname already exists".into())));
        assert_eq!(phase.error(), Some("Hostname already exists"));

        assert!(phase.begin_submit());
        phase.finish(Ok(()));
        assert_eq!(phase, DialogPhase::Closed);
    }
}
