use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::{EntityId, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum ChangeEvent {
    Create,
    Update,
    Delete,
}

/// One field of a change's before/after diff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: String,
    pub old: serde_json::Value,
    pub new: serde_json::Value,
}

/// An audit-log entry. Read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub id: EntityId,
    pub user: User,
    pub event: Option<ChangeEvent>,
    pub resource_name: String,
    pub resource_id: EntityId,
    pub change_at: DateTime<Utc>,
    pub site_id: Option<EntityId>,
    /// Snapshot of the resource after the change.
    pub resource: Option<serde_json::Value>,
    pub diff: Vec<FieldChange>,
}
