//! UI-level actions. Keys and background tasks produce these; the app
//! loop turns them into controller calls or local UI state changes.
//!
//! Domain state never lives here: it arrives as whole store snapshots in
//! [`Action::StateChanged`].

use std::fmt;
use std::sync::Arc;

use nsot_core::{
    AppState, AttributeForm, ConnectionState, DeviceForm, EntityId, NetworkForm, PageRequest,
    ResourceKind, Route,
};

/// A validated-on-submit create or edit form, ready for the controller.
#[derive(Debug, Clone)]
pub enum FormSubmission {
    Device(DeviceForm),
    Network(NetworkForm),
    Attribute(AttributeForm),
}

/// Destructive operation awaiting y/n.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDelete {
    pub kind: ResourceKind,
    pub id: EntityId,
    pub label: String,
}

impl fmt::Display for ConfirmDelete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Delete {} {}?", self.kind, self.label)
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── From the state bridge ──
    StateChanged(Arc<AppState>),
    Connection(ConnectionState),

    // ── Routing ──
    Navigate(Route),
    GoBack,
    Refresh,
    ChangePage(ResourceKind, PageRequest),

    // ── Create / edit dialog ──
    OpenForm(ResourceKind),
    /// Edit record `id`, starting from its current values.
    OpenEdit(EntityId, FormSubmission),
    CloseForm,
    SubmitForm(FormSubmission),
    /// Outcome of the one in-flight submission; `Err` carries the
    /// message to show, if the server gave one.
    FormFinished(Result<EntityId, Option<String>>),

    // ── Delete confirmation ──
    RequestDelete(ConfirmDelete),
    ConfirmYes,
    ConfirmNo,

    ToggleHelp,
    DismissNotification,
}
