// ── Action descriptors ──
//
// Everything the root reducer understands. Actions are plain data; the
// side effects that produce them live in `crate::controller`.

use nsot_api::NetworkRelation;

use crate::model::{Attribute, Change, Device, EntityId, Interface, Network, Site, User};
use crate::router::Route;

use super::resource::{ResourceAction, ResourceError};

/// Root action type folded by [`AppState`](super::AppState).
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Resources ────────────────────────────────────────────────────
    Device(ResourceAction<Device>),
    Network(ResourceAction<Network>),
    Attribute(ResourceAction<Attribute>),
    Change(ResourceAction<Change>),
    Interface(ResourceAction<Interface>),

    /// Tree lookups around one network (children, ancestors, ...).
    Related(RelatedAction),

    // ── Router ───────────────────────────────────────────────────────
    Navigate(Route),
    GoBack,

    // ── UI ───────────────────────────────────────────────────────────
    Ui(UiAction),
}

impl Action {
    /// Short `slice/event` label for logs.
    pub fn name(&self) -> String {
        match self {
            Self::Device(a) => format!("device/{}", a.name()),
            Self::Network(a) => format!("network/{}", a.name()),
            Self::Attribute(a) => format!("attribute/{}", a.name()),
            Self::Change(a) => format!("change/{}", a.name()),
            Self::Interface(a) => format!("interface/{}", a.name()),
            Self::Related(a) => format!("related/{}", a.name()),
            Self::Navigate(route) => format!("location/navigate {route}"),
            Self::GoBack => "location/back".into(),
            Self::Ui(a) => format!("ui/{}", a.name()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RelatedAction {
    Request {
        network_id: EntityId,
        relation: NetworkRelation,
    },
    Success {
        network_id: EntityId,
        relation: NetworkRelation,
        networks: Vec<Network>,
    },
    Failure {
        network_id: EntityId,
        relation: NetworkRelation,
        error: ResourceError,
    },
}

impl RelatedAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Request { .. } => "request",
            Self::Success { .. } => "success",
            Self::Failure { .. } => "failure",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    /// Identity and site resolved on connect.
    SessionEstablished { user: Option<User>, site: Option<Site> },
    SubmitStarted,
    SubmitFinished,
    Notify(Notification),
    DismissNotification,
}

impl UiAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SessionEstablished { .. } => "session_established",
            Self::SubmitStarted => "submit_started",
            Self::SubmitFinished => "submit_finished",
            Self::Notify(_) => "notify",
            Self::DismissNotification => "dismiss_notification",
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::Notify(Notification {
            level: NotificationLevel::Info,
            message: message.into(),
        })
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Notify(Notification {
            level: NotificationLevel::Error,
            message: message.into(),
        })
    }
}
