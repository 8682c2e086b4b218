//! State layer between `nsot-api` and the console UI.
//!
//! - **[`Store`]**: a single `Arc<AppState>` snapshot published through a
//!   `tokio::sync::watch` channel. [`Store::dispatch`] folds an [`Action`]
//!   through the root reducer; unrelated slices keep their `Arc` identity.
//!
//! - **[`ResourceState<T>`]**: per-entity slice with `items`, the selected
//!   `item`, loading flags, pagination and the last error.
//!
//! - **[`Command`]**: declarative API calls. [`Controller::execute`] runs
//!   them and dispatches request, then success or failure.
//!
//! - **[`Route`]**: console paths parsed into typed routes, with
//!   back-navigation kept in the `location` slice.
//!
//! - **[`forms`]**: create-form validation and server error extraction.

pub mod command;
pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod forms;
pub mod model;
pub mod pagination;
pub mod router;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::requests::*;
pub use command::{Command, CommandResult};
pub use config::{AuthCredentials, ClientConfig, TlsVerification};
pub use controller::{ConnectionState, Controller};
pub use error::CoreError;
pub use forms::{
    AttributeForm, DeviceForm, DialogPhase, NetworkForm, SubmissionError, ValidationError,
};
pub use pagination::{PageInfo, PageRequest};
pub use router::{Location, Route};
pub use store::{
    Action, AppState, Middleware, Notification, NotificationLevel, Reducer, RelatedAction,
    RelatedNetworks, Resource, ResourceAction, ResourceError, ResourceKind, ResourceState,
    StateStream, Store, UiAction, UiState,
};

pub use model::{
    Attribute, Attributes, Change, ChangeEvent, Device, EntityId, FieldChange, Interface,
    Network, NetworkState, Page, ResourceName, Site, User,
};

pub use nsot_api::NetworkRelation;
