// nsot-api: Async Rust client for the NSoT REST API

pub mod attributes;
pub mod auth;
pub mod changes;
pub mod client;
pub mod devices;
pub mod error;
pub mod interfaces;
pub mod networks;
pub mod sites;
pub mod transport;
pub mod types;

pub use auth::Credentials;
pub use client::{ListQuery, NsotClient};
pub use error::Error;
pub use networks::NetworkRelation;
pub use transport::{TlsMode, TransportConfig};
pub use types::Page;
