// ── Runtime connection configuration ──
//
// These types describe how to reach an NSoT server. They carry credential
// data and request tuning but never touch disk; the UI builds a
// `ClientConfig` (usually through nsot-config) and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::model::EntityId;

/// Site used for create payloads when none is configured.
pub const DEFAULT_SITE_ID: EntityId = EntityId::new(1);

/// Rows requested per list page when none is configured.
pub const DEFAULT_PAGE_SIZE: u64 = 25;

/// How to authenticate with the server.
#[derive(Debug, Clone)]
pub enum AuthCredentials {
    /// No auth header at all (local development servers).
    Anonymous,
    /// Proxy auth: a trusted front end asserts identity via `X-NSoT-Email`.
    AuthHeader { email: String },
    /// A previously issued auth token.
    AuthToken { email: String, token: SecretString },
    /// Email + secret key, exchanged for a token on connect.
    SecretKey {
        email: String,
        secret_key: SecretString,
    },
}

impl AuthCredentials {
    pub fn email(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::AuthHeader { email }
            | Self::AuthToken { email, .. }
            | Self::SecretKey { email, .. } => Some(email),
        }
    }
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed lab servers).
    DangerAcceptInvalid,
}

/// Configuration for talking to a single NSoT server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server URL (e.g. `http://localhost:8990`). `/api/` is appended.
    pub url: Url,
    pub auth: AuthCredentials,
    /// Site to scope every collection request to.
    pub site_id: Option<EntityId>,
    pub tls: TlsVerification,
    pub timeout: Duration,
    /// Rows per list page.
    pub page_size: u64,
}

impl ClientConfig {
    pub fn new(url: Url, auth: AuthCredentials) -> Self {
        Self {
            url,
            auth,
            site_id: Some(DEFAULT_SITE_ID),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Site injected into create payloads.
    pub fn create_site_id(&self) -> EntityId {
        self.site_id.unwrap_or(DEFAULT_SITE_ID)
    }
}
