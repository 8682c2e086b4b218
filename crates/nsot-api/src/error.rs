use thiserror::Error;

/// Top-level error type for the `nsot-api` crate.
///
/// Covers every failure mode of the REST surface: authentication,
/// transport, structured API errors, and payload decoding.
/// `nsot-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login or token exchange failed.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The server rejected the supplied credentials (HTTP 401).
    #[error("Invalid credentials")]
    InvalidCredentials,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// Structured error from the `{error: {message, code}}` envelope.
    ///
    /// `detail` keeps the raw `message` value, which the server sends
    /// either as a plain string or as an object of field name to message.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        message: String,
        detail: Option<serde_json::Value>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying by hand.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }

    /// HTTP status code, if the error carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::InvalidCredentials => Some(401),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The raw `error.message` value from the server, if any.
    pub fn detail(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Api { detail, .. } => detail.as_ref(),
            _ => None,
        }
    }
}
