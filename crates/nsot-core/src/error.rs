// ── Core error types ──
//
// User-facing errors from nsot-core. The `From<nsot_api::Error>` impl
// translates transport-layer failures into domain variants; structured
// server detail is carried along so forms can pick field messages out of it.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to NSoT at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Not connected to NSoT")]
    NotConnected,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── API errors ───────────────────────────────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
        /// Raw `error.message` value: a string or a field map.
        detail: Option<serde_json::Value>,
    },

    // ── Validation errors ────────────────────────────────────────────
    #[error("Validation failed for '{field}': {reason}")]
    ValidationFailed { field: String, reason: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// HTTP status code, if the failure came back from the server.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            Self::NotFound { .. } => Some(404),
            Self::AuthenticationFailed { .. } => Some(401),
            _ => None,
        }
    }

    pub fn detail(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Api { detail, .. } => detail.as_ref(),
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<nsot_api::Error> for CoreError {
    fn from(err: nsot_api::Error) -> Self {
        match err {
            nsot_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            nsot_api::Error::InvalidCredentials => CoreError::AuthenticationFailed {
                message: "server rejected the supplied credentials".into(),
            },
            nsot_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                        detail: None,
                    }
                }
            }
            nsot_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            nsot_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            nsot_api::Error::Api {
                status,
                message,
                detail,
            } => CoreError::Api {
                message,
                status: Some(status),
                detail,
            },
            nsot_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn api_error_keeps_detail() {
        let err = CoreError::from(nsot_api::Error::Api {
            status: 409,
            message: "hostname: taken".into(),
            detail: Some(json!({"hostname": "taken"})),
        });
        assert_eq!(err.status(), Some(409));
        assert_eq!(err.detail(), Some(&json!({"hostname": "taken"})));
    }

    #[test]
    fn invalid_credentials_are_auth_failures() {
        let err = CoreError::from(nsot_api::Error::InvalidCredentials);
        assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
    }
}
