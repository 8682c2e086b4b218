use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

/// Header used by NSoT's proxy ("auth_header") authentication mode.
pub const AUTH_HEADER_NAME: &str = "X-NSoT-Email";

/// Credentials for authenticating with an NSoT server.
///
/// Each variant carries the material needed for its auth flow.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// No authentication (local development servers).
    Anonymous,

    /// A trusted reverse proxy asserts identity via `X-NSoT-Email`.
    AuthHeader { email: String },

    /// `Authorization: AuthToken <email>:<token>`. The token comes from
    /// `POST /api/authenticate/` (see [`NsotClient::authenticate`](crate::NsotClient::authenticate)).
    AuthToken { email: String, token: SecretString },
}

impl Credentials {
    /// The user identity these credentials assert, if any.
    pub fn email(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::AuthHeader { email } | Self::AuthToken { email, .. } => Some(email),
        }
    }

    /// Default headers to inject on every request.
    ///
    /// Secret-bearing values are marked sensitive so they never show up
    /// in debug output.
    pub(crate) fn headers(&self) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        match self {
            Self::Anonymous => {}
            Self::AuthHeader { email } => {
                let value = HeaderValue::from_str(email).map_err(|e| Error::Authentication {
                    message: format!("invalid email header value: {e}"),
                })?;
                headers.insert(HeaderName::from_static("x-nsot-email"), value);
            }
            Self::AuthToken { email, token } => {
                let raw = format!("AuthToken {email}:{}", token.expose_secret());
                let mut value = HeaderValue::from_str(&raw).map_err(|e| Error::Authentication {
                    message: format!("invalid auth token header value: {e}"),
                })?;
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
        }
        Ok(headers)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_has_no_headers() {
        assert!(Credentials::Anonymous.headers().unwrap().is_empty());
    }

    #[test]
    fn auth_header_sets_email() {
        let creds = Credentials::AuthHeader {
            email: "admin@example.com".into(),
        };
        let headers = creds.headers().unwrap();
        assert_eq!(headers.get(AUTH_HEADER_NAME).unwrap(), "admin@example.com");
    }

    #[test]
    fn auth_token_is_sensitive() {
        let creds = Credentials::AuthToken {
            email: "admin@example.com".into(),
            token: SecretString::from("abc123".to_string()),
        };
        let headers = creds.headers().unwrap();
        let value = headers.get(AUTHORIZATION).unwrap();
        assert!(value.is_sensitive());
        assert_eq!(value, "AuthToken admin@example.com:abc123");
    }
}
