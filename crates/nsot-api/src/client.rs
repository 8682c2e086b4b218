// Async HTTP client for the NSoT REST API.
//
// Base path: /api/
// Auth: X-NSoT-Email header or `Authorization: AuthToken <email>:<token>`
//
// Endpoint groups (devices, networks, ...) are implemented as inherent
// methods in sibling modules to keep this one focused on transport mechanics.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::Credentials;
use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types::{AuthenticateRequest, AuthenticateResponse, ErrorBody};

// ── List query ───────────────────────────────────────────────────────

/// Query parameters for list endpoints.
///
/// `limit`/`offset` drive server-side pagination; `filters` are passed
/// through verbatim (e.g. `("hostname", "sw1")`, `("attributes", "vendor=juniper")`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub filters: Vec<(String, String)>,
}

impl ListQuery {
    pub fn page(limit: u64, offset: u64) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
            filters: Vec::new(),
        }
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((key.into(), value.into()));
        self
    }

    pub(crate) fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(self.filters.len() + 2);
        if let Some(limit) = self.limit {
            params.push(("limit".to_owned(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            params.push(("offset".to_owned(), offset.to_string()));
        }
        params.extend(self.filters.iter().cloned());
        params
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the NSoT REST API.
///
/// Holds a `reqwest::Client` with authentication headers baked in and the
/// normalized `/api/` base URL. When a site is set, collection endpoints
/// are addressed through `sites/{site_id}/`.
#[derive(Debug, Clone)]
pub struct NsotClient {
    http: reqwest::Client,
    base_url: Url,
    site_id: Option<u64>,
}

impl NsotClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from credentials and a transport config.
    pub fn new(
        base_url: &str,
        credentials: &Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let headers = credentials.headers()?;
        let http = transport.build_client_with_headers(headers)?;
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            site_id: None,
        })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            site_id: None,
        })
    }

    /// Scope collection endpoints to a site.
    #[must_use]
    pub fn with_site(mut self, site_id: Option<u64>) -> Self {
        self.site_id = site_id;
        self
    }

    pub fn site_id(&self) -> Option<u64> {
        self.site_id
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Ensure the base URL ends in `/api/`.
    ///
    /// `https://nsot.example.com` → `https://nsot.example.com/api/`
    /// `https://nsot.example.com/api` → `https://nsot.example.com/api/`
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();

        if path.ends_with("/api") {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/api/"));
        }

        Ok(url)
    }

    /// Exchange an email + secret key for an auth token.
    ///
    /// `POST /api/authenticate/` answers `{"auth_token": "..."}`.
    pub async fn authenticate(
        base_url: &str,
        email: &str,
        secret_key: &SecretString,
        transport: &TransportConfig,
    ) -> Result<SecretString, Error> {
        let anonymous = Self::new(base_url, &Credentials::Anonymous, transport)?;
        let body = AuthenticateRequest {
            email,
            secret_key: secret_key.expose_secret(),
        };

        let resp: AuthenticateResponse = anonymous
            .post("authenticate/", &body)
            .await
            .map_err(|e| match e {
                Error::Api { message, .. } => Error::Authentication { message },
                Error::InvalidCredentials => Error::Authentication {
                    message: "invalid email or secret key".into(),
                },
                other => other,
            })?;

        Ok(SecretString::from(resp.auth_token))
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Join a relative path (e.g. `"devices/"`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    /// Collection path, site-scoped when a site is configured.
    pub(crate) fn collection(&self, resource: &str) -> String {
        match self.site_id {
            Some(site) => format!("sites/{site}/{resource}/"),
            None => format!("{resource}/"),
        }
    }

    /// Detail path for a single object.
    pub(crate) fn detail(&self, resource: &str, id: u64) -> String {
        format!("{}{id}/", self.collection(resource))
    }

    /// Nested sub-resource path, e.g. `devices/1/interfaces/`.
    pub(crate) fn nested(&self, resource: &str, id: u64, action: &str) -> String {
        format!("{}{action}/", self.detail(resource, id))
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PATCH {url}");

        let resp = self.http.patch(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        self.handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Error::InvalidCredentials;
        }

        let raw = resp.text().await.unwrap_or_default();

        if let Ok(body) = serde_json::from_str::<ErrorBody>(&raw) {
            let message = flatten_message(&body.error.message)
                .unwrap_or_else(|| status.to_string());
            Error::Api {
                status: status.as_u16(),
                message,
                detail: Some(body.error.message),
            }
        } else {
            Error::Api {
                status: status.as_u16(),
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
                detail: None,
            }
        }
    }
}

/// Render an `error.message` value as one line of text.
///
/// Strings pass through; field maps become `field: msg; field: msg`
/// with list values joined by spaces.
fn flatten_message(value: &serde_json::Value) -> Option<String> {
    use serde_json::Value;

    fn scalar(v: &Value) -> String {
        match v {
            Value::String(s) => s.clone(),
            Value::Array(items) => items.iter().map(scalar).collect::<Vec<_>>().join(" "),
            other => other.to_string(),
        }
    }

    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => Some(
            map.iter()
                .map(|(k, v)| format!("{k}: {}", scalar(v)))
                .collect::<Vec<_>>()
                .join("; "),
        ),
        other => Some(scalar(other)),
    }
}
