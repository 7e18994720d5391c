// Flame Boss HTTP client
//
// Wraps `reqwest::Client` with URL construction, auth header injection and
// status-to-error mapping. Endpoint groups (sessions, devices, cooks) are
// implemented as inherent methods in separate files to keep this module
// focused on transport mechanics.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::{Credentials, Session};
use crate::error::Error;
use crate::transport::TransportConfig;

/// Production API host.
pub const DEFAULT_BASE_URL: &str = "https://myflameboss.com";

/// Path prefix for reads and session management.
const READ_API_PREFIX: &str = "api/v4";
/// Path prefix for controller writes, which live on an older API revision.
const WRITE_API_PREFIX: &str = "api/v1";

/// Async client for the Flame Boss cloud API.
///
/// Holds at most one session and one device id. Both are written only by
/// [`login`](Self::login) / [`discover_device`](Self::discover_device) (or
/// supplied at construction) and read by every other call.
pub struct FlameBossClient {
    http: reqwest::Client,
    base_url: Url,
    session: ArcSwapOption<Session>,
    device_id: ArcSwapOption<String>,
}

impl FlameBossClient {
    /// Create an unauthenticated client. Only [`login`](Self::login) will
    /// succeed until a session is established.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self::with_client(transport.build_client()?, base_url))
    }

    /// Create a client from persisted credentials.
    pub fn with_credentials(
        base_url: Url,
        credentials: Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let client = Self::new(base_url, transport)?;
        client.restore(credentials);
        Ok(client)
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            session: ArcSwapOption::empty(),
            device_id: ArcSwapOption::empty(),
        }
    }

    /// Replace the session and device id wholesale.
    pub fn restore(&self, credentials: Credentials) {
        self.session.store(Some(Arc::new(Session::new(
            credentials.username,
            credentials.auth_token,
        ))));
        self.device_id.store(credentials.device_id.map(Arc::new));
    }

    /// The API host this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether a session token is held.
    pub fn is_authenticated(&self) -> bool {
        self.session.load().is_some()
    }

    /// The controller this client writes to, if known.
    pub fn device_id(&self) -> Option<String> {
        self.device_id.load_full().map(|id| id.as_ref().clone())
    }

    /// Snapshot of the current credentials, for persisting after onboarding.
    pub fn credentials(&self) -> Option<Credentials> {
        let session = self.session.load_full()?;
        Some(Credentials {
            username: session.username.clone(),
            auth_token: session.token.clone(),
            device_id: self.device_id(),
        })
    }

    // ── State writers ────────────────────────────────────────────────

    pub(crate) fn set_session(&self, session: Session) {
        debug!(username = %session.username, "storing session");
        self.session.store(Some(Arc::new(session)));
    }

    pub(crate) fn set_device_id(&self, device_id: String) {
        debug!(device_id, "storing device id");
        self.device_id.store(Some(Arc::new(device_id)));
    }

    /// The active session, or an auth error if there is none.
    pub(crate) fn require_session(&self) -> Result<Arc<Session>, Error> {
        self.session.load_full().ok_or_else(|| Error::Authentication {
            message: "not logged in".into(),
        })
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `{base}/api/v4/{path}`
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        self.join(READ_API_PREFIX, path)
    }

    /// `{base}/api/v1/{path}`
    pub(crate) fn write_url(&self, path: &str) -> Result<Url, Error> {
        self.join(WRITE_API_PREFIX, path)
    }

    fn join(&self, prefix: &str, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{prefix}/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Unauthenticated form POST. Used only by login.
    pub(crate) async fn post_form_anonymous(
        &self,
        url: Url,
        form: &impl Serialize,
    ) -> Result<reqwest::Response, Error> {
        debug!("POST {}", url);
        Ok(self.http.post(url).form(form).send().await?)
    }

    /// Authenticated GET, decoding the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        let session = self.require_session()?;
        debug!("GET {}", url);

        let resp = session.apply(self.http.get(url)).send().await?;
        let resp = check_status(resp).await?;
        decode(resp).await
    }

    /// Authenticated form POST. Only the status is checked; the body is
    /// discarded.
    pub(crate) async fn post_form(
        &self,
        url: Url,
        form: &impl Serialize,
    ) -> Result<(), Error> {
        let session = self.require_session()?;
        debug!("POST {}", url);

        let resp = session.apply(self.http.post(url).form(form)).send().await?;
        check_status(resp).await?;
        Ok(())
    }
}

/// Map non-success statuses onto the error taxonomy.
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(Error::Authentication {
            message: format!("token rejected (HTTP {status})"),
        });
    }

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(Error::NotFound {
            what: resp.url().path().to_owned(),
        });
    }

    let body = resp.text().await.unwrap_or_default();
    Err(Error::Http {
        status: status.as_u16(),
        message: preview(&body),
    })
}

pub(crate) async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let body = resp.text().await?;
    match serde_json::from_str(&body) {
        Ok(value) => Ok(value),
        Err(e) => Err(Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        }),
    }
}

/// First 200 characters of a response body, for error messages.
pub(crate) fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}
