use secrecy::{ExposeSecret, SecretString};

/// Header carrying the session token.
pub const TOKEN_HEADER: &str = "X-API-TOKEN";
/// Header carrying the account login.
pub const USERNAME_HEADER: &str = "X-API-USERNAME";
/// Header pinning the API contract version.
pub const VERSION_HEADER: &str = "X-API-VERSION";
/// The API contract version sent on every authenticated call.
pub const API_VERSION: &str = "4";

/// An authenticated API session: the account login and its token.
///
/// Written once by `login` (or supplied at construction from persisted
/// config) and only read afterwards.
#[derive(Debug, Clone)]
pub struct Session {
    pub username: String,
    pub token: SecretString,
}

impl Session {
    pub fn new(username: impl Into<String>, token: SecretString) -> Self {
        Self {
            username: username.into(),
            token,
        }
    }

    /// Attach the auth headers to a request.
    pub(crate) fn apply(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header(TOKEN_HEADER, self.token.expose_secret())
            .header(USERNAME_HEADER, &self.username)
            .header(VERSION_HEADER, API_VERSION)
    }
}

/// Everything needed to talk to one controller without logging in again.
///
/// Persisted by the config layer after onboarding and handed back to
/// [`FlameBossClient::with_credentials`](crate::FlameBossClient::with_credentials).
/// Replaced wholesale on re-authentication.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub auth_token: SecretString,
    pub device_id: Option<String>,
}
