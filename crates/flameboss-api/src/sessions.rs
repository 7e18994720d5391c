// Session management
//
// Username/password login against `POST /api/v4/sessions`. The returned
// token is kept on the client and sent as a header on every later call.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::auth::Session;
use crate::client::{FlameBossClient, decode, preview};
use crate::error::Error;
use crate::models::LoginResponse;

impl FlameBossClient {
    /// Authenticate with username/password.
    ///
    /// On success the token and username are stored on this client and the
    /// full response (user id, token) is returned for persisting. Any
    /// non-success status or unreadable body is an
    /// [`Error::Authentication`]; only a transport failure surfaces as
    /// [`Error::Transport`].
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<LoginResponse, Error> {
        let url = self.api_url("sessions")?;
        debug!(username, "logging in");

        let form = [
            ("session[login]", username),
            ("session[password]", password.expose_secret()),
        ];
        let resp = self.post_form_anonymous(url, &form).await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {}", preview(&body)),
            });
        }

        let token: LoginResponse = decode(resp).await.map_err(|e| Error::Authentication {
            message: format!("malformed login response: {e}"),
        })?;

        self.set_session(Session::new(username, token.auth_token.clone().into()));
        debug!(user_id = token.user_id, "login successful");
        Ok(token)
    }
}
