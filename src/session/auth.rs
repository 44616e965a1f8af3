//! Login sequence and the lazy authentication gate.

use tracing::{debug, info, warn};

use crate::error::{CloudError, Result};

use super::session::{AuthState, Session};

impl Session {
    /// Login with the session credentials.
    ///
    /// Posts the login form, bridges the session cookie to the cloud domain and
    /// fetches a CSRF token. Returns `Ok(true)` only when a non-empty token was
    /// obtained. A login response that sets no cookies yields `Ok(false)`
    /// rather than an error.
    ///
    /// # Errors
    /// * [`CloudError::Validation`] if credentials are missing or empty; nothing
    ///   is sent in that case.
    /// * [`CloudError::Protocol`] if any step answers with a status other than
    ///   `200 OK` or an unreadable token envelope.
    pub fn login(&mut self) -> Result<bool> {
        let credentials = self
            .credentials()
            .cloned()
            .ok_or_else(|| CloudError::Validation("Credentials are not set".to_string()))?;
        credentials.validate()?;

        // A fresh login always replaces the old token.
        self.csrf_token.clear();
        self.state = AuthState::Authenticating;
        info!(login = credentials.login(), "logging in");

        let result = self.login_sequence(credentials.login(), credentials.password());
        self.state = match &result {
            Ok(true) => AuthState::Authenticated,
            _ => AuthState::Unauthenticated,
        };

        match &result {
            Ok(true) => info!(login = credentials.login(), "login successful"),
            Ok(false) => warn!(login = credentials.login(), "login did not yield a token"),
            Err(e) => warn!(login = credentials.login(), error = %e, "login failed"),
        }
        result
    }

    fn login_sequence(&mut self, login: &str, password: &str) -> Result<bool> {
        let response = self.api.post_login(login, password)?;
        if response.cookies_set() == 0 {
            return Ok(false);
        }

        self.api.get_session_bridge()?;
        self.fetch_csrf_token()
    }

    /// Fetch and store the CSRF token. Only called right after login set cookies.
    pub(crate) fn fetch_csrf_token(&mut self) -> Result<bool> {
        self.csrf_token = self.api.get_csrf_token()?;
        debug!(present = !self.csrf_token.is_empty(), "csrf token fetched");
        Ok(!self.csrf_token.is_empty())
    }

    /// Make sure the session holds a CSRF token, logging in if needed.
    ///
    /// A no-op once authenticated. Every remote operation calls this first.
    ///
    /// # Errors
    /// * [`CloudError::Auth`] if no credentials are set or the login yields no
    ///   token.
    /// * Any error of [`login`](Self::login).
    pub fn ensure_authenticated(&mut self) -> Result<()> {
        if !self.csrf_token.is_empty() {
            return Ok(());
        }
        if self.credentials().is_none() {
            return Err(CloudError::Auth("Login or password is not set".to_string()));
        }
        if !self.login()? {
            return Err(CloudError::Auth("Auth token not retrieved".to_string()));
        }
        Ok(())
    }
}
