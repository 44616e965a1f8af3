//! Session management.
//!
//! A [`Session`] is one logical account: its credentials, the cookie-carrying
//! transport, and the CSRF token obtained by the last successful login.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::api::ApiClient;
use crate::config::CloudConfig;
use crate::error::{CloudError, Result};
use crate::http::{HttpClient, Transport};
use crate::progress::{ProgressCallback, SharedProgressCallback};

/// Login name and password for one account.
///
/// The password never appears in `Debug` output.
#[derive(Clone)]
pub struct Credentials {
    login: String,
    password: String,
}

impl Credentials {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    /// Both fields must be non-empty before anything is sent.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.login.is_empty() {
            return Err(CloudError::Validation("Login name is empty".to_string()));
        }
        if self.password.is_empty() {
            return Err(CloudError::Validation("Password is empty".to_string()));
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Authentication progress of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// No CSRF token is held.
    Unauthenticated,
    /// A login sequence is running.
    Authenticating,
    /// A CSRF token from the last login is held.
    Authenticated,
}

/// Cloud user session.
///
/// Holds all authentication state needed for API requests. Operations take
/// `&mut self`, so at most one request sequence runs per session; wrap the
/// session in a mutex to share it between threads.
pub struct Session {
    /// API client for making requests
    pub(crate) api: ApiClient,
    credentials: Option<Credentials>,
    /// Empty until a login succeeds
    pub(crate) csrf_token: String,
    pub(crate) state: AuthState,
    /// Progress callback for transfer progress
    progress_callback: Option<SharedProgressCallback>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("api", &self.api)
            .field("credentials", &self.credentials)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create a session for the production service.
    ///
    /// No request is made until the first operation (or an explicit
    /// [`login`](Self::login)).
    ///
    /// # Example
    /// ```no_run
    /// use mailru_cloud::{Credentials, Session};
    ///
    /// # fn example() -> mailru_cloud::Result<()> {
    /// let mut session = Session::new(Credentials::new("user@mail.ru", "password"))?;
    /// session.ensure_authenticated()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_config(credentials, CloudConfig::default())
    }

    /// Create a session with a custom configuration (endpoints, proxy, timeout).
    pub fn with_config(credentials: Credentials, config: CloudConfig) -> Result<Self> {
        let transport = HttpClient::from_config(&config)?;
        let mut session = Self::with_transport(config, transport);
        session.set_credentials(credentials);
        Ok(session)
    }

    /// Create a session without credentials over an arbitrary transport.
    pub fn with_transport(config: CloudConfig, transport: impl Transport + 'static) -> Self {
        Self {
            api: ApiClient::new(config, Box::new(transport)),
            credentials: None,
            csrf_token: String::new(),
            state: AuthState::Unauthenticated,
            progress_callback: None,
        }
    }

    /// Replace the account credentials.
    ///
    /// Any token from a previous login is dropped.
    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = Some(credentials);
        self.invalidate();
    }

    pub(crate) fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Login name of the account, if credentials are set.
    pub fn login_name(&self) -> Option<&str> {
        self.credentials.as_ref().map(Credentials::login)
    }

    /// Current CSRF token, if authenticated.
    pub fn csrf_token(&self) -> Option<&str> {
        if self.csrf_token.is_empty() {
            None
        } else {
            Some(&self.csrf_token)
        }
    }

    pub fn auth_state(&self) -> AuthState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == AuthState::Authenticated
    }

    /// Forget the CSRF token. The next operation logs in again.
    pub fn invalidate(&mut self) {
        self.csrf_token.clear();
        self.state = AuthState::Unauthenticated;
    }

    pub fn config(&self) -> &CloudConfig {
        self.api.config()
    }

    /// Observe upload and download progress.
    ///
    /// The callback runs on the thread moving the bytes, which for uploads is
    /// the HTTP client's worker rather than the caller.
    pub fn watch_status(&mut self, callback: ProgressCallback) {
        self.progress_callback = Some(Arc::new(Mutex::new(callback)));
    }

    /// Stop observing progress.
    pub fn clear_status_watch(&mut self) {
        self.progress_callback = None;
    }

    pub(crate) fn progress_callback(&self) -> Option<SharedProgressCallback> {
        self.progress_callback.clone()
    }
}
