//! Service endpoints and fixed request headers.

use std::time::Duration;

/// Production authentication host.
pub const AUTH_DOMAIN: &str = "https://auth.mail.ru";
/// Production cloud host.
pub const CLOUD_DOMAIN: &str = "https://cloud.mail.ru";
/// Mail domain sent with the login form.
pub const LOGIN_DOMAIN: &str = "mail.ru";

const USER_AGENT: &str =
    "Mozilla / 5.0(Windows; U; Windows NT 5.1; en - US; rv: 1.9.0.1) Gecko / 2008070208 Firefox / 3.0.1";
const DEFAULT_ACCEPT: &str =
    "text / html,application / xhtml + xml,application / xml; q = 0.9,*/*;q=0.8";

/// Immutable client configuration, injected into a [`Session`](crate::Session).
///
/// `Default` targets the production service. Tests point `auth_domain` and
/// `cloud_domain` at a double instead.
#[derive(Debug, Clone)]
pub struct CloudConfig {
    /// Authentication host, without trailing slash.
    pub auth_domain: String,
    /// Cloud API host, without trailing slash.
    pub cloud_domain: String,
    /// Value of the `Domain` field in the login form.
    pub login_domain: String,
    /// User agent sent on every request.
    pub user_agent: String,
    /// Accept header used unless an endpoint overrides it.
    pub accept: String,
    /// Per-request timeout. `None` disables it.
    pub timeout: Option<Duration>,
    /// Proxy URL (e.g. "http://proxy:8080" or "socks5://proxy:1080").
    pub proxy: Option<String>,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            auth_domain: AUTH_DOMAIN.to_string(),
            cloud_domain: CLOUD_DOMAIN.to_string(),
            login_domain: LOGIN_DOMAIN.to_string(),
            user_agent: USER_AGENT.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
            timeout: Some(Duration::from_secs(60)),
            proxy: None,
        }
    }
}

impl CloudConfig {
    /// Override the authentication and cloud hosts.
    pub fn with_endpoints(mut self, auth_domain: &str, cloud_domain: &str) -> Self {
        self.auth_domain = auth_domain.trim_end_matches('/').to_string();
        self.cloud_domain = cloud_domain.trim_end_matches('/').to_string();
        self
    }

    /// Route all requests through a proxy.
    pub fn with_proxy(mut self, proxy: &str) -> Self {
        self.proxy = Some(proxy.to_string());
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn auth_url(&self) -> String {
        format!("{}/cgi-bin/auth", self.auth_domain)
    }

    pub(crate) fn sdc_url(&self) -> String {
        format!("{}/sdc?from={}/home", self.auth_domain, self.cloud_domain)
    }

    pub(crate) fn csrf_url(&self) -> String {
        format!("{}/api/v2/tokens/csrf", self.cloud_domain)
    }

    pub(crate) fn dispatcher_url(&self, token: &str) -> String {
        format!("{}/api/v2/dispatcher?token={}", self.cloud_domain, token)
    }

    pub(crate) fn add_file_url(&self) -> String {
        format!("{}/api/v2/file/add", self.cloud_domain)
    }

    /// Cloud UI page for a directory, used as `Referer`.
    pub(crate) fn home_url(&self, encoded_path: &str) -> String {
        format!("{}/home{}", self.cloud_domain, encoded_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoints() {
        let config = CloudConfig::default();
        assert_eq!(config.auth_url(), "https://auth.mail.ru/cgi-bin/auth");
        assert_eq!(
            config.sdc_url(),
            "https://auth.mail.ru/sdc?from=https://cloud.mail.ru/home"
        );
        assert_eq!(config.csrf_url(), "https://cloud.mail.ru/api/v2/tokens/csrf");
        assert_eq!(
            config.dispatcher_url("abc"),
            "https://cloud.mail.ru/api/v2/dispatcher?token=abc"
        );
        assert_eq!(config.add_file_url(), "https://cloud.mail.ru/api/v2/file/add");
    }

    #[test]
    fn test_with_endpoints_trims_slash() {
        let config = CloudConfig::default().with_endpoints("http://auth.test/", "http://cloud.test/");
        assert_eq!(config.auth_url(), "http://auth.test/cgi-bin/auth");
        assert_eq!(config.home_url("%2Fdocs%2F"), "http://cloud.test/home%2Fdocs%2F");
    }

    #[test]
    fn test_proxy_and_timeout() {
        let config = CloudConfig::default()
            .with_proxy("http://127.0.0.1:8080")
            .with_timeout(None);
        assert_eq!(config.proxy.as_deref(), Some("http://127.0.0.1:8080"));
        assert!(config.timeout.is_none());
    }
}
