//! Cloud API client with request/response handling.

use std::io::Read;

use reqwest::header::{ACCEPT, CONTENT_TYPE, ORIGIN, REFERER, USER_AGENT};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::responses::{CsrfResponse, ShardResponse};
use crate::config::CloudConfig;
use crate::error::{CloudError, Result};
use crate::http::{HttpRequest, HttpResponse, Transport};

const JSON_ACCEPT: &str = "application/json";
const ANY_ACCEPT: &str = "*/*";

/// Low-level client for the cloud endpoints.
///
/// Every request carries the configured user agent and, unless the endpoint
/// overrides it, the configured accept header. Cookies are handled by the
/// underlying [`Transport`].
pub struct ApiClient {
    transport: Box<dyn Transport>,
    config: CloudConfig,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new API client over `transport`.
    pub fn new(config: CloudConfig, transport: Box<dyn Transport>) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &CloudConfig {
        &self.config
    }

    /// Send a request with the fixed headers applied.
    fn execute(&self, mut request: HttpRequest) -> Result<HttpResponse> {
        if request.header_value(&ACCEPT).is_none() {
            request = request.with_header(ACCEPT, self.config.accept.clone());
        }
        request = request.with_header(USER_AGENT, self.config.user_agent.clone());

        // Query strings carry the CSRF token and login name.
        let method = request.method.clone();
        let path = request.url.split('?').next().unwrap_or_default().to_string();
        debug!(%method, url = %path, body = ?request.body, "api request");

        let response = self.transport.send(request)?;
        debug!(
            %method,
            url = %path,
            status = response.status().as_u16(),
            cookies = response.cookies_set(),
            "api response"
        );
        Ok(response)
    }

    /// `POST /cgi-bin/auth` with the login form.
    ///
    /// Returns the response so the caller can see whether cookies were set.
    pub fn post_login(&self, login: &str, password: &str) -> Result<HttpResponse> {
        let request = HttpRequest::post(self.config.auth_url()).with_form(vec![
            ("Login", login.to_string()),
            ("Domain", self.config.login_domain.clone()),
            ("Password", password.to_string()),
        ]);
        self.execute(request)?.ensure_ok()
    }

    /// `GET /sdc`, carrying the auth-domain session over to the cloud domain.
    pub fn get_session_bridge(&self) -> Result<()> {
        self.execute(HttpRequest::get(self.config.sdc_url()))?
            .ensure_ok()?;
        Ok(())
    }

    /// `GET /api/v2/tokens/csrf`. The returned token may be empty.
    pub fn get_csrf_token(&self) -> Result<String> {
        let request =
            HttpRequest::get(self.config.csrf_url()).with_header(ACCEPT, JSON_ACCEPT);
        let text = self.execute(request)?.ensure_ok()?.text()?;
        let parsed: CsrfResponse = decode(&text, "csrf token")?;
        Ok(parsed.body.token)
    }

    /// `GET /api/v2/dispatcher?token=...`.
    pub fn get_dispatcher(&self, token: &str) -> Result<ShardResponse> {
        let request =
            HttpRequest::get(self.config.dispatcher_url(token)).with_header(ACCEPT, JSON_ACCEPT);
        let text = self.execute(request)?.ensure_ok()?.text()?;
        decode(&text, "dispatcher")
    }

    /// Stream a multipart body to a shard. The status is left to the caller.
    pub fn post_upload(
        &self,
        url: &str,
        referer: &str,
        content_type: &str,
        body: impl Read + Send + 'static,
        length: u64,
    ) -> Result<HttpResponse> {
        let request = HttpRequest::post(url)
            .with_header(REFERER, referer)
            .with_header(ORIGIN, self.config.cloud_domain.clone())
            .with_header(CONTENT_TYPE, content_type)
            .with_header(ACCEPT, ANY_ACCEPT)
            .with_stream(body, length);
        self.execute(request)
    }

    /// `POST /api/v2/file/add`, registering uploaded bytes under a path.
    pub fn post_add_file(&self, fields: Vec<(&'static str, String)>, referer: &str) -> Result<()> {
        let request = HttpRequest::post(self.config.add_file_url())
            .with_header(REFERER, referer)
            .with_header(ORIGIN, self.config.cloud_domain.clone())
            .with_header(ACCEPT, ANY_ACCEPT)
            .with_form(fields);
        self.execute(request)?.ensure_ok()?;
        Ok(())
    }

    /// `GET` a file from a shard.
    pub fn get_file(&self, url: &str) -> Result<HttpResponse> {
        self.execute(HttpRequest::get(url))?.ensure_ok()
    }
}

fn decode<T: DeserializeOwned>(text: &str, what: &str) -> Result<T> {
    serde_json::from_str(text)
        .map_err(|e| CloudError::Protocol(format!("Malformed {} response: {}", what, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    struct Recorder {
        seen: Arc<Mutex<Vec<HttpRequest>>>,
        status: StatusCode,
        body: &'static str,
    }

    impl Transport for Recorder {
        fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
            self.seen.lock().unwrap().push(request);
            Ok(HttpResponse::new(self.status, Cursor::new(self.body.as_bytes().to_vec())))
        }
    }

    fn client(status: StatusCode, body: &'static str) -> (ApiClient, Arc<Mutex<Vec<HttpRequest>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let transport = Recorder {
            seen: Arc::clone(&seen),
            status,
            body,
        };
        (ApiClient::new(CloudConfig::default(), Box::new(transport)), seen)
    }

    #[test]
    fn test_fixed_headers_applied() {
        let (api, seen) = client(StatusCode::OK, "");
        api.get_session_bridge().unwrap();

        let seen = seen.lock().unwrap();
        let config = CloudConfig::default();
        assert_eq!(seen[0].header_value(&USER_AGENT), Some(config.user_agent.as_str()));
        assert_eq!(seen[0].header_value(&ACCEPT), Some(config.accept.as_str()));
    }

    #[test]
    fn test_json_accept_overrides_default() {
        let (api, seen) = client(StatusCode::OK, r#"{"body":{"token":"abc"}}"#);
        assert_eq!(api.get_csrf_token().unwrap(), "abc");
        assert_eq!(seen.lock().unwrap()[0].header_value(&ACCEPT), Some(JSON_ACCEPT));
    }

    #[test]
    fn test_login_form_fields() {
        let (api, seen) = client(StatusCode::OK, "");
        api.post_login("user", "p@ss word").unwrap();

        let seen = seen.lock().unwrap();
        match &seen[0].body {
            crate::http::RequestBody::Form(fields) => {
                assert_eq!(fields[0], ("Login", "user".to_string()));
                assert_eq!(fields[1], ("Domain", "mail.ru".to_string()));
                assert_eq!(fields[2], ("Password", "p@ss word".to_string()));
            }
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_json_is_protocol_error() {
        let (api, _) = client(StatusCode::OK, "<html>");
        assert!(matches!(api.get_dispatcher("t"), Err(CloudError::Protocol(_))));
    }

    #[test]
    fn test_non_ok_status_is_protocol_error() {
        let (api, _) = client(StatusCode::INTERNAL_SERVER_ERROR, "");
        let err = api.post_add_file(Vec::new(), "http://x/").unwrap_err();
        assert_eq!(err.to_string(), "Protocol error: 500: Internal Server Error");
    }
}
