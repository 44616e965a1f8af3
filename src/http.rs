//! HTTP transport for cloud requests.
//!
//! Everything above this module talks to the network through [`Transport`], so a
//! [`Session`](crate::Session) can run against [`HttpClient`] in production or a
//! scripted double in tests.

use std::fmt;
use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use reqwest::blocking::{Body, Client};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{Method, StatusCode, Url};

use crate::config::CloudConfig;
use crate::error::{CloudError, Result};

/// Body of an outgoing request.
pub enum RequestBody {
    /// No body.
    Empty,
    /// `application/x-www-form-urlencoded` fields, in order.
    Form(Vec<(&'static str, String)>),
    /// Raw bytes streamed from a reader with a length known up front.
    Stream {
        reader: Box<dyn Read + Send>,
        length: u64,
    },
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestBody::Empty => f.write_str("Empty"),
            RequestBody::Form(fields) => {
                let names: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
                f.debug_tuple("Form").field(&names).finish()
            }
            RequestBody::Stream { length, .. } => {
                f.debug_struct("Stream").field("length", length).finish()
            }
        }
    }
}

/// A single outgoing HTTP request.
#[derive(Debug)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(HeaderName, String)>,
    pub body: RequestBody,
}

impl HttpRequest {
    /// Create a GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    /// Create a POST request with an empty body.
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    /// Set a header, replacing any earlier value with the same name.
    pub fn with_header(mut self, name: HeaderName, value: impl Into<String>) -> Self {
        self.headers.retain(|(existing, _)| *existing != name);
        self.headers.push((name, value.into()));
        self
    }

    /// Attach form fields as the body.
    pub fn with_form(mut self, fields: Vec<(&'static str, String)>) -> Self {
        self.body = RequestBody::Form(fields);
        self
    }

    /// Attach a streamed body of exactly `length` bytes.
    pub fn with_stream(mut self, reader: impl Read + Send + 'static, length: u64) -> Self {
        self.body = RequestBody::Stream {
            reader: Box::new(reader),
            length,
        };
        self
    }

    /// Look up a header value by name.
    pub fn header_value(&self, name: &HeaderName) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Response to an [`HttpRequest`], with the body left unread.
pub struct HttpResponse {
    status: StatusCode,
    cookies_set: usize,
    content_length: Option<u64>,
    body: Box<dyn Read + Send>,
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("cookies_set", &self.cookies_set)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

impl HttpResponse {
    /// Create a response that set no cookies.
    pub fn new(status: StatusCode, body: impl Read + Send + 'static) -> Self {
        Self {
            status,
            cookies_set: 0,
            content_length: None,
            body: Box::new(body),
        }
    }

    /// Record how many cookies were stored while the request ran.
    pub fn with_cookies(mut self, count: usize) -> Self {
        self.cookies_set = count;
        self
    }

    /// Record the declared body length.
    pub fn with_content_length(mut self, length: Option<u64>) -> Self {
        self.content_length = length;
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Number of cookies stored during the exchange, redirect hops included.
    pub fn cookies_set(&self) -> usize {
        self.cookies_set
    }

    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    /// Fail with a protocol error unless the status is `200 OK`.
    pub(crate) fn ensure_ok(self) -> Result<Self> {
        if self.status != StatusCode::OK {
            return Err(CloudError::unexpected_status(self.status));
        }
        Ok(self)
    }

    /// Read the whole body as UTF-8 text.
    pub fn text(mut self) -> Result<String> {
        let mut text = String::new();
        self.body.read_to_string(&mut text)?;
        Ok(text)
    }

    /// Take the body reader for streaming.
    pub fn into_body(self) -> Box<dyn Read + Send> {
        self.body
    }
}

/// Executes HTTP requests for a session.
///
/// Implementations must keep cookies set by one response and send them on all
/// later requests made through the same instance.
pub trait Transport: Send {
    /// Send a request and return the response with its body unread.
    fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Cookie jar that counts the `Set-Cookie` headers it is handed.
///
/// reqwest feeds every hop of a redirect chain through the store, so the
/// counter sees cookies that never reach the final response.
#[derive(Debug, Default)]
struct CountingJar {
    jar: Jar,
    stored: AtomicUsize,
}

impl CountingJar {
    /// Reset the counter and return how many cookies it had seen.
    fn take_stored(&self) -> usize {
        self.stored.swap(0, Ordering::SeqCst)
    }
}

impl CookieStore for CountingJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        let headers: Vec<&HeaderValue> = cookie_headers.collect();
        self.stored.fetch_add(headers.len(), Ordering::SeqCst);
        self.jar.set_cookies(&mut headers.into_iter(), url);
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        self.jar.cookies(url)
    }
}

/// Blocking HTTP client with a persistent cookie store.
#[derive(Debug)]
pub struct HttpClient {
    client: Client,
    cookies: Arc<CountingJar>,
}

impl HttpClient {
    /// Create a new HTTP client with default settings.
    pub fn new() -> Result<Self> {
        Self::from_config(&CloudConfig::default())
    }

    /// Create a new HTTP client honouring the timeout and proxy of `config`.
    pub fn from_config(config: &CloudConfig) -> Result<Self> {
        let cookies = Arc::new(CountingJar::default());
        let mut builder = Client::builder()
            .cookie_provider(Arc::clone(&cookies))
            .timeout(config.timeout);

        if let Some(proxy) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| CloudError::Validation(format!("Invalid proxy: {}", e)))?;
            builder = builder.proxy(proxy);
        }

        Ok(Self {
            client: builder.build()?,
            cookies,
        })
    }
}

impl Transport for HttpClient {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self.client.request(request.method, &request.url);
        for (name, value) in request.headers {
            builder = builder.header(name, value);
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Form(fields) => builder.form(&fields),
            RequestBody::Stream { reader, length } => builder.body(Body::sized(reader, length)),
        };

        self.cookies.take_stored();
        let response = builder.send()?;
        let status = response.status();
        let cookies_set = self.cookies.take_stored();
        let content_length = response.content_length();

        Ok(HttpResponse::new(status, response)
            .with_cookies(cookies_set)
            .with_content_length(content_length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{ACCEPT, REFERER};
    use std::io::Cursor;

    #[test]
    fn test_client_creation() {
        assert!(HttpClient::new().is_ok());
    }

    #[test]
    fn test_proxy_creation() {
        let config = CloudConfig::default().with_proxy("http://127.0.0.1:8080");
        assert!(HttpClient::from_config(&config).is_ok());
    }

    #[test]
    fn test_proxy_invalid() {
        let config = CloudConfig::default().with_proxy(":::::::");
        let err = HttpClient::from_config(&config).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_with_header_replaces() {
        let request = HttpRequest::get("http://x/")
            .with_header(ACCEPT, "text/html")
            .with_header(ACCEPT, "application/json");
        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.header_value(&ACCEPT), Some("application/json"));
        assert_eq!(request.header_value(&REFERER), None);
    }

    #[test]
    fn test_response_ensure_ok() {
        let ok = HttpResponse::new(StatusCode::OK, Cursor::new(b"body".to_vec()));
        assert_eq!(ok.ensure_ok().unwrap().text().unwrap(), "body");

        let bad = HttpResponse::new(StatusCode::NOT_FOUND, Cursor::new(Vec::new()));
        assert!(matches!(bad.ensure_ok(), Err(CloudError::Protocol(_))));
    }

    #[test]
    fn test_counting_jar_counts_and_stores() {
        let store = CountingJar::default();
        let url = Url::parse("http://auth.test/cgi-bin/auth").unwrap();
        let first = HeaderValue::from_static("Mpop=abc; Path=/");
        let second = HeaderValue::from_static("ssdc=xyz; Path=/");

        store.set_cookies(&mut [&first, &second].into_iter(), &url);
        assert_eq!(store.take_stored(), 2);
        assert_eq!(store.take_stored(), 0);

        let sent = store.cookies(&Url::parse("http://auth.test/sdc").unwrap()).unwrap();
        let sent = sent.to_str().unwrap();
        assert!(sent.contains("Mpop=abc"));
        assert!(sent.contains("ssdc=xyz"));
    }

    #[test]
    fn test_form_body_debug_hides_values() {
        let body = RequestBody::Form(vec![("Password", "secret".to_string())]);
        let rendered = format!("{:?}", body);
        assert!(rendered.contains("Password"));
        assert!(!rendered.contains("secret"));
    }
}
