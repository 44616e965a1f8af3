//! Scripted transport shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::{Cursor, Read};
use std::sync::{Arc, Mutex};

use mailru_cloud::http::{HttpRequest, HttpResponse, RequestBody, Transport};
use mailru_cloud::{CloudConfig, CloudError, Credentials, Session};
use reqwest::header::HeaderName;
use reqwest::{Method, StatusCode};

pub const AUTH: &str = "http://auth.test";
pub const CLOUD: &str = "http://cloud.test";
pub const LOGIN: &str = "user@mail.ru";
pub const PASSWORD: &str = "secret";

/// A request as the transport saw it, with any streamed body drained.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(HeaderName, String)>,
    pub form: Option<Vec<(&'static str, String)>>,
    pub body: Vec<u8>,
    pub declared_length: Option<u64>,
}

impl Recorded {
    pub fn header(&self, name: &HeaderName) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.form
            .as_ref()?
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

struct Reply {
    status: StatusCode,
    cookies: usize,
    body: Vec<u8>,
}

#[derive(Default)]
struct Script {
    replies: VecDeque<Reply>,
    requests: Vec<Recorded>,
}

/// Answers requests from a queue of canned replies and records every request.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, status: u16, body: &str) -> &Self {
        self.reply_with_cookies(status, 0, body)
    }

    pub fn reply_with_cookies(&self, status: u16, cookies: usize, body: &str) -> &Self {
        self.script.lock().unwrap().replies.push_back(Reply {
            status: StatusCode::from_u16(status).unwrap(),
            cookies,
            body: body.as_bytes().to_vec(),
        });
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.script.lock().unwrap().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.script.lock().unwrap().requests.len()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: HttpRequest) -> mailru_cloud::Result<HttpResponse> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let mut recorded = Recorded {
            method,
            url: url.clone(),
            headers,
            form: None,
            body: Vec::new(),
            declared_length: None,
        };
        match body {
            RequestBody::Empty => {}
            RequestBody::Form(fields) => recorded.form = Some(fields),
            RequestBody::Stream { mut reader, length } => {
                reader.read_to_end(&mut recorded.body)?;
                recorded.declared_length = Some(length);
            }
        }

        let mut script = self.script.lock().unwrap();
        script.requests.push(recorded);
        let reply = script
            .replies
            .pop_front()
            .ok_or_else(|| CloudError::Protocol(format!("no scripted reply for {}", url)))?;

        let length = reply.body.len() as u64;
        Ok(HttpResponse::new(reply.status, Cursor::new(reply.body))
            .with_cookies(reply.cookies)
            .with_content_length(Some(length)))
    }
}

pub fn config() -> CloudConfig {
    CloudConfig::default().with_endpoints(AUTH, CLOUD)
}

/// Session with the default test credentials over `transport`.
pub fn session(transport: &ScriptedTransport) -> Session {
    session_with(transport, LOGIN, PASSWORD)
}

pub fn session_with(transport: &ScriptedTransport, login: &str, password: &str) -> Session {
    let mut session = Session::with_transport(config(), transport.clone());
    session.set_credentials(Credentials::new(login, password));
    session
}

/// Queue the three replies of a successful login yielding `token`.
pub fn script_login(transport: &ScriptedTransport, token: &str) {
    transport
        .reply_with_cookies(200, 1, "")
        .reply(200, "")
        .reply(200, &format!(r#"{{"body":{{"token":"{}"}}}}"#, token));
}

/// Queue a dispatcher reply offering one shard of `label`.
pub fn script_dispatcher(transport: &ScriptedTransport, label: &str, url: &str) {
    transport.reply(
        200,
        &format!(r#"{{"body":{{"{}":[{{"url":"{}","count":"1"}}]}}}}"#, label, url),
    );
}
