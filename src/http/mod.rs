//! HTTP transport abstraction layer
//!
//! The [Transport] trait sends exactly one request and reports either the
//! server's response (any status code) or a transport-level failure. Retry,
//! authentication and content decoding live one level up in
//! [helper::RequestHelper], so they are shared by every transport.
//!
//! - [reqwest_transport::ReqwestTransport]: blocking `reqwest` client
//! - [mock::MockTransport]: scripted responses for tests

pub mod helper;
pub mod mock;
pub mod reqwest_transport;

pub use helper::RequestHelper;
pub use mock::MockTransport;
pub use reqwest_transport::ReqwestTransport;

use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

/// Key added to decoded content with the number of attempts a call used
pub const RETRIES_KEY: &str = "fetch_url_retries";

/// HTTP verbs used against the hook endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Put,
    Delete,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully-resolved request, ready for a transport
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Look up a header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status and body as received from the server
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        RawResponse {
            status,
            body: body.into(),
        }
    }
}

/// Failure below the HTTP layer: DNS, connect, TLS, timeout, broken body
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
    /// Whether another attempt could succeed
    pub retryable: bool,
}

impl TransportError {
    pub fn retryable(message: impl Into<String>) -> Self {
        TransportError {
            message: message.into(),
            retryable: true,
        }
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        TransportError {
            message: message.into(),
            retryable: false,
        }
    }
}

/// Sends one HTTP request
///
/// Implementations must not retry on their own and must return every HTTP
/// status, including 4xx and 5xx, as `Ok`.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> std::result::Result<RawResponse, TransportError>;
}

/// Status information of a completed call
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseInfo {
    /// HTTP status code, or [ResponseInfo::TRANSPORT_FAILURE]
    pub status: i32,
    pub url: String,
    pub msg: String,
}

impl ResponseInfo {
    /// Sentinel status for a call that never produced an HTTP response.
    ///
    /// [RequestHelper::request] never builds one; exhausted transport
    /// failures are returned as `HookError::Transport`. The constant keeps
    /// the classification table total for callers that construct responses.
    pub const TRANSPORT_FAILURE: i32 = -1;
}

impl fmt::Display for ResponseInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "status={} url={} msg={}", self.status, self.url, self.msg)
    }
}

/// Uniform result of [RequestHelper::request]
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub info: ResponseInfo,
    pub content: Map<String, Value>,
}

/// Decode a response body into a JSON object.
///
/// - a JSON object is returned as is
/// - any other JSON value is wrapped as `{"json": value}`
/// - non-JSON text is wrapped as `{"content": text}`
/// - an empty body gives an empty object
pub fn decode_content(body: &str) -> Map<String, Value> {
    let mut content = Map::new();
    if body.is_empty() {
        return content;
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => return map,
        Ok(other) => {
            content.insert("json".to_string(), other);
        }
        Err(_) => {
            content.insert("content".to_string(), Value::String(body.to_string()));
        }
    }
    content
}
