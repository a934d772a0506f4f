use std::thread;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{Map, Value};

use crate::config::{Auth, ConnectionConfig};
use crate::error::{HookError, Result};
use crate::http::{
    decode_content, HttpMethod, HttpRequest, Response, ResponseInfo, Transport, RETRIES_KEY,
};

/// Performs authenticated requests with bounded retry over a [Transport]
pub struct RequestHelper<T: Transport> {
    transport: T,
    connection: ConnectionConfig,
}

impl<T: Transport> RequestHelper<T> {
    pub fn new(transport: T, connection: ConnectionConfig) -> Self {
        RequestHelper {
            transport,
            connection,
        }
    }

    pub fn connection(&self) -> &ConnectionConfig {
        &self.connection
    }

    /// Send one request and decode the response.
    ///
    /// Transport failures are retried up to `connection.retries` more times
    /// with a fixed `connection.sleep` between attempts. HTTP responses of any
    /// status are returned as they are, for the caller to classify.
    ///
    /// # Returns
    /// * `Ok(Response)` - Status info plus decoded content, with
    ///   `fetch_url_retries` set to the attempts used
    /// * `Err(HookError::Transport)` - No HTTP response could be obtained
    pub fn request(
        &self,
        url: &str,
        method: HttpMethod,
        body: Option<&Map<String, Value>>,
    ) -> Result<Response> {
        let request = self.build_request(url, method, body)?;
        let max_attempts = self.connection.retries.saturating_add(1);
        let mut attempt = 1;

        loop {
            tracing::debug!(%method, url, attempt, "Sending request");

            match self.transport.execute(&request) {
                Ok(raw) => {
                    let mut content = decode_content(&raw.body);
                    content.insert(RETRIES_KEY.to_string(), Value::from(attempt));

                    return Ok(Response {
                        info: ResponseInfo {
                            status: i32::from(raw.status),
                            url: url.to_string(),
                            msg: format!("HTTP {}, {} bytes", raw.status, raw.body.len()),
                        },
                        content,
                    });
                }
                Err(e) if e.retryable && attempt < max_attempts => {
                    tracing::warn!(
                        %method,
                        url,
                        attempt,
                        max_attempts,
                        error = %e,
                        "Request failed, retrying"
                    );
                    thread::sleep(self.connection.sleep);
                    attempt += 1;
                }
                Err(e) => {
                    return Err(HookError::Transport {
                        url: url.to_string(),
                        attempts: attempt,
                        message: e.message,
                    });
                }
            }
        }
    }

    fn build_request(
        &self,
        url: &str,
        method: HttpMethod,
        body: Option<&Map<String, Value>>,
    ) -> Result<HttpRequest> {
        let mut headers = vec![(
            "Authorization".to_string(),
            authorization(&self.connection.auth),
        )];

        let body = match body {
            Some(data) => {
                headers.push(("Content-Type".to_string(), "application/json".to_string()));
                Some(serde_json::to_string(data)?)
            }
            None => None,
        };

        Ok(HttpRequest {
            method,
            url: url.to_string(),
            headers,
            body,
        })
    }
}

/// `Authorization` header value for the configured auth mode
fn authorization(auth: &Auth) -> String {
    match auth {
        Auth::Token(token) => format!("Bearer {}", token),
        Auth::Basic { username, password } => {
            format!("Basic {}", STANDARD.encode(format!("{}:{}", username, password)))
        }
    }
}
