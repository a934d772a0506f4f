use reqwest::blocking::Client;
use reqwest::Method;

use crate::config::ConnectionConfig;
use crate::error::{HookError, Result};
use crate::http::{HttpMethod, HttpRequest, RawResponse, Transport, TransportError};

/// Blocking `reqwest` client behind the [Transport] trait
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a client honouring the TLS and proxy flags of `connection`.
    ///
    /// With `validate_certs` off, invalid certificates are accepted rather
    /// than refused. With `use_proxy` off, proxy environment variables are
    /// ignored.
    pub fn new(connection: &ConnectionConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(concat!("bitbucket-hook/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(!connection.validate_certs);

        if !connection.use_proxy {
            builder = builder.no_proxy();
        }

        let client = builder
            .build()
            .map_err(|e| HookError::config(format!("Cannot build HTTP client: {}", e)))?;

        Ok(ReqwestTransport { client })
    }
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
        HttpMethod::Post => Method::POST,
    }
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: &HttpRequest) -> std::result::Result<RawResponse, TransportError> {
        let mut builder = self
            .client
            .request(method(request.method), request.url.as_str());

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().map_err(|e| {
            // A request that cannot be built (bad URL, bad header) fails the same way every time
            if e.is_builder() {
                TransportError::fatal(format!("Invalid request: {}", e))
            } else {
                TransportError::retryable(format!("Request failed: {}", e))
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| TransportError::retryable(format!("Failed to read response body: {}", e)))?;

        Ok(RawResponse { status, body })
    }
}
