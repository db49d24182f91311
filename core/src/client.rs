//! Request builder, dispatcher and response mapper for the Klout API.
//!
//! # Design
//! `KloutClient` owns its `ClientConfig` and a `Transport`. Every verb goes
//! through `request`, which is `build_request`, the transport round-trip, and
//! `parse_response`. The two halves stay public so a host that performs its
//! own I/O (the FFI crate) can use them directly.

use serde_json::Value;

use crate::config::{ClientConfig, DISABLED_BODY};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::resolve::resolve;
use crate::transport::{Transport, UreqTransport};

/// Synchronous client for the Klout REST API.
pub struct KloutClient<T = UreqTransport> {
    config: ClientConfig,
    transport: T,
}

impl KloutClient<UreqTransport> {
    /// Client that talks to the network through `ureq`.
    pub fn new(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(&config);
        Self { config, transport }
    }
}

impl<T: Transport> KloutClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn set_api_key(&mut self, api_key: Option<&str>) -> &str {
        self.config.set_api_key(api_key)
    }

    pub fn set_base_url(&mut self, base_url: &str) -> Result<(), ApiError> {
        self.config.set_base_url(base_url)
    }

    pub fn disable(&mut self) {
        self.config.disable();
    }

    /// Resolve `path`, append `query` and the API key, attach the fixed
    /// headers.
    pub fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<HttpRequest, ApiError> {
        let mut url = resolve(self.config.base_url(), path)?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("key", self.config.api_key());
        }
        Ok(HttpRequest {
            method,
            url: url.into(),
            headers: self.config.headers().to_vec(),
        })
    }

    /// Map a response to its JSON body or to the error its status implies.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Value, ApiError> {
        check_status(response)
    }

    /// Issue one request and map the response.
    ///
    /// In disable mode this returns `{"Disabled":true}` without resolving the
    /// path or touching the transport.
    pub fn request(
        &self,
        method: HttpMethod,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Value, ApiError> {
        if self.config.is_disabled() {
            tracing::debug!(%method, path, "disabled, returning canned response");
            return Ok(serde_json::from_str(DISABLED_BODY)?);
        }
        let request = self.build_request(method, path, query)?;
        tracing::debug!(%method, path, "dispatching Klout API request");
        let response = self.transport.execute(&request)?;
        tracing::debug!(status = response.status, path, "received Klout API response");
        self.parse_response(response)
    }

    pub fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, ApiError> {
        self.request(HttpMethod::Get, path, query)
    }

    pub fn post(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, ApiError> {
        self.request(HttpMethod::Post, path, query)
    }

    pub fn put(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, ApiError> {
        self.request(HttpMethod::Put, path, query)
    }

    pub fn delete(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, ApiError> {
        self.request(HttpMethod::Delete, path, query)
    }
}

/// Map a status code to the matching `ApiError`, or decode the body.
fn check_status(response: HttpResponse) -> Result<Value, ApiError> {
    match response.status {
        400 => Err(ApiError::BadRequest {
            data: error_body(&response.body),
        }),
        401 => Err(ApiError::Unauthorized),
        404 => Err(ApiError::NotFound),
        status @ 402..=499 => Err(ApiError::ClientError {
            status,
            data: error_body(&response.body),
        }),
        status @ 500..=599 => Err(ApiError::ServerError { status }),
        _ if response.body.trim().is_empty() => Ok(Value::Null),
        _ => Ok(serde_json::from_str(&response.body)?),
    }
}

/// Error bodies are kept even when they are not JSON.
fn error_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}
