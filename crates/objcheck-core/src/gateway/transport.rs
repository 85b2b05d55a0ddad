//! The single outbound HTTP call.
//!
//! Providers describe a request as plain data; a [`Transport`] performs it.
//! Production code uses [`ReqwestTransport`]; tests swap in a recording double.

use crate::error::{GatewayError, GatewayResult};
use async_trait::async_trait;
use std::time::Duration;

/// A provider-specific POST request, fully built.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    /// Header name/value pairs, in the order they are sent
    pub headers: Vec<(String, String)>,
    /// JSON body
    pub body: serde_json::Value,
}

impl HttpRequest {
    pub fn post(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            body,
        }
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    /// Look up a header value by case-insensitive name.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and raw body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs one HTTP request per call, with no retries.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (the gateway holds an `Arc<dyn Transport>`).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request, failing with [`GatewayError::Transport`] when the
    /// provider cannot be reached within `timeout`.
    async fn send(&self, request: &HttpRequest, timeout: Duration) -> GatewayResult<HttpResponse>;
}

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest, timeout: Duration) -> GatewayResult<HttpResponse> {
        let mut builder = self.client.post(&request.url).timeout(timeout);
        // Headers first: `json()` only sets Content-Type when it is absent.
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let resp = builder
            .json(&request.body)
            .send()
            .await
            .map_err(|e| transport_error(e, timeout))?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| transport_error(e, timeout))?;
        Ok(HttpResponse { status, body })
    }
}

fn transport_error(error: reqwest::Error, timeout: Duration) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Transport(format!("Request timed out after {}s", timeout.as_secs()))
    } else {
        GatewayError::Transport(error.to_string())
    }
}
