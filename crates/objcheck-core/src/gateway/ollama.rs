//! Ollama provider for self-hosted vision models.
//!
//! Talks to an Ollama daemon's `/api/generate` endpoint. The endpoint is the
//! full URL, not a base. No authentication required unless a key is set.

use super::provider::{to_body, ProviderKind, VerificationRequest, VisionProvider};
use super::transport::HttpRequest;
use crate::error::{GatewayError, GatewayResult};
use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_ENDPOINT: &str = "http://localhost:11434/api/generate";

/// Ollama provider for local vision model inference.
pub struct OllamaProvider {
    endpoint: String,
    api_key: String,
    model: String,
}

impl OllamaProvider {
    pub fn new(endpoint: &str, api_key: &str, model: &str) -> Self {
        Self {
            endpoint: endpoint.trim().to_string(),
            api_key: api_key.trim().to_string(),
            model: model.to_string(),
        }
    }
}

/// Ollama /api/generate request body.
#[derive(Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    images: Vec<String>,
    stream: bool,
}

/// Ollama /api/generate response.
#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

impl VisionProvider for OllamaProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Ollama
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, request: &VerificationRequest) -> GatewayResult<HttpRequest> {
        let body = OllamaRequest {
            model: self.model.clone(),
            prompt: request.prompt.clone(),
            images: vec![request.image.data.clone()],
            stream: false,
        };

        let mut http = HttpRequest::post(&self.endpoint, to_body(self.kind(), &body)?)
            .header("Content-Type", "application/json");
        // Reverse proxies in front of Ollama may want a key.
        if !self.api_key.is_empty() {
            http = http.header("Authorization", format!("Bearer {}", self.api_key));
        }
        Ok(http)
    }

    fn parse_reply(&self, body: serde_json::Value) -> GatewayResult<String> {
        let ollama_resp: OllamaResponse = serde_json::from_value(body).map_err(|e| {
            GatewayError::Protocol(format!("Ollama response has no `response` field: {e}"))
        })?;
        Ok(ollama_resp.response)
    }
}
