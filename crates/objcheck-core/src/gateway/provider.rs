//! Provider selection, per-call request types, and the provider trait.
//!
//! A provider turns a [`VerificationRequest`] into one provider-specific HTTP
//! request and pulls the reply text back out of the provider's JSON envelope.
//! The network call itself belongs to the [`Transport`](super::transport::Transport).

use super::transport::HttpRequest;
use crate::error::{GatewayError, GatewayResult};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prompt used when the caller supplies a blank one.
pub const DEFAULT_PROMPT: &str =
    "Describe only if the image contains the specified objects. Ignore other objects.";

/// Default output budget for a verification reply.
pub const DEFAULT_MAX_TOKENS: u32 = 500;

/// The closed set of supported providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Ollama,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 3] = [Self::OpenAi, Self::Anthropic, Self::Ollama];

    /// Config/CLI identifier ("openai", "anthropic", "ollama").
    pub fn id(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Ollama => "ollama",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-4o",
            Self::Anthropic => "claude-sonnet-4-20250514",
            Self::Ollama => "llava",
        }
    }

    /// Endpoint used when none is configured. Only Ollama's is overridable.
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Self::OpenAi => super::openai::ENDPOINT,
            Self::Anthropic => super::anthropic::ENDPOINT,
            Self::Ollama => super::ollama::DEFAULT_ENDPOINT,
        }
    }

    /// Instantiate the provider implementation for a validated config.
    pub(crate) fn build(&self, config: &ProviderConfig) -> Box<dyn VisionProvider> {
        match self {
            Self::OpenAi => Box::new(super::openai::OpenAiProvider::new(
                &config.api_key,
                &config.model_name,
            )),
            Self::Anthropic => Box::new(super::anthropic::AnthropicProvider::new(
                &config.api_key,
                &config.model_name,
            )),
            Self::Ollama => Box::new(super::ollama::OllamaProvider::new(
                &config.endpoint_url,
                &config.api_key,
                &config.model_name,
            )),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAi => write!(f, "OpenAI"),
            Self::Anthropic => write!(f, "Anthropic"),
            Self::Ollama => write!(f, "Ollama"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == name)
            .ok_or_else(|| GatewayError::Configuration(format!("Unknown provider: {s}")))
    }
}

/// Which backend to call and how to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub provider: ProviderKind,
    pub api_key: String,
    pub endpoint_url: String,
    pub model_name: String,
}

impl ProviderConfig {
    /// Config with the provider's default endpoint and model and no credential.
    pub fn new(provider: ProviderKind) -> Self {
        Self {
            provider,
            api_key: String::new(),
            endpoint_url: provider.default_endpoint().to_string(),
            model_name: provider.default_model().to_string(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = endpoint_url.into();
        self
    }

    pub fn with_model(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    /// Check that the fields this provider needs are present.
    ///
    /// Runs before any request is built, so a misconfigured provider never
    /// reaches the network.
    pub fn validate(&self) -> GatewayResult<()> {
        match self.provider {
            ProviderKind::OpenAi | ProviderKind::Anthropic => {
                if self.api_key.trim().is_empty() {
                    return Err(GatewayError::missing_field(self.provider, "api_key"));
                }
            }
            ProviderKind::Ollama => {
                if self.endpoint_url.trim().is_empty() {
                    return Err(GatewayError::missing_field(self.provider, "endpoint"));
                }
            }
        }
        if self.model_name.trim().is_empty() {
            return Err(GatewayError::missing_field(self.provider, "model"));
        }
        Ok(())
    }
}

/// Base64-encoded image ready to send to a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    /// Base64-encoded image bytes
    pub data: String,
    /// MIME type declared to the provider
    pub media_type: String,
}

impl ImageInput {
    /// Encode raw bytes, declared as JPEG.
    ///
    /// All three providers accept other formats under a JPEG label, and the
    /// declared type is part of the wire shape they are tested against.
    pub fn jpeg(bytes: &[u8]) -> Self {
        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            media_type: "image/jpeg".to_string(),
        }
    }

    /// Return a data URL suitable for OpenAI-style APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// One verification attempt: an encoded image and the instruction to apply.
#[derive(Debug, Clone)]
pub struct VerificationRequest {
    pub image: ImageInput,
    pub prompt: String,
    pub max_tokens: u32,
}

impl VerificationRequest {
    /// Build a request from raw bytes, substituting [`DEFAULT_PROMPT`] for a
    /// blank prompt.
    pub fn new(image_bytes: &[u8], prompt: &str) -> GatewayResult<Self> {
        if image_bytes.is_empty() {
            return Err(GatewayError::InvalidInput(
                "Image data is empty.".to_string(),
            ));
        }
        let prompt = if prompt.trim().is_empty() {
            DEFAULT_PROMPT.to_string()
        } else {
            prompt.to_string()
        };
        Ok(Self {
            image: ImageInput::jpeg(image_bytes),
            prompt,
            max_tokens: DEFAULT_MAX_TOKENS,
        })
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Reply text lifted out of a provider's JSON envelope.
#[derive(Debug, Clone)]
pub struct RawReply {
    /// Model output, unmodified
    pub text: String,
    pub provider: ProviderKind,
    pub model: String,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// One implementation per provider.
///
/// Both halves are pure: no I/O happens here, which keeps request shapes and
/// reply decoding testable without a network.
pub trait VisionProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    fn model(&self) -> &str;

    /// Build the provider-specific HTTP request.
    fn build_request(&self, request: &VerificationRequest) -> GatewayResult<HttpRequest>;

    /// Extract the reply text from a decoded, error-free response body.
    fn parse_reply(&self, body: serde_json::Value) -> GatewayResult<String>;
}

/// Pull a provider-reported error message out of a response body.
///
/// OpenAI and Anthropic report `{"error": {"message": ...}}`; Ollama reports
/// `{"error": "..."}`.
pub(crate) fn reported_error(body: &serde_json::Value) -> Option<String> {
    match body.get("error")? {
        serde_json::Value::Null => None,
        serde_json::Value::String(message) => Some(message.clone()),
        other => Some(
            other
                .get("message")
                .and_then(|m| m.as_str())
                .map(String::from)
                .unwrap_or_else(|| other.to_string()),
        ),
    }
}

/// Serialize a typed request body, for use in `build_request`.
pub(crate) fn to_body<T: Serialize>(
    provider: ProviderKind,
    body: &T,
) -> GatewayResult<serde_json::Value> {
    serde_json::to_value(body).map_err(|e| {
        GatewayError::Protocol(format!("Failed to encode {provider} request: {e}"))
    })
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
