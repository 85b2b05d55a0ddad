//! Sub-configuration structs with defaults.

use crate::gateway::{
    resolve_env_var, ProviderConfig, ProviderKind, DEFAULT_MAX_TOKENS, DEFAULT_PROMPT,
};
use serde::{Deserialize, Serialize};

/// Prompt policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationConfig {
    /// Instruction sent to the provider when the caller does not override it
    pub system_prompt: String,

    /// Whether callers may replace the system prompt with their own
    pub allow_prompt_edit: bool,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_PROMPT.to_string(),
            allow_prompt_edit: false,
        }
    }
}

impl VerificationConfig {
    /// The prompt to send: the caller's if editing is allowed and it is
    /// non-blank, the system prompt otherwise.
    pub fn effective_prompt<'a>(&'a self, user_prompt: Option<&'a str>) -> &'a str {
        match user_prompt {
            Some(prompt) if self.allow_prompt_edit && !prompt.trim().is_empty() => prompt,
            _ => &self.system_prompt,
        }
    }
}

/// Provider selection and per-provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// The one provider in use
    pub active: ProviderKind,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Output token budget per reply
    pub max_tokens: u32,

    pub openai: OpenAiConfig,
    pub anthropic: AnthropicConfig,
    pub ollama: OllamaConfig,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            active: ProviderKind::OpenAi,
            timeout_secs: 30,
            max_tokens: DEFAULT_MAX_TOKENS,
            openai: OpenAiConfig::default(),
            anthropic: AnthropicConfig::default(),
            ollama: OllamaConfig::default(),
        }
    }
}

impl ProviderSettings {
    /// Build the call-time config for a provider, resolving `${ENV_VAR}`
    /// references.
    ///
    /// Unresolvable credentials come back empty; the gateway rejects them
    /// before any request is made.
    pub fn resolve(&self, kind: ProviderKind) -> ProviderConfig {
        let resolve = |value: &str| resolve_env_var(value).unwrap_or_default();
        match kind {
            ProviderKind::OpenAi => ProviderConfig::new(kind)
                .with_api_key(resolve(&self.openai.api_key))
                .with_model(self.openai.model.clone()),
            ProviderKind::Anthropic => ProviderConfig::new(kind)
                .with_api_key(resolve(&self.anthropic.api_key))
                .with_model(self.anthropic.model.clone()),
            ProviderKind::Ollama => ProviderConfig::new(kind)
                .with_api_key(resolve(&self.ollama.api_key))
                .with_endpoint(resolve(&self.ollama.endpoint))
                .with_model(self.ollama.model.clone()),
        }
    }

    /// Config for the active provider.
    pub fn active_config(&self) -> ProviderConfig {
        self.resolve(self.active)
    }
}

/// OpenAI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Model name
    pub model: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: "${OPENAI_API_KEY}".to_string(),
            model: ProviderKind::OpenAi.default_model().to_string(),
        }
    }
}

/// Anthropic configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnthropicConfig {
    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Model name
    pub model: String,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: "${ANTHROPIC_API_KEY}".to_string(),
            model: ProviderKind::Anthropic.default_model().to_string(),
        }
    }
}

/// Ollama configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    /// Full URL of the generate endpoint
    pub endpoint: String,

    /// Optional API key for authenticating proxies
    pub api_key: String,

    /// Model name
    pub model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            endpoint: ProviderKind::Ollama.default_endpoint().to_string(),
            api_key: String::new(),
            model: ProviderKind::Ollama.default_model().to_string(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
