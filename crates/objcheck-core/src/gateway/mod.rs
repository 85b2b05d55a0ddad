//! Provider gateway for multimodal LLM backends.
//!
//! Provides a provider abstraction over OpenAI, Anthropic, and Ollama: each
//! provider builds its own request and decodes its own reply, while the
//! [`Gateway`] owns validation, the single HTTP call, and error mapping.

pub(crate) mod anthropic;
pub(crate) mod client;
pub(crate) mod ollama;
pub(crate) mod openai;
pub(crate) mod provider;
pub(crate) mod transport;

pub use client::{Gateway, DEFAULT_TIMEOUT};
pub use provider::{
    resolve_env_var, ImageInput, ProviderConfig, ProviderKind, RawReply, VerificationRequest,
    VisionProvider, DEFAULT_MAX_TOKENS, DEFAULT_PROMPT,
};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
