//! objcheck core - verify that an image contains the objects you ask about.
//!
//! An image and a natural-language instruction go to one of several
//! interchangeable multimodal providers; the provider's free-text reply is
//! turned into an ordered list of question/answer pairs.
//!
//! # Architecture
//!
//! ```text
//! (image, prompt) → Gateway (OpenAI | Anthropic | Ollama) → raw text → interpret → VerificationResult
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use objcheck_core::{Config, Verifier};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load()?;
//!     let verifier = Verifier::new(config);
//!
//!     let image = std::fs::read("./shelf.jpg")?;
//!     let result = verifier.verify(&image, Some("Is there a red mug?")).await;
//!     println!("{}", result.to_envelope());
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod gateway;
pub mod interpret;
pub mod output;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, GatewayError, GatewayResult};
pub use gateway::{Gateway, ProviderConfig, ProviderKind, RawReply, Transport};
pub use interpret::interpret;
pub use output::{OutputFormat, OutputWriter};
pub use types::{QaPair, VerificationResult};

use std::sync::Arc;
use std::time::Duration;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Verifier - the main entry point: gateway call plus reply interpretation.
///
/// Stateless across calls; share one behind an `Arc` for concurrent use.
pub struct Verifier {
    config: Config,
    gateway: Gateway,
}

impl Verifier {
    /// Create a verifier that talks to providers over HTTP.
    pub fn new(config: Config) -> Self {
        Self::with_gateway(config, Gateway::new())
    }

    /// Create a verifier over a custom transport.
    pub fn with_transport(config: Config, transport: Arc<dyn Transport>) -> Self {
        Self::with_gateway(config, Gateway::with_transport(transport))
    }

    fn with_gateway(config: Config, gateway: Gateway) -> Self {
        let gateway = gateway
            .timeout(Duration::from_secs(config.provider.timeout_secs))
            .max_tokens(config.provider.max_tokens);
        tracing::debug!(
            "Initializing verifier v{} (active provider: {})",
            VERSION,
            config.provider.active
        );
        Self { config, gateway }
    }

    /// Get a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Verify an image with the active provider.
    ///
    /// `user_prompt` replaces the configured system prompt only when prompt
    /// editing is allowed. Failures come back as
    /// [`VerificationResult::Error`].
    pub async fn verify(&self, image_bytes: &[u8], user_prompt: Option<&str>) -> VerificationResult {
        let provider = self.config.provider.active_config();
        let prompt = self.config.verification.effective_prompt(user_prompt);
        self.verify_with(image_bytes, prompt, &provider).await
    }

    /// Verify an image with an explicit provider and prompt.
    pub async fn verify_with(
        &self,
        image_bytes: &[u8],
        prompt: &str,
        provider: &ProviderConfig,
    ) -> VerificationResult {
        let reply = self
            .gateway
            .process_image(image_bytes, prompt, provider)
            .await;
        if let Ok(raw) = &reply {
            tracing::debug!(
                provider = raw.provider.id(),
                model = %raw.model,
                latency_ms = raw.latency_ms,
                "Interpreting reply"
            );
        }
        VerificationResult::from_reply(reply)
    }
}
