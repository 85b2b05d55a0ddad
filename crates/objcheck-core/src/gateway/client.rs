//! The provider gateway: one image + one prompt in, one reply string out.

use super::provider::{reported_error, ProviderConfig, RawReply, VerificationRequest, VisionProvider};
use super::transport::{HttpResponse, ReqwestTransport, Transport};
use crate::error::{GatewayError, GatewayResult};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Routes verification requests to the configured provider.
///
/// Holds no per-call state; a single gateway can serve concurrent callers.
#[derive(Clone)]
pub struct Gateway {
    transport: Arc<dyn Transport>,
    timeout: Duration,
    max_tokens: u32,
}

impl Gateway {
    /// Gateway over the production HTTP transport.
    pub fn new() -> Self {
        Self::with_transport(Arc::new(ReqwestTransport::new()))
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            timeout: DEFAULT_TIMEOUT,
            max_tokens: super::provider::DEFAULT_MAX_TOKENS,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Send one image and prompt to the provider selected by `config`.
    ///
    /// Input and configuration are checked before anything is sent. Exactly
    /// one request is made on the success path and no retries are attempted.
    pub async fn process_image(
        &self,
        image_bytes: &[u8],
        prompt: &str,
        config: &ProviderConfig,
    ) -> GatewayResult<RawReply> {
        if image_bytes.is_empty() {
            return Err(GatewayError::InvalidInput("Image data is empty.".to_string()));
        }
        config.validate()?;

        let provider = config.provider.build(config);
        let request =
            VerificationRequest::new(image_bytes, prompt)?.with_max_tokens(self.max_tokens);
        let http = provider.build_request(&request)?;

        tracing::debug!(
            provider = provider.kind().id(),
            model = provider.model(),
            url = %http.url,
            image_bytes = image_bytes.len(),
            "Sending verification request"
        );

        let start = Instant::now();
        let response = self.transport.send(&http, self.timeout).await?;
        let latency_ms = elapsed_ms(start.elapsed());

        tracing::debug!(
            provider = provider.kind().id(),
            status = response.status,
            latency_ms,
            "Provider responded"
        );

        let text = decode_reply(provider.as_ref(), response)?;
        Ok(RawReply {
            text,
            provider: provider.kind(),
            model: provider.model().to_string(),
            latency_ms,
        })
    }
}

/// Whole milliseconds, saturating at `u64::MAX`.
fn elapsed_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

impl Default for Gateway {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn an HTTP response into reply text or a typed failure.
///
/// A provider-reported `error` field wins over the status code, since some
/// providers (and proxies) report errors with a 200.
fn decode_reply(provider: &dyn VisionProvider, response: HttpResponse) -> GatewayResult<String> {
    let kind = provider.kind();
    let body: serde_json::Value = match serde_json::from_str(&response.body) {
        Ok(body) => body,
        Err(e) if response.is_success() => {
            return Err(GatewayError::Protocol(format!(
                "{kind} returned a non-JSON body: {e}"
            )));
        }
        Err(_) => {
            return Err(GatewayError::Provider(format!(
                "{kind} HTTP {}: {}",
                response.status, response.body
            )));
        }
    };

    if let Some(message) = reported_error(&body) {
        return Err(GatewayError::Provider(message));
    }
    if !response.is_success() {
        return Err(GatewayError::Provider(format!(
            "{kind} HTTP {}: {}",
            response.status, response.body
        )));
    }

    provider.parse_reply(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::provider::ProviderKind;
    use crate::gateway::transport::mock::MockTransport;
    use base64::Engine;
    use serde_json::json;

    const IMAGE: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

    fn gateway(mock: &Arc<MockTransport>) -> Gateway {
        Gateway::with_transport(mock.clone())
    }

    fn openai() -> ProviderConfig {
        ProviderConfig::new(ProviderKind::OpenAi).with_api_key("sk-test")
    }

    fn anthropic() -> ProviderConfig {
        ProviderConfig::new(ProviderKind::Anthropic).with_api_key("sk-ant")
    }

    fn ollama() -> ProviderConfig {
        ProviderConfig::new(ProviderKind::Ollama)
    }

    /// The base64 payload each provider embeds, wherever its shape puts it.
    fn embedded_image(kind: ProviderKind, body: &serde_json::Value) -> String {
        match kind {
            ProviderKind::OpenAi => body["messages"][1]["content"][0]["image_url"]["url"]
                .as_str()
                .unwrap()
                .trim_start_matches("data:image/jpeg;base64,")
                .to_string(),
            ProviderKind::Anthropic => body["messages"][0]["content"][0]["source"]["data"]
                .as_str()
                .unwrap()
                .to_string(),
            ProviderKind::Ollama => body["images"][0].as_str().unwrap().to_string(),
        }
    }

    #[tokio::test]
    async fn test_all_providers_embed_exact_base64() {
        let expected = base64::engine::general_purpose::STANDARD.encode(IMAGE);
        let replies = [
            json!({"choices": [{"message": {"content": "ok"}}]}),
            json!({"content": [{"type": "text", "text": "ok"}]}),
            json!({"response": "ok"}),
        ];

        for (config, reply) in [openai(), anthropic(), ollama()].into_iter().zip(replies) {
            let mock = Arc::new(MockTransport::new().respond(200, reply));
            let raw = gateway(&mock)
                .process_image(IMAGE, "Is there a cat?", &config)
                .await
                .unwrap();

            assert_eq!(raw.text, "ok");
            assert_eq!(raw.provider, config.provider);
            assert_eq!(mock.calls(), 1);
            let sent = mock.last_request();
            assert_eq!(embedded_image(config.provider, &sent.body), expected);
        }
    }

    #[tokio::test]
    async fn test_auth_header_shapes() {
        let mock = Arc::new(
            MockTransport::new()
                .respond(200, json!({"choices": [{"message": {"content": "ok"}}]}))
                .respond(200, json!({"content": [{"text": "ok"}]}))
                .respond(200, json!({"response": "ok"})),
        );
        let gw = gateway(&mock);

        gw.process_image(IMAGE, "p", &openai()).await.unwrap();
        let sent = mock.last_request();
        assert_eq!(sent.header_value("Authorization"), Some("Bearer sk-test"));
        assert_eq!(sent.url, "https://api.openai.com/v1/chat/completions");

        gw.process_image(IMAGE, "p", &anthropic()).await.unwrap();
        let sent = mock.last_request();
        assert_eq!(sent.header_value("x-api-key"), Some("sk-ant"));
        assert_eq!(sent.header_value("anthropic-version"), Some("2023-06-01"));
        assert_eq!(sent.url, "https://api.anthropic.com/v1/messages");

        gw.process_image(IMAGE, "p", &ollama()).await.unwrap();
        let sent = mock.last_request();
        assert_eq!(sent.header_value("Authorization"), None);
        assert_eq!(sent.url, "http://localhost:11434/api/generate");

        assert_eq!(mock.calls(), 3);
    }

    #[tokio::test]
    async fn test_missing_credential_makes_no_call() {
        let mock = Arc::new(MockTransport::new());
        let gw = gateway(&mock);

        for config in [
            ProviderConfig::new(ProviderKind::OpenAi),
            ProviderConfig::new(ProviderKind::Anthropic),
            ProviderConfig::new(ProviderKind::Ollama).with_endpoint(""),
        ] {
            let err = gw.process_image(IMAGE, "p", &config).await.unwrap_err();
            assert!(matches!(err, GatewayError::Configuration(_)), "{err}");
        }
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_image_is_invalid_input() {
        let mock = Arc::new(MockTransport::new());
        let err = gateway(&mock)
            .process_image(&[], "p", &openai())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidInput(_)));
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_image_checked_before_config() {
        let mock = Arc::new(MockTransport::new());
        let err = gateway(&mock)
            .process_image(&[], "p", &ProviderConfig::new(ProviderKind::OpenAi))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_timeout_and_max_tokens_are_applied() {
        let mock = Arc::new(MockTransport::new().respond(200, json!({"response": "ok"})));
        let gw = gateway(&mock).timeout(Duration::from_secs(5)).max_tokens(64);
        gw.process_image(IMAGE, "p", &ollama()).await.unwrap();
        assert_eq!(mock.last_timeout(), Duration::from_secs(5));

        let mock = Arc::new(
            MockTransport::new().respond(200, json!({"choices": [{"message": {"content": "ok"}}]})),
        );
        gateway(&mock).max_tokens(64).process_image(IMAGE, "p", &openai()).await.unwrap();
        assert_eq!(mock.last_request().body["max_tokens"], 64);
        assert_eq!(mock.last_timeout(), DEFAULT_TIMEOUT);
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let mock = Arc::new(
            MockTransport::new().fail(GatewayError::Transport("connection refused".into())),
        );
        let err = gateway(&mock)
            .process_image(IMAGE, "p", &ollama())
            .await
            .unwrap_err();
        assert_eq!(err, GatewayError::Transport("connection refused".into()));
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_provider_error_payload() {
        let mock = Arc::new(MockTransport::new().respond(
            401,
            json!({"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}),
        ));
        let err = gateway(&mock)
            .process_image(IMAGE, "p", &openai())
            .await
            .unwrap_err();
        assert_eq!(err, GatewayError::Provider("Incorrect API key provided".into()));
    }

    #[tokio::test]
    async fn test_error_field_on_success_status_is_provider_error() {
        let mock = Arc::new(
            MockTransport::new().respond(200, json!({"error": "model \"llava\" not found"})),
        );
        let err = gateway(&mock)
            .process_image(IMAGE, "p", &ollama())
            .await
            .unwrap_err();
        assert_eq!(err, GatewayError::Provider("model \"llava\" not found".into()));
    }

    #[tokio::test]
    async fn test_non_json_error_status_is_provider_error() {
        let mock = Arc::new(MockTransport::new().respond_raw(502, "Bad Gateway"));
        let err = gateway(&mock)
            .process_image(IMAGE, "p", &anthropic())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Provider(_)));
        assert!(err.message().contains("502"));
    }

    #[tokio::test]
    async fn test_non_json_success_is_protocol_error() {
        let mock = Arc::new(MockTransport::new().respond_raw(200, "<html>hello</html>"));
        let err = gateway(&mock)
            .process_image(IMAGE, "p", &ollama())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Protocol(_)));
    }

    #[tokio::test]
    async fn test_missing_reply_path_is_protocol_error() {
        let mock = Arc::new(MockTransport::new().respond(200, json!({"id": "msg_1", "content": []})));
        let err = gateway(&mock)
            .process_image(IMAGE, "p", &anthropic())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Protocol(_)));
    }

    #[tokio::test]
    async fn test_empty_reply_text_is_not_an_error() {
        let mock = Arc::new(MockTransport::new().respond(200, json!({"response": ""})));
        let raw = gateway(&mock)
            .process_image(IMAGE, "p", &ollama())
            .await
            .unwrap();
        assert_eq!(raw.text, "");
        assert_eq!(raw.model, "llava");
    }

    #[test]
    fn test_elapsed_ms_saturates() {
        assert_eq!(elapsed_ms(Duration::from_millis(1500)), 1500);
        assert_eq!(elapsed_ms(Duration::MAX), u64::MAX);
    }
}
