//! Anthropic provider using the Messages API.
//!
//! Sends image + prompt as base64 image and text content blocks in a single
//! `user` message.

use super::provider::{to_body, ProviderKind, VerificationRequest, VisionProvider};
use super::transport::HttpRequest;
use crate::error::{GatewayError, GatewayResult};
use serde::{Deserialize, Serialize};

pub(crate) const ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

/// Anthropic provider using the Messages API.
pub struct AnthropicProvider {
    api_key: String,
    model: String,
}

impl AnthropicProvider {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
struct MessagesRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: Vec<ContentBlock>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "image")]
    Image { source: ImageSource },
    #[serde(rename = "text")]
    Text { text: String },
}

#[derive(Serialize)]
struct ImageSource {
    #[serde(rename = "type")]
    source_type: &'static str,
    media_type: String,
    data: String,
}

// --- Response types ---

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    text: Option<String>,
}

impl VisionProvider for AnthropicProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, request: &VerificationRequest) -> GatewayResult<HttpRequest> {
        let body = MessagesRequest {
            model: self.model.clone(),
            max_tokens: request.max_tokens,
            messages: vec![Message {
                role: "user",
                content: vec![
                    ContentBlock::Image {
                        source: ImageSource {
                            source_type: "base64",
                            media_type: request.image.media_type.clone(),
                            data: request.image.data.clone(),
                        },
                    },
                    ContentBlock::Text {
                        text: request.prompt.clone(),
                    },
                ],
            }],
        };

        Ok(HttpRequest::post(ENDPOINT, to_body(self.kind(), &body)?)
            .header("x-api-key", self.api_key.clone())
            .header("anthropic-version", API_VERSION)
            .header("Content-Type", "application/json"))
    }

    fn parse_reply(&self, body: serde_json::Value) -> GatewayResult<String> {
        let messages_resp: MessagesResponse = serde_json::from_value(body).map_err(|e| {
            GatewayError::Protocol(format!("Unexpected Anthropic response shape: {e}"))
        })?;

        // Only the first block counts; a leading non-text block is a shape error.
        messages_resp
            .content
            .into_iter()
            .next()
            .and_then(|c| c.text)
            .ok_or_else(|| {
                GatewayError::Protocol("Anthropic response has no content[0].text".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider() -> AnthropicProvider {
        AnthropicProvider::new("sk-ant-test", "claude-sonnet-4-20250514")
    }

    #[test]
    fn test_request_shape() {
        let request = VerificationRequest::new(b"jpeg", "Find the dog.").unwrap();
        let http = provider().build_request(&request).unwrap();

        assert_eq!(http.url, ENDPOINT);
        assert_eq!(http.header_value("x-api-key"), Some("sk-ant-test"));
        assert_eq!(http.header_value("anthropic-version"), Some("2023-06-01"));
        assert_eq!(http.header_value("Authorization"), None);
        assert_eq!(
            http.body,
            json!({
                "model": "claude-sonnet-4-20250514",
                "max_tokens": 500,
                "messages": [{
                    "role": "user",
                    "content": [
                        {"type": "image", "source": {
                            "type": "base64", "media_type": "image/jpeg", "data": "anBlZw=="
                        }},
                        {"type": "text", "text": "Find the dog."}
                    ]
                }]
            })
        );
    }

    #[test]
    fn test_parse_reply() {
        let body = json!({
            "id": "msg_1",
            "type": "message",
            "content": [{"type": "text", "text": "A fluffy cat."}],
            "usage": {"input_tokens": 10, "output_tokens": 4}
        });
        assert_eq!(provider().parse_reply(body).unwrap(), "A fluffy cat.");
    }

    #[test]
    fn test_empty_content_is_protocol_error() {
        let err = provider().parse_reply(json!({"content": []})).unwrap_err();
        assert!(matches!(err, GatewayError::Protocol(_)));
    }

    #[test]
    fn test_first_block_without_text_is_protocol_error() {
        let body = json!({"content": [{"type": "tool_use", "id": "t1"}]});
        let err = provider().parse_reply(body).unwrap_err();
        assert!(matches!(err, GatewayError::Protocol(_)));
    }
}
