//! OpenAI provider using the Chat Completions API.
//!
//! The prompt goes in as a `system` message; the image follows as a data URL
//! in the `user` message content array.

use super::provider::{to_body, ProviderKind, VerificationRequest, VisionProvider};
use super::transport::HttpRequest;
use crate::error::{GatewayError, GatewayResult};
use serde::{Deserialize, Serialize};

pub(crate) const ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI provider using Chat Completions API.
pub struct OpenAiProvider {
    api_key: String,
    model: String,
}

impl OpenAiProvider {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: MessageContent,
}

#[derive(Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ChatContent>),
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ChatContent {
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl VisionProvider for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, request: &VerificationRequest) -> GatewayResult<HttpRequest> {
        let body = ChatRequest {
            model: self.model.clone(),
            max_tokens: request.max_tokens,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: MessageContent::Text(request.prompt.clone()),
                },
                ChatMessage {
                    role: "user",
                    content: MessageContent::Parts(vec![ChatContent::ImageUrl {
                        image_url: ImageUrl {
                            url: request.image.data_url(),
                        },
                    }]),
                },
            ],
        };

        Ok(HttpRequest::post(ENDPOINT, to_body(self.kind(), &body)?)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json"))
    }

    fn parse_reply(&self, body: serde_json::Value) -> GatewayResult<String> {
        let chat_resp: ChatResponse = serde_json::from_value(body).map_err(|e| {
            GatewayError::Protocol(format!("Unexpected OpenAI response shape: {e}"))
        })?;

        chat_resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                GatewayError::Protocol(
                    "OpenAI response has no choices[0].message.content".to_string(),
                )
            })
    }
}
