//! Result types for a verification.

use crate::error::GatewayError;
use crate::gateway::RawReply;
use serde::{Deserialize, Serialize};

/// One question and its answer, as structured from model output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

impl QaPair {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Outcome of one verification.
///
/// `NotFound` is a successful determination that the objects are absent,
/// not a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VerificationResult {
    /// Q/A pairs in order of appearance in the reply
    Success { qa_pairs: Vec<QaPair> },
    /// The image lacks the requested objects
    NotFound { message: String },
    /// Input, configuration, transport, or provider failure
    Error { message: String },
}

impl VerificationResult {
    /// Interpret a gateway outcome: replies are parsed, errors carried over.
    pub fn from_reply(reply: Result<RawReply, GatewayError>) -> Self {
        match reply {
            Ok(raw) => crate::interpret::interpret(&raw.text),
            Err(e) => Self::from(e),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Q/A pairs of a successful result, empty otherwise.
    pub fn qa_pairs(&self) -> &[QaPair] {
        match self {
            Self::Success { qa_pairs } => qa_pairs,
            _ => &[],
        }
    }

    /// JSON success/error envelope for AJAX-style endpoints.
    ///
    /// ```text
    /// {"success": true,  "data": {"qa_pairs": [...]}}
    /// {"success": false, "data": {"message": "...", "not_found": true}}
    /// ```
    pub fn to_envelope(&self) -> serde_json::Value {
        match self {
            Self::Success { qa_pairs } => serde_json::json!({
                "success": true,
                "data": { "qa_pairs": qa_pairs },
            }),
            Self::NotFound { message } => serde_json::json!({
                "success": false,
                "data": { "message": message, "not_found": true },
            }),
            Self::Error { message } => serde_json::json!({
                "success": false,
                "data": { "message": message, "not_found": false },
            }),
        }
    }
}

impl From<GatewayError> for VerificationResult {
    fn from(error: GatewayError) -> Self {
        Self::Error {
            message: error.message().to_string(),
        }
    }
}
