//! Response interpretation: raw model text to a [`VerificationResult`].
//!
//! Two steps. A reply mentioning any negative phrase is a "not found"
//! outcome, whatever else it contains. Otherwise Q/A pairs are extracted
//! line by line, and text with no Q/A markers at all becomes one pair under
//! [`FALLBACK_QUESTION`]. Every input maps to a result; nothing here fails.

mod parser;

pub use parser::{parse_lines, QaParser};

use crate::types::{QaPair, VerificationResult};

/// Phrases that mark a reply as "requested objects absent".
///
/// A policy list, matched case-insensitively anywhere in the reply. It is
/// English-only and will miss refusals phrased any other way.
pub const NEGATIVE_PHRASES: &[&str] = &["does not contain", "no required objects", "cannot find"];

/// Message attached to a not-found outcome.
pub const NOT_FOUND_MESSAGE: &str = "Image does not contain necessary objects.";

/// Question label used when a reply has no Q/A structure.
pub const FALLBACK_QUESTION: &str = "AI Analysis";

/// Whether the reply says the requested objects are absent.
pub fn is_negative(text: &str) -> bool {
    let lower = text.to_lowercase();
    NEGATIVE_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

/// Extract Q/A pairs, falling back to a single pair holding the whole text.
pub fn extract_qa_pairs(text: &str) -> Vec<QaPair> {
    let pairs = parse_lines(text);
    if pairs.is_empty() {
        vec![QaPair::new(FALLBACK_QUESTION, text)]
    } else {
        pairs
    }
}

/// Interpret a provider's raw reply.
pub fn interpret(text: &str) -> VerificationResult {
    if is_negative(text) {
        return VerificationResult::NotFound {
            message: NOT_FOUND_MESSAGE.to_string(),
        };
    }
    VerificationResult::Success {
        qa_pairs: extract_qa_pairs(text),
    }
}
