//! Line-oriented question/answer extraction.
//!
//! A two-state machine: either no question is pending, or one question is
//! pending with whatever answer text has accumulated for it so far.

use crate::types::QaPair;
use once_cell::sync::Lazy;
use regex::Regex;

static QUESTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:Q:|Question:)\s*(.+)").expect("valid question regex"));

static ANSWER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:A:|Answer:)\s*(.+)").expect("valid answer regex"));

/// Classification of one trimmed, non-blank line.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Question(&'a str),
    Answer(&'a str),
    Text(&'a str),
}

impl<'a> Line<'a> {
    fn classify(line: &'a str) -> Self {
        if let Some(rest) = capture(&QUESTION_RE, line) {
            Line::Question(rest)
        } else if let Some(rest) = capture(&ANSWER_RE, line) {
            Line::Answer(rest)
        } else {
            Line::Text(line)
        }
    }
}

fn capture<'a>(re: &Regex, line: &'a str) -> Option<&'a str> {
    re.captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[derive(Debug, Default, PartialEq, Eq)]
enum State {
    #[default]
    NoPendingQuestion,
    PendingQuestion { question: String, answer: String },
}

/// Incremental Q/A parser. Feed lines, then [`finish`](QaParser::finish).
#[derive(Debug, Default)]
pub struct QaParser {
    state: State,
    pairs: Vec<QaPair>,
}

impl QaParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one raw line. Surrounding whitespace is ignored and blank
    /// lines are skipped.
    ///
    /// Plain text extends the pending answer, joined with a single space. When
    /// no answer has been given yet the text becomes the answer as-is, with no
    /// leading space (`"Q: Colour?\nOrange"` yields the answer `"Orange"`, not
    /// `" Orange"`).
    pub fn feed_line(&mut self, raw: &str) {
        let line = raw.trim();
        if line.is_empty() {
            return;
        }

        match Line::classify(line) {
            Line::Question(question) => {
                self.flush();
                self.state = State::PendingQuestion {
                    question: question.to_string(),
                    answer: String::new(),
                };
            }
            Line::Answer(text) => {
                // Orphan answers with no question pending are dropped.
                if let State::PendingQuestion { answer, .. } = &mut self.state {
                    *answer = text.to_string();
                }
            }
            Line::Text(text) => {
                if let State::PendingQuestion { answer, .. } = &mut self.state {
                    if !answer.is_empty() {
                        answer.push(' ');
                    }
                    answer.push_str(text);
                }
            }
        }
    }

    pub fn has_pending_question(&self) -> bool {
        matches!(self.state, State::PendingQuestion { .. })
    }

    /// Flush any pending question and return the pairs in order of appearance.
    pub fn finish(mut self) -> Vec<QaPair> {
        self.flush();
        self.pairs
    }

    fn flush(&mut self) {
        if let State::PendingQuestion { question, answer } = std::mem::take(&mut self.state) {
            self.pairs.push(QaPair::new(question, answer));
        }
    }
}

/// Extract Q/A pairs from free text, without any fallback.
pub fn parse_lines(text: &str) -> Vec<QaPair> {
    let mut parser = QaParser::new();
    for line in text.split('\n') {
        parser.feed_line(line);
    }
    parser.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(q: &str, a: &str) -> QaPair {
        QaPair::new(q, a)
    }

    #[test]
    fn test_classify_markers_case_insensitive() {
        assert_eq!(Line::classify("Q: Cat?"), Line::Question("Cat?"));
        assert_eq!(Line::classify("question:   Dog?"), Line::Question("Dog?"));
        assert_eq!(Line::classify("a: yes"), Line::Answer("yes"));
        assert_eq!(Line::classify("ANSWER: no"), Line::Answer("no"));
        assert_eq!(Line::classify("A park."), Line::Text("A park."));
    }

    #[test]
    fn test_bare_marker_is_plain_text() {
        assert_eq!(Line::classify("Q:"), Line::Text("Q:"));
        assert_eq!(Line::classify("Answer:"), Line::Text("Answer:"));
    }

    #[test]
    fn test_marker_must_be_at_line_start() {
        assert_eq!(
            Line::classify("The Q: marker is late"),
            Line::Text("The Q: marker is late")
        );
    }

    #[test]
    fn test_new_question_flushes_previous() {
        let pairs = parse_lines("Q: one\nQ: two\nA: second");
        assert_eq!(pairs, vec![pair("one", ""), pair("two", "second")]);
    }

    #[test]
    fn test_answer_overwrites_not_appends() {
        let pairs = parse_lines("Q: q\nA: first\nA: second");
        assert_eq!(pairs, vec![pair("q", "second")]);
    }

    #[test]
    fn test_continuation_lines_join_with_space() {
        let pairs = parse_lines("Q: Describe.\nA: A park.\n\n   There are trees.  \nBirds too.");
        assert_eq!(pairs, vec![pair("Describe.", "A park. There are trees. Birds too.")]);
    }

    #[test]
    fn test_text_before_answer_marker_becomes_answer() {
        let pairs = parse_lines("Q: Colour?\nOrange, mostly.");
        assert_eq!(pairs, vec![pair("Colour?", "Orange, mostly.")]);
    }

    #[test]
    fn test_text_without_pending_question_is_discarded() {
        let pairs = parse_lines("Here is my analysis:\nA: stray\nQ: Cat?\nA: Yes.");
        assert_eq!(pairs, vec![pair("Cat?", "Yes.")]);
    }

    #[test]
    fn test_crlf_lines() {
        let pairs = parse_lines("Q: Cat?\r\nA: Yes.\r\n");
        assert_eq!(pairs, vec![pair("Cat?", "Yes.")]);
    }

    #[test]
    fn test_duplicate_questions_are_kept() {
        let pairs = parse_lines("Q: Cat?\nA: Yes.\nQ: Cat?\nA: Still yes.");
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].question, pairs[1].question);
    }

    #[test]
    fn test_parser_state_transitions() {
        let mut parser = QaParser::new();
        assert!(!parser.has_pending_question());
        parser.feed_line("   ");
        parser.feed_line("intro text");
        assert!(!parser.has_pending_question());
        parser.feed_line("Q: Is there a cat?");
        assert!(parser.has_pending_question());
        parser.feed_line("A: Yes.");
        assert!(parser.has_pending_question());
        assert_eq!(parser.finish(), vec![pair("Is there a cat?", "Yes.")]);
    }

    #[test]
    fn test_no_markers_yields_nothing() {
        assert!(parse_lines("A fluffy orange cat.").is_empty());
        assert!(parse_lines("").is_empty());
    }
}
