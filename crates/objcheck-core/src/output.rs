//! Output formatting for verification results.
//!
//! Writes a [`VerificationResult`] either as the JSON success/error envelope
//! or as a plain-text Question/Answer table.

use crate::types::VerificationResult;
use std::io::{self, Write};

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON success/error envelope
    Json,
    /// Two-column Question/Answer table
    Table,
}

impl OutputFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "table" | "text" => Some(Self::Table),
            _ => None,
        }
    }
}

/// A writer that renders verification results.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
}

impl<W: Write> OutputWriter<W> {
    /// Create a new output writer.
    ///
    /// `pretty` only affects JSON output.
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
        }
    }

    /// Write a single result.
    pub fn write(&mut self, result: &VerificationResult) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                let envelope = result.to_envelope();
                if self.pretty {
                    serde_json::to_writer_pretty(&mut self.writer, &envelope)
                        .map_err(io::Error::other)?;
                } else {
                    serde_json::to_writer(&mut self.writer, &envelope).map_err(io::Error::other)?;
                }
                writeln!(self.writer)?;
            }
            OutputFormat::Table => self.write_table(result)?,
        }
        Ok(())
    }

    fn write_table(&mut self, result: &VerificationResult) -> io::Result<()> {
        match result {
            VerificationResult::Success { qa_pairs } => {
                let width = qa_pairs
                    .iter()
                    .map(|p| p.question.chars().count())
                    .chain(std::iter::once("Question".len()))
                    .max()
                    .unwrap_or(0);

                writeln!(self.writer, "{:<width$} | Answer", "Question")?;
                writeln!(self.writer, "{}-+-{}", "-".repeat(width), "-".repeat(6))?;
                for pair in qa_pairs {
                    // Answers may span lines in fallback mode; keep rows aligned.
                    let mut lines = pair.answer.lines();
                    let first = lines.next().unwrap_or("");
                    writeln!(self.writer, "{:<width$} | {}", pair.question, first)?;
                    for line in lines {
                        writeln!(self.writer, "{:<width$} | {}", "", line)?;
                    }
                }
            }
            VerificationResult::NotFound { message } => writeln!(self.writer, "{message}")?,
            VerificationResult::Error { message } => writeln!(self.writer, "Error: {message}")?,
        }
        Ok(())
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Consume the writer and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::QaPair;

    fn render(result: &VerificationResult, format: OutputFormat, pretty: bool) -> String {
        let mut writer = OutputWriter::new(Vec::new(), format, pretty);
        writer.write(result).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(OutputFormat::parse("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("table"), Some(OutputFormat::Table));
        assert_eq!(OutputFormat::parse("xml"), None);
    }

    #[test]
    fn test_json_envelope_single_line() {
        let result = VerificationResult::Success {
            qa_pairs: vec![QaPair::new("Cat?", "Yes.")],
        };
        let out = render(&result, OutputFormat::Json, false);
        assert_eq!(out.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["success"], true);
    }

    #[test]
    fn test_json_pretty_is_multiline() {
        let result = VerificationResult::Error {
            message: "boom".into(),
        };
        let out = render(&result, OutputFormat::Json, true);
        assert!(out.lines().count() > 1);
        assert!(out.contains("\"boom\""));
    }

    #[test]
    fn test_table_rows_align() {
        let result = VerificationResult::Success {
            qa_pairs: vec![
                QaPair::new("Is there a cat?", "Yes."),
                QaPair::new("Dog?", "No."),
            ],
        };
        let out = render(&result, OutputFormat::Table, false);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Question        | Answer");
        assert_eq!(lines[2], "Is there a cat? | Yes.");
        assert_eq!(lines[3], "Dog?            | No.");
    }

    #[test]
    fn test_table_multiline_answer() {
        let result = VerificationResult::Success {
            qa_pairs: vec![QaPair::new("AI Analysis", "Line one.\nLine two.")],
        };
        let out = render(&result, OutputFormat::Table, false);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[2], "AI Analysis | Line one.");
        assert_eq!(lines[3], "            | Line two.");
    }

    #[test]
    fn test_table_not_found_and_error() {
        let not_found = VerificationResult::NotFound {
            message: "Image does not contain necessary objects.".into(),
        };
        assert_eq!(
            render(&not_found, OutputFormat::Table, false),
            "Image does not contain necessary objects.\n"
        );
        let error = VerificationResult::Error {
            message: "timed out".into(),
        };
        assert_eq!(render(&error, OutputFormat::Table, false), "Error: timed out\n");
    }
}
