//! Text extraction and the classification gate in front of the model call.

use bytes::Bytes;
use thiserror::Error;
use tracing::warn;

pub const TOO_LITTLE_TEXT_MESSAGE: &str = "The uploaded file does not appear to be a resume \
    (too little readable text). Please upload a valid resume PDF.";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("PDF text extraction failed: {0}")]
    Pdf(String),

    #[error("PDF extraction worker stopped: {0}")]
    Worker(String),
}

/// Outcome of the gate: either text worth analyzing or an early rejection.
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    Proceed(String),
    TooShort { chars: usize },
}

/// Extracts plain text from PDF bytes.
///
/// Runs on the blocking pool; a panic inside the PDF parser is reported as
/// an extraction failure rather than tearing down the request task.
pub async fn extract_pdf_text(data: Bytes) -> Result<String, ExtractionError> {
    tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
        .await
        .map_err(|e| ExtractionError::Worker(e.to_string()))?
        .map_err(|e| ExtractionError::Pdf(e.to_string()))
}

/// Applies the minimum-length rule to extracted text.
pub fn classification_gate(text: &str, min_chars: usize) -> GateDecision {
    let trimmed = text.trim();
    let chars = trimmed.chars().count();
    if chars < min_chars {
        warn!(chars, min_chars, "Extracted text below resume threshold");
        GateDecision::TooShort { chars }
    } else {
        GateDecision::Proceed(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_rejects_fifty_characters() {
        let text = "x".repeat(50);
        assert_eq!(classification_gate(&text, 200), GateDecision::TooShort { chars: 50 });
    }

    #[test]
    fn test_gate_ignores_surrounding_whitespace() {
        let text = format!("   \n{}\n\t  ", "a".repeat(199));
        assert_eq!(classification_gate(&text, 200), GateDecision::TooShort { chars: 199 });
    }

    #[test]
    fn test_gate_accepts_threshold_exactly() {
        let text = format!("  {}  ", "a".repeat(200));
        assert_eq!(classification_gate(&text, 200), GateDecision::Proceed("a".repeat(200)));
    }

    #[test]
    fn test_gate_counts_characters_not_bytes() {
        // 100 two-byte characters: 200 bytes but only 100 characters.
        let text = "é".repeat(100);
        assert_eq!(classification_gate(&text, 200), GateDecision::TooShort { chars: 100 });
    }

    #[tokio::test]
    async fn test_extract_reads_generated_pdf() {
        let pdf = crate::analysis::fixtures::pdf_with_lines(&crate::analysis::fixtures::RESUME_LINES);
        let text = extract_pdf_text(Bytes::from(pdf)).await.unwrap();
        assert!(text.contains("Backend Engineer"));
        assert!(matches!(classification_gate(&text, 200), GateDecision::Proceed(_)));
    }

    #[tokio::test]
    async fn test_extract_rejects_non_pdf_bytes() {
        let result = extract_pdf_text(Bytes::from_static(b"definitely not a pdf")).await;
        assert!(result.is_err());
    }
}
