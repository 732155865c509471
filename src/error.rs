//! Error handling for the ATS screener

use crate::processing::records::RecordKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    /// A required field on a resume or job record is missing or unusable.
    #[error("Malformed {record} record: field '{field}' {reason}")]
    MalformedRecord {
        record: RecordKind,
        field: String,
        reason: String,
    },

    /// A graded answer reply without a usable integer score in 0-100 or feedback.
    #[error("Malformed answer grade: {0}")]
    MalformedGrade(String),

    /// Embedding inference or a language model call failed or timed out.
    #[error("External service failure: {0}")]
    ExternalService(String),

    #[error("Vocabulary error: {0}")]
    Vocabulary(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, AtsError>;

impl AtsError {
    pub fn malformed(record: RecordKind, field: &str, reason: impl Into<String>) -> Self {
        AtsError::MalformedRecord {
            record,
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// HTTP failures from the language model endpoint
impl From<reqwest::Error> for AtsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AtsError::ExternalService(format!("request timed out: {}", err))
        } else {
            AtsError::ExternalService(err.to_string())
        }
    }
}
