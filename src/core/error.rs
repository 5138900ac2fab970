//! Error taxonomy for document loading, validation, and saving

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the document adapters and the modification engine.
///
/// Every variant is recoverable at the controller: it is shown to the user
/// and the currently loaded document (if any) is left untouched.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    #[error("unsupported format \"{0}\" (only .docx and .rtf are supported)")]
    UnsupportedFormat(String),

    #[error("document could not be parsed: {0}")]
    Corrupt(String),

    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("failed to apply modifications: {0}")]
    Apply(String),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DocumentError {
    /// Short label used for message-window titles and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NotFound",
            Self::UnsupportedFormat(_) => "UnsupportedFormat",
            Self::Corrupt(_) => "CorruptDocument",
            Self::Validation { .. } => "ValidationError",
            Self::Apply(_) => "ApplyError",
            Self::Write { .. } => "WriteError",
        }
    }

    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}
