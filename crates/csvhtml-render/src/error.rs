//! Error types for document rendering.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for render operations.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors that can occur while rendering a document.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Invalid configuration (e.g. a separator that is not one character).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Input file could not be opened.
    #[error("open input file {}: {source}", path.display())]
    OpenInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Header was requested but the input has no records.
    #[error("read header row: input is empty")]
    MissingHeader,

    /// Header row failed to parse.
    #[error("read header row: {0}")]
    ReadHeader(#[source] csv::Error),

    /// A body row failed to parse.
    #[error("read row {record}: {source}")]
    ReadRow {
        /// 1-based record number in the input.
        record: u64,
        #[source]
        source: csv::Error,
    },

    /// Template rendering error.
    #[error("template error: {0}")]
    TemplateError(String),

    /// Writing the document failed.
    #[error("write output: {0}")]
    Io(#[from] std::io::Error),
}

impl From<askama::Error> for RenderError {
    fn from(err: askama::Error) -> Self {
        RenderError::TemplateError(err.to_string())
    }
}

/// Coarse failure class, used to pick exit codes and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidConfig,
    Read,
    Template,
    Io,
}

impl RenderError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RenderError::InvalidConfig(_) => ErrorKind::InvalidConfig,
            RenderError::OpenInput { .. }
            | RenderError::MissingHeader
            | RenderError::ReadHeader(_)
            | RenderError::ReadRow { .. } => ErrorKind::Read,
            RenderError::TemplateError(_) => ErrorKind::Template,
            RenderError::Io(_) => ErrorKind::Io,
        }
    }

    /// True for input open and parse failures.
    pub fn is_read_error(&self) -> bool {
        self.kind() == ErrorKind::Read
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_errors_classified() {
        assert!(RenderError::MissingHeader.is_read_error());
        let open = RenderError::OpenInput {
            path: PathBuf::from("missing.csv"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(open.is_read_error());
        assert_eq!(
            RenderError::InvalidConfig("x".into()).kind(),
            ErrorKind::InvalidConfig
        );
        assert_eq!(
            RenderError::TemplateError("x".into()).kind(),
            ErrorKind::Template
        );
    }

    #[test]
    fn test_messages_name_stage() {
        assert_eq!(
            RenderError::MissingHeader.to_string(),
            "read header row: input is empty"
        );
        let open = RenderError::OpenInput {
            path: PathBuf::from("data/in.csv"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(open.to_string().starts_with("open input file data/in.csv:"));
    }
}
