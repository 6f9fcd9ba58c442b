//! Error types for census document ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading a census document.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The document has no content at all.
    #[error("census document is empty")]
    EmptyDocument,

    /// The document parsed but contains no table with rows.
    #[error("no table found in census document")]
    NoTable,

    /// A CSS selector failed to compile.
    #[error("invalid selector '{css}': {message}")]
    Selector { css: String, message: String },

    /// Failed to read the document from disk.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for ingest operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(IngestError::EmptyDocument.to_string(), "census document is empty");
        assert_eq!(IngestError::NoTable.to_string(), "no table found in census document");

        let err = IngestError::FileRead {
            path: PathBuf::from("/tmp/censo.html"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("/tmp/censo.html"));
    }
}
