//! Error types for report generation.

use thiserror::Error;

/// Errors that stop a report from being produced.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Nothing was selected.
    #[error("no specialty selected; choose at least one specialty or coordination")]
    EmptySelection,

    /// The selection matched no patient in the upload.
    #[error("the selected specialties have no patients in this census")]
    EmptyResultSet,

    /// The workbook writer failed.
    #[error("failed to write workbook: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
}

pub type Result<T> = std::result::Result<T, ReportError>;
