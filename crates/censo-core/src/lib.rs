//! Census session facade.
//!
//! Ties ingestion, classification, selection and report generation into the
//! operations a form layer needs: open a document, read and update the
//! selection, generate a workbook.

#![deny(unsafe_code)]

pub mod error;
pub mod kind;
pub mod session;

pub use error::SessionError;
pub use kind::ReportKind;
pub use session::{CensusSession, GeneratedReport};
