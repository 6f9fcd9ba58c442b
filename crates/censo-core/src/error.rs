use censo_ingest::IngestError;
use censo_report::ReportError;
use thiserror::Error;

/// Errors surfaced by a [`CensusSession`](crate::CensusSession).
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Report(#[from] ReportError),
}
