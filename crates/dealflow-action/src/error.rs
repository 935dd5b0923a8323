//! Error types for the action engine.

use dealflow_core::error::DealflowError;
use uuid::Uuid;

/// Errors from record store lookups.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Record not found: {0}")]
    NotFound(Uuid),
    #[error("Storage error: {0}")]
    Storage(#[from] DealflowError),
}

/// Errors from action confirmation.
///
/// All variants are rejections surfaced to the caller; none is retried.
#[derive(Debug, thiserror::Error)]
pub enum ConfirmError {
    #[error("Action not found: {0}")]
    NotFound(Uuid),
    #[error("Action already approved: {0}")]
    AlreadyApproved(Uuid),
    #[error("Origin meeting missing for schedule action {0}, cannot create follow-up")]
    MissingOriginMeeting(Uuid),
    #[error("Storage error: {0}")]
    Storage(#[from] DealflowError),
}

impl From<RecordError> for ConfirmError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::NotFound(id) => ConfirmError::NotFound(id),
            RecordError::Storage(e) => ConfirmError::Storage(e),
        }
    }
}

/// Errors from the analysis pipeline.
///
/// Extraction failures are deliberately absent: they are recovered inside
/// the pipeline with an empty analysis, never surfaced.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Meeting not found: {0}")]
    MeetingNotFound(Uuid),
    #[error("Storage error: {0}")]
    Storage(#[from] DealflowError),
}

impl From<RecordError> for PipelineError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::NotFound(id) => PipelineError::MeetingNotFound(id),
            RecordError::Storage(e) => PipelineError::Storage(e),
        }
    }
}
