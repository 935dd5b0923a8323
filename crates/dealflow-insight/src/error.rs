//! Error types for signal extraction.

use dealflow_core::error::DealflowError;

/// Errors from a signal extractor call.
///
/// These never escape the analysis pipeline as hard failures: the caller
/// recovers by substituting an empty [`crate::AnalysisResult`].
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("extractor is not configured: missing API key")]
    NotConfigured,
    #[error("extraction request failed: {0}")]
    Request(String),
    #[error("extraction timed out after {0} seconds")]
    Timeout(u64),
    #[error("malformed extractor response: {0}")]
    MalformedResponse(String),
}

impl From<ExtractError> for DealflowError {
    fn from(err: ExtractError) -> Self {
        DealflowError::Extraction(err.to_string())
    }
}
