use thiserror::Error;

use crate::model::ErrorPayload;

const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred";

/// Errors that cross the scan boundary.
///
/// Per-package advisory lookup failures never show up here; they are
/// absorbed by the advisory source.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("No content in manifest")]
    EmptyManifest,

    #[error("Incorrect manifest format: {0}")]
    InvalidManifestFormat(String),

    #[error("Internal scan failure: {0}")]
    InternalScanFailure(String),
}

impl ScanError {
    /// True for errors caused by the caller's input (4xx-class).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ScanError::EmptyManifest | ScanError::InvalidManifestFormat(_)
        )
    }

    /// Caller-facing payload. Internal failure detail is not included.
    pub fn to_payload(&self) -> ErrorPayload {
        let error = match self {
            ScanError::InternalScanFailure(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        };
        ErrorPayload { error }
    }
}
