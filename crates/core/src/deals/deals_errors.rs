use thiserror::Error;

use crate::constants::VALIDATION_MESSAGE_SEPARATOR;

/// Why a single record of a batch was rejected.
///
/// None of these abort the batch; each one becomes an entry of the import report.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DealImportError {
    #[error("Validation failed: {}", .0.join(VALIDATION_MESSAGE_SEPARATOR))]
    Validation(Vec<String>),

    #[error("Duplicate deal: Deal with ID {0} already exists.")]
    Duplicate(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl From<crate::Error> for DealImportError {
    fn from(err: crate::Error) -> Self {
        DealImportError::Unexpected(err.to_string())
    }
}
