//! Domain errors raised while syncing the roster

use thiserror::Error;

use crate::api::ApiError;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Unknown unit type '{0}'")]
    UnknownUnitType(String),

    #[error("Unknown rank '{0}'")]
    UnknownRank(String),

    #[error("Target list '{0}' not found")]
    ListNotFound(String),

    #[error("Interest category '{0}' not found")]
    CategoryNotFound(String),

    #[error("Row {row} is missing '{column}'")]
    MissingField { row: usize, column: &'static str },

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl SyncError {
    /// Setup-time failures that no amount of row-level handling can recover
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            SyncError::ListNotFound(_) | SyncError::CategoryNotFound(_)
        )
    }
}
