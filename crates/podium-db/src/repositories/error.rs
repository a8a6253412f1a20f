//! Error handling utilities for repositories

use podium_core::error::EngineError;
use sqlx::Error as SqlxError;

/// Convert SQLx error to EngineError
pub fn map_db_error(e: SqlxError) -> EngineError {
    EngineError::StorageError(e.to_string())
}
