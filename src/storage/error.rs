// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Storage errors and their mapping onto API faults.

use thiserror::Error;

use crate::error::ApiError;

/// Error type for storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Entity not found
    #[error("{0} not found")]
    NotFound(String),

    /// Unique constraint violated; carries the offending column
    #[error("{0} is already taken")]
    Conflict(String),

    /// Foreign key points at a missing row
    #[error("referenced record does not exist")]
    InvalidReference,

    /// Migration failure at startup
    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Any other database failure
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return StorageError::Conflict(unique_column(db.message()));
            }
            if db.is_foreign_key_violation() {
                return StorageError::InvalidReference;
            }
        }
        StorageError::Database(e)
    }
}

/// Column named by a SQLite unique violation.
///
/// SQLite reports `UNIQUE constraint failed: teams.name`; the column is the
/// part after the last dot.
fn unique_column(message: &str) -> String {
    message
        .rsplit(": ")
        .next()
        .and_then(|target| target.split(',').next())
        .map(|target| target.rsplit('.').next().unwrap_or(target).trim().to_string())
        .filter(|column| !column.is_empty())
        .unwrap_or_else(|| "value".to_string())
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound(entity) => ApiError::not_found(format!("{entity} not found")),
            StorageError::Conflict(column) => {
                ApiError::conflict(format!("{} is already taken", crate::validation::to_camel_case(&column)))
            }
            StorageError::InvalidReference => {
                ApiError::bad_request("Referenced record does not exist")
            }
            other => ApiError::internal(other.to_string()),
        }
    }
}
