use std::time::Duration;

use sqlx::Error as SqlxError;
use thiserror::Error;

pub type StoreResult<T = ()> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("statement did not complete within {0:?}")]
    Timeout(Duration),
    #[error("constraint violation: {0}")]
    Constraint(#[source] SqlxError),
    #[error("database error: {0}")]
    Database(#[source] SqlxError),
    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    /// Split driver errors so callers can match constraint violations
    /// without digging into `sqlx::Error`.
    pub(crate) fn from_sqlx(err: SqlxError) -> Self {
        let is_constraint = err.as_database_error().is_some_and(|db| {
            db.is_unique_violation() || db.is_foreign_key_violation() || db.is_check_violation()
        });
        if is_constraint {
            StoreError::Constraint(err)
        } else {
            StoreError::Database(err)
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, StoreError::Timeout(_))
    }

    pub fn is_constraint(&self) -> bool {
        matches!(self, StoreError::Constraint(_))
    }
}
