//! Storage-specific error type wrapping sqlx errors, plus the mapping of
//! database constraint violations onto domain error kinds. Uniqueness and
//! restrict rules are part of the persistence contract, so the adapter is
//! the right place to translate them.

use sanitrack_domain::error::{ReferentialIntegrityError, SanitrackError, UniquenessViolation};

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Failed to run migrations.
    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<StorageError> for SanitrackError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}

/// Map a write failure: a unique-constraint violation becomes a domain
/// conflict carrying the offending key; anything else stays a storage error.
pub(crate) fn map_unique(
    err: sqlx::Error,
    entity: &'static str,
    key: impl Into<String>,
) -> SanitrackError {
    if let sqlx::Error::Database(ref db) = err {
        if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) {
            return UniquenessViolation {
                entity,
                key: key.into(),
            }
            .into();
        }
    }
    StorageError::Database(err).into()
}

/// Map a delete failure: a foreign-key restriction becomes a domain
/// referential-integrity error.
pub(crate) fn map_restrict(err: sqlx::Error, entity: &'static str) -> SanitrackError {
    if let sqlx::Error::Database(ref db) = err {
        if matches!(db.kind(), sqlx::error::ErrorKind::ForeignKeyViolation) {
            return ReferentialIntegrityError { entity }.into();
        }
    }
    StorageError::Database(err).into()
}
