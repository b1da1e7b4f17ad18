use rusqlite::ErrorCode;
use rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    /// A unique column already holds this value. `field` names the column,
    /// e.g. `email` or `username`.
    #[error("{field} already exists")]
    Conflict { field: String },
    #[error("storage failure: {0}")]
    Storage(#[from] anyhow::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(failure, Some(msg)) = &err {
            if failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == SQLITE_CONSTRAINT_UNIQUE
            {
                return StoreError::Conflict {
                    field: conflicting_column(msg).to_string(),
                };
            }
        }
        StoreError::Storage(err.into())
    }
}

/// SQLite reports "UNIQUE constraint failed: users.email"; pull out `email`.
fn conflicting_column(msg: &str) -> &str {
    msg.rsplit(['.', ' ']).next().unwrap_or(msg)
}
