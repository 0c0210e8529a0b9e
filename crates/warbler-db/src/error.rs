use rusqlite::ErrorCode;
use rusqlite::ffi;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    /// A UNIQUE or PRIMARY KEY constraint rejected the write.
    #[error("uniqueness violation: {0}")]
    UniqueViolation(String),

    /// Any other constraint: NOT NULL, CHECK, FOREIGN KEY.
    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("DB lock poisoned: {0}")]
    LockPoisoned(String),

    #[error(transparent)]
    Sqlite(rusqlite::Error),
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(e, msg) = &err {
            if e.code == ErrorCode::ConstraintViolation {
                let detail = msg.clone().unwrap_or_else(|| e.to_string());
                return match e.extended_code {
                    ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                        DbError::UniqueViolation(detail)
                    }
                    _ => DbError::Constraint(detail),
                };
            }
        }
        DbError::Sqlite(err)
    }
}

impl DbError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DbError::UniqueViolation(_))
    }
}
