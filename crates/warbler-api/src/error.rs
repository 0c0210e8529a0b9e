use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use warbler_db::DbError;
use warbler_types::api::ErrorBody;

pub const UNAUTHORIZED_MESSAGE: &str = "Access unauthorized.";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed input, reported before anything is written.
    #[error("{0}")]
    Validation(String),

    /// A write collided with a uniqueness constraint.
    #[error("{0}")]
    Uniqueness(String),

    /// No current user, or the current user does not own the resource.
    #[error("Access unauthorized.")]
    Unauthorized,

    #[error("Invalid credentials.")]
    InvalidCredentials,

    #[error("Not found.")]
    NotFound,

    #[error("database error: {0}")]
    Database(DbError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::UniqueViolation(detail) => ApiError::Uniqueness(describe_conflict(&detail)),
            other => ApiError::Database(other),
        }
    }
}

/// Turns SQLite's "UNIQUE constraint failed: table.column" into user wording.
fn describe_conflict(detail: &str) -> String {
    let message = if detail.contains("users.username") {
        "Username already taken."
    } else if detail.contains("users.email") {
        "Email already taken."
    } else if detail.contains("follows.") {
        "Already following this user."
    } else if detail.contains("likes.") {
        "Message already liked."
    } else {
        return detail.to_string();
    };
    message.to_string()
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Uniqueness(_) => StatusCode::CONFLICT,
            ApiError::Unauthorized | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Database(_) | ApiError::Internal(_) => {
                error!("Request failed: {}", self);
                ErrorBody {
                    error: "Internal server error.".into(),
                    redirect: None,
                }
            }
            ApiError::Unauthorized => ErrorBody {
                error: UNAUTHORIZED_MESSAGE.into(),
                redirect: Some("/".into()),
            },
            _ => ErrorBody {
                error: self.to_string(),
                redirect: None,
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violations_become_uniqueness_errors() {
        let err: ApiError =
            DbError::UniqueViolation("UNIQUE constraint failed: users.username".into()).into();
        assert!(matches!(&err, ApiError::Uniqueness(msg) if msg == "Username already taken."));
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn other_db_errors_are_internal() {
        let err: ApiError = DbError::Constraint("NOT NULL constraint failed".into()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
