pub mod auth;
mod convert;
pub mod error;
pub mod follows;
pub mod likes;
pub mod messages;
pub mod middleware;
pub mod password;
pub mod routes;
pub mod users;

#[cfg(test)]
mod test_support;

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;
use uuid::Uuid;

use crate::auth::{AppState, AppStateInner};
use crate::error::ApiError;

pub use routes::router;

/// Run blocking DB or bcrypt work off the async runtime.
pub(crate) async fn blocking<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&AppStateInner) -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(e.to_string())
        })?
}

/// Ids in the path that are not UUIDs name nothing that exists.
pub(crate) fn parse_path_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound)
}

/// 303 See Other to `location`, carrying `body` for clients that do not follow.
pub(crate) fn see_other<T: Serialize>(location: String, body: T) -> Response {
    (
        StatusCode::SEE_OTHER,
        [(header::LOCATION, location)],
        Json(body),
    )
        .into_response()
}
