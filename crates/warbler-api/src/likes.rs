use axum::{
    Extension, Json,
    extract::{Path, State},
    response::Response,
};
use tracing::{info, warn};
use uuid::Uuid;

use warbler_db::Database;
use warbler_types::api::{LikesResponse, ToggleLikeResponse};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::{blocking, convert, messages, parse_path_id, see_other};

/// Like the message, or remove the like if it exists. Returns whether the
/// message is liked afterwards. Users cannot like their own messages.
pub fn toggle_like(db: &Database, current: &CurrentUser, message_id: Uuid) -> Result<bool, ApiError> {
    let message = messages::get(db, &message_id.to_string())?;
    if current.owns(message.user_id) {
        warn!("User {} tried to like own message {}", current.id, message_id);
        return Err(ApiError::Unauthorized);
    }

    Ok(db.toggle_like(&current.id.to_string(), &message_id.to_string())?)
}

pub fn liked_messages(db: &Database, user_id: Uuid) -> Result<LikesResponse, ApiError> {
    let user = db
        .get_user_by_id(&user_id.to_string())?
        .map(convert::summary)
        .ok_or(ApiError::NotFound)?;
    let messages = db
        .liked_messages(&user_id.to_string())?
        .into_iter()
        .map(convert::message)
        .collect();
    Ok(LikesResponse { user, messages })
}

pub async fn like_message(
    State(state): State<AppState>,
    Path(message_id): Path<String>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Response, ApiError> {
    let message_id = parse_path_id(&message_id)?;
    let liker = current.clone();
    let liked = blocking(&state, move |s| toggle_like(&s.db, &liker, message_id)).await?;

    info!(
        "User {} {} message {}",
        current.username,
        if liked { "liked" } else { "unliked" },
        message_id
    );
    Ok(see_other("/".into(), ToggleLikeResponse { message_id, liked }))
}

pub async fn show_likes(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<LikesResponse>, ApiError> {
    let user_id = parse_path_id(&user_id)?;
    let likes = blocking(&state, move |s| liked_messages(&s.db, user_id)).await?;
    Ok(Json(likes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    use crate::test_support::TestApp;

    #[test]
    fn cannot_like_own_message() {
        let app = TestApp::new();
        let author = app.seed_user("author");
        let db = &app.state().db;
        let message = messages::create(db, &app.current(&author), "mine").unwrap();

        let err = toggle_like(db, &app.current(&author), message.id).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[test]
    fn liking_missing_message_is_not_found() {
        let app = TestApp::new();
        let fan = app.seed_user("fan");
        let err = toggle_like(&app.state().db, &app.current(&fan), Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[tokio::test]
    async fn like_toggles_and_lists() {
        let app = TestApp::new();
        let author = app.seed_user("author");
        let fan = app.seed_user("fan");
        let message = messages::create(&app.state().db, &app.current(&author), "likeable").unwrap();
        let token = app.login(&fan);
        let uri = format!("/messages/{}/like", message.id);

        let resp = app.post(&uri, Some(&token), None).await;
        assert_eq!(resp.status, StatusCode::SEE_OTHER);
        assert_eq!(resp.body["liked"], true);

        let likes = app.get(&format!("/users/{}/likes", fan.id), Some(&token)).await;
        assert_eq!(likes.status, StatusCode::OK);
        assert_eq!(likes.body["messages"][0]["text"], "likeable");

        let resp = app.post(&uri, Some(&token), None).await;
        assert_eq!(resp.body["liked"], false);

        let anonymous = app.get(&format!("/users/{}/likes", fan.id), None).await;
        assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    }
}
