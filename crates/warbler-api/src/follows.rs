use axum::{
    Extension, Json,
    extract::{Path, State},
    response::Response,
};
use tracing::info;
use uuid::Uuid;

use warbler_db::Database;
use warbler_types::api::GraphResponse;
use warbler_types::models::{Follow, UserSummary};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::{blocking, convert, parse_path_id, see_other};

/// Current user starts following `followee_id`. Following twice is a
/// uniqueness error, following oneself a validation error.
pub fn follow(db: &Database, current: &CurrentUser, followee_id: Uuid) -> Result<Follow, ApiError> {
    if current.id == followee_id {
        return Err(ApiError::Validation("You cannot follow yourself.".into()));
    }
    if !db.user_exists(&followee_id.to_string())? {
        return Err(ApiError::NotFound);
    }

    db.add_follow(&current.id.to_string(), &followee_id.to_string())?;
    Ok(Follow {
        user_being_followed_id: followee_id,
        user_following_id: current.id,
    })
}

/// Removing an edge that does not exist is not an error.
pub fn unfollow(db: &Database, current: &CurrentUser, followee_id: Uuid) -> Result<bool, ApiError> {
    Ok(db.remove_follow(&current.id.to_string(), &followee_id.to_string())?)
}

/// Does `a` follow `b`?
pub fn is_following(db: &Database, a: Uuid, b: Uuid) -> Result<bool, ApiError> {
    Ok(db.is_following(&a.to_string(), &b.to_string())?)
}

/// Is `a` followed by `b`?
pub fn is_followed_by(db: &Database, a: Uuid, b: Uuid) -> Result<bool, ApiError> {
    is_following(db, b, a)
}

fn owner_summary(db: &Database, user_id: Uuid) -> Result<UserSummary, ApiError> {
    db.get_user_by_id(&user_id.to_string())?
        .map(convert::summary)
        .ok_or(ApiError::NotFound)
}

pub fn following(db: &Database, user_id: Uuid) -> Result<GraphResponse, ApiError> {
    let user = owner_summary(db, user_id)?;
    let users = db
        .following(&user_id.to_string())?
        .into_iter()
        .map(convert::summary)
        .collect();
    Ok(GraphResponse { user, users })
}

pub fn followers(db: &Database, user_id: Uuid) -> Result<GraphResponse, ApiError> {
    let user = owner_summary(db, user_id)?;
    let users = db
        .followers(&user_id.to_string())?
        .into_iter()
        .map(convert::summary)
        .collect();
    Ok(GraphResponse { user, users })
}

pub async fn show_following(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<GraphResponse>, ApiError> {
    let user_id = parse_path_id(&user_id)?;
    let graph = blocking(&state, move |s| following(&s.db, user_id)).await?;
    Ok(Json(graph))
}

pub async fn show_followers(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<GraphResponse>, ApiError> {
    let user_id = parse_path_id(&user_id)?;
    let graph = blocking(&state, move |s| followers(&s.db, user_id)).await?;
    Ok(Json(graph))
}

pub async fn add_follow(
    State(state): State<AppState>,
    Path(followee_id): Path<String>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Response, ApiError> {
    let followee_id = parse_path_id(&followee_id)?;
    let follower = current.clone();
    let graph = blocking(&state, move |s| {
        follow(&s.db, &follower, followee_id)?;
        following(&s.db, follower.id)
    })
    .await?;

    info!("User {} followed {}", current.username, followee_id);
    Ok(see_other(format!("/users/{}/following", current.id), graph))
}

pub async fn stop_following(
    State(state): State<AppState>,
    Path(followee_id): Path<String>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Response, ApiError> {
    let followee_id = parse_path_id(&followee_id)?;
    let follower = current.clone();
    let graph = blocking(&state, move |s| {
        if unfollow(&s.db, &follower, followee_id)? {
            info!("User {} stopped following {}", follower.username, followee_id);
        }
        following(&s.db, follower.id)
    })
    .await?;

    Ok(see_other(format!("/users/{}/following", current.id), graph))
}
