use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::Response,
};
use tracing::{info, warn};
use uuid::Uuid;

use warbler_db::migrations::{DEFAULT_HEADER_IMAGE_URL, DEFAULT_IMAGE_URL};
use warbler_db::models::UserChanges;
use warbler_db::{Database, PAGE_LIMIT};
use warbler_types::api::{
    Notice, ProfileResponse, ProfileUpdateRequest, UserDetailResponse, UserSearchQuery,
};
use warbler_types::models::{User, UserSummary};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::password::PasswordHasher;
use crate::{blocking, convert, parse_path_id, see_other};

/// All users, or those whose username contains `q`.
pub fn list_users(db: &Database, q: Option<&str>) -> Result<Vec<UserSummary>, ApiError> {
    let q = q.map(str::trim).filter(|q| !q.is_empty());
    Ok(db
        .list_users(q)?
        .into_iter()
        .map(convert::summary)
        .collect())
}

pub fn user_detail(db: &Database, user_id: Uuid) -> Result<UserDetailResponse, ApiError> {
    let id = user_id.to_string();
    let row = db.get_user_by_id(&id)?.ok_or(ApiError::NotFound)?;
    let messages = db
        .messages_by_user(&id, PAGE_LIMIT)?
        .into_iter()
        .map(convert::message)
        .collect();
    let counts = db.user_counts(&id)?;
    let user = convert::user(row);

    Ok(UserDetailResponse {
        id: user.id,
        username: user.username,
        image_url: user.image_url,
        header_image_url: user.header_image_url,
        bio: user.bio,
        location: user.location,
        messages,
        following_count: counts.following,
        followers_count: counts.followers,
        likes_count: counts.likes,
    })
}

pub fn profile(db: &Database, current: &CurrentUser) -> Result<ProfileResponse, ApiError> {
    let row = db
        .get_user_by_id(&current.id.to_string())?
        .ok_or(ApiError::NotFound)?;
    let has_password = !row.password.is_empty();
    Ok(ProfileResponse {
        user: convert::user(row),
        has_password,
    })
}

fn blank_to_default(url: Option<String>, default: &str) -> Option<String> {
    url.map(|url| {
        let url = url.trim();
        if url.is_empty() { default.to_string() } else { url.to_string() }
    })
}

/// Edit the current user's profile. The stored password must match
/// `req.password`; otherwise nothing changes.
pub fn update_profile(
    db: &Database,
    hasher: &PasswordHasher,
    current: &CurrentUser,
    req: ProfileUpdateRequest,
) -> Result<User, ApiError> {
    let id = current.id.to_string();
    let row = db.get_user_by_id(&id)?.ok_or(ApiError::NotFound)?;
    if !hasher.verify(&req.password, &row.password) {
        warn!("Profile edit for {} refused: wrong password", current.id);
        return Err(ApiError::Unauthorized);
    }

    let username = req.username.map(|u| u.trim().to_string());
    if username.as_deref().is_some_and(str::is_empty) {
        return Err(ApiError::Validation("Username is required.".into()));
    }
    let email = req.email.map(|e| e.trim().to_string());
    if email.as_deref().is_some_and(|e| !e.contains('@')) {
        return Err(ApiError::Validation("A valid email is required.".into()));
    }

    let changes = UserChanges {
        username,
        email,
        image_url: blank_to_default(req.image_url, DEFAULT_IMAGE_URL),
        header_image_url: blank_to_default(req.header_image_url, DEFAULT_HEADER_IMAGE_URL),
        bio: req.bio,
        location: req.location,
    };
    db.update_user(&id, &changes)?;

    let updated = db.get_user_by_id(&id)?.ok_or(ApiError::NotFound)?;
    Ok(convert::user(updated))
}

/// Delete the current user and everything that depends on it.
pub fn delete_account(db: &Database, current: &CurrentUser) -> Result<(), ApiError> {
    if !db.delete_user(&current.id.to_string())? {
        return Err(ApiError::NotFound);
    }
    Ok(())
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<UserSearchQuery>,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    let users = blocking(&state, move |s| list_users(&s.db, query.q.as_deref())).await?;
    Ok(Json(users))
}

pub async fn show_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserDetailResponse>, ApiError> {
    let user_id = parse_path_id(&user_id)?;
    let detail = blocking(&state, move |s| user_detail(&s.db, user_id)).await?;
    Ok(Json(detail))
}

pub async fn show_profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let response = blocking(&state, move |s| profile(&s.db, &current)).await?;
    Ok(Json(response))
}

pub async fn edit_profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<ProfileUpdateRequest>,
) -> Result<Response, ApiError> {
    let editor = current.clone();
    let user = blocking(&state, move |s| update_profile(&s.db, &s.hasher, &editor, req)).await?;

    info!("User {} updated their profile", current.id);
    Ok(see_other(format!("/users/{}", user.id), user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Response, ApiError> {
    let doomed = current.clone();
    blocking(&state, move |s| delete_account(&s.db, &doomed)).await?;

    info!("User {} deleted their account", current.username);
    Ok(see_other(
        "/signup".into(),
        Notice {
            message: "Your account has been deleted.".into(),
        },
    ))
}
