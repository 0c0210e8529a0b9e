use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use warbler_db::Database;
use warbler_db::models::NewUser;
use warbler_types::api::{AuthResponse, LoginRequest, Notice, SignupRequest};
use warbler_types::models::User;

use crate::error::ApiError;
use crate::middleware::{CurrentUser, issue_token};
use crate::password::PasswordHasher;
use crate::{blocking, convert, see_other};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
    pub session_ttl: chrono::Duration,
    pub hasher: PasswordHasher,
}

/// Create a user. The password is hashed before the row is built; a taken
/// username or email surfaces as `ApiError::Uniqueness`.
pub fn signup(db: &Database, hasher: &PasswordHasher, req: &SignupRequest) -> Result<User, ApiError> {
    let username = req.username.as_deref().unwrap_or_default().trim();
    let email = req.email.as_deref().unwrap_or_default().trim();
    let password = req.password.as_deref().unwrap_or_default();

    if password.is_empty() {
        return Err(ApiError::Validation("Password is required.".into()));
    }
    if username.is_empty() {
        return Err(ApiError::Validation("Username is required.".into()));
    }
    if !email.contains('@') {
        return Err(ApiError::Validation("A valid email is required.".into()));
    }

    let password_hash = hasher.hash(password)?;
    let user_id = Uuid::new_v4().to_string();

    db.create_user(&NewUser {
        id: &user_id,
        username,
        email,
        password_hash: &password_hash,
        image_url: req.image_url.as_deref(),
    })?;

    let row = db
        .get_user_by_id(&user_id)?
        .ok_or_else(|| ApiError::Internal(format!("user {user_id} vanished after insert")))?;

    info!("User {} signed up", username);
    Ok(convert::user(row))
}

/// Check credentials. Unknown usernames and wrong passwords are both `None`.
/// The username is trimmed the same way `signup` trims it before storing.
pub fn authenticate(
    db: &Database,
    hasher: &PasswordHasher,
    username: &str,
    password: &str,
) -> Result<Option<User>, ApiError> {
    let Some(row) = db.get_user_by_username(username.trim())? else {
        return Ok(None);
    };

    if hasher.verify(password, &row.password) {
        Ok(Some(convert::user(row)))
    } else {
        Ok(None)
    }
}

/// Record a session row for `user` and sign the token that refers to it.
pub fn open_session(state: &AppStateInner, user: &User) -> Result<String, ApiError> {
    let session_id = Uuid::new_v4();
    let expires_at = Utc::now() + state.session_ttl;

    state.db.create_session(
        &session_id.to_string(),
        &user.id.to_string(),
        &expires_at.to_rfc3339_opts(SecondsFormat::Micros, true),
    )?;

    issue_token(&state.jwt_secret, user.id, session_id, &user.username, expires_at)
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (user, token) = blocking(&state, move |s| {
        let user = signup(&s.db, &s.hasher, &req)?;
        let token = open_session(s, &user)?;
        Ok((user, token))
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user_id: user.id,
            username: user.username,
            token,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (user, token) = blocking(&state, move |s| {
        let Some(user) = authenticate(&s.db, &s.hasher, &req.username, &req.password)? else {
            warn!("Failed login for {}", req.username);
            return Err(ApiError::InvalidCredentials);
        };
        let purged = s.db.purge_expired_sessions()?;
        if purged > 0 {
            info!("Purged {} expired sessions", purged);
        }
        let token = open_session(s, &user)?;
        Ok((user, token))
    })
    .await?;

    info!("User {} logged in", user.username);
    Ok(Json(AuthResponse {
        user_id: user.id,
        username: user.username,
        token,
    }))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Response, ApiError> {
    let session_id = current.session_id.to_string();
    blocking(&state, move |s| Ok(s.db.delete_session(&session_id)?)).await?;

    info!("User {} logged out", current.username);
    Ok(see_other(
        "/login".into(),
        Notice {
            message: "You have been logged out.".into(),
        },
    ))
}
