use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::{debug, error, warn};
use uuid::Uuid;

use warbler_types::api::Claims;

use crate::auth::{AppState, AppStateInner};
use crate::error::ApiError;

/// The authenticated principal of a request, resolved from a live session.
/// Services take it explicitly instead of reading request state.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
    pub session_id: Uuid,
}

impl CurrentUser {
    pub fn owns(&self, owner_id: Uuid) -> bool {
        self.id == owner_id
    }
}

pub fn issue_token(
    secret: &str,
    user_id: Uuid,
    session_id: Uuid,
    username: &str,
    expires_at: DateTime<Utc>,
) -> Result<String, ApiError> {
    let claims = Claims {
        curr_user: user_id,
        sid: session_id,
        username: username.to_string(),
        exp: expires_at.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        error!("Failed to sign session token: {}", e);
        ApiError::Internal("token signing failed".into())
    })
}

pub fn decode_token(secret: &str, token: &str) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .ok()
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
}

fn current_user_from_token(state: &AppStateInner, token: &str) -> Option<CurrentUser> {
    let claims = decode_token(&state.jwt_secret, token)?;

    match state
        .db
        .session_is_live(&claims.sid.to_string(), &claims.curr_user.to_string())
    {
        Ok(true) => Some(CurrentUser {
            id: claims.curr_user,
            username: claims.username,
            session_id: claims.sid,
        }),
        Ok(false) => {
            debug!("Session {} is gone or expired", claims.sid);
            None
        }
        Err(e) => {
            error!("Session lookup failed: {}", e);
            None
        }
    }
}

/// Resolve the current user from the bearer session token, if any.
/// A missing or stale token leaves the request anonymous.
pub async fn resolve_session(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let current = bearer_token(&req).and_then(|token| current_user_from_token(&state, token));
    if let Some(user) = current {
        req.extensions_mut().insert(user);
    }
    next.run(req).await
}

/// Refuse the request unless `resolve_session` found a current user.
pub async fn require_auth(req: Request, next: Next) -> Result<Response, ApiError> {
    if req.extensions().get::<CurrentUser>().is_none() {
        warn!("Access unauthorized: {} {}", req.method(), req.uri().path());
        return Err(ApiError::Unauthorized);
    }
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_roundtrip_keeps_current_user_marker() {
        let user_id = Uuid::new_v4();
        let sid = Uuid::new_v4();
        let expires = Utc::now() + chrono::Duration::days(1);

        let token = issue_token("secret", user_id, sid, "testuser", expires).unwrap();
        let claims = decode_token("secret", &token).unwrap();

        assert_eq!(claims.curr_user, user_id);
        assert_eq!(claims.sid, sid);
        assert_eq!(claims.username, "testuser");
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let expires = Utc::now() + chrono::Duration::days(1);
        let token = issue_token("secret", Uuid::new_v4(), Uuid::new_v4(), "u", expires).unwrap();
        assert!(decode_token("other", &token).is_none());
    }
}
