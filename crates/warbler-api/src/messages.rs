use axum::{
    Extension, Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use tracing::{info, warn};
use uuid::Uuid;

use warbler_db::migrations::MESSAGE_MAX_CHARS;
use warbler_db::{Database, PAGE_LIMIT};
use warbler_types::api::{MessageDeleted, NewMessageRequest, TimelineResponse};
use warbler_types::models::Message;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::{blocking, convert, parse_path_id, see_other};

/// Post `text` as the current user.
pub fn create(db: &Database, current: &CurrentUser, text: &str) -> Result<Message, ApiError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ApiError::Validation("Message text is required.".into()));
    }
    if text.chars().count() > MESSAGE_MAX_CHARS {
        return Err(ApiError::Validation(format!(
            "Messages are limited to {MESSAGE_MAX_CHARS} characters."
        )));
    }

    let message_id = Uuid::new_v4().to_string();
    db.insert_message(&message_id, &current.id.to_string(), text)?;
    get(db, &message_id)
}

pub fn get(db: &Database, message_id: &str) -> Result<Message, ApiError> {
    db.get_message(message_id)?
        .map(convert::message)
        .ok_or(ApiError::NotFound)
}

/// Only the author may delete a message.
pub fn delete(db: &Database, current: &CurrentUser, message_id: Uuid) -> Result<(), ApiError> {
    let message = get(db, &message_id.to_string())?;
    if !current.owns(message.user_id) {
        warn!(
            "User {} tried to delete message {} owned by {}",
            current.id, message_id, message.user_id
        );
        return Err(ApiError::Unauthorized);
    }

    db.delete_message(&message_id.to_string())?;
    Ok(())
}

/// Latest messages by the current user and everyone they follow.
/// Anonymous callers get an empty timeline.
pub fn timeline(db: &Database, current: Option<&CurrentUser>) -> Result<TimelineResponse, ApiError> {
    let Some(current) = current else {
        return Ok(TimelineResponse {
            user: None,
            messages: vec![],
        });
    };

    let user_id = current.id.to_string();
    let user = db
        .get_user_by_id(&user_id)?
        .map(convert::summary)
        .ok_or(ApiError::NotFound)?;
    let messages = db
        .timeline(&user_id, PAGE_LIMIT)?
        .into_iter()
        .map(convert::message)
        .collect();

    Ok(TimelineResponse {
        user: Some(user),
        messages,
    })
}

pub async fn home(
    State(state): State<AppState>,
    current: Option<Extension<CurrentUser>>,
) -> Result<Json<TimelineResponse>, ApiError> {
    let current = current.map(|Extension(user)| user);
    let response = blocking(&state, move |s| timeline(&s.db, current.as_ref())).await?;
    Ok(Json(response))
}

pub async fn new_message(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<NewMessageRequest>,
) -> Result<Response, ApiError> {
    let author = current.clone();
    let message = blocking(&state, move |s| create(&s.db, &author, &req.text)).await?;

    info!("User {} posted message {}", current.username, message.id);
    Ok(see_other(format!("/users/{}", current.id), message))
}

pub async fn show_message(
    State(state): State<AppState>,
    Path(message_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let message_id = parse_path_id(&message_id)?;
    let message = blocking(&state, move |s| get(&s.db, &message_id.to_string())).await?;
    Ok(Json(message))
}

pub async fn delete_message(
    State(state): State<AppState>,
    Path(message_id): Path<String>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Response, ApiError> {
    let message_id = parse_path_id(&message_id)?;
    let requester = current.clone();
    blocking(&state, move |s| delete(&s.db, &requester, message_id)).await?;

    info!("User {} deleted message {}", current.username, message_id);
    Ok(see_other(
        format!("/users/{}", current.id),
        MessageDeleted { id: message_id },
    ))
}
