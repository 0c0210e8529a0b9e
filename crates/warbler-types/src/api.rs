use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Message, User, UserSummary};

// -- Session claims --

/// Claims of a session token. `curr_user` is the current-user marker; `sid`
/// names the session row that must still exist for the token to be honoured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub curr_user: Uuid,
    pub sid: Uuid,
    pub username: String,
    pub exp: usize,
}

// -- Auth --

/// Missing and `null` fields both deserialize as `None` so that validation,
/// not the JSON extractor, reports them.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignupRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user_id: Uuid,
    pub username: String,
    pub token: String,
}

// -- Messages --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewMessageRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageDeleted {
    pub id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleLikeResponse {
    pub message_id: Uuid,
    pub liked: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TimelineResponse {
    pub user: Option<UserSummary>,
    pub messages: Vec<Message>,
}

// -- Users --

#[derive(Debug, Default, Deserialize)]
pub struct UserSearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserDetailResponse {
    pub id: Uuid,
    pub username: String,
    pub image_url: String,
    pub header_image_url: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub messages: Vec<Message>,
    pub following_count: u64,
    pub followers_count: u64,
    pub likes_count: u64,
}

/// Followers or followees of `user`.
#[derive(Debug, Serialize, Deserialize)]
pub struct GraphResponse {
    pub user: UserSummary,
    pub users: Vec<UserSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LikesResponse {
    pub user: UserSummary,
    pub messages: Vec<Message>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: User,
    pub has_password: bool,
}

/// Profile edit. `password` re-authenticates the current user; omitted
/// fields are left unchanged.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileUpdateRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub image_url: Option<String>,
    pub header_image_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub password: String,
}

// -- Plain notices --

#[derive(Debug, Serialize, Deserialize)]
pub struct Notice {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}
