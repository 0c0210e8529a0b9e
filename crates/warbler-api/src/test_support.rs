use std::sync::Arc;

use axum::{
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use warbler_db::Database;
use warbler_types::api::SignupRequest;
use warbler_types::models::User;

use crate::auth::{self, AppState, AppStateInner, open_session};
use crate::middleware::CurrentUser;
use crate::password::{PasswordHasher, TEST_COST};
use crate::router;

pub(crate) struct TestApp {
    state: AppState,
}

pub(crate) struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers.get(header::LOCATION).and_then(|v| v.to_str().ok())
    }

    /// The body as text, for substring checks.
    pub fn text(&self) -> String {
        self.body.to_string()
    }
}

impl TestApp {
    pub fn new() -> Self {
        let state = Arc::new(AppStateInner {
            db: Database::open_in_memory().unwrap(),
            jwt_secret: "test-secret".into(),
            session_ttl: chrono::Duration::days(1),
            hasher: PasswordHasher::new(TEST_COST),
        });
        Self { state }
    }

    pub fn state(&self) -> &AppStateInner {
        &self.state
    }

    /// Signs up `username` with password equal to the username.
    pub fn seed_user(&self, username: &str) -> User {
        let email = format!("{username}@test.com");
        auth::signup(
            &self.state.db,
            &self.state.hasher,
            &signup_request(username, &email, username),
        )
        .unwrap()
    }

    pub fn login(&self, user: &User) -> String {
        open_session(&self.state, user).unwrap()
    }

    /// A context value for calling services directly.
    pub fn current(&self, user: &User) -> CurrentUser {
        CurrentUser {
            id: user.id,
            username: user.username.clone(),
            session_id: Uuid::new_v4(),
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        json: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = match json {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let resp = router(self.state.clone()).oneshot(req).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, json: Option<Value>) -> TestResponse {
        self.request(Method::POST, uri, token, json).await
    }
}

pub(crate) fn signup_request(username: &str, email: &str, password: &str) -> SignupRequest {
    SignupRequest {
        username: Some(username.into()),
        email: Some(email.into()),
        password: Some(password.into()),
        image_url: None,
    }
}
