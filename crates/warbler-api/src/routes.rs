use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::{self, AppState};
use crate::middleware::{require_auth, resolve_session};
use crate::{follows, likes, messages, users};

/// The full HTTP surface. Routes under `protected_routes` refuse requests
/// without a live session.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/signup", post(auth::register))
        .route("/login", post(auth::login))
        .route("/", get(messages::home))
        .route("/users", get(users::list))
        .route("/users/{user_id}", get(users::show_user));

    let protected_routes = Router::new()
        .route("/logout", post(auth::logout))
        .route("/messages/new", post(messages::new_message))
        .route("/messages/{message_id}", get(messages::show_message))
        .route("/messages/{message_id}/delete", post(messages::delete_message))
        .route("/messages/{message_id}/like", post(likes::like_message))
        .route("/users/profile", get(users::show_profile).post(users::edit_profile))
        .route("/users/delete", post(users::delete_user))
        .route("/users/{user_id}/following", get(follows::show_following))
        .route("/users/{user_id}/followers", get(follows::show_followers))
        .route("/users/{user_id}/likes", get(likes::show_likes))
        .route("/users/follow/{user_id}", post(follows::add_follow))
        .route("/users/stop-following/{user_id}", post(follows::stop_following))
        .layer(middleware::from_fn(require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn_with_state(state.clone(), resolve_session))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::test_support::TestApp;

    #[tokio::test]
    async fn health_is_public() {
        let app = TestApp::new();
        let resp = app.get("/health", None).await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body, "ok");
    }

    #[tokio::test]
    async fn signup_login_logout_flow() {
        let app = TestApp::new();

        let created = app
            .post(
                "/signup",
                None,
                Some(json!({
                    "username": "testuser",
                    "email": "test@test.com",
                    "password": "testuser",
                    "image_url": null
                })),
            )
            .await;
        assert_eq!(created.status, StatusCode::CREATED);
        assert_eq!(created.body["username"], "testuser");

        let stored = app.state().db.get_user_by_username("testuser").unwrap().unwrap();
        assert!(stored.password.starts_with("$2b$"));

        let bad = app
            .post(
                "/login",
                None,
                Some(json!({ "username": "testuser", "password": "nope" })),
            )
            .await;
        assert_eq!(bad.status, StatusCode::UNAUTHORIZED);
        assert_eq!(bad.body["error"], "Invalid credentials.");

        let logged_in = app
            .post(
                "/login",
                None,
                Some(json!({ "username": "testuser", "password": "testuser" })),
            )
            .await;
        assert_eq!(logged_in.status, StatusCode::OK);
        assert_eq!(logged_in.body["user_id"], created.body["user_id"]);
        let token = logged_in.body["token"].as_str().unwrap().to_string();

        let profile = app.get("/users/profile", Some(&token)).await;
        assert_eq!(profile.status, StatusCode::OK);

        let out = app.post("/logout", Some(&token), None).await;
        assert_eq!(out.status, StatusCode::SEE_OTHER);
        assert_eq!(out.location(), Some("/login"));

        let after = app.get("/users/profile", Some(&token)).await;
        assert_eq!(after.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn signup_without_password_is_bad_request() {
        let app = TestApp::new();
        let resp = app
            .post(
                "/signup",
                None,
                Some(json!({ "username": "testuser", "email": "test@test.com" })),
            )
            .await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);
        assert!(app.state().db.get_user_by_username("testuser").unwrap().is_none());
    }

    #[tokio::test]
    async fn signup_with_null_fields_is_bad_request() {
        let app = TestApp::new();
        let resp = app
            .post(
                "/signup",
                None,
                Some(json!({
                    "username": "testuser",
                    "email": "test@test.com",
                    "password": null,
                    "image_url": null
                })),
            )
            .await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);
        assert_eq!(resp.body["error"], "Password is required.");
        assert!(app.state().db.get_user_by_username("testuser").unwrap().is_none());

        let resp = app
            .post(
                "/signup",
                None,
                Some(json!({ "username": null, "email": null, "password": "pw" })),
            )
            .await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_ids_are_not_found() {
        let app = TestApp::new();
        let user = app.seed_user("testuser");
        let token = app.login(&user);

        let message = app.get("/messages/11111111", Some(&token)).await;
        assert_eq!(message.status, StatusCode::NOT_FOUND);

        let profile = app.get("/users/11111111", None).await;
        assert_eq!(profile.status, StatusCode::NOT_FOUND);

        for uri in [
            "/messages/11111111/delete",
            "/messages/11111111/like",
            "/users/follow/11111111",
            "/users/stop-following/11111111",
        ] {
            let resp = app.post(uri, Some(&token), None).await;
            assert_eq!(resp.status, StatusCode::NOT_FOUND, "{uri}");
        }
        for uri in ["/users/11111111/following", "/users/11111111/followers", "/users/11111111/likes"] {
            let resp = app.get(uri, Some(&token)).await;
            assert_eq!(resp.status, StatusCode::NOT_FOUND, "{uri}");
        }
    }

    #[tokio::test]
    async fn duplicate_signup_conflicts() {
        let app = TestApp::new();
        app.seed_user("testuser");

        let resp = app
            .post(
                "/signup",
                None,
                Some(json!({
                    "username": "testuser",
                    "email": "fresh@test.com",
                    "password": "pass"
                })),
            )
            .await;
        assert_eq!(resp.status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn garbage_token_is_anonymous() {
        let app = TestApp::new();
        let resp = app.get("/users/profile", Some("not-a-jwt")).await;
        assert_eq!(resp.status, StatusCode::UNAUTHORIZED);

        let home = app.get("/", Some("not-a-jwt")).await;
        assert_eq!(home.status, StatusCode::OK);
    }
}
