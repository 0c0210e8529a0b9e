use rusqlite::Connection;
use tracing::info;

use crate::Result;

pub const DEFAULT_IMAGE_URL: &str = "/static/images/default-pic.png";
pub const DEFAULT_HEADER_IMAGE_URL: &str = "/static/images/warbler-hero.jpg";

/// Longest message text, in characters.
pub const MESSAGE_MAX_CHARS: usize = 140;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (users, messages, follows, likes, sessions)");
        conn.execute_batch(
            "
            CREATE TABLE users (
                id                  TEXT PRIMARY KEY,
                username            TEXT NOT NULL UNIQUE CHECK (length(username) > 0),
                email               TEXT NOT NULL UNIQUE CHECK (length(email) > 0),
                password            TEXT NOT NULL,
                image_url           TEXT NOT NULL DEFAULT '/static/images/default-pic.png',
                header_image_url    TEXT NOT NULL DEFAULT '/static/images/warbler-hero.jpg',
                bio                 TEXT,
                location            TEXT,
                created_at          TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );

            CREATE TABLE messages (
                id          TEXT PRIMARY KEY,
                text        TEXT NOT NULL CHECK (length(text) BETWEEN 1 AND 140),
                created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
                user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE
            );

            CREATE INDEX idx_messages_user
                ON messages(user_id, created_at);

            CREATE TABLE follows (
                user_being_followed_id  TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                user_following_id       TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                PRIMARY KEY (user_being_followed_id, user_following_id),
                CHECK (user_being_followed_id <> user_following_id)
            );

            CREATE INDEX idx_follows_following
                ON follows(user_following_id);

            CREATE TABLE likes (
                user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                message_id  TEXT NOT NULL REFERENCES messages(id) ON DELETE CASCADE,
                PRIMARY KEY (user_id, message_id)
            );

            CREATE INDEX idx_likes_message
                ON likes(message_id);

            CREATE TABLE sessions (
                id          TEXT PRIMARY KEY,
                user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                created_at  TEXT NOT NULL,
                expires_at  TEXT NOT NULL
            );

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
