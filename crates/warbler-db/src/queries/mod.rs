mod follows;
mod likes;
mod messages;
mod sessions;
mod users;

use chrono::{SecondsFormat, Utc};
use rusqlite::Row;

use crate::models::{MessageRow, UserRow};

const USER_COLUMNS: &str =
    "u.id, u.username, u.email, u.password, u.image_url, u.header_image_url, u.bio, u.location, u.created_at";

// JOIN users to fetch the author fields in the same query
const MESSAGE_SELECT: &str = "SELECT m.id, m.text, m.created_at, m.user_id, u.username, u.image_url
     FROM messages m
     JOIN users u ON m.user_id = u.id";

/// Timestamps are stored as RFC 3339 with microseconds so that string order
/// matches time order.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
        image_url: row.get(4)?,
        header_image_url: row.get(5)?,
        bio: row.get(6)?,
        location: row.get(7)?,
        created_at: row.get(8)?,
    })
}

fn message_from_row(row: &Row<'_>) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        id: row.get(0)?,
        text: row.get(1)?,
        created_at: row.get(2)?,
        user_id: row.get(3)?,
        author_username: row.get(4)?,
        author_image_url: row.get(5)?,
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use uuid::Uuid;

    use crate::Database;
    use crate::models::NewUser;

    /// Inserts a user with a placeholder hash and returns its id.
    pub fn seed_user(db: &Database, username: &str) -> String {
        let id = Uuid::new_v4().to_string();
        let email = format!("{username}@test.com");
        db.create_user(&NewUser {
            id: &id,
            username,
            email: &email,
            password_hash: "HASHED_PASSWORD",
            image_url: None,
        })
        .unwrap();
        id
    }

    pub fn seed_message(db: &Database, user_id: &str, text: &str) -> String {
        let id = Uuid::new_v4().to_string();
        db.insert_message(&id, user_id, text).unwrap();
        id
    }
}
