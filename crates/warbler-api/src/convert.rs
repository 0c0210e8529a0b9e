use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use warbler_db::models::{MessageRow, UserRow};
use warbler_types::models::{Message, User, UserSummary};

pub(crate) fn parse_id(raw: &str, what: &str) -> Uuid {
    raw.parse().unwrap_or_else(|e| {
        warn!("Corrupt {} '{}': {}", what, raw, e);
        Uuid::default()
    })
}

pub(crate) fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // SQLite's datetime() has no timezone: "YYYY-MM-DD HH:MM:SS"
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}': {}", raw, e);
            DateTime::default()
        })
}

pub(crate) fn user(row: UserRow) -> User {
    User {
        id: parse_id(&row.id, "user id"),
        username: row.username,
        email: row.email,
        image_url: row.image_url,
        header_image_url: row.header_image_url,
        bio: row.bio,
        location: row.location,
        created_at: parse_timestamp(&row.created_at),
    }
}

pub(crate) fn summary(row: UserRow) -> UserSummary {
    UserSummary {
        id: parse_id(&row.id, "user id"),
        username: row.username,
        image_url: row.image_url,
        bio: row.bio,
    }
}

pub(crate) fn message(row: MessageRow) -> Message {
    Message {
        id: parse_id(&row.id, "message id"),
        text: row.text,
        created_at: parse_timestamp(&row.created_at),
        user_id: parse_id(&row.user_id, "message user_id"),
        author_username: row.author_username,
        author_image_url: row.author_image_url,
    }
}
