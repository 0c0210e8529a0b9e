use rusqlite::{OptionalExtension, params};

use super::{USER_COLUMNS, user_from_row};
use crate::models::UserRow;
use crate::{Database, Result};

impl Database {
    /// Inserts the edge `follower -> followee`. A repeated edge is a
    /// `DbError::UniqueViolation`; a self-edge fails the CHECK constraint.
    pub fn add_follow(&self, follower_id: &str, followee_id: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO follows (user_being_followed_id, user_following_id) VALUES (?1, ?2)",
                params![followee_id, follower_id],
            )?;
            Ok(())
        })
    }

    /// Returns false if there was no such edge.
    pub fn remove_follow(&self, follower_id: &str, followee_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let removed = conn.execute(
                "DELETE FROM follows WHERE user_being_followed_id = ?1 AND user_following_id = ?2",
                params![followee_id, follower_id],
            )?;
            Ok(removed > 0)
        })
    }

    pub fn is_following(&self, follower_id: &str, followee_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let found: Option<i64> = conn
                .query_row(
                    "SELECT 1 FROM follows WHERE user_being_followed_id = ?1 AND user_following_id = ?2",
                    params![followee_id, follower_id],
                    |r| r.get(0),
                )
                .optional()?;
            Ok(found.is_some())
        })
    }

    /// Users that `user_id` follows, ordered by username.
    pub fn following(&self, user_id: &str) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {USER_COLUMNS} FROM follows f
                 JOIN users u ON u.id = f.user_being_followed_id
                 WHERE f.user_following_id = ?1
                 ORDER BY u.username"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([user_id], user_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Users following `user_id`, ordered by username.
    pub fn followers(&self, user_id: &str) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {USER_COLUMNS} FROM follows f
                 JOIN users u ON u.id = f.user_following_id
                 WHERE f.user_being_followed_id = ?1
                 ORDER BY u.username"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([user_id], user_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}
