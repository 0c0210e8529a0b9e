use rusqlite::{Connection, OptionalExtension, params};
use tracing::info;

use super::{USER_COLUMNS, now_timestamp, user_from_row};
use crate::migrations::DEFAULT_IMAGE_URL;
use crate::models::{NewUser, UserChanges, UserCounts, UserRow};
use crate::{Database, Result};

impl Database {
    /// Fails with `DbError::UniqueViolation` when the username or email is taken.
    pub fn create_user(&self, user: &NewUser<'_>) -> Result<()> {
        let image_url = user
            .image_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(DEFAULT_IMAGE_URL);

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, email, password, image_url, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    user.id,
                    user.username,
                    user.email,
                    user.password_hash,
                    image_url,
                    now_timestamp()
                ],
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "u.id = ?1", id))
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "u.username = ?1", username))
    }

    pub fn user_exists(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let found: Option<i64> = conn
                .query_row("SELECT 1 FROM users WHERE id = ?1", [id], |r| r.get(0))
                .optional()?;
            Ok(found.is_some())
        })
    }

    /// All users ordered by username. `search` keeps usernames containing it.
    pub fn list_users(&self, search: Option<&str>) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| {
            // instr() instead of LIKE so '%' and '_' in the query match literally
            let sql = format!(
                "SELECT {USER_COLUMNS} FROM users u
                 WHERE ?1 IS NULL OR instr(u.username, ?1) > 0
                 ORDER BY u.username"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([search], user_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Applies the provided columns. Returns false if the user does not exist.
    pub fn update_user(&self, id: &str, changes: &UserChanges) -> Result<bool> {
        self.with_conn(|conn| {
            let updated = conn.execute(
                "UPDATE users SET
                    username = COALESCE(?2, username),
                    email = COALESCE(?3, email),
                    image_url = COALESCE(?4, image_url),
                    header_image_url = COALESCE(?5, header_image_url),
                    bio = COALESCE(?6, bio),
                    location = COALESCE(?7, location)
                 WHERE id = ?1",
                params![
                    id,
                    changes.username,
                    changes.email,
                    changes.image_url,
                    changes.header_image_url,
                    changes.bio,
                    changes.location
                ],
            )?;
            Ok(updated > 0)
        })
    }

    /// Removes the user and every row that references it in one transaction.
    /// Returns false if the user did not exist.
    pub fn delete_user(&self, id: &str) -> Result<bool> {
        let deleted = self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "DELETE FROM likes
                 WHERE user_id = ?1
                    OR message_id IN (SELECT id FROM messages WHERE user_id = ?1)",
                [id],
            )?;
            tx.execute(
                "DELETE FROM follows WHERE user_being_followed_id = ?1 OR user_following_id = ?1",
                [id],
            )?;
            tx.execute("DELETE FROM messages WHERE user_id = ?1", [id])?;
            tx.execute("DELETE FROM sessions WHERE user_id = ?1", [id])?;
            let removed = tx.execute("DELETE FROM users WHERE id = ?1", [id])?;
            tx.commit()?;
            Ok(removed > 0)
        })?;

        if deleted {
            info!("User {} deleted with dependent rows", id);
        }
        Ok(deleted)
    }

    pub fn user_counts(&self, id: &str) -> Result<UserCounts> {
        self.with_conn(|conn| {
            let count = |sql: &str| -> Result<u64> {
                let n: i64 = conn.query_row(sql, [id], |r| r.get(0))?;
                Ok(u64::try_from(n).unwrap_or_default())
            };
            Ok(UserCounts {
                following: count("SELECT COUNT(*) FROM follows WHERE user_following_id = ?1")?,
                followers: count("SELECT COUNT(*) FROM follows WHERE user_being_followed_id = ?1")?,
                likes: count("SELECT COUNT(*) FROM likes WHERE user_id = ?1")?,
            })
        })
    }
}

fn query_user(conn: &Connection, predicate: &str, value: &str) -> Result<Option<UserRow>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users u WHERE {predicate}");
    let mut stmt = conn.prepare(&sql)?;
    let row = stmt.query_row([value], user_from_row).optional()?;
    Ok(row)
}
