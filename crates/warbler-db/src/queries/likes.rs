use rusqlite::{OptionalExtension, params};

use super::{MESSAGE_SELECT, message_from_row};
use crate::models::MessageRow;
use crate::{Database, Result};

impl Database {
    pub fn add_like(&self, user_id: &str, message_id: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO likes (user_id, message_id) VALUES (?1, ?2)",
                params![user_id, message_id],
            )?;
            Ok(())
        })
    }

    /// Toggle a like: removes it if present, inserts it if not.
    /// Returns true when the message is liked afterwards.
    pub fn toggle_like(&self, user_id: &str, message_id: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let existing: Option<i64> = tx
                .query_row(
                    "SELECT 1 FROM likes WHERE user_id = ?1 AND message_id = ?2",
                    params![user_id, message_id],
                    |r| r.get(0),
                )
                .optional()?;

            let liked = if existing.is_some() {
                tx.execute(
                    "DELETE FROM likes WHERE user_id = ?1 AND message_id = ?2",
                    params![user_id, message_id],
                )?;
                false
            } else {
                tx.execute(
                    "INSERT INTO likes (user_id, message_id) VALUES (?1, ?2)",
                    params![user_id, message_id],
                )?;
                true
            };
            tx.commit()?;
            Ok(liked)
        })
    }

    /// Messages liked by `user_id`, newest first.
    pub fn liked_messages(&self, user_id: &str) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "{MESSAGE_SELECT}
                 JOIN likes l ON l.message_id = m.id
                 WHERE l.user_id = ?1
                 ORDER BY m.created_at DESC, m.rowid DESC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([user_id], message_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{seed_message, seed_user};
    use crate::{Database, DbError};

    #[test]
    fn toggle_flips_like_state() {
        let db = Database::open_in_memory().unwrap();
        let author = seed_user(&db, "author");
        let fan = seed_user(&db, "fan");
        let mid = seed_message(&db, &author, "hello");

        assert!(db.toggle_like(&fan, &mid).unwrap());
        assert_eq!(db.liked_messages(&fan).unwrap()[0].id, mid);

        assert!(!db.toggle_like(&fan, &mid).unwrap());
        assert!(db.liked_messages(&fan).unwrap().is_empty());
    }

    #[test]
    fn like_pair_is_unique() {
        let db = Database::open_in_memory().unwrap();
        let author = seed_user(&db, "author");
        let fan = seed_user(&db, "fan");
        let mid = seed_message(&db, &author, "hello");

        db.add_like(&fan, &mid).unwrap();
        let err = db.add_like(&fan, &mid).unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation(_)), "got {err:?}");
    }
}
