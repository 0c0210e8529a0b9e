use rusqlite::{OptionalExtension, params};

use super::{MESSAGE_SELECT, message_from_row, now_timestamp};
use crate::models::MessageRow;
use crate::{Database, Result};

impl Database {
    pub fn insert_message(&self, id: &str, user_id: &str, text: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (id, text, created_at, user_id) VALUES (?1, ?2, ?3, ?4)",
                params![id, text, now_timestamp(), user_id],
            )?;
            Ok(())
        })
    }

    pub fn get_message(&self, id: &str) -> Result<Option<MessageRow>> {
        self.with_conn(|conn| {
            let sql = format!("{MESSAGE_SELECT} WHERE m.id = ?1");
            let row = conn.query_row(&sql, [id], message_from_row).optional()?;
            Ok(row)
        })
    }

    /// Newest first.
    pub fn messages_by_user(&self, user_id: &str, limit: u32) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "{MESSAGE_SELECT} WHERE m.user_id = ?1 ORDER BY m.created_at DESC, m.rowid DESC LIMIT ?2"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params![user_id, limit], message_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Messages written by `user_id` or by anyone `user_id` follows, newest first.
    pub fn timeline(&self, user_id: &str, limit: u32) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "{MESSAGE_SELECT}
                 WHERE m.user_id = ?1
                    OR m.user_id IN (
                        SELECT user_being_followed_id FROM follows WHERE user_following_id = ?1
                    )
                 ORDER BY m.created_at DESC, m.rowid DESC
                 LIMIT ?2"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params![user_id, limit], message_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Removes the message and its likes. Returns false if it did not exist.
    pub fn delete_message(&self, id: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM likes WHERE message_id = ?1", [id])?;
            let removed = tx.execute("DELETE FROM messages WHERE id = ?1", [id])?;
            tx.commit()?;
            Ok(removed > 0)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{seed_message, seed_user};
    use crate::{Database, DbError};

    #[test]
    fn message_belongs_to_user() {
        let db = Database::open_in_memory().unwrap();
        let uid = seed_user(&db, "testuser");
        let mid = seed_message(&db, &uid, "test text");

        let messages = db.messages_by_user(&uid, 100).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id, mid);
        assert_eq!(messages[0].text, "test text");
        assert_eq!(messages[0].author_username, "testuser");
    }

    #[test]
    fn message_requires_existing_owner() {
        let db = Database::open_in_memory().unwrap();
        let err = db.insert_message("m1", "no-such-user", "orphan").unwrap_err();
        assert!(matches!(err, DbError::Constraint(_)), "got {err:?}");
    }

    #[test]
    fn overlong_text_is_rejected_by_schema() {
        let db = Database::open_in_memory().unwrap();
        let uid = seed_user(&db, "testuser");
        let text = "x".repeat(141);
        assert!(db.insert_message("m1", &uid, &text).is_err());
    }

    #[test]
    fn timeline_includes_followed_users_only() {
        let db = Database::open_in_memory().unwrap();
        let me = seed_user(&db, "me");
        let friend = seed_user(&db, "friend");
        let stranger = seed_user(&db, "stranger");
        db.add_follow(&me, &friend).unwrap();

        seed_message(&db, &me, "first");
        seed_message(&db, &friend, "second");
        seed_message(&db, &stranger, "unseen");

        let texts: Vec<String> = db
            .timeline(&me, 100)
            .unwrap()
            .into_iter()
            .map(|m| m.text)
            .collect();
        assert_eq!(texts, vec!["second", "first"]);
    }

    #[test]
    fn delete_message_removes_its_likes() {
        let db = Database::open_in_memory().unwrap();
        let author = seed_user(&db, "author");
        let fan = seed_user(&db, "fan");
        let mid = seed_message(&db, &author, "likeable");
        db.add_like(&fan, &mid).unwrap();

        assert!(db.delete_message(&mid).unwrap());
        assert!(db.get_message(&mid).unwrap().is_none());
        assert!(db.liked_messages(&fan).unwrap().is_empty());
        assert!(!db.delete_message(&mid).unwrap());
    }
}
