use rusqlite::{OptionalExtension, params};

use super::now_timestamp;
use crate::models::SessionRow;
use crate::{Database, Result};

impl Database {
    pub fn create_session(&self, id: &str, user_id: &str, expires_at: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO sessions (id, user_id, created_at, expires_at) VALUES (?1, ?2, ?3, ?4)",
                params![id, user_id, now_timestamp(), expires_at],
            )?;
            Ok(())
        })
    }

    pub fn get_session(&self, id: &str) -> Result<Option<SessionRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, user_id, created_at, expires_at FROM sessions WHERE id = ?1",
                    [id],
                    |row| {
                        Ok(SessionRow {
                            id: row.get(0)?,
                            user_id: row.get(1)?,
                            created_at: row.get(2)?,
                            expires_at: row.get(3)?,
                        })
                    },
                )
                .optional()?;
            Ok(row)
        })
    }

    /// True when session `id` belongs to `user_id` and has not expired.
    pub fn session_is_live(&self, id: &str, user_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let found: Option<i64> = conn
                .query_row(
                    "SELECT 1 FROM sessions WHERE id = ?1 AND user_id = ?2 AND expires_at > ?3",
                    params![id, user_id, now_timestamp()],
                    |r| r.get(0),
                )
                .optional()?;
            Ok(found.is_some())
        })
    }

    pub fn delete_session(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM sessions WHERE id = ?1", [id])?;
            Ok(removed > 0)
        })
    }

    /// Returns the number of sessions removed.
    pub fn purge_expired_sessions(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let removed = conn.execute(
                "DELETE FROM sessions WHERE expires_at <= ?1",
                [now_timestamp()],
            )?;
            Ok(removed)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::seed_user;
    use crate::Database;

    #[test]
    fn session_lifecycle() {
        let db = Database::open_in_memory().unwrap();
        let uid = seed_user(&db, "testuser");

        db.create_session("live", &uid, "2999-01-01T00:00:00.000000Z").unwrap();
        assert!(db.session_is_live("live", &uid).unwrap());
        assert!(!db.session_is_live("live", "someone-else").unwrap());

        assert!(db.delete_session("live").unwrap());
        assert!(!db.session_is_live("live", &uid).unwrap());
    }

    #[test]
    fn expired_sessions_are_not_live() {
        let db = Database::open_in_memory().unwrap();
        let uid = seed_user(&db, "testuser");

        db.create_session("old", &uid, "2000-01-01T00:00:00.000000Z").unwrap();
        assert!(!db.session_is_live("old", &uid).unwrap());
        assert_eq!(db.purge_expired_sessions().unwrap(), 1);
        assert!(db.get_session("old").unwrap().is_none());
    }
}
