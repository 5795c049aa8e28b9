use crate::Database;
use crate::models::{MessageRow, UserRow};
use anyhow::Result;
use rusqlite::{Connection, ErrorCode, OptionalExtension};

impl Database {
    // -- Users --

    /// Insert a new user. Returns `false` when the username is already taken.
    pub fn create_user(&self, username: &str, full_name: &str, password_hash: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT INTO users (username, full_name, password) VALUES (?1, ?2, ?3)",
                (username, full_name, password_hash),
            );
            match inserted {
                Ok(_) => Ok(true),
                Err(e) if e.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) => Ok(false),
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn get_user(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, username))
    }

    /// `None` leaves the column as it is. Returns the number of rows touched,
    /// which is zero for an unknown username.
    pub fn update_profile(
        &self,
        username: &str,
        full_name: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<usize> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE users
                 SET full_name = COALESCE(?1, full_name),
                     password  = COALESCE(?2, password)
                 WHERE username = ?3",
                rusqlite::params![full_name, password_hash, username],
            )?;
            Ok(changed)
        })
    }

    // -- Messages --

    pub fn insert_message(&self, target_username: &str, content: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (target_username, content) VALUES (?1, ?2)",
                (target_username, content),
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Newest first. Rows written in the same second fall back to id order.
    pub fn get_messages(&self, target_username: &str) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| query_messages(conn, target_username))
    }

    /// Returns the number of rows removed; an unknown id removes nothing.
    pub fn delete_message(&self, id: i64) -> Result<usize> {
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM messages WHERE id = ?1", [id])?;
            Ok(removed)
        })
    }
}

fn query_user(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT username, full_name, password, created_at FROM users WHERE username = ?1",
    )?;

    let row = stmt
        .query_row([username], |row| {
            Ok(UserRow {
                username: row.get(0)?,
                full_name: row.get(1)?,
                password: row.get(2)?,
                created_at: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_messages(conn: &Connection, target_username: &str) -> Result<Vec<MessageRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, target_username, content, created_at, is_read
         FROM messages
         WHERE target_username = ?1
         ORDER BY created_at DESC, id DESC",
    )?;

    let rows = stmt
        .query_map([target_username], |row| {
            Ok(MessageRow {
                id: row.get(0)?,
                target_username: row.get(1)?,
                content: row.get(2)?,
                created_at: row.get(3)?,
                is_read: row.get(4)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn duplicate_username_is_reported_not_raised() {
        let db = db();
        assert!(db.create_user("nil", "Nil Noman", "h1").unwrap());
        assert!(!db.create_user("nil", "Someone Else", "h2").unwrap());

        let user = db.get_user("nil").unwrap().unwrap();
        assert_eq!(user.full_name, "Nil Noman");
        assert_eq!(user.password, "h1");
    }

    #[test]
    fn unknown_user_is_none() {
        assert!(db().get_user("ghost").unwrap().is_none());
    }

    #[test]
    fn created_at_is_filled_by_store() {
        let db = db();
        db.create_user("nil", "Nil Noman", "h").unwrap();
        let user = db.get_user("nil").unwrap().unwrap();
        // datetime('now') => "YYYY-MM-DD HH:MM:SS"
        assert_eq!(user.created_at.len(), 19);
    }

    #[test]
    fn messages_are_newest_first_and_scoped_to_target() {
        let db = db();
        let first = db.insert_message("nil", "one").unwrap();
        let second = db.insert_message("nil", "two").unwrap();
        db.insert_message("other", "not yours").unwrap();
        let third = db.insert_message("nil", "three").unwrap();

        let rows = db.get_messages("nil").unwrap();
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![third, second, first]);
        assert!(rows.iter().all(|r| r.target_username == "nil"));
        assert!(rows.iter().all(|r| !r.is_read));

        for pair in rows.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
    }

    #[test]
    fn first_message_gets_id_one() {
        assert_eq!(db().insert_message("nil", "hello").unwrap(), 1);
    }

    #[test]
    fn messages_for_unknown_target_are_empty() {
        assert!(db().get_messages("nobody").unwrap().is_empty());
    }

    #[test]
    fn delete_removes_only_that_message() {
        let db = db();
        let keep = db.insert_message("nil", "keep").unwrap();
        let gone = db.insert_message("nil", "gone").unwrap();

        assert_eq!(db.delete_message(gone).unwrap(), 1);
        assert_eq!(db.delete_message(gone).unwrap(), 0);
        assert_eq!(db.delete_message(9999).unwrap(), 0);

        let ids: Vec<i64> = db.get_messages("nil").unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![keep]);
    }

    #[test]
    fn update_profile_none_keeps_columns() {
        let db = db();
        db.create_user("nil", "Nil Noman", "old").unwrap();

        assert_eq!(db.update_profile("nil", Some("Nil N."), None).unwrap(), 1);
        let user = db.get_user("nil").unwrap().unwrap();
        assert_eq!(user.full_name, "Nil N.");
        assert_eq!(user.password, "old");

        db.update_profile("nil", None, Some("new")).unwrap();
        let user = db.get_user("nil").unwrap().unwrap();
        assert_eq!(user.full_name, "Nil N.");
        assert_eq!(user.password, "new");
    }

    #[test]
    fn update_profile_unknown_user_touches_nothing() {
        assert_eq!(db().update_profile("ghost", Some("Boo"), Some("x")).unwrap(), 0);
    }
}
