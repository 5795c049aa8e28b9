use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (users, messages)");
        // target_username is deliberately not a foreign key: anyone may post
        // to any handle, registered or not.
        conn.execute_batch(
            "
            CREATE TABLE users (
                username    TEXT PRIMARY KEY,
                full_name   TEXT NOT NULL,
                password    TEXT NOT NULL,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE messages (
                id               INTEGER PRIMARY KEY AUTOINCREMENT,
                target_username  TEXT NOT NULL,
                content          TEXT NOT NULL,
                created_at       TEXT NOT NULL DEFAULT (datetime('now')),
                is_read          INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX idx_messages_target
                ON messages(target_username, created_at);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
