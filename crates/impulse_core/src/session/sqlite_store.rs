//! SQLite-backed session storage.
//!
//! # Responsibility
//! - Keep session key/value blobs in `session_data`, outside process memory.
//!
//! # Invariants
//! - `start` inserts the `sessions` row at most once.
//! - `put` is a single upsert statement, so readers never see a torn value.

use super::{SessionId, SessionResult, SessionStore};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

/// Session store over the `sessions`/`session_data` tables.
pub struct SqliteSessionStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSessionStore<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SessionStore for SqliteSessionStore<'_> {
    fn start(&self, session: &SessionId) -> SessionResult<()> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO sessions (session_id) VALUES (?1);",
            [session.as_str()],
        )?;
        if inserted > 0 {
            debug!(
                "event=session_start module=session status=ok session_id={}",
                session
            );
        }
        Ok(())
    }

    fn get(&self, session: &SessionId, key: &str) -> SessionResult<Option<Vec<u8>>> {
        self.start(session)?;
        let value = self
            .conn
            .query_row(
                "SELECT value FROM session_data WHERE session_id = ?1 AND key = ?2;",
                params![session.as_str(), key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put(&self, session: &SessionId, key: &str, value: &[u8]) -> SessionResult<()> {
        self.start(session)?;
        self.conn.execute(
            "INSERT INTO session_data (session_id, key, value)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (session_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![session.as_str(), key, value],
        )?;
        Ok(())
    }
}
