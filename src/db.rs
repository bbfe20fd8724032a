mod migration;
mod schema;

use std::path::Path;

use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};
use time::OffsetDateTime;
use tracing::debug;

use crate::PromptError;
use crate::store::KeyValueStore;
use migration::apply_pending_migrations;

/// SQLite-backed key-value store.
///
/// Each key holds one JSON document, mirroring browser extension local
/// storage. The prompt library and search history live under separate keys.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens an in-memory SQLite database.
    ///
    /// Applies pending migrations on connection open.
    pub fn in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        apply_pending_migrations(&mut conn)?;
        Ok(Self { conn })
    }

    /// Opens a file-based SQLite database at the given path.
    ///
    /// Creates the database file if it does not exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening database");
        let mut conn = Connection::open(path)?;
        apply_pending_migrations(&mut conn)?;
        Ok(Self { conn })
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>, PromptError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PromptError> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE
             SET value = excluded.value, updated_at = excluded.updated_at",
            rusqlite::params![key, value, now],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PromptError> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(())
    }
}
