use anyhow::Result;
use rusqlite::Connection;
use time::OffsetDateTime;
use tracing::info;

use super::schema::INITIAL_SCHEMA;

/// One schema change, identified by a monotonically increasing version.
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: u32,
    pub description: &'static str,
    pub up: &'static str,
}

impl Migration {
    pub const fn new(version: u32, description: &'static str, up: &'static str) -> Self {
        Self {
            version,
            description,
            up,
        }
    }

    /// Checks whether this version is recorded in `schema_migrations`.
    pub fn is_applied(&self, conn: &Connection) -> Result<bool> {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM schema_migrations WHERE version = ?1)",
            [self.version],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Runs the migration and records it, in a single transaction.
    pub fn apply(&self, conn: &mut Connection) -> Result<()> {
        let tx = conn.transaction()?;
        tx.execute_batch(self.up)?;
        tx.execute(
            "INSERT INTO schema_migrations (version, applied_at, description) VALUES (?1, ?2, ?3)",
            rusqlite::params![
                self.version,
                OffsetDateTime::now_utc().unix_timestamp(),
                self.description
            ],
        )?;
        tx.commit()?;
        Ok(())
    }
}

/// Every migration, in version order. Entries are append-only.
pub const MIGRATIONS: &[Migration] = &[Migration::new(
    1,
    "Create kv table for prompt library and search history documents",
    INITIAL_SCHEMA,
)];

/// Applies every migration not yet recorded in `schema_migrations`.
pub fn apply_pending_migrations(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL,
            description TEXT
        );
        "#,
    )?;

    for migration in MIGRATIONS {
        if !migration.is_applied(conn)? {
            migration.apply(conn)?;
            info!(
                version = migration.version,
                description = migration.description,
                "applied migration"
            );
        }
    }

    Ok(())
}
