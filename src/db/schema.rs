/// Version 1 schema: the key-value table backing the prompt library.
///
/// Uses CREATE TABLE IF NOT EXISTS so databases created before migrations
/// were tracked upgrade cleanly.
pub const INITIAL_SCHEMA: &str = r#"
-- Key-value table: one JSON document per key
CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL
);
"#;
