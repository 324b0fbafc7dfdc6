//! Table definitions, applied idempotently when a store is opened.

use rusqlite::Connection;

use crate::error::StoreResult;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS organizations (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    link TEXT
);

CREATE TABLE IF NOT EXISTS opportunities (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    organization_id INTEGER NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    opportunity     TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_opportunities_org ON opportunities(organization_id);

CREATE TABLE IF NOT EXISTS images (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    url          TEXT NOT NULL,
    organization TEXT,
    date         TEXT
);
";

/// Enables foreign keys and creates any missing tables.
pub fn apply(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.execute_batch(SCHEMA)?;
    Ok(())
}
