use rusqlite::Connection;

use crate::error::Result;

/// Create the vendor catalog tables. The vendor export ships these already
/// populated; this is used to build fixture databases.
pub fn initialize(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS categories (
            category_id   INTEGER PRIMARY KEY,
            name          TEXT,
            icon_filename TEXT
        );

        CREATE TABLE IF NOT EXISTS groups (
            group_id      INTEGER PRIMARY KEY,
            name          TEXT,
            categoryID    INTEGER,
            icon_filename TEXT
        );

        CREATE TABLE IF NOT EXISTS types (
            type_id       INTEGER PRIMARY KEY,
            en_name       TEXT,
            zh_name       TEXT,
            categoryID    INTEGER,
            groupID       INTEGER,
            icon_filename TEXT,
            published     INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_types_category ON types(categoryID);
        ",
    )?;
    Ok(())
}
