use rusqlite::Connection;

use crate::error::PrmResult;

/// Initialize the database schema. Creates all tables if they don't exist.
///
/// Family edge tables carry no uniqueness constraint: linking
/// the same pair twice stores two rows.
pub fn initialize(conn: &Connection) -> PrmResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS accounts (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            email TEXT NOT NULL DEFAULT ''
        );

        CREATE TABLE IF NOT EXISTS contacts (
            id TEXT PRIMARY KEY NOT NULL,
            account_id TEXT NOT NULL REFERENCES accounts(id),
            first_name TEXT NOT NULL,
            middle_name TEXT,
            last_name TEXT,
            nickname TEXT,
            gender TEXT,
            is_partial INTEGER NOT NULL DEFAULT 0,
            is_dead INTEGER NOT NULL DEFAULT 0,
            birthdate TEXT,
            birthdate_year_unknown INTEGER NOT NULL DEFAULT 0,
            birthdate_age_based INTEGER NOT NULL DEFAULT 0,
            street TEXT,
            city TEXT,
            province TEXT,
            postal_code TEXT,
            country TEXT,
            avatar_file TEXT,
            default_avatar_color TEXT NOT NULL,
            last_talked_to TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS contacts_account_idx ON contacts(account_id);

        CREATE TABLE IF NOT EXISTS relationships (
            id TEXT PRIMARY KEY NOT NULL,
            account_id TEXT NOT NULL REFERENCES accounts(id),
            contact_id TEXT NOT NULL REFERENCES contacts(id) ON DELETE CASCADE,
            with_contact_id TEXT NOT NULL REFERENCES contacts(id) ON DELETE CASCADE,
            is_active INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS offsprings (
            id TEXT PRIMARY KEY NOT NULL,
            account_id TEXT NOT NULL REFERENCES accounts(id),
            contact_id TEXT NOT NULL REFERENCES contacts(id) ON DELETE CASCADE,
            is_the_child_of TEXT NOT NULL REFERENCES contacts(id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS progenitors (
            id TEXT PRIMARY KEY NOT NULL,
            account_id TEXT NOT NULL REFERENCES accounts(id),
            contact_id TEXT NOT NULL REFERENCES contacts(id) ON DELETE CASCADE,
            is_the_parent_of TEXT NOT NULL REFERENCES contacts(id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS reminders (
            id TEXT PRIMARY KEY NOT NULL,
            account_id TEXT NOT NULL REFERENCES accounts(id),
            contact_id TEXT NOT NULL REFERENCES contacts(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            next_expected_date TEXT NOT NULL,
            frequency_type TEXT NOT NULL,
            frequency_number INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS notes (
            id TEXT PRIMARY KEY NOT NULL,
            contact_id TEXT NOT NULL REFERENCES contacts(id) ON DELETE CASCADE,
            body TEXT NOT NULL,
            is_favorited INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS tags (
            id TEXT PRIMARY KEY NOT NULL,
            account_id TEXT NOT NULL REFERENCES accounts(id),
            name TEXT NOT NULL,
            UNIQUE(account_id, name COLLATE NOCASE)
        );

        CREATE TABLE IF NOT EXISTS contact_tags (
            contact_id TEXT NOT NULL REFERENCES contacts(id) ON DELETE CASCADE,
            tag_id TEXT NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
            PRIMARY KEY (contact_id, tag_id)
        );

        CREATE TABLE IF NOT EXISTS calls (
            id TEXT PRIMARY KEY NOT NULL,
            contact_id TEXT NOT NULL REFERENCES contacts(id) ON DELETE CASCADE,
            called_at TEXT NOT NULL,
            content TEXT
        );

        CREATE TABLE IF NOT EXISTS debts (
            id TEXT PRIMARY KEY NOT NULL,
            contact_id TEXT NOT NULL REFERENCES contacts(id) ON DELETE CASCADE,
            in_debt TEXT NOT NULL,
            amount REAL NOT NULL,
            reason TEXT,
            status TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS events (
            id TEXT PRIMARY KEY NOT NULL,
            account_id TEXT NOT NULL REFERENCES accounts(id),
            object_type TEXT NOT NULL,
            object_id TEXT NOT NULL,
            nature_of_operation TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        PRAGMA foreign_keys = ON;
        ",
    )?;
    Ok(())
}

/// Create an in-memory connection for testing.
pub fn test_connection() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    initialize(&conn).unwrap();
    conn
}
