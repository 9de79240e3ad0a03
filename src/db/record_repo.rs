use chrono::NaiveDateTime;
use rusqlite::{params, Connection};

use crate::error::{PrmError, PrmResult};
use crate::model::{Account, Call, Contact, Debt, DebtDirection, DebtStatus, Id, Note, Tag};
use super::contact_repo::DATETIME_FORMAT;

fn parse_datetime(s: &str) -> PrmResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .map_err(|e| PrmError::InvalidDate(format!("{}: {}", s, e)))
}

// --- Notes ---

pub fn insert_note(conn: &Connection, note: &Note) -> PrmResult<()> {
    conn.execute(
        "INSERT INTO notes (id, contact_id, body, is_favorited, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            note.id.to_db(),
            note.contact_id.to_db(),
            note.body,
            note.is_favorited as i32,
            note.created_at.format(DATETIME_FORMAT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn set_note_favorited(conn: &Connection, id: Id<Note>, favorited: bool) -> PrmResult<usize> {
    Ok(conn.execute(
        "UPDATE notes SET is_favorited = ?1 WHERE id = ?2",
        params![favorited as i32, id.to_db()],
    )?)
}

pub fn find_note(conn: &Connection, id: Id<Note>) -> PrmResult<Option<Note>> {
    let mut stmt = conn.prepare(
        "SELECT id, contact_id, body, is_favorited, created_at FROM notes WHERE id = ?1",
    )?;
    let result = stmt.query_row(params![id.to_db()], |row| Ok(row_to_note(row)));

    match result {
        Ok(note) => Ok(Some(note?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Favorites first, then newest first.
pub fn find_notes_by_contact(conn: &Connection, contact_id: Id<Contact>) -> PrmResult<Vec<Note>> {
    let mut stmt = conn.prepare(
        "SELECT id, contact_id, body, is_favorited, created_at FROM notes
         WHERE contact_id = ?1 ORDER BY is_favorited DESC, created_at DESC",
    )?;

    let notes = stmt
        .query_map(params![contact_id.to_db()], |row| Ok(row_to_note(row)))?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(notes)
}

fn row_to_note(row: &rusqlite::Row) -> PrmResult<Note> {
    Ok(Note {
        id: Id::from_db(&row.get::<_, String>(0)?)?,
        contact_id: Id::from_db(&row.get::<_, String>(1)?)?,
        body: row.get(2)?,
        is_favorited: row.get::<_, i32>(3)? != 0,
        created_at: parse_datetime(&row.get::<_, String>(4)?)?,
    })
}

// --- Tags ---

pub fn insert_tag(conn: &Connection, tag: &Tag) -> PrmResult<()> {
    conn.execute(
        "INSERT INTO tags (id, account_id, name) VALUES (?1, ?2, ?3)",
        params![tag.id.to_db(), tag.account_id.to_db(), tag.name],
    )?;
    Ok(())
}

pub fn find_tag_by_name(
    conn: &Connection,
    account_id: Id<Account>,
    name: &str,
) -> PrmResult<Option<Tag>> {
    let mut stmt = conn.prepare(
        "SELECT id, account_id, name FROM tags WHERE account_id = ?1 AND name = ?2 COLLATE NOCASE",
    )?;
    let result = stmt.query_row(params![account_id.to_db(), name], |row| Ok(row_to_tag(row)));

    match result {
        Ok(tag) => Ok(Some(tag?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Returns whether a new assignment was stored.
pub fn assign_tag(conn: &Connection, contact_id: Id<Contact>, tag_id: Id<Tag>) -> PrmResult<bool> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO contact_tags (contact_id, tag_id) VALUES (?1, ?2)",
        params![contact_id.to_db(), tag_id.to_db()],
    )?;
    Ok(inserted > 0)
}

pub fn unassign_tag(
    conn: &Connection,
    contact_id: Id<Contact>,
    tag_id: Id<Tag>,
) -> PrmResult<usize> {
    Ok(conn.execute(
        "DELETE FROM contact_tags WHERE contact_id = ?1 AND tag_id = ?2",
        params![contact_id.to_db(), tag_id.to_db()],
    )?)
}

pub fn find_tags_by_contact(conn: &Connection, contact_id: Id<Contact>) -> PrmResult<Vec<Tag>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.account_id, t.name FROM tags t
         JOIN contact_tags ct ON ct.tag_id = t.id
         WHERE ct.contact_id = ?1 ORDER BY t.name COLLATE NOCASE",
    )?;

    let tags = stmt
        .query_map(params![contact_id.to_db()], |row| Ok(row_to_tag(row)))?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(tags)
}

fn row_to_tag(row: &rusqlite::Row) -> PrmResult<Tag> {
    Ok(Tag {
        id: Id::from_db(&row.get::<_, String>(0)?)?,
        account_id: Id::from_db(&row.get::<_, String>(1)?)?,
        name: row.get(2)?,
    })
}

// --- Calls ---

pub fn insert_call(conn: &Connection, call: &Call) -> PrmResult<()> {
    conn.execute(
        "INSERT INTO calls (id, contact_id, called_at, content) VALUES (?1, ?2, ?3, ?4)",
        params![
            call.id.to_db(),
            call.contact_id.to_db(),
            call.called_at.format(DATETIME_FORMAT).to_string(),
            call.content,
        ],
    )?;
    Ok(())
}

pub fn find_calls_by_contact(conn: &Connection, contact_id: Id<Contact>) -> PrmResult<Vec<Call>> {
    let mut stmt = conn.prepare(
        "SELECT id, contact_id, called_at, content FROM calls
         WHERE contact_id = ?1 ORDER BY called_at DESC",
    )?;

    let calls = stmt
        .query_map(params![contact_id.to_db()], |row| Ok(row_to_call(row)))?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(calls)
}

fn row_to_call(row: &rusqlite::Row) -> PrmResult<Call> {
    Ok(Call {
        id: Id::from_db(&row.get::<_, String>(0)?)?,
        contact_id: Id::from_db(&row.get::<_, String>(1)?)?,
        called_at: parse_datetime(&row.get::<_, String>(2)?)?,
        content: row.get(3)?,
    })
}

// --- Debts ---

pub fn insert_debt(conn: &Connection, debt: &Debt) -> PrmResult<()> {
    conn.execute(
        "INSERT INTO debts (id, contact_id, in_debt, amount, reason, status) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            debt.id.to_db(),
            debt.contact_id.to_db(),
            debt.direction.to_db_str(),
            debt.amount,
            debt.reason,
            debt.status.to_db_str(),
        ],
    )?;
    Ok(())
}

pub fn update_debt_status(conn: &Connection, id: Id<Debt>, status: DebtStatus) -> PrmResult<usize> {
    Ok(conn.execute(
        "UPDATE debts SET status = ?1 WHERE id = ?2",
        params![status.to_db_str(), id.to_db()],
    )?)
}

pub fn find_debt(conn: &Connection, id: Id<Debt>) -> PrmResult<Option<Debt>> {
    let mut stmt = conn.prepare(
        "SELECT id, contact_id, in_debt, amount, reason, status FROM debts WHERE id = ?1",
    )?;
    let result = stmt.query_row(params![id.to_db()], |row| Ok(row_to_debt(row)));

    match result {
        Ok(debt) => Ok(Some(debt?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn find_debts_by_contact(conn: &Connection, contact_id: Id<Contact>) -> PrmResult<Vec<Debt>> {
    let mut stmt = conn.prepare(
        "SELECT id, contact_id, in_debt, amount, reason, status FROM debts
         WHERE contact_id = ?1 ORDER BY rowid",
    )?;

    let debts = stmt
        .query_map(params![contact_id.to_db()], |row| Ok(row_to_debt(row)))?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(debts)
}

fn row_to_debt(row: &rusqlite::Row) -> PrmResult<Debt> {
    let direction: String = row.get(2)?;
    let status: String = row.get(5)?;

    Ok(Debt {
        id: Id::from_db(&row.get::<_, String>(0)?)?,
        contact_id: Id::from_db(&row.get::<_, String>(1)?)?,
        direction: DebtDirection::from_db_str(&direction)
            .ok_or_else(|| PrmError::Other(format!("Unknown debt direction: {}", direction)))?,
        amount: row.get(3)?,
        reason: row.get(4)?,
        status: DebtStatus::from_db_str(&status)
            .ok_or_else(|| PrmError::Other(format!("Unknown debt status: {}", status)))?,
    })
}
