use chrono::NaiveDateTime;
use rusqlite::{params, Connection};

use crate::error::{PrmError, PrmResult};
use crate::model::{Account, Event, Id, ObjectType, Operation};
use super::contact_repo::DATETIME_FORMAT;

pub fn insert(
    conn: &Connection,
    account_id: Id<Account>,
    object_type: ObjectType,
    object_id: &str,
    operation: Operation,
) -> PrmResult<Id<Event>> {
    let id = Id::generate();
    conn.execute(
        "INSERT INTO events (id, account_id, object_type, object_id, nature_of_operation, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, datetime('now'))",
        params![
            id.to_db(),
            account_id.to_db(),
            object_type.to_db_str(),
            object_id,
            operation.to_db_str(),
        ],
    )?;
    Ok(id)
}

/// Newest first, ties broken by insertion order (latest first).
pub fn recent(conn: &Connection, account_id: Id<Account>, limit: usize) -> PrmResult<Vec<Event>> {
    let mut stmt = conn.prepare(
        "SELECT id, account_id, object_type, object_id, nature_of_operation, created_at
         FROM events
         WHERE account_id = ?1
         ORDER BY created_at DESC, rowid DESC
         LIMIT ?2",
    )?;

    let events = stmt
        .query_map(params![account_id.to_db(), limit as i64], |row| {
            Ok(row_to_event(row))
        })?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(events)
}

fn row_to_event(row: &rusqlite::Row) -> PrmResult<Event> {
    let object_type: String = row.get(2)?;
    let operation: String = row.get(4)?;
    let created_at: String = row.get(5)?;

    Ok(Event {
        id: Id::from_db(&row.get::<_, String>(0)?)?,
        account_id: Id::from_db(&row.get::<_, String>(1)?)?,
        object_type: ObjectType::from_db_str(&object_type)
            .ok_or_else(|| PrmError::Other(format!("Unknown object type: {}", object_type)))?,
        object_id: row.get(3)?,
        nature_of_operation: Operation::from_db_str(&operation)
            .ok_or_else(|| PrmError::Other(format!("Unknown operation: {}", operation)))?,
        created_at: NaiveDateTime::parse_from_str(&created_at, DATETIME_FORMAT)
            .map_err(|e| PrmError::InvalidDate(format!("{}: {}", created_at, e)))?,
    })
}
