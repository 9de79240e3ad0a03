use std::fmt::Display;

use rusqlite::Connection;

use crate::db::event_repo;
use crate::error::PrmResult;
use crate::model::{Account, Event, Id, ObjectType, Operation};

/// Records that an object of `object_type` underwent `operation`.
pub fn log_event(
    conn: &Connection,
    account_id: Id<Account>,
    object_type: ObjectType,
    object_id: impl Display,
    operation: Operation,
) -> PrmResult<()> {
    let object_id = object_id.to_string();
    event_repo::insert(conn, account_id, object_type, &object_id, operation)?;
    tracing::trace!(
        account = %account_id,
        object_type = object_type.to_db_str(),
        object_id = %object_id,
        operation = operation.to_db_str(),
        "event logged"
    );
    Ok(())
}

pub fn events_for(
    conn: &Connection,
    account_id: Id<Account>,
    limit: usize,
) -> PrmResult<Vec<Event>> {
    event_repo::recent(conn, account_id, limit)
}
