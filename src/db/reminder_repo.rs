use chrono::NaiveDate;
use rusqlite::{params, Connection};

use crate::error::{PrmError, PrmResult};
use crate::model::{Contact, Frequency, Id, Reminder};

pub fn insert(conn: &Connection, reminder: &Reminder) -> PrmResult<()> {
    let (kind, number) = reminder.frequency.to_db();
    conn.execute(
        "INSERT INTO reminders (id, account_id, contact_id, title, next_expected_date, frequency_type, frequency_number)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            reminder.id.to_db(),
            reminder.account_id.to_db(),
            reminder.contact_id.to_db(),
            reminder.title,
            reminder.next_expected_date.to_string(),
            kind,
            number,
        ],
    )?;
    Ok(())
}

pub fn update_next_expected_date(
    conn: &Connection,
    id: Id<Reminder>,
    date: NaiveDate,
) -> PrmResult<()> {
    conn.execute(
        "UPDATE reminders SET next_expected_date = ?1 WHERE id = ?2",
        params![date.to_string(), id.to_db()],
    )?;
    Ok(())
}

pub fn delete(conn: &Connection, id: Id<Reminder>) -> PrmResult<usize> {
    Ok(conn.execute("DELETE FROM reminders WHERE id = ?1", params![id.to_db()])?)
}

pub fn find_by_id(conn: &Connection, id: Id<Reminder>) -> PrmResult<Option<Reminder>> {
    let mut stmt = conn.prepare(
        "SELECT id, account_id, contact_id, title, next_expected_date, frequency_type, frequency_number
         FROM reminders WHERE id = ?1",
    )?;
    let result = stmt.query_row(params![id.to_db()], |row| Ok(row_to_reminder(row)));

    match result {
        Ok(reminder) => Ok(Some(reminder?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn find_by_contact(conn: &Connection, contact_id: Id<Contact>) -> PrmResult<Vec<Reminder>> {
    let mut stmt = conn.prepare(
        "SELECT id, account_id, contact_id, title, next_expected_date, frequency_type, frequency_number
         FROM reminders WHERE contact_id = ?1 ORDER BY rowid",
    )?;

    let reminders = stmt
        .query_map(params![contact_id.to_db()], |row| Ok(row_to_reminder(row)))?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(reminders)
}

fn row_to_reminder(row: &rusqlite::Row) -> PrmResult<Reminder> {
    let date_str: String = row.get(4)?;
    let kind: String = row.get(5)?;
    let number: u32 = row.get(6)?;

    Ok(Reminder {
        id: Id::from_db(&row.get::<_, String>(0)?)?,
        account_id: Id::from_db(&row.get::<_, String>(1)?)?,
        contact_id: Id::from_db(&row.get::<_, String>(2)?)?,
        title: row.get(3)?,
        next_expected_date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
            .map_err(|e| PrmError::InvalidDate(format!("{}: {}", date_str, e)))?,
        frequency: Frequency::from_db(&kind, number)
            .ok_or_else(|| PrmError::Other(format!("Unknown reminder frequency: {}", kind)))?,
    })
}
