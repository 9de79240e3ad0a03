use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;

use crate::db::{contact_repo, record_repo, reminder_repo};
use crate::error::{PrmError, PrmResult};
use crate::model::{
    Call, Contact, Debt, DebtDirection, DebtStatus, Frequency, Id, Note, ObjectType, Operation,
    Reminder, Tag,
};
use crate::queries::contact_queries::get_contact;
use crate::validation::{self, trim_optional};
use super::event_ops::log_event;

// --- Reminders ---

pub fn add_reminder(
    conn: &Connection,
    contact_id: Id<Contact>,
    title: &str,
    next_expected_date: NaiveDate,
    frequency: Frequency,
) -> PrmResult<Reminder> {
    let contact = get_contact(conn, contact_id)?;
    let valid_title = validation::non_blank(title, "title")?;

    match frequency {
        Frequency::OneTime => {}
        Frequency::Week(n) | Frequency::Month(n) | Frequency::Year(n) => {
            validation::positive(i32::try_from(n).unwrap_or(i32::MAX), "frequency")?;
        }
    }

    let reminder = Reminder::create(
        contact.account_id,
        contact.id,
        valid_title,
        next_expected_date,
        frequency,
    );
    reminder_repo::insert(conn, &reminder)?;
    log_event(conn, contact.account_id, ObjectType::Reminder, reminder.id, Operation::Add)?;
    Ok(reminder)
}

/// Moves a recurring reminder to its next occurrence after `as_of`. One-time
/// reminders that have passed are deleted and `None` is returned. A recurring
/// reminder whose next occurrence is past the last representable date is an
/// `InvalidDate` error and stays stored.
pub fn advance_reminder(
    conn: &Connection,
    reminder_id: Id<Reminder>,
    as_of: NaiveDate,
) -> PrmResult<Option<Reminder>> {
    let mut reminder = reminder_repo::find_by_id(conn, reminder_id)?
        .ok_or_else(|| PrmError::not_found("Reminder", reminder_id))?;

    match (reminder.next_after(as_of), reminder.frequency) {
        (Some(next), _) => {
            reminder.next_expected_date = next;
            reminder_repo::update_next_expected_date(conn, reminder.id, next)?;
            log_event(
                conn,
                reminder.account_id,
                ObjectType::Reminder,
                reminder.id,
                Operation::Update,
            )?;
            Ok(Some(reminder))
        }
        (None, Frequency::OneTime) => {
            reminder_repo::delete(conn, reminder.id)?;
            log_event(
                conn,
                reminder.account_id,
                ObjectType::Reminder,
                reminder.id,
                Operation::Delete,
            )?;
            Ok(None)
        }
        (None, frequency) => Err(PrmError::InvalidDate(format!(
            "no occurrence of {:?} after {} from {}",
            frequency, as_of, reminder.next_expected_date
        ))),
    }
}

pub fn delete_reminder(conn: &Connection, reminder_id: Id<Reminder>) -> PrmResult<()> {
    let reminder = reminder_repo::find_by_id(conn, reminder_id)?
        .ok_or_else(|| PrmError::not_found("Reminder", reminder_id))?;
    reminder_repo::delete(conn, reminder.id)?;
    log_event(conn, reminder.account_id, ObjectType::Reminder, reminder.id, Operation::Delete)
}

// --- Notes ---

pub fn add_note(
    conn: &Connection,
    contact_id: Id<Contact>,
    body: &str,
    created_at: NaiveDateTime,
) -> PrmResult<Note> {
    let contact = get_contact(conn, contact_id)?;
    let valid_body = validation::non_blank(body, "body")?;

    let note = Note::create(contact.id, valid_body, created_at);
    record_repo::insert_note(conn, &note)?;
    log_event(conn, contact.account_id, ObjectType::Note, note.id, Operation::Add)?;
    Ok(note)
}

pub fn toggle_favorite(conn: &Connection, note_id: Id<Note>) -> PrmResult<Note> {
    let mut note = record_repo::find_note(conn, note_id)?
        .ok_or_else(|| PrmError::not_found("Note", note_id))?;
    let contact = get_contact(conn, note.contact_id)?;

    note.is_favorited = !note.is_favorited;
    record_repo::set_note_favorited(conn, note.id, note.is_favorited)?;
    log_event(conn, contact.account_id, ObjectType::Note, note.id, Operation::Update)?;
    Ok(note)
}

// --- Tags ---

/// Tags the contact, creating the tag for the account if it doesn't exist
/// yet. Tagging twice with the same name is a no-op.
pub fn tag_contact(conn: &Connection, contact_id: Id<Contact>, name: &str) -> PrmResult<Tag> {
    let contact = get_contact(conn, contact_id)?;
    let valid_name = validation::non_blank(name, "tag")?;

    let tag = match record_repo::find_tag_by_name(conn, contact.account_id, &valid_name)? {
        Some(existing) => existing,
        None => {
            let tag = Tag::create(contact.account_id, valid_name);
            record_repo::insert_tag(conn, &tag)?;
            log_event(conn, contact.account_id, ObjectType::Tag, tag.id, Operation::Add)?;
            tag
        }
    };

    if record_repo::assign_tag(conn, contact.id, tag.id)? {
        tracing::debug!(contact = %contact.id, tag = %tag.name, "contact tagged");
    }
    Ok(tag)
}

pub fn untag_contact(conn: &Connection, contact_id: Id<Contact>, name: &str) -> PrmResult<()> {
    let contact = get_contact(conn, contact_id)?;
    let tag = record_repo::find_tag_by_name(conn, contact.account_id, name.trim())?
        .ok_or_else(|| PrmError::not_found("Tag", name.trim()))?;
    record_repo::unassign_tag(conn, contact.id, tag.id)?;
    Ok(())
}

// --- Calls ---

/// Logs a call and moves `last_talked_to` forward if this call is newer.
pub fn log_call(
    conn: &Connection,
    contact_id: Id<Contact>,
    called_at: NaiveDateTime,
    content: Option<&str>,
) -> PrmResult<Call> {
    let mut contact = get_contact(conn, contact_id)?;

    let call = Call::create(contact.id, called_at, trim_optional(content));
    record_repo::insert_call(conn, &call)?;
    log_event(conn, contact.account_id, ObjectType::Call, call.id, Operation::Add)?;

    if contact.last_talked_to.map_or(true, |last| called_at > last) {
        contact.last_talked_to = Some(called_at);
        contact_repo::update(conn, &contact)?;
    }
    Ok(call)
}

// --- Debts ---

pub fn add_debt(
    conn: &Connection,
    contact_id: Id<Contact>,
    direction: DebtDirection,
    amount: f64,
    reason: Option<&str>,
) -> PrmResult<Debt> {
    let contact = get_contact(conn, contact_id)?;
    let valid_amount = validation::positive_amount(amount, "amount")?;

    let debt = Debt::create(contact.id, direction, valid_amount, trim_optional(reason));
    record_repo::insert_debt(conn, &debt)?;
    log_event(conn, contact.account_id, ObjectType::Debt, debt.id, Operation::Add)?;
    Ok(debt)
}

pub fn settle_debt(conn: &Connection, debt_id: Id<Debt>) -> PrmResult<Debt> {
    let mut debt = record_repo::find_debt(conn, debt_id)?
        .ok_or_else(|| PrmError::not_found("Debt", debt_id))?;
    let contact = get_contact(conn, debt.contact_id)?;

    debt.status = DebtStatus::Complete;
    record_repo::update_debt_status(conn, debt.id, debt.status)?;
    log_event(conn, contact.account_id, ObjectType::Debt, debt.id, Operation::Update)?;
    Ok(debt)
}
