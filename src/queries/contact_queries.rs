use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;

use crate::db::{contact_repo, record_repo, reminder_repo};
use crate::error::{PrmError, PrmResult};
use crate::model::{
    Account, Call, Contact, Debt, DebtStatus, Id, Note, Reminder, Tag,
};

/// Loads a contact that must exist.
pub fn get_contact(conn: &Connection, contact_id: Id<Contact>) -> PrmResult<Contact> {
    contact_repo::find_by_id(conn, contact_id)?
        .ok_or_else(|| PrmError::not_found("Contact", contact_id))
}

pub fn contacts_for_account(conn: &Connection, account_id: Id<Account>) -> PrmResult<Vec<Contact>> {
    contact_repo::find_by_account(conn, account_id)
}

/// Non-partial contacts whose birthday falls on `date`.
pub fn birthdays_on(
    conn: &Connection,
    account_id: Id<Account>,
    date: NaiveDate,
) -> PrmResult<Vec<Contact>> {
    Ok(contact_repo::find_by_account(conn, account_id)?
        .into_iter()
        .filter(|c| !c.is_partial && !c.is_dead && c.is_birthday_on(date))
        .collect())
}

pub fn reminders_for(conn: &Connection, contact_id: Id<Contact>) -> PrmResult<Vec<Reminder>> {
    reminder_repo::find_by_contact(conn, contact_id)
}

pub fn notes_for(conn: &Connection, contact_id: Id<Contact>) -> PrmResult<Vec<Note>> {
    record_repo::find_notes_by_contact(conn, contact_id)
}

pub fn tags_for(conn: &Connection, contact_id: Id<Contact>) -> PrmResult<Vec<Tag>> {
    record_repo::find_tags_by_contact(conn, contact_id)
}

pub fn calls_for(conn: &Connection, contact_id: Id<Contact>) -> PrmResult<Vec<Call>> {
    record_repo::find_calls_by_contact(conn, contact_id)
}

pub fn debts_for(conn: &Connection, contact_id: Id<Contact>) -> PrmResult<Vec<Debt>> {
    record_repo::find_debts_by_contact(conn, contact_id)
}

/// Net amount still owed across in-progress debts. Positive means the
/// contact owes the account holder.
pub fn outstanding_debt(conn: &Connection, contact_id: Id<Contact>) -> PrmResult<f64> {
    Ok(debts_for(conn, contact_id)?
        .iter()
        .filter(|d| d.status == DebtStatus::InProgress)
        .map(Debt::signed_amount)
        .sum())
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactSummary {
    pub contact_id: Id<Contact>,
    pub reminders: usize,
    pub notes: usize,
    pub tags: usize,
    pub calls: usize,
    pub open_debts: usize,
    pub outstanding_debt: f64,
}

pub fn contact_summary(conn: &Connection, contact_id: Id<Contact>) -> PrmResult<ContactSummary> {
    let contact = get_contact(conn, contact_id)?;
    let debts = debts_for(conn, contact.id)?;

    Ok(ContactSummary {
        contact_id: contact.id,
        reminders: reminders_for(conn, contact.id)?.len(),
        notes: notes_for(conn, contact.id)?.len(),
        tags: tags_for(conn, contact.id)?.len(),
        calls: calls_for(conn, contact.id)?.len(),
        open_debts: debts.iter().filter(|d| d.status == DebtStatus::InProgress).count(),
        outstanding_debt: debts
            .iter()
            .filter(|d| d.status == DebtStatus::InProgress)
            .map(Debt::signed_amount)
            .sum(),
    })
}
