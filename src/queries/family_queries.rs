//! Family-graph reads for a single contact.
//!
//! Edge direction conventions:
//! - partners: relationship edges whose source is the contact;
//! - offsprings: "child of" edges naming the contact as the parent;
//! - progenitors: "parent of" edges naming the contact as the child.
//!
//! `family_members` is partners followed by offsprings. Parents reachable
//! only through a "parent of" edge are not family members; this mirrors the
//! behavior callers have always relied on.

use std::collections::HashMap;

use rusqlite::Connection;

use crate::db::{contact_repo, family_repo, reminder_repo};
use crate::error::{PrmError, PrmResult};
use crate::model::{Account, Contact, ContactShort, Id, ProjectionSettings, Reminder};
use super::contact_queries::get_contact;

/// Resolves `ids` to contacts of `account_id`, keeping the order (and
/// repeats) of `ids`. One query for the whole batch; any id that doesn't
/// resolve fails the lookup.
fn resolve(
    conn: &Connection,
    account_id: Id<Account>,
    ids: &[Id<Contact>],
) -> PrmResult<Vec<Contact>> {
    let by_id: HashMap<Id<Contact>, Contact> = contact_repo::find_by_ids(conn, account_id, ids)?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    ids.iter()
        .map(|id| {
            by_id
                .get(id)
                .cloned()
                .ok_or_else(|| PrmError::not_found("Contact", id))
        })
        .collect()
}

fn project(contacts: &[Contact], settings: &ProjectionSettings) -> Vec<ContactShort> {
    contacts
        .iter()
        .map(|c| ContactShort::from_contact(c, settings))
        .collect()
}

/// Contacts this one could still be linked to: non-partial contacts of the
/// same account, excluding itself and anyone it already points at through
/// a partner, "child of" or "parent of" edge. Sorted by first then last name.
pub fn potential_contacts(conn: &Connection, contact_id: Id<Contact>) -> PrmResult<Vec<Contact>> {
    let contact = get_contact(conn, contact_id)?;
    let linked = family_repo::linked_from(conn, contact.account_id, contact.id)?;

    let candidates = contact_repo::find_linkable(conn, contact.account_id, contact.id)?
        .into_iter()
        .filter(|candidate| !linked.contains(&candidate.id))
        .collect();

    Ok(candidates)
}

pub fn current_partners(conn: &Connection, contact_id: Id<Contact>) -> PrmResult<Vec<Contact>> {
    let contact = get_contact(conn, contact_id)?;
    let targets: Vec<Id<Contact>> =
        family_repo::find_active_relationships_from(conn, contact.account_id, contact.id)?
            .into_iter()
            .map(|edge| edge.with_contact_id)
            .collect();
    resolve(conn, contact.account_id, &targets)
}

pub fn offsprings(conn: &Connection, contact_id: Id<Contact>) -> PrmResult<Vec<Contact>> {
    let contact = get_contact(conn, contact_id)?;
    let children: Vec<Id<Contact>> =
        family_repo::find_offsprings_of(conn, contact.account_id, contact.id)?
            .into_iter()
            .map(|edge| edge.contact_id)
            .collect();
    resolve(conn, contact.account_id, &children)
}

pub fn progenitors(conn: &Connection, contact_id: Id<Contact>) -> PrmResult<Vec<Contact>> {
    let contact = get_contact(conn, contact_id)?;
    let parents: Vec<Id<Contact>> =
        family_repo::find_progenitors_of(conn, contact.account_id, contact.id)?
            .into_iter()
            .map(|edge| edge.contact_id)
            .collect();
    resolve(conn, contact.account_id, &parents)
}

pub fn partial_partners(conn: &Connection, contact_id: Id<Contact>) -> PrmResult<Vec<Contact>> {
    Ok(current_partners(conn, contact_id)?
        .into_iter()
        .filter(|c| c.is_partial)
        .collect())
}

pub fn partial_offsprings(conn: &Connection, contact_id: Id<Contact>) -> PrmResult<Vec<Contact>> {
    Ok(offsprings(conn, contact_id)?
        .into_iter()
        .filter(|c| c.is_partial)
        .collect())
}

pub fn family_members(conn: &Connection, contact_id: Id<Contact>) -> PrmResult<Vec<Contact>> {
    let mut members = current_partners(conn, contact_id)?;
    members.extend(offsprings(conn, contact_id)?);
    Ok(members)
}

/// The contact's own reminders, then those of each partial partner, then
/// those of each partial offspring. Not deduplicated.
pub fn reminders_about_relatives(
    conn: &Connection,
    contact_id: Id<Contact>,
) -> PrmResult<Vec<Reminder>> {
    let mut reminders = reminder_repo::find_by_contact(conn, contact_id)?;

    for relative in partial_partners(conn, contact_id)?
        .into_iter()
        .chain(partial_offsprings(conn, contact_id)?)
    {
        reminders.extend(reminder_repo::find_by_contact(conn, relative.id)?);
    }

    Ok(reminders)
}

/// Parent of a (usually partial) child, from its first "child of" edge.
pub fn first_progenitor(conn: &Connection, contact_id: Id<Contact>) -> PrmResult<Contact> {
    let contact = get_contact(conn, contact_id)?;
    let edge = family_repo::find_first_offspring_from(conn, contact.account_id, contact.id)?
        .ok_or_else(|| PrmError::not_found("Offspring", contact.id))?;
    get_contact(conn, edge.is_the_child_of)
}

/// Partner of a (usually partial) contact, from the first partner edge
/// pointing at it.
pub fn first_partner(conn: &Connection, contact_id: Id<Contact>) -> PrmResult<Contact> {
    let contact = get_contact(conn, contact_id)?;
    let edge = family_repo::find_first_relationship_to(conn, contact.account_id, contact.id)?
        .ok_or_else(|| PrmError::not_found("Relationship", contact.id))?;
    get_contact(conn, edge.contact_id)
}

// --- Public projections ---

pub fn current_partners_short(
    conn: &Connection,
    contact_id: Id<Contact>,
    settings: &ProjectionSettings,
) -> PrmResult<Vec<ContactShort>> {
    Ok(project(&current_partners(conn, contact_id)?, settings))
}

pub fn offsprings_short(
    conn: &Connection,
    contact_id: Id<Contact>,
    settings: &ProjectionSettings,
) -> PrmResult<Vec<ContactShort>> {
    Ok(project(&offsprings(conn, contact_id)?, settings))
}

pub fn progenitors_short(
    conn: &Connection,
    contact_id: Id<Contact>,
    settings: &ProjectionSettings,
) -> PrmResult<Vec<ContactShort>> {
    Ok(project(&progenitors(conn, contact_id)?, settings))
}

pub fn potential_contacts_short(
    conn: &Connection,
    contact_id: Id<Contact>,
    settings: &ProjectionSettings,
) -> PrmResult<Vec<ContactShort>> {
    Ok(project(&potential_contacts(conn, contact_id)?, settings))
}

/// Everything a family panel needs in one go.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FamilyView {
    pub contact: ContactShort,
    pub partners: Vec<ContactShort>,
    pub offsprings: Vec<ContactShort>,
    pub progenitors: Vec<ContactShort>,
}

pub fn family_view(
    conn: &Connection,
    contact_id: Id<Contact>,
    settings: &ProjectionSettings,
) -> PrmResult<FamilyView> {
    let contact = get_contact(conn, contact_id)?;
    Ok(FamilyView {
        contact: ContactShort::from_contact(&contact, settings),
        partners: current_partners_short(conn, contact_id, settings)?,
        offsprings: offsprings_short(conn, contact_id, settings)?,
        progenitors: progenitors_short(conn, contact_id, settings)?,
    })
}
