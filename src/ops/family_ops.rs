//! Linking and unlinking contacts in the family graph.
//!
//! Bilateral operations are two independent writes with no transaction
//! around them; if the second write fails the first one stays applied.
//! Unlinking only touches the directions the caller asks for, so a
//! non-bilateral unlink of a bilateral pair leaves the reverse edge behind.

use rusqlite::Connection;

use crate::db::family_repo;
use crate::error::{PrmError, PrmResult};
use crate::model::{
    Contact, Id, ObjectType, OffspringEdge, Operation, ProgenitorEdge, RelationshipEdge,
};
use crate::queries::contact_queries::get_contact;
use super::event_ops::log_event;

/// Loads both ends of a link and checks they share an account.
fn require_pair(
    conn: &Connection,
    first: Id<Contact>,
    second: Id<Contact>,
) -> PrmResult<(Contact, Contact)> {
    let a = get_contact(conn, first)?;
    let b = get_contact(conn, second)?;
    if a.account_id != b.account_id {
        return Err(PrmError::CrossAccount {
            first: first.to_string(),
            second: second.to_string(),
        });
    }
    Ok((a, b))
}

/// Creates `contact → partner`, plus `partner → contact` when bilateral.
/// Existing edges are not checked; linking twice stores two edges.
pub fn set_relationship_with(
    conn: &Connection,
    contact_id: Id<Contact>,
    partner_id: Id<Contact>,
    bilateral: bool,
) -> PrmResult<Vec<RelationshipEdge>> {
    let (contact, partner) = require_pair(conn, contact_id, partner_id)?;
    let account_id = contact.account_id;

    let mut created = vec![RelationshipEdge::create(account_id, contact.id, partner.id)];
    if bilateral {
        created.push(RelationshipEdge::create(account_id, partner.id, contact.id));
    }

    for edge in &created {
        family_repo::insert_relationship(conn, edge)?;
        log_event(conn, account_id, ObjectType::Relationship, edge.id, Operation::Add)?;
    }

    tracing::debug!(contact = %contact.id, partner = %partner.id, bilateral, "partners linked");
    Ok(created)
}

/// Deletes the first `contact → partner` edge, and the first
/// `partner → contact` edge when bilateral. A missing edge is `NotFound`.
pub fn unset_relationship_with(
    conn: &Connection,
    contact_id: Id<Contact>,
    partner_id: Id<Contact>,
    bilateral: bool,
) -> PrmResult<()> {
    let contact = get_contact(conn, contact_id)?;
    let account_id = contact.account_id;

    let mut directions = vec![(contact_id, partner_id)];
    if bilateral {
        directions.push((partner_id, contact_id));
    }

    for (from, to) in directions {
        let edge = family_repo::find_relationship(conn, account_id, from, to)?.ok_or_else(|| {
            tracing::warn!(from = %from, to = %to, "no relationship edge to remove");
            PrmError::not_found("Relationship", format!("{} -> {}", from, to))
        })?;
        family_repo::delete_relationship(conn, edge.id)?;
        log_event(conn, account_id, ObjectType::Relationship, edge.id, Operation::Delete)?;
    }

    tracing::debug!(contact = %contact_id, partner = %partner_id, bilateral, "partners unlinked");
    Ok(())
}

/// Marks the first `contact → partner` edge active or inactive without
/// removing it. Inactive edges no longer count as current partners.
pub fn set_relationship_active(
    conn: &Connection,
    contact_id: Id<Contact>,
    partner_id: Id<Contact>,
    is_active: bool,
) -> PrmResult<RelationshipEdge> {
    let contact = get_contact(conn, contact_id)?;
    let mut edge = family_repo::find_relationship(conn, contact.account_id, contact_id, partner_id)?
        .ok_or_else(|| {
            PrmError::not_found("Relationship", format!("{} -> {}", contact_id, partner_id))
        })?;

    edge.is_active = is_active;
    family_repo::set_relationship_active(conn, edge.id, is_active)?;
    log_event(conn, contact.account_id, ObjectType::Relationship, edge.id, Operation::Update)?;
    Ok(edge)
}

/// Records `child` as a child of `parent`. When bilateral, also records the
/// paired "parent of" edge.
pub fn is_the_offspring_of(
    conn: &Connection,
    child_id: Id<Contact>,
    parent_id: Id<Contact>,
    bilateral: bool,
) -> PrmResult<(OffspringEdge, Option<ProgenitorEdge>)> {
    let (child, parent) = require_pair(conn, child_id, parent_id)?;
    let account_id = child.account_id;

    let offspring = OffspringEdge::create(account_id, child.id, parent.id);
    family_repo::insert_offspring(conn, &offspring)?;
    log_event(conn, account_id, ObjectType::Offspring, offspring.id, Operation::Add)?;

    let progenitor = if bilateral {
        let edge = ProgenitorEdge::create(account_id, parent.id, child.id);
        family_repo::insert_progenitor(conn, &edge)?;
        log_event(conn, account_id, ObjectType::Progenitor, edge.id, Operation::Add)?;
        Some(edge)
    } else {
        None
    };

    tracing::debug!(child = %child.id, parent = %parent.id, bilateral, "offspring linked");
    Ok((offspring, progenitor))
}

/// Removes the "`child` is child of `parent`" edge, and the paired "parent
/// of" edge when bilateral. A missing edge is `NotFound`.
pub fn unset_offspring(
    conn: &Connection,
    parent_id: Id<Contact>,
    child_id: Id<Contact>,
    bilateral: bool,
) -> PrmResult<()> {
    let parent = get_contact(conn, parent_id)?;
    let account_id = parent.account_id;

    let offspring = family_repo::find_offspring(conn, account_id, child_id, parent_id)?
        .ok_or_else(|| {
            tracing::warn!(child = %child_id, parent = %parent_id, "no offspring edge to remove");
            PrmError::not_found("Offspring", format!("{} -> {}", child_id, parent_id))
        })?;
    family_repo::delete_offspring(conn, offspring.id)?;
    log_event(conn, account_id, ObjectType::Offspring, offspring.id, Operation::Delete)?;

    if bilateral {
        let progenitor = family_repo::find_progenitor(conn, account_id, parent_id, child_id)?
            .ok_or_else(|| {
                tracing::warn!(
                    parent = %parent_id,
                    child = %child_id,
                    "no progenitor edge to remove"
                );
                PrmError::not_found("Progenitor", format!("{} -> {}", parent_id, child_id))
            })?;
        family_repo::delete_progenitor(conn, progenitor.id)?;
        log_event(conn, account_id, ObjectType::Progenitor, progenitor.id, Operation::Delete)?;
    }

    tracing::debug!(child = %child_id, parent = %parent_id, bilateral, "offspring unlinked");
    Ok(())
}
