use std::collections::HashSet;

use rusqlite::{params, Connection};

use crate::error::PrmResult;
use crate::model::{Account, Contact, Id, OffspringEdge, ProgenitorEdge, RelationshipEdge};

// Every lookup below orders by rowid so "first" and list order follow
// insertion order.

// --- Relationships ---

pub fn insert_relationship(conn: &Connection, edge: &RelationshipEdge) -> PrmResult<()> {
    conn.execute(
        "INSERT INTO relationships (id, account_id, contact_id, with_contact_id, is_active)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            edge.id.to_db(),
            edge.account_id.to_db(),
            edge.contact_id.to_db(),
            edge.with_contact_id.to_db(),
            edge.is_active as i32,
        ],
    )?;
    Ok(())
}

pub fn delete_relationship(conn: &Connection, id: Id<RelationshipEdge>) -> PrmResult<()> {
    conn.execute("DELETE FROM relationships WHERE id = ?1", params![id.to_db()])?;
    Ok(())
}

pub fn set_relationship_active(
    conn: &Connection,
    id: Id<RelationshipEdge>,
    is_active: bool,
) -> PrmResult<()> {
    conn.execute(
        "UPDATE relationships SET is_active = ?1 WHERE id = ?2",
        params![is_active as i32, id.to_db()],
    )?;
    Ok(())
}

/// First edge `contact_id → with_contact_id`.
pub fn find_relationship(
    conn: &Connection,
    account_id: Id<Account>,
    contact_id: Id<Contact>,
    with_contact_id: Id<Contact>,
) -> PrmResult<Option<RelationshipEdge>> {
    let mut stmt = conn.prepare(
        "SELECT id, account_id, contact_id, with_contact_id, is_active FROM relationships
         WHERE account_id = ?1 AND contact_id = ?2 AND with_contact_id = ?3
         ORDER BY rowid LIMIT 1",
    )?;
    let result = stmt.query_row(
        params![account_id.to_db(), contact_id.to_db(), with_contact_id.to_db()],
        |row| Ok(row_to_relationship(row)),
    );

    match result {
        Ok(edge) => Ok(Some(edge?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// First edge pointing at `with_contact_id`, whoever the source is.
pub fn find_first_relationship_to(
    conn: &Connection,
    account_id: Id<Account>,
    with_contact_id: Id<Contact>,
) -> PrmResult<Option<RelationshipEdge>> {
    let mut stmt = conn.prepare(
        "SELECT id, account_id, contact_id, with_contact_id, is_active FROM relationships
         WHERE account_id = ?1 AND with_contact_id = ?2
         ORDER BY rowid LIMIT 1",
    )?;
    let result = stmt.query_row(params![account_id.to_db(), with_contact_id.to_db()], |row| {
        Ok(row_to_relationship(row))
    });

    match result {
        Ok(edge) => Ok(Some(edge?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn find_active_relationships_from(
    conn: &Connection,
    account_id: Id<Account>,
    contact_id: Id<Contact>,
) -> PrmResult<Vec<RelationshipEdge>> {
    let mut stmt = conn.prepare(
        "SELECT id, account_id, contact_id, with_contact_id, is_active FROM relationships
         WHERE account_id = ?1 AND contact_id = ?2 AND is_active = 1
         ORDER BY rowid",
    )?;

    let edges = stmt
        .query_map(params![account_id.to_db(), contact_id.to_db()], |row| {
            Ok(row_to_relationship(row))
        })?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(edges)
}

// --- Offsprings ---

pub fn insert_offspring(conn: &Connection, edge: &OffspringEdge) -> PrmResult<()> {
    conn.execute(
        "INSERT INTO offsprings (id, account_id, contact_id, is_the_child_of)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            edge.id.to_db(),
            edge.account_id.to_db(),
            edge.contact_id.to_db(),
            edge.is_the_child_of.to_db(),
        ],
    )?;
    Ok(())
}

pub fn delete_offspring(conn: &Connection, id: Id<OffspringEdge>) -> PrmResult<()> {
    conn.execute("DELETE FROM offsprings WHERE id = ?1", params![id.to_db()])?;
    Ok(())
}

/// First edge "`child` is the child of `parent`".
pub fn find_offspring(
    conn: &Connection,
    account_id: Id<Account>,
    child: Id<Contact>,
    parent: Id<Contact>,
) -> PrmResult<Option<OffspringEdge>> {
    let mut stmt = conn.prepare(
        "SELECT id, account_id, contact_id, is_the_child_of FROM offsprings
         WHERE account_id = ?1 AND contact_id = ?2 AND is_the_child_of = ?3
         ORDER BY rowid LIMIT 1",
    )?;
    let result = stmt.query_row(
        params![account_id.to_db(), child.to_db(), parent.to_db()],
        |row| Ok(row_to_offspring(row)),
    );

    match result {
        Ok(edge) => Ok(Some(edge?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// First edge whose child side is `child`.
pub fn find_first_offspring_from(
    conn: &Connection,
    account_id: Id<Account>,
    child: Id<Contact>,
) -> PrmResult<Option<OffspringEdge>> {
    let mut stmt = conn.prepare(
        "SELECT id, account_id, contact_id, is_the_child_of FROM offsprings
         WHERE account_id = ?1 AND contact_id = ?2
         ORDER BY rowid LIMIT 1",
    )?;
    let result = stmt.query_row(params![account_id.to_db(), child.to_db()], |row| {
        Ok(row_to_offspring(row))
    });

    match result {
        Ok(edge) => Ok(Some(edge?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Edges naming `parent` as the parent, i.e. one per child.
pub fn find_offsprings_of(
    conn: &Connection,
    account_id: Id<Account>,
    parent: Id<Contact>,
) -> PrmResult<Vec<OffspringEdge>> {
    let mut stmt = conn.prepare(
        "SELECT id, account_id, contact_id, is_the_child_of FROM offsprings
         WHERE account_id = ?1 AND is_the_child_of = ?2
         ORDER BY rowid",
    )?;

    let edges = stmt
        .query_map(params![account_id.to_db(), parent.to_db()], |row| {
            Ok(row_to_offspring(row))
        })?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(edges)
}

// --- Progenitors ---

pub fn insert_progenitor(conn: &Connection, edge: &ProgenitorEdge) -> PrmResult<()> {
    conn.execute(
        "INSERT INTO progenitors (id, account_id, contact_id, is_the_parent_of)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            edge.id.to_db(),
            edge.account_id.to_db(),
            edge.contact_id.to_db(),
            edge.is_the_parent_of.to_db(),
        ],
    )?;
    Ok(())
}

pub fn delete_progenitor(conn: &Connection, id: Id<ProgenitorEdge>) -> PrmResult<()> {
    conn.execute("DELETE FROM progenitors WHERE id = ?1", params![id.to_db()])?;
    Ok(())
}

/// First edge "`parent` is the parent of `child`".
pub fn find_progenitor(
    conn: &Connection,
    account_id: Id<Account>,
    parent: Id<Contact>,
    child: Id<Contact>,
) -> PrmResult<Option<ProgenitorEdge>> {
    let mut stmt = conn.prepare(
        "SELECT id, account_id, contact_id, is_the_parent_of FROM progenitors
         WHERE account_id = ?1 AND contact_id = ?2 AND is_the_parent_of = ?3
         ORDER BY rowid LIMIT 1",
    )?;
    let result = stmt.query_row(
        params![account_id.to_db(), parent.to_db(), child.to_db()],
        |row| Ok(row_to_progenitor(row)),
    );

    match result {
        Ok(edge) => Ok(Some(edge?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Edges naming `child` as the child, i.e. one per parent.
pub fn find_progenitors_of(
    conn: &Connection,
    account_id: Id<Account>,
    child: Id<Contact>,
) -> PrmResult<Vec<ProgenitorEdge>> {
    let mut stmt = conn.prepare(
        "SELECT id, account_id, contact_id, is_the_parent_of FROM progenitors
         WHERE account_id = ?1 AND is_the_parent_of = ?2
         ORDER BY rowid",
    )?;

    let edges = stmt
        .query_map(params![account_id.to_db(), child.to_db()], |row| {
            Ok(row_to_progenitor(row))
        })?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(edges)
}

// --- Cross-table ---

/// Contacts that `contact_id` already points at through any edge kind where
/// it is the source row.
pub fn linked_from(
    conn: &Connection,
    account_id: Id<Account>,
    contact_id: Id<Contact>,
) -> PrmResult<HashSet<Id<Contact>>> {
    let mut stmt = conn.prepare(
        "SELECT with_contact_id FROM relationships WHERE account_id = ?1 AND contact_id = ?2
         UNION
         SELECT is_the_child_of FROM offsprings WHERE account_id = ?1 AND contact_id = ?2
         UNION
         SELECT is_the_parent_of FROM progenitors WHERE account_id = ?1 AND contact_id = ?2",
    )?;

    let ids = stmt
        .query_map(params![account_id.to_db(), contact_id.to_db()], |row| {
            row.get::<_, String>(0)
        })?
        .collect::<Result<Vec<_>, _>>()?
        .iter()
        .map(|s| Id::from_db(s))
        .collect::<PrmResult<HashSet<_>>>()?;

    Ok(ids)
}

fn row_to_relationship(row: &rusqlite::Row) -> PrmResult<RelationshipEdge> {
    Ok(RelationshipEdge {
        id: Id::from_db(&row.get::<_, String>(0)?)?,
        account_id: Id::from_db(&row.get::<_, String>(1)?)?,
        contact_id: Id::from_db(&row.get::<_, String>(2)?)?,
        with_contact_id: Id::from_db(&row.get::<_, String>(3)?)?,
        is_active: row.get::<_, i32>(4)? != 0,
    })
}

fn row_to_offspring(row: &rusqlite::Row) -> PrmResult<OffspringEdge> {
    Ok(OffspringEdge {
        id: Id::from_db(&row.get::<_, String>(0)?)?,
        account_id: Id::from_db(&row.get::<_, String>(1)?)?,
        contact_id: Id::from_db(&row.get::<_, String>(2)?)?,
        is_the_child_of: Id::from_db(&row.get::<_, String>(3)?)?,
    })
}

fn row_to_progenitor(row: &rusqlite::Row) -> PrmResult<ProgenitorEdge> {
    Ok(ProgenitorEdge {
        id: Id::from_db(&row.get::<_, String>(0)?)?,
        account_id: Id::from_db(&row.get::<_, String>(1)?)?,
        contact_id: Id::from_db(&row.get::<_, String>(2)?)?,
        is_the_parent_of: Id::from_db(&row.get::<_, String>(3)?)?,
    })
}
