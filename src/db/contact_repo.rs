use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, params_from_iter, Connection};

use crate::error::PrmResult;
use crate::model::{Account, Address, Birthdate, Contact, Gender, Id};

const COLUMNS: &str = "id, account_id, first_name, middle_name, last_name, nickname, gender,
     is_partial, is_dead, birthdate, birthdate_year_unknown, birthdate_age_based,
     street, city, province, postal_code, country, avatar_file, default_avatar_color,
     last_talked_to";

pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn insert(conn: &Connection, contact: &Contact) -> PrmResult<()> {
    let address = contact.address.clone().unwrap_or_default();
    conn.execute(
        &format!(
            "INSERT INTO contacts ({COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)"
        ),
        params![
            contact.id.to_db(),
            contact.account_id.to_db(),
            contact.first_name,
            contact.middle_name,
            contact.last_name,
            contact.nickname,
            contact.gender.map(|g| g.to_db_str()),
            contact.is_partial as i32,
            contact.is_dead as i32,
            contact.birthdate.map(|b| b.date.to_string()),
            contact.birthdate.map(|b| b.is_year_unknown as i32).unwrap_or(0),
            contact.birthdate.map(|b| b.is_age_based as i32).unwrap_or(0),
            address.street,
            address.city,
            address.province,
            address.postal_code,
            address.country,
            contact.avatar_file,
            contact.default_avatar_color,
            contact.last_talked_to.map(|d| d.format(DATETIME_FORMAT).to_string()),
        ],
    )?;
    Ok(())
}

pub fn update(conn: &Connection, contact: &Contact) -> PrmResult<()> {
    let address = contact.address.clone().unwrap_or_default();
    conn.execute(
        "UPDATE contacts SET first_name = ?1, middle_name = ?2, last_name = ?3, nickname = ?4,
         gender = ?5, is_partial = ?6, is_dead = ?7, birthdate = ?8, birthdate_year_unknown = ?9,
         birthdate_age_based = ?10, street = ?11, city = ?12, province = ?13, postal_code = ?14,
         country = ?15, avatar_file = ?16, default_avatar_color = ?17, last_talked_to = ?18,
         updated_at = datetime('now')
         WHERE id = ?19",
        params![
            contact.first_name,
            contact.middle_name,
            contact.last_name,
            contact.nickname,
            contact.gender.map(|g| g.to_db_str()),
            contact.is_partial as i32,
            contact.is_dead as i32,
            contact.birthdate.map(|b| b.date.to_string()),
            contact.birthdate.map(|b| b.is_year_unknown as i32).unwrap_or(0),
            contact.birthdate.map(|b| b.is_age_based as i32).unwrap_or(0),
            address.street,
            address.city,
            address.province,
            address.postal_code,
            address.country,
            contact.avatar_file,
            contact.default_avatar_color,
            contact.last_talked_to.map(|d| d.format(DATETIME_FORMAT).to_string()),
            contact.id.to_db(),
        ],
    )?;
    Ok(())
}

pub fn delete(conn: &Connection, id: Id<Contact>) -> PrmResult<usize> {
    Ok(conn.execute("DELETE FROM contacts WHERE id = ?1", params![id.to_db()])?)
}

pub fn find_by_id(conn: &Connection, id: Id<Contact>) -> PrmResult<Option<Contact>> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM contacts WHERE id = ?1"))?;
    let result = stmt.query_row(params![id.to_db()], |row| Ok(row_to_contact(row)));

    match result {
        Ok(contact) => Ok(Some(contact?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Loads every contact of `account_id` whose id is in `ids`, in one query.
/// Order of the result is unspecified; ids that don't resolve are absent.
pub fn find_by_ids(
    conn: &Connection,
    account_id: Id<Account>,
    ids: &[Id<Contact>],
) -> PrmResult<Vec<Contact>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; ids.len()].join(", ");
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM contacts WHERE account_id = ? AND id IN ({placeholders})"
    ))?;

    let values = std::iter::once(account_id.to_db()).chain(ids.iter().map(Id::to_db));
    let contacts = stmt
        .query_map(params_from_iter(values), |row| Ok(row_to_contact(row)))?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(contacts)
}

pub fn find_by_account(conn: &Connection, account_id: Id<Account>) -> PrmResult<Vec<Contact>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM contacts WHERE account_id = ?1 ORDER BY first_name, last_name"
    ))?;

    let contacts = stmt
        .query_map(params![account_id.to_db()], |row| Ok(row_to_contact(row)))?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(contacts)
}

/// Non-partial contacts of the account other than `except`, by first then
/// last name.
pub fn find_linkable(
    conn: &Connection,
    account_id: Id<Account>,
    except: Id<Contact>,
) -> PrmResult<Vec<Contact>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM contacts
         WHERE account_id = ?1 AND is_partial = 0 AND id != ?2
         ORDER BY first_name ASC, last_name ASC"
    ))?;

    let contacts = stmt
        .query_map(params![account_id.to_db(), except.to_db()], |row| {
            Ok(row_to_contact(row))
        })?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(contacts)
}

fn row_to_contact(row: &rusqlite::Row) -> PrmResult<Contact> {
    let id_str: String = row.get(0)?;
    let account_str: String = row.get(1)?;
    let gender_str: Option<String> = row.get(6)?;
    let birthdate_str: Option<String> = row.get(9)?;
    let last_talked_str: Option<String> = row.get(19)?;

    let birthdate = match birthdate_str
        .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok())
    {
        Some(date) => Some(Birthdate {
            date,
            is_year_unknown: row.get::<_, i32>(10)? != 0,
            is_age_based: row.get::<_, i32>(11)? != 0,
        }),
        None => None,
    };

    let address = Address {
        street: row.get(12)?,
        city: row.get(13)?,
        province: row.get(14)?,
        postal_code: row.get(15)?,
        country: row.get(16)?,
    };

    Ok(Contact {
        id: Id::from_db(&id_str)?,
        account_id: Id::from_db(&account_str)?,
        first_name: row.get(2)?,
        middle_name: row.get(3)?,
        last_name: row.get(4)?,
        nickname: row.get(5)?,
        gender: gender_str.as_deref().and_then(Gender::from_db_str),
        is_partial: row.get::<_, i32>(7)? != 0,
        is_dead: row.get::<_, i32>(8)? != 0,
        birthdate,
        address: if address.is_empty() { None } else { Some(address) },
        avatar_file: row.get(17)?,
        default_avatar_color: row.get(18)?,
        last_talked_to: last_talked_str
            .and_then(|s| NaiveDateTime::parse_from_str(&s, DATETIME_FORMAT).ok()),
    })
}
