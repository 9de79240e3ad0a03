use chrono::{Datelike, NaiveDate};
use rand::Rng;
use rusqlite::Connection;

use crate::db::{account_repo, contact_repo};
use crate::error::{PrmError, PrmResult};
use crate::model::{
    pick_default_avatar_color, Account, Address, Birthdate, Contact, Gender, Id, ObjectType,
    Operation,
};
use crate::queries::contact_queries::get_contact;
use crate::validation::{self, trim_optional};
use super::event_ops::log_event;

/// What the user told us about a birthday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BirthdayInput {
    Unknown,
    Exact(NaiveDate),
    /// Month and day without a year.
    MonthDay { month: u32, day: u32 },
    /// Only an approximate age is known.
    Approximate { age: u32 },
}

/// Year stored for birthdates whose year is unknown. 2000 is a leap year so
/// Feb 29 stays representable.
const UNKNOWN_YEAR: i32 = 2000;

pub fn add_contact<R: Rng + ?Sized>(
    conn: &Connection,
    account_id: Id<Account>,
    first_name: &str,
    last_name: Option<&str>,
    is_partial: bool,
    rng: &mut R,
) -> PrmResult<Contact> {
    account_repo::find_by_id(conn, account_id)?
        .ok_or_else(|| PrmError::not_found("Account", account_id))?;

    let valid_first = validation::non_blank(first_name, "first_name")?;
    let color = pick_default_avatar_color(rng);

    let mut contact = if is_partial {
        Contact::create_partial(account_id, valid_first, color)
    } else {
        Contact::create(account_id, valid_first, color)
    };
    contact.last_name = trim_optional(last_name);

    contact_repo::insert(conn, &contact)?;
    log_event(conn, account_id, ObjectType::Contact, contact.id, Operation::Add)?;
    tracing::debug!(contact = %contact.id, partial = is_partial, "contact added");
    Ok(contact)
}

pub fn update_name(
    conn: &Connection,
    contact_id: Id<Contact>,
    first_name: &str,
    middle_name: Option<&str>,
    last_name: Option<&str>,
    nickname: Option<&str>,
) -> PrmResult<Contact> {
    let mut contact = get_contact(conn, contact_id)?;

    contact.first_name = validation::non_blank(first_name, "first_name")?;
    contact.middle_name = trim_optional(middle_name);
    contact.last_name = trim_optional(last_name);
    contact.nickname = trim_optional(nickname);

    contact_repo::update(conn, &contact)?;
    log_event(conn, contact.account_id, ObjectType::Contact, contact.id, Operation::Update)?;
    Ok(contact)
}

pub fn set_gender(
    conn: &Connection,
    contact_id: Id<Contact>,
    gender: Option<Gender>,
) -> PrmResult<Contact> {
    let mut contact = get_contact(conn, contact_id)?;
    contact.gender = gender;
    contact_repo::update(conn, &contact)?;
    log_event(conn, contact.account_id, ObjectType::Contact, contact.id, Operation::Update)?;
    Ok(contact)
}

/// Sets or clears the birthdate. `as_of` anchors age-based birthdates.
pub fn set_birthday(
    conn: &Connection,
    contact_id: Id<Contact>,
    input: BirthdayInput,
    as_of: NaiveDate,
) -> PrmResult<Contact> {
    let mut contact = get_contact(conn, contact_id)?;

    contact.birthdate = match input {
        BirthdayInput::Unknown => None,
        BirthdayInput::Exact(date) => Some(Birthdate {
            date,
            is_year_unknown: false,
            is_age_based: false,
        }),
        BirthdayInput::MonthDay { month, day } => {
            let date = NaiveDate::from_ymd_opt(UNKNOWN_YEAR, month, day).ok_or_else(|| {
                PrmError::InvalidDate(format!("month {} day {}", month, day))
            })?;
            Some(Birthdate {
                date,
                is_year_unknown: true,
                is_age_based: false,
            })
        }
        BirthdayInput::Approximate { age } => {
            let year = i32::try_from(age)
                .ok()
                .map(|age| as_of.year() - age)
                .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
                .ok_or_else(|| PrmError::InvalidDate(format!("age {}", age)))?;
            Some(Birthdate {
                date: year,
                is_year_unknown: false,
                is_age_based: true,
            })
        }
    };

    contact_repo::update(conn, &contact)?;
    log_event(conn, contact.account_id, ObjectType::Contact, contact.id, Operation::Update)?;
    tracing::debug!(contact = %contact.id, ?input, "birthday set");
    Ok(contact)
}

pub fn set_address(
    conn: &Connection,
    contact_id: Id<Contact>,
    address: &Address,
) -> PrmResult<Contact> {
    let mut contact = get_contact(conn, contact_id)?;

    let trimmed = Address {
        street: trim_optional(address.street.as_deref()),
        city: trim_optional(address.city.as_deref()),
        province: trim_optional(address.province.as_deref()),
        postal_code: trim_optional(address.postal_code.as_deref()),
        country: trim_optional(address.country.as_deref()),
    };
    contact.address = if trimmed.is_empty() { None } else { Some(trimmed) };

    contact_repo::update(conn, &contact)?;
    log_event(conn, contact.account_id, ObjectType::Contact, contact.id, Operation::Update)?;
    Ok(contact)
}

/// Points the contact at an already-stored avatar file, or clears it.
pub fn set_avatar_file(
    conn: &Connection,
    contact_id: Id<Contact>,
    avatar_file: Option<&str>,
) -> PrmResult<Contact> {
    let mut contact = get_contact(conn, contact_id)?;
    contact.avatar_file = trim_optional(avatar_file);
    contact_repo::update(conn, &contact)?;
    log_event(conn, contact.account_id, ObjectType::Contact, contact.id, Operation::Update)?;
    Ok(contact)
}

pub fn mark_dead(conn: &Connection, contact_id: Id<Contact>, is_dead: bool) -> PrmResult<Contact> {
    let mut contact = get_contact(conn, contact_id)?;
    contact.is_dead = is_dead;
    contact_repo::update(conn, &contact)?;
    log_event(conn, contact.account_id, ObjectType::Contact, contact.id, Operation::Update)?;
    Ok(contact)
}

/// Deletes the contact together with its edges and records.
pub fn delete_contact(conn: &Connection, contact_id: Id<Contact>) -> PrmResult<()> {
    let contact = get_contact(conn, contact_id)?;
    contact_repo::delete(conn, contact_id)?;
    log_event(conn, contact.account_id, ObjectType::Contact, contact.id, Operation::Delete)?;
    tracing::debug!(contact = %contact_id, "contact deleted");
    Ok(())
}
