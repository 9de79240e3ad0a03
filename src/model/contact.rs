use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::account::Account;
use super::ids::Id;

/// Palette the default avatar color is drawn from.
pub const AVATAR_COLORS: &[&str] = &[
    "#fdb660", "#93521e", "#bd5067", "#b3d5fe", "#ff9807", "#709512", "#5f479a", "#e5e5cd",
];

/// Picks a default avatar color from [`AVATAR_COLORS`].
pub fn pick_default_avatar_color<R: Rng + ?Sized>(rng: &mut R) -> String {
    AVATAR_COLORS[rng.gen_range(0..AVATAR_COLORS.len())].to_string()
}

/// How a complete name is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameOrder {
    #[default]
    FirstnameLastname,
    LastnameFirstname,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "Male" => Some(Gender::Male),
            "Female" => Some(Gender::Female),
            "Other" => Some(Gender::Other),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

/// A birthdate. When the year is unknown the stored year is a placeholder
/// and must not be used for age calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Birthdate {
    pub date: NaiveDate,
    pub is_year_unknown: bool,
    pub is_age_based: bool,
}

/// A postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl Address {
    /// `street, city, province postal_code, country`, skipping blank parts.
    pub fn formatted(&self) -> String {
        let region = [self.province.as_deref(), self.postal_code.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        [
            self.street.clone(),
            self.city.clone(),
            Some(region),
            self.country.clone(),
        ]
        .into_iter()
        .flatten()
        .filter(|s| !s.trim().is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }

    pub fn is_empty(&self) -> bool {
        self.formatted().is_empty()
    }
}

/// A person tracked by an account holder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: Id<Contact>,
    pub account_id: Id<Account>,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub nickname: Option<String>,
    pub gender: Option<Gender>,
    pub is_partial: bool,
    pub is_dead: bool,
    pub birthdate: Option<Birthdate>,
    pub address: Option<Address>,
    pub avatar_file: Option<String>,
    pub default_avatar_color: String,
    pub last_talked_to: Option<NaiveDateTime>,
}

impl Contact {
    pub fn create(
        account_id: Id<Account>,
        first_name: String,
        default_avatar_color: String,
    ) -> Self {
        Self {
            id: Id::generate(),
            account_id,
            first_name,
            middle_name: None,
            last_name: None,
            nickname: None,
            gender: None,
            is_partial: false,
            is_dead: false,
            birthdate: None,
            address: None,
            avatar_file: None,
            default_avatar_color,
            last_talked_to: None,
        }
    }

    /// A placeholder contact that only exists inside someone's family graph.
    pub fn create_partial(
        account_id: Id<Account>,
        first_name: String,
        default_avatar_color: String,
    ) -> Self {
        let mut c = Self::create(account_id, first_name, default_avatar_color);
        c.is_partial = true;
        c
    }

    pub fn complete_name(&self, order: NameOrder) -> String {
        let parts = match order {
            NameOrder::FirstnameLastname => [
                Some(self.first_name.as_str()),
                self.middle_name.as_deref(),
                self.last_name.as_deref(),
            ],
            NameOrder::LastnameFirstname => [
                self.last_name.as_deref(),
                Some(self.first_name.as_str()),
                self.middle_name.as_deref(),
            ],
        };
        parts
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn name_with_nickname(&self, order: NameOrder) -> String {
        match self.nickname.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            Some(nick) => format!("{} ({})", self.complete_name(order), nick),
            None => self.complete_name(order),
        }
    }

    pub fn initials(&self) -> String {
        [
            Some(self.first_name.as_str()),
            self.middle_name.as_deref(),
            self.last_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter_map(|part| part.trim().chars().next())
        .flat_map(char::to_uppercase)
        .collect()
    }

    /// Age in whole years on `as_of`. `None` without a usable birth year.
    pub fn age(&self, as_of: NaiveDate) -> Option<u32> {
        let born = self.birthdate.filter(|b| !b.is_year_unknown)?.date;
        if as_of < born {
            return None;
        }
        let mut years = as_of.year() - born.year();
        if (as_of.month(), as_of.day()) < (born.month(), born.day()) {
            years -= 1;
        }
        u32::try_from(years).ok()
    }

    pub fn is_birthday_on(&self, date: NaiveDate) -> bool {
        self.birthdate
            .map(|b| b.date.month() == date.month() && b.date.day() == date.day())
            .unwrap_or(false)
    }

    pub fn formatted_address(&self) -> Option<String> {
        self.address
            .as_ref()
            .map(Address::formatted)
            .filter(|s| !s.is_empty())
    }

    pub fn avatar_url(&self, storage_url: &str) -> Option<String> {
        self.avatar_file
            .as_ref()
            .map(|file| format!("{}/{}", storage_url.trim_end_matches('/'), file))
    }

    pub fn avatar(&self, storage_url: &str) -> AvatarDescriptor {
        let avatar_url = self.avatar_url(storage_url);
        AvatarDescriptor {
            has_avatar: avatar_url.is_some(),
            avatar_url,
            default_avatar_color: self.default_avatar_color.clone(),
            initials: self.initials(),
        }
    }
}

/// What a client needs to draw a contact's avatar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvatarDescriptor {
    pub has_avatar: bool,
    pub avatar_url: Option<String>,
    pub default_avatar_color: String,
    pub initials: String,
}

/// How contacts are rendered in public projections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectionSettings {
    pub name_order: NameOrder,
    pub avatar_storage_url: String,
}

/// Reduced public representation of a contact, used in family listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactShort {
    pub id: Id<Contact>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub complete_name: String,
    pub initials: String,
    pub is_partial: bool,
    pub avatar: AvatarDescriptor,
}

impl ContactShort {
    pub fn from_contact(contact: &Contact, settings: &ProjectionSettings) -> Self {
        Self {
            id: contact.id,
            first_name: contact.first_name.clone(),
            last_name: contact.last_name.clone(),
            complete_name: contact.complete_name(settings.name_order),
            initials: contact.initials(),
            is_partial: contact.is_partial,
            avatar: contact.avatar(&settings.avatar_storage_url),
        }
    }
}
