use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::account::Account;
use super::contact::Contact;
use super::ids::Id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: Id<Note>,
    pub contact_id: Id<Contact>,
    pub body: String,
    pub is_favorited: bool,
    pub created_at: NaiveDateTime,
}

impl Note {
    pub fn create(contact_id: Id<Contact>, body: String, created_at: NaiveDateTime) -> Self {
        Self {
            id: Id::generate(),
            contact_id,
            body,
            is_favorited: false,
            created_at,
        }
    }
}

/// A free-form label; names are unique per account, ignoring case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Id<Tag>,
    pub account_id: Id<Account>,
    pub name: String,
}

impl Tag {
    pub fn create(account_id: Id<Account>, name: String) -> Self {
        Self {
            id: Id::generate(),
            account_id,
            name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub id: Id<Call>,
    pub contact_id: Id<Contact>,
    pub called_at: NaiveDateTime,
    pub content: Option<String>,
}

impl Call {
    pub fn create(
        contact_id: Id<Contact>,
        called_at: NaiveDateTime,
        content: Option<String>,
    ) -> Self {
        Self {
            id: Id::generate(),
            contact_id,
            called_at,
            content,
        }
    }
}

/// Who owes whom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebtDirection {
    /// The contact owes the account holder.
    ContactOwes,
    /// The account holder owes the contact.
    UserOwes,
}

impl DebtDirection {
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "yes" => Some(DebtDirection::ContactOwes),
            "no" => Some(DebtDirection::UserOwes),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            DebtDirection::ContactOwes => "yes",
            DebtDirection::UserOwes => "no",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebtStatus {
    InProgress,
    Complete,
}

impl DebtStatus {
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "inprogress" => Some(DebtStatus::InProgress),
            "complete" => Some(DebtStatus::Complete),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            DebtStatus::InProgress => "inprogress",
            DebtStatus::Complete => "complete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub id: Id<Debt>,
    pub contact_id: Id<Contact>,
    pub direction: DebtDirection,
    pub amount: f64,
    pub reason: Option<String>,
    pub status: DebtStatus,
}

impl Debt {
    pub fn create(
        contact_id: Id<Contact>,
        direction: DebtDirection,
        amount: f64,
        reason: Option<String>,
    ) -> Self {
        Self {
            id: Id::generate(),
            contact_id,
            direction,
            amount,
            reason,
            status: DebtStatus::InProgress,
        }
    }

    /// Positive when the contact owes the account holder.
    pub fn signed_amount(&self) -> f64 {
        match self.direction {
            DebtDirection::ContactOwes => self.amount,
            DebtDirection::UserOwes => -self.amount,
        }
    }
}
