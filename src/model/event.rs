use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::account::Account;
use super::ids::Id;

/// Kind of object an audit event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectType {
    Contact,
    Relationship,
    Offspring,
    Progenitor,
    Reminder,
    Note,
    Tag,
    Call,
    Debt,
}

impl ObjectType {
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "contact" => Some(ObjectType::Contact),
            "relationship" => Some(ObjectType::Relationship),
            "offspring" => Some(ObjectType::Offspring),
            "progenitor" => Some(ObjectType::Progenitor),
            "reminder" => Some(ObjectType::Reminder),
            "note" => Some(ObjectType::Note),
            "tag" => Some(ObjectType::Tag),
            "call" => Some(ObjectType::Call),
            "debt" => Some(ObjectType::Debt),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            ObjectType::Contact => "contact",
            ObjectType::Relationship => "relationship",
            ObjectType::Offspring => "offspring",
            ObjectType::Progenitor => "progenitor",
            ObjectType::Reminder => "reminder",
            ObjectType::Note => "note",
            ObjectType::Tag => "tag",
            ObjectType::Call => "call",
            ObjectType::Debt => "debt",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Add,
    Update,
    Delete,
}

impl Operation {
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "create" => Some(Operation::Add),
            "update" => Some(Operation::Update),
            "delete" => Some(Operation::Delete),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            Operation::Add => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

/// One row of the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Id<Event>,
    pub account_id: Id<Account>,
    pub object_type: ObjectType,
    pub object_id: String,
    pub nature_of_operation: Operation,
    pub created_at: NaiveDateTime,
}
