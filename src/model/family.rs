use serde::{Deserialize, Serialize};

use super::account::Account;
use super::contact::Contact;
use super::ids::Id;

/// Directed "is partnered with" edge. A bilateral partnership is stored as
/// two of these, one per direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipEdge {
    pub id: Id<RelationshipEdge>,
    pub account_id: Id<Account>,
    pub contact_id: Id<Contact>,
    pub with_contact_id: Id<Contact>,
    pub is_active: bool,
}

impl RelationshipEdge {
    pub fn create(
        account_id: Id<Account>,
        contact_id: Id<Contact>,
        with_contact_id: Id<Contact>,
    ) -> Self {
        Self {
            id: Id::generate(),
            account_id,
            contact_id,
            with_contact_id,
            is_active: true,
        }
    }
}

/// Directed "is child of" edge: `contact_id` is the child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffspringEdge {
    pub id: Id<OffspringEdge>,
    pub account_id: Id<Account>,
    pub contact_id: Id<Contact>,
    pub is_the_child_of: Id<Contact>,
}

impl OffspringEdge {
    pub fn create(account_id: Id<Account>, child: Id<Contact>, parent: Id<Contact>) -> Self {
        Self {
            id: Id::generate(),
            account_id,
            contact_id: child,
            is_the_child_of: parent,
        }
    }
}

/// Directed "is parent of" edge: `contact_id` is the parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgenitorEdge {
    pub id: Id<ProgenitorEdge>,
    pub account_id: Id<Account>,
    pub contact_id: Id<Contact>,
    pub is_the_parent_of: Id<Contact>,
}

impl ProgenitorEdge {
    pub fn create(account_id: Id<Account>, parent: Id<Contact>, child: Id<Contact>) -> Self {
        Self {
            id: Id::generate(),
            account_id,
            contact_id: parent,
            is_the_parent_of: child,
        }
    }
}
