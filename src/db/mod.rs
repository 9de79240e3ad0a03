pub mod schema;
pub mod account_repo;
pub mod contact_repo;
pub mod family_repo;
pub mod reminder_repo;
pub mod record_repo;
pub mod event_repo;
