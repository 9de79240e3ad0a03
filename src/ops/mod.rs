pub mod event_ops;
pub mod contact_ops;
pub mod family_ops;
pub mod record_ops;
