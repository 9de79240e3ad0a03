pub mod contact_queries;
pub mod family_queries;
