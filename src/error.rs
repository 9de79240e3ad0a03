use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrmError {
    #[error("{field} cannot be blank")]
    BlankField { field: String },

    #[error("{field} must be positive")]
    NonPositive { field: String },

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Contacts {first} and {second} belong to different accounts")]
    CrossAccount { first: String, second: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl PrmError {
    pub fn not_found(entity_type: &str, id: impl ToString) -> Self {
        PrmError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PrmError::NotFound { .. })
    }
}

pub type PrmResult<T> = Result<T, PrmError>;
