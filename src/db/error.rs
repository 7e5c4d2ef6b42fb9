use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid policy document: {0}")]
    InvalidPolicy(String),

    #[error("Cyclic team hierarchy at team '{team_id}'")]
    CyclicHierarchy { team_id: String },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type DbResult<T> = Result<T, DbError>;
