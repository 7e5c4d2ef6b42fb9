//! Authorization errors.

use thiserror::Error;

use crate::db::DbError;

#[derive(Debug, Error)]
pub enum AuthzError {
    /// The principal does not exist in the organization.
    #[error("Principal not found")]
    NotFound,

    /// A statement is malformed (missing effect, or an effect outside
    /// Allow/Deny). Surfaced at resolution time, never during evaluation.
    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    /// The storage collaborator failed. Propagated unchanged; retry policy
    /// belongs to the caller.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[source] DbError),

    /// A team parent chain revisits a team. Fatal to the single resolution.
    #[error("Cyclic team hierarchy at team '{team_id}'")]
    CyclicTeamHierarchy { team_id: String },
}

impl From<DbError> for AuthzError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound => AuthzError::NotFound,
            DbError::InvalidPolicy(reason) => AuthzError::InvalidPolicy(reason),
            DbError::CyclicHierarchy { team_id } => AuthzError::CyclicTeamHierarchy { team_id },
            other => AuthzError::StorageUnavailable(other),
        }
    }
}
