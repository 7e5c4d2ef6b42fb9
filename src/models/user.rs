use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validators::ID_REGEX;

/// Identity within an organization. Policy and team attachments are edges
/// held by the storage layer, not fields on the struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub org_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    /// Caller-supplied identifier; a UUID is generated when absent
    #[validate(regex(path = *ID_REGEX))]
    pub id: Option<String>,
    /// Display name
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// Update to a user's details and team memberships.
///
/// `team_ids` replaces the whole membership set when present; the update is
/// atomic so no resolution observes a partially replaced set.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub team_ids: Option<Vec<String>>,
}
