use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validators::ID_REGEX;

/// Named group within an organization.
///
/// Teams form a forest via the nullable parent reference. A team's effective
/// policy set includes its own attached policies plus the policies attached
/// to every ancestor up to the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub org_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Parent team, if any (stored as a reference, never a back-pointer graph)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTeam {
    /// Caller-supplied identifier; a UUID is generated when absent
    #[validate(regex(path = *ID_REGEX))]
    pub id: Option<String>,
    /// Display name
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 1024))]
    pub description: Option<String>,
    /// Parent team within the same organization
    pub parent_id: Option<String>,
}
