use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validators::ID_REGEX;

/// Tenant boundary. Every user, team, and org-owned policy belongs to
/// exactly one organization; cross-organization references are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrganization {
    /// Caller-supplied identifier; a UUID is generated when absent
    #[validate(regex(path = *ID_REGEX))]
    pub id: Option<String>,
    /// Display name
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 1024))]
    pub description: Option<String>,
}
