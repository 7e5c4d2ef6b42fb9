use async_trait::async_trait;

use crate::{
    db::error::DbResult,
    models::{Policy, Team},
};

/// Read-side team lookups consumed by the policy aggregator.
#[async_trait]
pub trait TeamRepo: Send + Sync {
    /// Get a team by its id.
    async fn get(&self, team_id: &str) -> DbResult<Option<Team>>;

    /// Ancestor chain of a team, nearest parent first; the team itself is
    /// excluded. A parent chain that revisits a team yields
    /// `DbError::CyclicHierarchy` instead of looping.
    async fn ancestors(&self, team_id: &str) -> DbResult<Vec<String>>;

    /// Policies attached directly to the team, in attachment order.
    async fn direct_policies(&self, team_id: &str) -> DbResult<Vec<Policy>>;
}
