use async_trait::async_trait;

use crate::{
    db::error::DbResult,
    models::{Policy, User},
};

/// Read-side user lookups consumed by the policy aggregator.
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Get a user by id within an organization.
    async fn get(&self, org_id: &str, user_id: &str) -> DbResult<Option<User>>;

    /// Policies attached directly to the user, in attachment order.
    async fn direct_policies(&self, user_id: &str) -> DbResult<Vec<Policy>>;

    /// Ids of the teams the user is a member of, in membership order.
    async fn team_ids(&self, user_id: &str) -> DbResult<Vec<String>>;
}
