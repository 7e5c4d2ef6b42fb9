use async_trait::async_trait;

use crate::{db::error::DbResult, models::Policy};

/// Read-side policy lookups consumed by the policy aggregator.
#[async_trait]
pub trait PolicyRepo: Send + Sync {
    /// Get a policy by its id.
    async fn get(&self, policy_id: &str) -> DbResult<Option<Policy>>;

    /// Organization default policies, applied to every principal in the
    /// organization at resolution time.
    async fn org_default_policies(&self, org_id: &str) -> DbResult<Vec<Policy>>;
}
