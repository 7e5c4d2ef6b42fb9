//! Policy aggregator: resolve the full set of policy documents that apply to
//! a principal.

use std::collections::HashSet;
use std::sync::Arc;

use super::AuthzError;
use crate::{
    config::EngineConfig,
    db::Store,
    models::{Policy, Statement},
};

/// Flattened, request-scoped sequence of statements applicable to one
/// principal for one evaluation.
///
/// Never persisted; rebuilt on every decision request and discarded after.
/// The statement order is the aggregator's fixed concatenation order, which
/// the order-sensitive lister depends on; the decision engine's combination
/// rule is order-independent.
#[derive(Debug, Clone, Default)]
pub struct EffectivePolicySet {
    statements: Vec<Statement>,
}

impl EffectivePolicySet {
    /// Build a set from pre-resolved statements, preserving their order.
    pub fn from_statements(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    pub fn statements(&self) -> std::slice::Iter<'_, Statement> {
        self.statements.iter()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// Resolves a principal into its effective policy set through the storage
/// collaborator.
///
/// Fixed concatenation order (relied on by [`super::list_actions`]):
/// 1. policies attached directly to the user, in attachment order;
/// 2. for each member team in membership order: the team's own policies,
///    then its ancestors' policies walking leaf to root;
/// 3. organization default policies.
///
/// A policy reachable through multiple paths is counted once, at its first
/// position in that order.
#[derive(Clone)]
pub struct PolicyAggregator {
    store: Arc<Store>,
    config: EngineConfig,
}

impl PolicyAggregator {
    pub fn new(store: Arc<Store>) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    pub fn with_config(store: Arc<Store>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// Resolve the effective policy set for a user within an organization.
    ///
    /// Fails with [`AuthzError::NotFound`] when the user does not exist in
    /// the organization, [`AuthzError::CyclicTeamHierarchy`] when a team
    /// parent chain revisits a team or exceeds the configured depth bound,
    /// and [`AuthzError::StorageUnavailable`] on lookup failure (propagated,
    /// not retried here).
    pub async fn resolve(
        &self,
        org_id: &str,
        user_id: &str,
    ) -> Result<EffectivePolicySet, AuthzError> {
        let users = self.store.users();
        if users.get(org_id, user_id).await?.is_none() {
            return Err(AuthzError::NotFound);
        }

        let mut seen = HashSet::new();
        let mut set = EffectivePolicySet::default();

        for policy in users.direct_policies(user_id).await? {
            append(&mut set, &mut seen, policy);
        }

        let teams = self.store.teams();
        for team_id in users.team_ids(user_id).await? {
            for policy in teams.direct_policies(&team_id).await? {
                append(&mut set, &mut seen, policy);
            }
            let ancestors = teams.ancestors(&team_id).await?;
            self.check_chain(&team_id, &ancestors)?;
            for ancestor_id in &ancestors {
                for policy in teams.direct_policies(ancestor_id).await? {
                    append(&mut set, &mut seen, policy);
                }
            }
        }

        if self.config.org_default_policies {
            for policy in self.store.policies().org_default_policies(org_id).await? {
                append(&mut set, &mut seen, policy);
            }
        }

        tracing::debug!(
            org_id,
            user_id,
            policies = seen.len(),
            statements = set.len(),
            "resolved effective policy set"
        );
        Ok(set)
    }

    // Re-check the chain the storage collaborator returned: a revisited team
    // or an over-deep chain is rejected rather than walked.
    fn check_chain(&self, team_id: &str, ancestors: &[String]) -> Result<(), AuthzError> {
        if ancestors.len() > self.config.max_hierarchy_depth {
            return Err(AuthzError::CyclicTeamHierarchy {
                team_id: team_id.to_string(),
            });
        }
        let mut visited: HashSet<&str> = HashSet::with_capacity(ancestors.len() + 1);
        visited.insert(team_id);
        for ancestor in ancestors {
            if !visited.insert(ancestor) {
                return Err(AuthzError::CyclicTeamHierarchy {
                    team_id: ancestor.clone(),
                });
            }
        }
        Ok(())
    }
}

fn append(set: &mut EffectivePolicySet, seen: &mut HashSet<String>, policy: Policy) {
    if seen.insert(policy.id) {
        set.statements.extend(policy.statements);
    }
}
