use std::sync::Arc;

use serde::Serialize;

use crate::{
    authz::{AuthzError, EffectivePolicySet, PolicyAggregator, decide, list_actions},
    config::EngineConfig,
    db::Store,
    models::Effect,
};

/// Outcome of an authorization check.
#[derive(Debug, Clone, Serialize)]
pub struct AccessDecision {
    pub access: Effect,
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        self.access.is_allow()
    }
}

/// Actions a user may perform on a resource, in resolution order.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizedActions {
    pub actions: Vec<String>,
}

/// Service layer for authorization checks.
///
/// Resolves the principal's effective policy set through the storage
/// collaborator, then evaluates it with the pure decision engine or lister.
/// Errors are surfaced to the caller, never coerced into a decision; a
/// caller that cannot fail the request hard must treat an error as Deny.
#[derive(Clone)]
pub struct AuthorizationService {
    aggregator: PolicyAggregator,
}

impl AuthorizationService {
    pub fn new(store: Arc<Store>) -> Self {
        Self {
            aggregator: PolicyAggregator::new(store),
        }
    }

    pub fn with_config(store: Arc<Store>, config: EngineConfig) -> Self {
        Self {
            aggregator: PolicyAggregator::with_config(store, config),
        }
    }

    /// Is this user allowed to perform this action on this resource?
    pub async fn authorize(
        &self,
        org_id: &str,
        user_id: &str,
        resource: &str,
        action: &str,
    ) -> Result<AccessDecision, AuthzError> {
        let policy_set = self.resolve(org_id, user_id).await?;
        let access = decide(&policy_set, action, resource);
        tracing::debug!(org_id, user_id, resource, action, access = %access, "authorization decision");
        Ok(AccessDecision { access })
    }

    /// Which actions may this user perform on this resource?
    pub async fn list_authorized_actions(
        &self,
        org_id: &str,
        user_id: &str,
        resource: &str,
    ) -> Result<AuthorizedActions, AuthzError> {
        let policy_set = self.resolve(org_id, user_id).await?;
        let actions = list_actions(&policy_set, resource);
        tracing::debug!(org_id, user_id, resource, allowed = actions.len(), "listed authorized actions");
        Ok(AuthorizedActions { actions })
    }

    async fn resolve(&self, org_id: &str, user_id: &str) -> Result<EffectivePolicySet, AuthzError> {
        self.aggregator.resolve(org_id, user_id).await.map_err(|e| {
            match &e {
                AuthzError::NotFound => {
                    tracing::debug!(org_id, user_id, "principal not found");
                }
                other => {
                    tracing::warn!(org_id, user_id, error = %other, "policy resolution failed");
                }
            }
            e
        })
    }
}
