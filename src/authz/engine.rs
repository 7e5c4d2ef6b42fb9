//! Decision engine: deny-overrides-allow with default deny.

use super::{EffectivePolicySet, matches_any};
use crate::models::Effect;

/// Evaluate one (action, resource) pair against an effective policy set.
///
/// Every statement whose action patterns match `action` and whose resource
/// patterns match `resource` contributes its effect as a candidate. Any
/// matching Deny wins outright, regardless of position or how many Allows
/// also match; otherwise at least one matching Allow yields Allow; otherwise
/// the result is Deny. "No policy" is a normal Deny outcome, not an error.
///
/// Pure and total: no I/O, terminates for all well-formed inputs.
pub fn decide(policy_set: &EffectivePolicySet, action: &str, resource: &str) -> Effect {
    let mut matched_allow = false;

    for statement in policy_set.statements() {
        if !matches_any(&statement.actions, action) || !matches_any(&statement.resources, resource)
        {
            continue;
        }
        match statement.effect {
            Effect::Deny => {
                tracing::debug!(action, resource, "matching Deny statement overrides");
                return Effect::Deny;
            }
            Effect::Allow => matched_allow = true,
        }
    }

    if matched_allow { Effect::Allow } else { Effect::Deny }
}
