//! Authorization lister: enumerate the actions a policy set allows on a
//! resource.

use super::{EffectivePolicySet, matches, matches_any};
use crate::models::Effect;

/// List the action names whose resolved effect on `resource` is Allow, in
/// first-seen order.
///
/// Statements are processed in the aggregator's fixed order. For each
/// statement whose resource patterns match, every literal action name is
/// entered into (or updated in) an action→effect map; a wildcard action
/// pattern cannot be enumerated into concrete names and is instead applied
/// to the names already seen. Per name, Deny is sticky: once an action
/// resolves to Deny, a later Allow never resurrects it.
///
/// Names resolved to Deny are omitted from the result; absence means "not
/// authorized", consistent with default deny.
pub fn list_actions(policy_set: &EffectivePolicySet, resource: &str) -> Vec<String> {
    let mut resolved: Vec<(String, Effect)> = Vec::new();

    for statement in policy_set.statements() {
        if !matches_any(&statement.resources, resource) {
            continue;
        }
        for action in &statement.actions {
            if action.contains('*') {
                for (name, effect) in resolved.iter_mut() {
                    if matches(action, name) {
                        apply(effect, statement.effect);
                    }
                }
            } else {
                match resolved.iter_mut().find(|(name, _)| name == action) {
                    Some((_, effect)) => apply(effect, statement.effect),
                    None => resolved.push((action.clone(), statement.effect)),
                }
            }
        }
    }

    resolved
        .into_iter()
        .filter_map(|(name, effect)| effect.is_allow().then_some(name))
        .collect()
}

// Once denied, an action stays denied within this resolution pass.
fn apply(current: &mut Effect, incoming: Effect) {
    if incoming == Effect::Deny {
        *current = Effect::Deny;
    }
}
