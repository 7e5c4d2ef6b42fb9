//! Engine configuration.

use serde::Deserialize;

/// Tuning knobs for policy resolution.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Upper bound on the length of a team's ancestor chain.
    ///
    /// Resolution fails with `CyclicTeamHierarchy` when a chain exceeds this
    /// bound, in addition to the visited-set check on the chain itself.
    #[serde(default = "default_max_hierarchy_depth")]
    pub max_hierarchy_depth: usize,

    /// Whether organization default policies participate in resolution.
    #[serde(default = "default_true")]
    pub org_default_policies: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_hierarchy_depth: default_max_hierarchy_depth(),
            org_default_policies: default_true(),
        }
    }
}

fn default_max_hierarchy_depth() -> usize {
    32
}

fn default_true() -> bool {
    true
}
