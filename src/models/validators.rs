use std::sync::LazyLock;

use regex::Regex;

/// Regex for validating caller-supplied identifiers.
/// Examples: "WONKA", "U1", "team-accountants", "policy_42"
pub static ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.:-]{0,127}$").unwrap());
