//! Policy-based access control core.
//!
//! The evaluation flow:
//! 1. The aggregator resolves the principal's effective policy set (direct
//!    user policies, member-team policies including ancestors, organization
//!    defaults) through the storage collaborator.
//! 2. The decision engine evaluates one (action, resource) pair against the
//!    set with deny-overrides-allow and default deny.
//! 3. The lister enumerates the allowed actions on a resource with per-action
//!    sticky deny.
//!
//! The engine, lister, and pattern matcher are pure functions of their
//! inputs: no I/O, no shared state, safe to call concurrently.

mod aggregator;
mod engine;
mod error;
mod lister;

pub use aggregator::{EffectivePolicySet, PolicyAggregator};
pub use engine::decide;
pub use error::AuthzError;
pub use lister::list_actions;

/// Match a pattern against a value.
///
/// `*` matches any sequence of characters at its position, including none,
/// and including across delimiter boundaries. A pattern may contain any
/// number of wildcards; a pattern without one matches only the exact value.
///
/// # Examples
///
/// ```
/// use palisade::authz::matches;
///
/// assert!(matches("*", "anything"));
/// assert!(matches("database:pg01:*", "database:pg01:balancesheet"));
/// assert!(matches("*:balancesheet", "database:pg01:balancesheet"));
/// assert!(!matches("database:pg01:*", "database:pg02:balancesheet"));
/// assert!(matches("database:pg01:balancesheet", "database:pg01:balancesheet"));
/// ```
pub fn matches(pattern: &str, value: &str) -> bool {
    if !pattern.contains('*') {
        return pattern == value;
    }
    if pattern == "*" {
        return true;
    }
    glob_match(pattern.as_bytes(), value.as_bytes())
}

/// True if any pattern in the set matches the value. An empty pattern set
/// never matches.
pub fn matches_any<S: AsRef<str>>(patterns: &[S], value: &str) -> bool {
    patterns.iter().any(|p| matches(p.as_ref(), value))
}

/// Two-pointer glob scan where only `*` is special.
///
/// On mismatch, backtracks to the most recent `*` and widens what it
/// consumed by one byte. Byte-wise comparison is sound for UTF-8 since the
/// only special character is ASCII. This is the innermost loop of every
/// decision; it performs no allocation.
fn glob_match(pattern: &[u8], value: &[u8]) -> bool {
    let mut p = 0;
    let mut v = 0;
    let mut star: Option<usize> = None;
    let mut mark = 0;

    while v < value.len() {
        if p < pattern.len() && pattern[p] == b'*' {
            star = Some(p);
            mark = v;
            p += 1;
        } else if p < pattern.len() && pattern[p] == value[v] {
            p += 1;
            v += 1;
        } else if let Some(s) = star {
            p = s + 1;
            mark += 1;
            v = mark;
        } else {
            return false;
        }
    }

    while p < pattern.len() && pattern[p] == b'*' {
        p += 1;
    }
    p == pattern.len()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("*", "anything", true)]
    #[case("*", ":", true)]
    #[case("database:pg01:*", "database:pg01:balancesheet", true)]
    #[case("database:pg01:*", "database:pg01:", true)]
    #[case("database:pg01:*", "database:pg02:balancesheet", false)]
    #[case("*:balancesheet", "database:pg01:balancesheet", true)]
    #[case("*:balancesheet", "database:pg01:ledger", false)]
    #[case("database:*:balancesheet", "database:pg01:balancesheet", true)]
    #[case("database:*:balancesheet", "database:pg01:sub:balancesheet", true)]
    #[case("database:*:balancesheet", "database:pg01:balancesheets", false)]
    fn test_wildcard_matching(#[case] pattern: &str, #[case] value: &str, #[case] expected: bool) {
        assert_eq!(matches(pattern, value), expected);
    }

    #[test]
    fn test_exact_matching() {
        assert!(matches("finance:ReadBalanceSheet", "finance:ReadBalanceSheet"));
        assert!(!matches("finance:ReadBalanceSheet", "finance:ReadBalance"));
        assert!(!matches("finance:Read", "finance:ReadBalanceSheet"));
        assert!(!matches("finance:readbalancesheet", "finance:ReadBalanceSheet"));
    }

    #[test]
    fn test_wildcard_crosses_delimiters() {
        // Not segment-bounded: a single star may span multiple segments.
        assert!(matches("database:*", "database:pg01:balancesheet"));
        assert!(matches("*sheet", "database:pg01:balancesheet"));
    }

    #[test]
    fn test_multiple_wildcards() {
        assert!(matches("*:pg01:*", "database:pg01:balancesheet"));
        assert!(!matches("*:pg01:*", "database:pg02:balancesheet"));
        assert!(matches("d*:*sheet", "database:pg01:balancesheet"));
    }

    #[test]
    fn test_matches_any() {
        let patterns = ["finance:Read*", "finance:Audit"];
        assert!(matches_any(&patterns, "finance:ReadBalanceSheet"));
        assert!(matches_any(&patterns, "finance:Audit"));
        assert!(!matches_any(&patterns, "finance:Write"));
    }

    #[test]
    fn test_empty_pattern_set_never_matches() {
        let patterns: [&str; 0] = [];
        assert!(!matches_any(&patterns, "anything"));
    }
}
