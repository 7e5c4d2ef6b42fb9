use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validators::ID_REGEX;

/// Statement effect.
///
/// A closed two-variant enum so an unknown effect is unrepresentable past
/// policy-load time; documents carrying anything other than `"Allow"` or
/// `"Deny"` are rejected when the policy is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

impl Effect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "Allow",
            Self::Deny => "Deny",
        }
    }

    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

impl std::fmt::Display for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Effect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Allow" => Ok(Effect::Allow),
            "Deny" => Ok(Effect::Deny),
            _ => Err(format!("Invalid statement effect: {}", s)),
        }
    }
}

/// One Effect/Action-set/Resource-set rule within a policy.
///
/// Wire shape (PascalCase keys) matches the persisted policy documents:
/// `{ "Effect": "Allow", "Action": [...], "Resource": [...] }`. An absent
/// `Action` or `Resource` list is an empty set, which never matches anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    #[serde(rename = "Effect")]
    pub effect: Effect,
    #[serde(rename = "Action", default)]
    pub actions: Vec<String>,
    #[serde(rename = "Resource", default)]
    pub resources: Vec<String>,
}

impl Statement {
    pub fn new(
        effect: Effect,
        actions: impl IntoIterator<Item = impl Into<String>>,
        resources: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            effect,
            actions: actions.into_iter().map(Into::into).collect(),
            resources: resources.into_iter().map(Into::into).collect(),
        }
    }
}

/// Self-contained statement document stored alongside a policy's identity
/// metadata: `{ "Statement": [ ... ] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyDocument {
    #[serde(rename = "Statement")]
    pub statements: Vec<Statement>,
}

/// Versioned, identified policy document.
///
/// Policies are referenced many-to-many by users and teams; a policy is not
/// owned by any single principal and may be shared. `org_id: None` marks a
/// shared policy visible org-wide as an organization default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    pub name: String,
    pub version: String,
    pub statements: Vec<Statement>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePolicy {
    /// Caller-supplied identifier; a UUID is generated when absent
    #[validate(regex(path = *ID_REGEX))]
    pub id: Option<String>,
    /// Display name
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    /// Document version tag (e.g. "0.1")
    #[validate(length(min = 1, max = 32))]
    pub version: String,
    /// Raw statement document; parsed and validated at creation time
    pub document: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_round_trip() {
        assert_eq!("Allow".parse::<Effect>().unwrap(), Effect::Allow);
        assert_eq!("Deny".parse::<Effect>().unwrap(), Effect::Deny);
        assert_eq!(Effect::Allow.to_string(), "Allow");
    }

    #[test]
    fn test_effect_rejects_unknown_values() {
        assert!("allow".parse::<Effect>().is_err());
        assert!("Maybe".parse::<Effect>().is_err());
        assert!("".parse::<Effect>().is_err());
    }

    #[test]
    fn test_statement_wire_shape() {
        let statement: Statement = serde_json::from_str(
            r#"{"Effect": "Allow", "Action": ["finance:ReadBalanceSheet"], "Resource": ["database:pg01:balancesheet"]}"#,
        )
        .unwrap();
        assert_eq!(statement.effect, Effect::Allow);
        assert_eq!(statement.actions, vec!["finance:ReadBalanceSheet"]);
        assert_eq!(statement.resources, vec!["database:pg01:balancesheet"]);
    }

    #[test]
    fn test_statement_missing_sets_default_to_empty() {
        let statement: Statement = serde_json::from_str(r#"{"Effect": "Deny"}"#).unwrap();
        assert!(statement.actions.is_empty());
        assert!(statement.resources.is_empty());
    }

    #[test]
    fn test_statement_missing_effect_is_rejected() {
        let result: Result<Statement, _> =
            serde_json::from_str(r#"{"Action": ["a"], "Resource": ["r"]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_statement_unknown_effect_is_rejected() {
        let result: Result<Statement, _> =
            serde_json::from_str(r#"{"Effect": "Grant", "Action": ["a"], "Resource": ["r"]}"#);
        assert!(result.is_err());
    }
}
