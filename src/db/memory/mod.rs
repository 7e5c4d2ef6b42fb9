//! In-memory storage backend.
//!
//! Backs the repository traits with concurrent maps, and carries the
//! administrative mutation surface (create/update/delete of organizations,
//! users, teams, policies and their attachments) that the read-side traits
//! deliberately do not expose. Attachment sets are replaced by swapping the
//! whole list under one map entry, so a concurrent resolution sees either
//! the old set or the new one, never a half-updated mix.

mod repos;

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;
use validator::Validate;

pub use repos::{MemoryPolicyRepo, MemoryTeamRepo, MemoryUserRepo};

use crate::{
    db::{DbError, DbResult, Store},
    models::{
        CreateOrganization, CreatePolicy, CreateTeam, CreateUser, Organization, Policy,
        PolicyDocument, Team, UpdateUser, User,
    },
};

#[derive(Default)]
pub(crate) struct MemoryData {
    pub(crate) organizations: DashMap<String, Organization>,
    pub(crate) users: DashMap<String, User>,
    pub(crate) teams: DashMap<String, Team>,
    pub(crate) policies: DashMap<String, Policy>,
    /// user id -> policy ids, in attachment order
    pub(crate) user_policies: DashMap<String, Vec<String>>,
    /// user id -> team ids, in membership order
    pub(crate) user_teams: DashMap<String, Vec<String>>,
    /// team id -> policy ids, in attachment order
    pub(crate) team_policies: DashMap<String, Vec<String>>,
    /// org id -> default policy ids
    pub(crate) org_defaults: DashMap<String, Vec<String>>,
}

impl MemoryData {
    pub(crate) fn policies_by_ids(&self, ids: &[String]) -> DbResult<Vec<Policy>> {
        ids.iter()
            .map(|id| {
                self.policies
                    .get(id)
                    .map(|p| p.value().clone())
                    .ok_or(DbError::NotFound)
            })
            .collect()
    }
}

/// In-memory database handle. Cheap to clone; clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryDb {
    data: Arc<MemoryData>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the read-side [`Store`] over this database's data.
    pub fn store(&self) -> Store {
        Store::new(
            Arc::new(MemoryUserRepo::new(self.data.clone())),
            Arc::new(MemoryTeamRepo::new(self.data.clone())),
            Arc::new(MemoryPolicyRepo::new(self.data.clone())),
        )
    }

    // ========================================================================
    // Organizations
    // ========================================================================

    pub fn create_organization(&self, input: CreateOrganization) -> DbResult<Organization> {
        input
            .validate()
            .map_err(|e| DbError::Validation(e.to_string()))?;
        let id = input.id.unwrap_or_else(generate_id);
        if self.data.organizations.contains_key(&id) {
            return Err(DbError::Conflict(format!(
                "organization '{}' already exists",
                id
            )));
        }
        let org = Organization {
            id: id.clone(),
            name: input.name,
            description: input.description,
            created_at: Utc::now(),
        };
        self.data.organizations.insert(id, org.clone());
        Ok(org)
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub fn create_user(&self, org_id: &str, input: CreateUser) -> DbResult<User> {
        input
            .validate()
            .map_err(|e| DbError::Validation(e.to_string()))?;
        self.require_org(org_id)?;
        let id = input.id.unwrap_or_else(generate_id);
        if self.data.users.contains_key(&id) {
            return Err(DbError::Conflict(format!("user '{}' already exists", id)));
        }
        let user = User {
            id: id.clone(),
            org_id: org_id.to_string(),
            name: input.name,
            created_at: Utc::now(),
        };
        self.data.users.insert(id, user.clone());
        Ok(user)
    }

    /// Update a user's details and, when `team_ids` is present, replace the
    /// whole membership set in one swap.
    pub fn update_user(&self, org_id: &str, user_id: &str, input: UpdateUser) -> DbResult<User> {
        input
            .validate()
            .map_err(|e| DbError::Validation(e.to_string()))?;
        self.require_user(org_id, user_id)?;

        if let Some(team_ids) = &input.team_ids {
            for team_id in team_ids {
                let team = self.data.teams.get(team_id).ok_or(DbError::NotFound)?;
                if team.org_id != org_id {
                    return Err(DbError::Validation(format!(
                        "team '{}' belongs to another organization",
                        team_id
                    )));
                }
            }
            self.data
                .user_teams
                .insert(user_id.to_string(), team_ids.clone());
        }

        let mut user = self.data.users.get_mut(user_id).ok_or(DbError::NotFound)?;
        if let Some(name) = input.name {
            user.name = name;
        }
        Ok(user.clone())
    }

    pub fn delete_user(&self, org_id: &str, user_id: &str) -> DbResult<()> {
        self.require_user(org_id, user_id)?;
        self.data.user_policies.remove(user_id);
        self.data.user_teams.remove(user_id);
        self.data.users.remove(user_id);
        Ok(())
    }

    // ========================================================================
    // Teams
    // ========================================================================

    pub fn create_team(&self, org_id: &str, input: CreateTeam) -> DbResult<Team> {
        input
            .validate()
            .map_err(|e| DbError::Validation(e.to_string()))?;
        self.require_org(org_id)?;
        if let Some(parent_id) = &input.parent_id {
            let parent = self.data.teams.get(parent_id).ok_or(DbError::NotFound)?;
            if parent.org_id != org_id {
                return Err(DbError::Validation(format!(
                    "parent team '{}' belongs to another organization",
                    parent_id
                )));
            }
        }
        let id = input.id.unwrap_or_else(generate_id);
        if self.data.teams.contains_key(&id) {
            return Err(DbError::Conflict(format!("team '{}' already exists", id)));
        }
        let team = Team {
            id: id.clone(),
            org_id: org_id.to_string(),
            name: input.name,
            description: input.description,
            parent_id: input.parent_id,
            created_at: Utc::now(),
        };
        self.data.teams.insert(id, team.clone());
        Ok(team)
    }

    /// Re-parent a team. The write is not cycle-checked; cycles are detected
    /// and rejected at resolution time by the iterative ancestor walk.
    pub fn set_team_parent(&self, team_id: &str, parent_id: Option<&str>) -> DbResult<()> {
        if let Some(parent_id) = parent_id
            && !self.data.teams.contains_key(parent_id)
        {
            return Err(DbError::NotFound);
        }
        let mut team = self.data.teams.get_mut(team_id).ok_or(DbError::NotFound)?;
        team.parent_id = parent_id.map(str::to_string);
        Ok(())
    }

    // ========================================================================
    // Policies and attachments
    // ========================================================================

    /// Create a policy. The statement document is parsed here: a missing or
    /// unknown effect is an [`DbError::InvalidPolicy`] at creation time and
    /// can therefore never reach evaluation.
    pub fn create_policy(&self, org_id: Option<&str>, input: CreatePolicy) -> DbResult<Policy> {
        input
            .validate()
            .map_err(|e| DbError::Validation(e.to_string()))?;
        if let Some(org_id) = org_id {
            self.require_org(org_id)?;
        }
        let document: PolicyDocument = serde_json::from_value(input.document)
            .map_err(|e| DbError::InvalidPolicy(e.to_string()))?;
        let id = input.id.unwrap_or_else(generate_id);
        if self.data.policies.contains_key(&id) {
            return Err(DbError::Conflict(format!("policy '{}' already exists", id)));
        }
        let policy = Policy {
            id: id.clone(),
            org_id: org_id.map(str::to_string),
            name: input.name,
            version: input.version,
            statements: document.statements,
            created_at: Utc::now(),
        };
        self.data.policies.insert(id, policy.clone());
        Ok(policy)
    }

    /// Replace all of a user's policy attachments in one swap.
    pub fn replace_user_policies(&self, user_id: &str, policy_ids: &[&str]) -> DbResult<()> {
        let user = self.data.users.get(user_id).ok_or(DbError::NotFound)?;
        let org_id = user.org_id.clone();
        drop(user);
        let ids = self.checked_policy_ids(&org_id, policy_ids)?;
        self.data.user_policies.insert(user_id.to_string(), ids);
        Ok(())
    }

    /// Attach policies to a user; ids already attached are skipped.
    pub fn add_user_policies(&self, user_id: &str, policy_ids: &[&str]) -> DbResult<()> {
        let user = self.data.users.get(user_id).ok_or(DbError::NotFound)?;
        let org_id = user.org_id.clone();
        drop(user);
        let new_ids = self.checked_policy_ids(&org_id, policy_ids)?;
        let mut attached = self
            .data
            .user_policies
            .get(user_id)
            .map(|v| v.value().clone())
            .unwrap_or_default();
        for id in new_ids {
            if !attached.contains(&id) {
                attached.push(id);
            }
        }
        self.data.user_policies.insert(user_id.to_string(), attached);
        Ok(())
    }

    pub fn delete_user_policies(&self, user_id: &str) -> DbResult<()> {
        if !self.data.users.contains_key(user_id) {
            return Err(DbError::NotFound);
        }
        self.data.user_policies.remove(user_id);
        Ok(())
    }

    pub fn delete_user_policy(&self, user_id: &str, policy_id: &str) -> DbResult<()> {
        let mut attached = self
            .data
            .user_policies
            .get_mut(user_id)
            .ok_or(DbError::NotFound)?;
        attached.retain(|id| id != policy_id);
        Ok(())
    }

    /// Replace all of a team's policy attachments in one swap.
    pub fn replace_team_policies(&self, team_id: &str, policy_ids: &[&str]) -> DbResult<()> {
        let team = self.data.teams.get(team_id).ok_or(DbError::NotFound)?;
        let org_id = team.org_id.clone();
        drop(team);
        let ids = self.checked_policy_ids(&org_id, policy_ids)?;
        self.data.team_policies.insert(team_id.to_string(), ids);
        Ok(())
    }

    /// Set the organization's default policy list, applied to every
    /// principal in the organization at resolution time.
    pub fn set_org_default_policies(&self, org_id: &str, policy_ids: &[&str]) -> DbResult<()> {
        self.require_org(org_id)?;
        let ids = self.checked_policy_ids(org_id, policy_ids)?;
        self.data.org_defaults.insert(org_id.to_string(), ids);
        Ok(())
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn require_org(&self, org_id: &str) -> DbResult<()> {
        if !self.data.organizations.contains_key(org_id) {
            return Err(DbError::Validation(format!(
                "organization '{}' does not exist",
                org_id
            )));
        }
        Ok(())
    }

    fn require_user(&self, org_id: &str, user_id: &str) -> DbResult<()> {
        match self.data.users.get(user_id) {
            Some(user) if user.org_id == org_id => Ok(()),
            _ => Err(DbError::NotFound),
        }
    }

    /// Resolve attachment ids: every policy must exist and be either shared
    /// (no owning organization) or owned by the attaching organization.
    fn checked_policy_ids(&self, org_id: &str, policy_ids: &[&str]) -> DbResult<Vec<String>> {
        policy_ids
            .iter()
            .map(|id| {
                let policy = self.data.policies.get(*id).ok_or(DbError::NotFound)?;
                match &policy.org_id {
                    Some(owner) if owner != org_id => Err(DbError::Validation(format!(
                        "policy '{}' belongs to another organization",
                        id
                    ))),
                    _ => Ok(policy.id.clone()),
                }
            })
            .collect()
    }
}

fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::Effect;

    fn org_input(id: &str) -> CreateOrganization {
        CreateOrganization {
            id: Some(id.to_string()),
            name: format!("Org {}", id),
            description: None,
        }
    }

    fn user_input(id: &str) -> CreateUser {
        CreateUser {
            id: Some(id.to_string()),
            name: format!("User {}", id),
        }
    }

    fn team_input(id: &str, parent_id: Option<&str>) -> CreateTeam {
        CreateTeam {
            id: Some(id.to_string()),
            name: format!("Team {}", id),
            description: None,
            parent_id: parent_id.map(str::to_string),
        }
    }

    fn policy_input(id: &str) -> CreatePolicy {
        CreatePolicy {
            id: Some(id.to_string()),
            name: format!("Policy {}", id),
            version: "0.1".to_string(),
            document: json!({
                "Statement": [
                    {"Effect": "Allow", "Action": ["finance:Read"], "Resource": ["db:*"]}
                ]
            }),
        }
    }

    #[test]
    fn test_create_user_requires_existing_org() {
        let db = MemoryDb::new();
        let err = db.create_user("GHOST", user_input("U1")).unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }

    #[test]
    fn test_generated_id_when_absent() {
        let db = MemoryDb::new();
        db.create_organization(org_input("ACME")).unwrap();
        let user = db
            .create_user(
                "ACME",
                CreateUser {
                    id: None,
                    name: "Anon".to_string(),
                },
            )
            .unwrap();
        assert!(!user.id.is_empty());
    }

    #[test]
    fn test_duplicate_ids_conflict() {
        let db = MemoryDb::new();
        db.create_organization(org_input("ACME")).unwrap();
        db.create_user("ACME", user_input("U1")).unwrap();
        let err = db.create_user("ACME", user_input("U1")).unwrap_err();
        assert!(matches!(err, DbError::Conflict(_)));
    }

    #[test]
    fn test_create_policy_parses_document() {
        let db = MemoryDb::new();
        db.create_organization(org_input("ACME")).unwrap();
        let policy = db.create_policy(Some("ACME"), policy_input("P1")).unwrap();
        assert_eq!(policy.statements.len(), 1);
        assert_eq!(policy.statements[0].effect, Effect::Allow);
    }

    #[test]
    fn test_create_policy_rejects_unknown_effect() {
        let db = MemoryDb::new();
        db.create_organization(org_input("ACME")).unwrap();
        let input = CreatePolicy {
            document: json!({
                "Statement": [{"Effect": "Grant", "Action": ["a"], "Resource": ["r"]}]
            }),
            ..policy_input("P1")
        };
        let err = db.create_policy(Some("ACME"), input).unwrap_err();
        assert!(matches!(err, DbError::InvalidPolicy(_)));
    }

    #[test]
    fn test_create_policy_rejects_missing_effect() {
        let db = MemoryDb::new();
        db.create_organization(org_input("ACME")).unwrap();
        let input = CreatePolicy {
            document: json!({"Statement": [{"Action": ["a"], "Resource": ["r"]}]}),
            ..policy_input("P1")
        };
        let err = db.create_policy(Some("ACME"), input).unwrap_err();
        assert!(matches!(err, DbError::InvalidPolicy(_)));
    }

    #[test]
    fn test_cross_org_policy_attachment_rejected() {
        let db = MemoryDb::new();
        db.create_organization(org_input("ACME")).unwrap();
        db.create_organization(org_input("EVIL")).unwrap();
        db.create_user("ACME", user_input("U1")).unwrap();
        db.create_policy(Some("EVIL"), policy_input("P1")).unwrap();

        let err = db.replace_user_policies("U1", &["P1"]).unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }

    #[test]
    fn test_shared_policy_attaches_anywhere() {
        let db = MemoryDb::new();
        db.create_organization(org_input("ACME")).unwrap();
        db.create_user("ACME", user_input("U1")).unwrap();
        db.create_policy(None, policy_input("SHARED")).unwrap();
        db.replace_user_policies("U1", &["SHARED"]).unwrap();
    }

    #[test]
    fn test_cross_org_team_parent_rejected() {
        let db = MemoryDb::new();
        db.create_organization(org_input("ACME")).unwrap();
        db.create_organization(org_input("EVIL")).unwrap();
        db.create_team("EVIL", team_input("T-EVIL", None)).unwrap();
        let err = db
            .create_team("ACME", team_input("T1", Some("T-EVIL")))
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }

    #[test]
    fn test_add_user_policies_skips_already_attached() {
        let db = MemoryDb::new();
        db.create_organization(org_input("ACME")).unwrap();
        db.create_user("ACME", user_input("U1")).unwrap();
        db.create_policy(Some("ACME"), policy_input("P1")).unwrap();
        db.create_policy(Some("ACME"), policy_input("P2")).unwrap();

        db.add_user_policies("U1", &["P1"]).unwrap();
        db.add_user_policies("U1", &["P1", "P2"]).unwrap();
        let attached = db.data.user_policies.get("U1").unwrap().value().clone();
        assert_eq!(attached, vec!["P1", "P2"]);
    }

    #[test]
    fn test_detach_one_policy_then_all() {
        let db = MemoryDb::new();
        db.create_organization(org_input("ACME")).unwrap();
        db.create_user("ACME", user_input("U1")).unwrap();
        db.create_policy(Some("ACME"), policy_input("P1")).unwrap();
        db.create_policy(Some("ACME"), policy_input("P2")).unwrap();
        db.replace_user_policies("U1", &["P1", "P2"]).unwrap();

        db.delete_user_policy("U1", "P1").unwrap();
        let attached = db.data.user_policies.get("U1").unwrap().value().clone();
        assert_eq!(attached, vec!["P2"]);

        db.delete_user_policies("U1").unwrap();
        assert!(db.data.user_policies.get("U1").is_none());
    }

    #[test]
    fn test_delete_user_clears_attachments() {
        let db = MemoryDb::new();
        db.create_organization(org_input("ACME")).unwrap();
        db.create_user("ACME", user_input("U1")).unwrap();
        db.create_policy(Some("ACME"), policy_input("P1")).unwrap();
        db.replace_user_policies("U1", &["P1"]).unwrap();

        db.delete_user("ACME", "U1").unwrap();
        assert!(db.data.users.get("U1").is_none());
        assert!(db.data.user_policies.get("U1").is_none());
    }
}
