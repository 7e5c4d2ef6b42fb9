use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use super::MemoryData;
use crate::{
    db::{
        DbError, DbResult,
        repos::{PolicyRepo, TeamRepo, UserRepo},
    },
    models::{Policy, Team, User},
};

pub struct MemoryUserRepo {
    data: Arc<MemoryData>,
}

impl MemoryUserRepo {
    pub(crate) fn new(data: Arc<MemoryData>) -> Self {
        Self { data }
    }
}

#[async_trait]
impl UserRepo for MemoryUserRepo {
    async fn get(&self, org_id: &str, user_id: &str) -> DbResult<Option<User>> {
        Ok(self
            .data
            .users
            .get(user_id)
            .filter(|u| u.org_id == org_id)
            .map(|u| u.value().clone()))
    }

    async fn direct_policies(&self, user_id: &str) -> DbResult<Vec<Policy>> {
        let ids = self
            .data
            .user_policies
            .get(user_id)
            .map(|v| v.value().clone())
            .unwrap_or_default();
        self.data.policies_by_ids(&ids)
    }

    async fn team_ids(&self, user_id: &str) -> DbResult<Vec<String>> {
        Ok(self
            .data
            .user_teams
            .get(user_id)
            .map(|v| v.value().clone())
            .unwrap_or_default())
    }
}

pub struct MemoryTeamRepo {
    data: Arc<MemoryData>,
}

impl MemoryTeamRepo {
    pub(crate) fn new(data: Arc<MemoryData>) -> Self {
        Self { data }
    }
}

#[async_trait]
impl TeamRepo for MemoryTeamRepo {
    async fn get(&self, team_id: &str) -> DbResult<Option<Team>> {
        Ok(self.data.teams.get(team_id).map(|t| t.value().clone()))
    }

    /// Iterative walk over parent references with a visited set; a revisited
    /// team terminates the walk with `CyclicHierarchy` instead of looping.
    async fn ancestors(&self, team_id: &str) -> DbResult<Vec<String>> {
        let mut chain = Vec::new();
        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(team_id.to_string());

        let mut current = self
            .data
            .teams
            .get(team_id)
            .ok_or(DbError::NotFound)?
            .parent_id
            .clone();

        while let Some(parent_id) = current {
            if !visited.insert(parent_id.clone()) {
                return Err(DbError::CyclicHierarchy { team_id: parent_id });
            }
            let parent = self.data.teams.get(&parent_id).ok_or(DbError::NotFound)?;
            current = parent.parent_id.clone();
            drop(parent);
            chain.push(parent_id);
        }
        Ok(chain)
    }

    async fn direct_policies(&self, team_id: &str) -> DbResult<Vec<Policy>> {
        let ids = self
            .data
            .team_policies
            .get(team_id)
            .map(|v| v.value().clone())
            .unwrap_or_default();
        self.data.policies_by_ids(&ids)
    }
}

pub struct MemoryPolicyRepo {
    data: Arc<MemoryData>,
}

impl MemoryPolicyRepo {
    pub(crate) fn new(data: Arc<MemoryData>) -> Self {
        Self { data }
    }
}

#[async_trait]
impl PolicyRepo for MemoryPolicyRepo {
    async fn get(&self, policy_id: &str) -> DbResult<Option<Policy>> {
        Ok(self.data.policies.get(policy_id).map(|p| p.value().clone()))
    }

    async fn org_default_policies(&self, org_id: &str) -> DbResult<Vec<Policy>> {
        let ids = self
            .data
            .org_defaults
            .get(org_id)
            .map(|v| v.value().clone())
            .unwrap_or_default();
        self.data.policies_by_ids(&ids)
    }
}
