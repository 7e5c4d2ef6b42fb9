mod error;
pub mod memory;
pub mod repos;

use std::sync::Arc;

pub use error::{DbError, DbResult};
pub use repos::*;

/// Storage collaborator bundling the repositories the aggregator reads from.
///
/// Repository trait objects are cached at construction time. Mutations are
/// a backend concern (see [`memory::MemoryDb`]); the core holds no locks and
/// relies on the backend for read-after-write visibility: a committed policy
/// or membership change must be observed by the very next resolution.
pub struct Store {
    users: Arc<dyn UserRepo>,
    teams: Arc<dyn TeamRepo>,
    policies: Arc<dyn PolicyRepo>,
}

impl Store {
    pub fn new(
        users: Arc<dyn UserRepo>,
        teams: Arc<dyn TeamRepo>,
        policies: Arc<dyn PolicyRepo>,
    ) -> Self {
        Self {
            users,
            teams,
            policies,
        }
    }

    pub fn users(&self) -> &dyn UserRepo {
        self.users.as_ref()
    }

    pub fn teams(&self) -> &dyn TeamRepo {
        self.teams.as_ref()
    }

    pub fn policies(&self) -> &dyn PolicyRepo {
        self.policies.as_ref()
    }
}
