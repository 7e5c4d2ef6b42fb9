//! Multi-tenant policy decision engine.
//!
//! Organizations contain users and teams; users and teams carry attached
//! policies; policies contain statements that grant or deny actions on
//! resources. The crate answers two questions:
//!
//! - is this user allowed to perform this action on this resource?
//! - which actions may this user perform on this resource?
//!
//! Both are answered from the aggregate policy set that applies to a user:
//! policies attached directly to the user, policies attached to every team
//! the user belongs to (including ancestor teams), and organization-wide
//! default policies.
//!
//! The evaluation core ([`authz`]) is pure and contains no I/O. Policy
//! resolution reads through the storage collaborator traits in [`db`]; an
//! in-memory backend ([`db::memory`]) is provided for embedding and tests.
//! The HTTP surface, relational schema, and bootstrap wiring are external
//! collaborators and live outside this crate.

pub mod authz;
pub mod config;
pub mod db;
pub mod models;
pub mod services;

#[cfg(test)]
mod tests;

pub use authz::AuthzError;
pub use config::EngineConfig;
pub use services::{AccessDecision, AuthorizationService, AuthorizedActions};
