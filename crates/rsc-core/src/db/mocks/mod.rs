//! Mock implementations of repository traits for testing.
//!
//! These mocks use in-memory storage and do not require a database connection.

mod inventory_repo;

pub use inventory_repo::{MockInventoryRepository, RepoFailure};
