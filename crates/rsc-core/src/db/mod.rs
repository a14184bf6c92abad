//! Local inventory reader.
//!
//! Read-only access to the network service datastore. The
//! [`InventoryRepository`] trait is always available; the MySQL
//! implementation and the pool are compiled with the `database` feature.

mod error;
pub mod inventory_repo;
pub mod mocks;
mod pool;

pub use error::DbError;
pub use inventory_repo::InventoryRepository;
pub use pool::{ConnectionSettings, PoolOptions};

#[cfg(feature = "database")]
pub use inventory_repo::MySqlInventoryRepository;
#[cfg(feature = "database")]
pub use pool::{create_pool, create_pool_with_options, DbPool};
