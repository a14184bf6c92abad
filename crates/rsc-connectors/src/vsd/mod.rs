//! Nuage VSD controller connectors.
//!
//! - [`VsdConnector`]: the REST client used against a real controller.
//! - [`MockControllerConnector`]: in-memory controller with failure injection.

mod client;
mod mock;

pub use client::{VsdConfig, VsdConnector};
pub use mock::{MockBehavior, MockControllerConnector, PageRecord};
