//! # rsc-connectors
//!
//! Client side of the remote SDN controller.
//!
//! This crate provides the connector trait definitions, the HTTP transport,
//! the page-walking fetcher used to pull whole collections out of one
//! partition, and the VSD REST connector plus an in-memory mock.

pub mod http;
pub mod pagination;
pub mod secure_string;
pub mod testing;
pub mod traits;
pub mod vsd;

pub use secure_string::SecureString;

pub use traits::{
    AuthConfig, Connector, ConnectorConfig, ConnectorError, ConnectorResult, ControllerConnector,
    ListScope, PageRequest, RemoteKind, RemoteObject,
};

pub use pagination::{fetch_all_pages, PaginatedFetcher, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use vsd::{MockBehavior, MockControllerConnector, VsdConfig, VsdConnector};
