//! # rsc-core
//!
//! Cross-system correlation engine for resscan.
//!
//! This crate reads the local datastore inventory, pulls the matching
//! collections from every controller partition, indexes both sides and runs
//! forward (local to remote) and backward (remote to local) consistency scans
//! per resource kind. Discrepancies are reported as [`Finding`]s; only
//! datastore and transport failures are errors.

pub mod db;
pub mod engine;
pub mod error;
pub mod finding;
pub mod index;
pub mod model;
pub mod orchestrator;
pub mod partition;
pub mod remote;
pub mod report;
pub mod strategy;

pub use error::AuditError;
pub use finding::{Finding, FindingKind, FindingSink, Severity};
pub use index::{Identified, ResourceIndex};
pub use model::{
    LocalRouter, LocalSubnet, RemoteResource, ResourceKind, RouterLinkRecord, RouterPort,
    SubnetLinkRecord,
};
pub use orchestrator::{AuditContext, AuditOrchestrator, OrchestratorConfig};
pub use partition::{Partition, PartitionRegistry, RemoteSite};
pub use report::AuditReport;
pub use strategy::AuditStrategy;
