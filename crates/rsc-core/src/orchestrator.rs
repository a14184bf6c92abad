//! Audit orchestrator.
//!
//! Sequences one audit per resource kind: read the local inventory, fetch
//! every partition, index, scan forward, scan backward, drain. Every run gets
//! its own [`AuditContext`]; nothing fetched or indexed outlives the run, so
//! audits can be repeated within one process.
//!
//! A datastore or controller failure aborts the run for that kind only and
//! is returned as an [`AuditError`]. Findings never abort a run.

use crate::db::InventoryRepository;
use crate::error::AuditError;
use crate::model::ResourceKind;
use crate::partition::{PartitionRegistry, RemoteSite};
use crate::report::AuditReport;
use crate::strategy::AuditStrategy;
use chrono::Utc;
use rsc_connectors::DEFAULT_PAGE_SIZE;
use rsc_observability::audit_span;
use std::sync::Arc;
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

/// Configuration for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Page size for controller collection walks.
    pub page_size: u32,
    /// Fetch partitions concurrently.
    pub parallel_fetch: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            parallel_fetch: true,
        }
    }
}

/// Everything one audit run may read. Borrowed from the orchestrator for the
/// duration of the run.
pub struct AuditContext<'a> {
    pub inventory: &'a dyn InventoryRepository,
    pub sites: &'a [RemoteSite],
    pub registry: &'a PartitionRegistry,
    pub config: &'a OrchestratorConfig,
}

/// Runs audits against one datastore and a fixed set of partitions.
pub struct AuditOrchestrator {
    inventory: Arc<dyn InventoryRepository>,
    sites: Vec<RemoteSite>,
    registry: PartitionRegistry,
    config: OrchestratorConfig,
}

impl AuditOrchestrator {
    /// Creates an orchestrator with default configuration. The partition
    /// registry is derived from the sites, in order.
    pub fn new(inventory: Arc<dyn InventoryRepository>, sites: Vec<RemoteSite>) -> Self {
        Self::with_config(inventory, sites, OrchestratorConfig::default())
    }

    pub fn with_config(
        inventory: Arc<dyn InventoryRepository>,
        sites: Vec<RemoteSite>,
        config: OrchestratorConfig,
    ) -> Self {
        let registry = PartitionRegistry::new(sites.iter().map(|s| s.partition.clone()).collect());
        Self {
            inventory,
            sites,
            registry,
            config,
        }
    }

    pub fn registry(&self) -> &PartitionRegistry {
        &self.registry
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Audits one resource kind.
    pub async fn run(&self, kind: ResourceKind) -> Result<AuditReport, AuditError> {
        let run_id = Uuid::new_v4();
        let span = audit_span!(run_id, kind);
        self.run_with_id(run_id, kind).instrument(span).await
    }

    async fn run_with_id(
        &self,
        run_id: Uuid,
        kind: ResourceKind,
    ) -> Result<AuditReport, AuditError> {
        let started_at = Utc::now();
        let strategy = AuditStrategy::for_kind(kind);

        if !strategy.is_supported() {
            warn!("No correlation rules for {}; nothing to scan", kind);
            return Ok(AuditReport {
                run_id,
                kind,
                started_at,
                finished_at: Utc::now(),
                scanned: false,
                findings: Vec::new(),
            });
        }

        info!(partitions = self.sites.len(), "Starting audit");

        let ctx = AuditContext {
            inventory: self.inventory.as_ref(),
            sites: &self.sites,
            registry: &self.registry,
            config: &self.config,
        };

        let findings = strategy.run(&ctx).await.map_err(|e| {
            error!(
                stage = e.stage(),
                partition = e.partition().unwrap_or("-"),
                "Audit aborted: {}",
                e
            );
            e
        })?;

        let report = AuditReport {
            run_id,
            kind,
            started_at,
            finished_at: Utc::now(),
            scanned: true,
            findings,
        };
        info!(
            findings = report.findings.len(),
            duration_ms = report.duration_ms(),
            "Audit complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::mocks::{MockInventoryRepository, RepoFailure};
    use crate::partition::Partition;
    use rsc_connectors::MockControllerConnector;

    fn site(az: &str) -> RemoteSite {
        RemoteSite::new(
            Partition {
                availability_zone: az.into(),
                correlation_id: format!("cms-{}", az),
                tenant: format!("OpenStack_{}", az),
            },
            Arc::new(MockControllerConnector::new(az)),
        )
    }

    #[tokio::test]
    async fn test_unsupported_kind_is_empty_report() {
        let connector = Arc::new(MockControllerConnector::new("az1"));
        let site = RemoteSite::new(
            Partition {
                availability_zone: "az1".into(),
                correlation_id: "cms1".into(),
                tenant: "t".into(),
            },
            connector.clone(),
        );
        let orchestrator =
            AuditOrchestrator::new(Arc::new(MockInventoryRepository::new()), vec![site]);

        let report = orchestrator.run(ResourceKind::SecurityGroup).await.unwrap();
        assert!(!report.scanned);
        assert!(report.is_clean());
        assert!(!connector.session_started());
    }

    #[tokio::test]
    async fn test_inventory_failure_aborts_run() {
        let repo = MockInventoryRepository::new();
        repo.fail_on(RepoFailure::Routers).await;
        let orchestrator = AuditOrchestrator::new(Arc::new(repo), vec![site("az1")]);

        let err = orchestrator.run(ResourceKind::Router).await.unwrap_err();
        assert!(matches!(err, AuditError::Inventory { stage: "read_routers", .. }));
    }

    #[test]
    fn test_registry_follows_site_order() {
        let orchestrator = AuditOrchestrator::new(
            Arc::new(MockInventoryRepository::new()),
            vec![site("az1"), site("az2")],
        );
        assert_eq!(orchestrator.registry().len(), 2);
        assert_eq!(orchestrator.registry().correlation_id("az2"), Some("cms-az2"));
        assert_eq!(orchestrator.config().page_size, 500);
    }
}
