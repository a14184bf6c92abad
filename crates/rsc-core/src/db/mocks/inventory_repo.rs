//! Mock implementation of InventoryRepository for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::db::{DbError, InventoryRepository};
use crate::model::{LocalRouter, LocalSubnet, RouterLinkRecord, RouterPort, SubnetLinkRecord};

/// Which read the mock should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoFailure {
    Routers,
    Subnets,
    SubnetLinks,
    RouterPorts,
    RouterLinks,
}

#[derive(Debug, Default)]
struct Tables {
    routers: Vec<LocalRouter>,
    subnets: Vec<LocalSubnet>,
    router_ports: Vec<RouterPort>,
    subnet_links: Vec<SubnetLinkRecord>,
    router_links: Vec<RouterLinkRecord>,
    failure: Option<RepoFailure>,
}

/// Mock implementation of InventoryRepository using in-memory tables.
///
/// Rows are returned in insertion order.
#[derive(Default)]
pub struct MockInventoryRepository {
    tables: Arc<RwLock<Tables>>,
}

impl MockInventoryRepository {
    /// Creates a new empty mock repository.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_router(&self, id: &str) {
        self.tables.write().await.routers.push(LocalRouter { id: id.to_string() });
    }

    pub async fn add_subnet(&self, id: &str, network_id: &str) {
        self.tables.write().await.subnets.push(LocalSubnet {
            id: id.to_string(),
            network_id: network_id.to_string(),
        });
    }

    pub async fn add_router_port(&self, router_id: &str, port_id: &str) {
        self.tables.write().await.router_ports.push(RouterPort {
            router_id: router_id.to_string(),
            port_id: port_id.to_string(),
        });
    }

    pub async fn add_subnet_link(
        &self,
        local_subnet_id: &str,
        remote_subnet_id: &str,
        remote_template_id: Option<&str>,
    ) {
        self.tables.write().await.subnet_links.push(SubnetLinkRecord {
            local_subnet_id: local_subnet_id.to_string(),
            remote_subnet_id: remote_subnet_id.to_string(),
            remote_template_id: remote_template_id.map(str::to_string),
        });
    }

    pub async fn add_router_link(
        &self,
        local_router_id: &str,
        zone_name: Option<&str>,
        remote_router_id: Option<&str>,
    ) {
        self.tables.write().await.router_links.push(RouterLinkRecord {
            local_router_id: local_router_id.to_string(),
            zone_name: zone_name.map(str::to_string),
            remote_router_id: remote_router_id.map(str::to_string),
        });
    }

    /// Makes the given read fail with a connection error.
    pub async fn fail_on(&self, failure: RepoFailure) {
        self.tables.write().await.failure = Some(failure);
    }

    async fn check(&self, read: RepoFailure) -> Result<(), DbError> {
        if self.tables.read().await.failure == Some(read) {
            return Err(DbError::Connection(format!(
                "injected failure on {:?}",
                read
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl InventoryRepository for MockInventoryRepository {
    async fn list_routers(&self) -> Result<Vec<LocalRouter>, DbError> {
        self.check(RepoFailure::Routers).await?;
        Ok(self.tables.read().await.routers.clone())
    }

    async fn list_subnets(&self) -> Result<Vec<LocalSubnet>, DbError> {
        self.check(RepoFailure::Subnets).await?;
        Ok(self.tables.read().await.subnets.clone())
    }

    async fn list_router_ports(&self) -> Result<Vec<RouterPort>, DbError> {
        self.check(RepoFailure::RouterPorts).await?;
        Ok(self.tables.read().await.router_ports.clone())
    }

    async fn list_subnet_links(&self) -> Result<Vec<SubnetLinkRecord>, DbError> {
        self.check(RepoFailure::SubnetLinks).await?;
        Ok(self.tables.read().await.subnet_links.clone())
    }

    async fn list_router_links(&self) -> Result<Vec<RouterLinkRecord>, DbError> {
        self.check(RepoFailure::RouterLinks).await?;
        Ok(self.tables.read().await.router_links.clone())
    }

    async fn router_ports_by_router_id(&self, router_id: &str) -> Result<Vec<RouterPort>, DbError> {
        self.check(RepoFailure::RouterPorts).await?;
        let tables = self.tables.read().await;
        Ok(tables
            .router_ports
            .iter()
            .filter(|p| p.router_id == router_id)
            .cloned()
            .collect())
    }

    async fn router_links_by_router_id(
        &self,
        router_id: &str,
    ) -> Result<Vec<RouterLinkRecord>, DbError> {
        self.check(RepoFailure::RouterLinks).await?;
        let tables = self.tables.read().await;
        Ok(tables
            .router_links
            .iter()
            .filter(|l| l.local_router_id == router_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_keyed_reads_filter_by_router() {
        let repo = MockInventoryRepository::new();
        repo.add_router_port("r1", "p1").await;
        repo.add_router_port("r2", "p2").await;
        repo.add_router_port("r1", "p3").await;
        repo.add_router_link("r1", Some("az1"), None).await;

        let ports = repo.router_ports_by_router_id("r1").await.unwrap();
        assert_eq!(
            ports.iter().map(|p| p.port_id.as_str()).collect::<Vec<_>>(),
            vec!["p1", "p3"]
        );
        assert!(repo.router_links_by_router_id("r2").await.unwrap().is_empty());
        assert_eq!(repo.list_router_ports().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_read_all_keeps_insertion_order() {
        let repo = MockInventoryRepository::new();
        repo.add_router_link("r2", Some("az2"), Some("d2")).await;
        repo.add_router_link("r1", None, None).await;
        repo.add_subnet_link("s1", "l1", Some("t1")).await;

        let links = repo.list_router_links().await.unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].local_router_id, "r2");
        assert_eq!(links[0].zone_name.as_deref(), Some("az2"));
        assert_eq!(links[1].zone_name, None);

        let subnet_links = repo.list_subnet_links().await.unwrap();
        assert_eq!(subnet_links[0].remote_template_id.as_deref(), Some("t1"));

        repo.fail_on(RepoFailure::RouterLinks).await;
        assert!(repo.list_router_links().await.is_err());
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let repo = MockInventoryRepository::new();
        repo.add_subnet("s1", "n1").await;
        repo.fail_on(RepoFailure::Subnets).await;

        assert!(matches!(repo.list_subnets().await, Err(DbError::Connection(_))));
        assert!(repo.list_routers().await.is_ok());
    }
}
