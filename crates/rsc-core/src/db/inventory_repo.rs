//! Inventory repository for the network service datastore.

use super::DbError;
use crate::model::{LocalRouter, LocalSubnet, RouterLinkRecord, RouterPort, SubnetLinkRecord};
use async_trait::async_trait;

/// Read-only access to the local inventory.
///
/// Read-all methods return rows in the order the store yields them; the
/// engine treats that order as the emission order of forward findings. The
/// router audit walks routers and uses the keyed reads per router, so
/// `list_router_ports` and `list_router_links` serve callers that want the
/// whole mapping at once.
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// Lists every router.
    async fn list_routers(&self) -> Result<Vec<LocalRouter>, DbError>;

    /// Lists every subnet.
    async fn list_subnets(&self) -> Result<Vec<LocalSubnet>, DbError>;

    /// Lists every router interface.
    async fn list_router_ports(&self) -> Result<Vec<RouterPort>, DbError>;

    /// Lists every subnet mapping row.
    async fn list_subnet_links(&self) -> Result<Vec<SubnetLinkRecord>, DbError>;

    /// Lists every router-to-zone mapping row.
    async fn list_router_links(&self) -> Result<Vec<RouterLinkRecord>, DbError>;

    /// Lists the interfaces attached to one router.
    async fn router_ports_by_router_id(&self, router_id: &str) -> Result<Vec<RouterPort>, DbError>;

    /// Lists the zone mapping rows of one router.
    async fn router_links_by_router_id(
        &self,
        router_id: &str,
    ) -> Result<Vec<RouterLinkRecord>, DbError>;
}

/// MySQL implementation of InventoryRepository.
#[cfg(feature = "database")]
pub struct MySqlInventoryRepository {
    pool: sqlx::MySqlPool,
}

#[cfg(feature = "database")]
impl MySqlInventoryRepository {
    pub fn new(pool: sqlx::MySqlPool) -> Self {
        Self { pool }
    }
}

#[cfg(feature = "database")]
#[async_trait]
impl InventoryRepository for MySqlInventoryRepository {
    async fn list_routers(&self) -> Result<Vec<LocalRouter>, DbError> {
        let rows = sqlx::query_as::<_, LocalRouter>("SELECT id FROM routers")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_subnets(&self) -> Result<Vec<LocalSubnet>, DbError> {
        let rows = sqlx::query_as::<_, LocalSubnet>("SELECT id, network_id FROM subnets")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_router_ports(&self) -> Result<Vec<RouterPort>, DbError> {
        let rows = sqlx::query_as::<_, RouterPort>("SELECT router_id, port_id FROM routerports")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_subnet_links(&self) -> Result<Vec<SubnetLinkRecord>, DbError> {
        let rows = sqlx::query_as::<_, SubnetLinkRecord>(
            r#"
            SELECT subnet_id, nuage_subnet_id, nuage_l2dom_tmplt_id
            FROM nuage_subnet_l2dom_mapping
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_router_links(&self) -> Result<Vec<RouterLinkRecord>, DbError> {
        let rows = sqlx::query_as::<_, RouterLinkRecord>(
            r#"
            SELECT router_id, az_name, nuage_router_id
            FROM newarch_az_router_nuage
            WHERE router_id IS NOT NULL
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn router_ports_by_router_id(&self, router_id: &str) -> Result<Vec<RouterPort>, DbError> {
        let rows = sqlx::query_as::<_, RouterPort>(
            "SELECT router_id, port_id FROM routerports WHERE router_id = ?",
        )
        .bind(router_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn router_links_by_router_id(
        &self,
        router_id: &str,
    ) -> Result<Vec<RouterLinkRecord>, DbError> {
        let rows = sqlx::query_as::<_, RouterLinkRecord>(
            r#"
            SELECT router_id, az_name, nuage_router_id
            FROM newarch_az_router_nuage
            WHERE router_id = ?
            "#,
        )
        .bind(router_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
