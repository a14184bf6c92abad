//! Per-kind audit strategies.

use crate::engine::router::{self, RouterInventory};
use crate::engine::subnet::{self, SubnetInventory};
use crate::error::AuditError;
use crate::finding::{Finding, FindingSink};
use crate::model::ResourceKind;
use crate::orchestrator::AuditContext;
use crate::remote::{FetchPlan, RemoteFetcher};
use tracing::info;

/// The closed set of ways a resource kind can be audited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditStrategy {
    Router,
    Subnet,
    /// A selectable kind with no correlation rules yet.
    Unsupported(ResourceKind),
}

impl AuditStrategy {
    pub fn for_kind(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Router => AuditStrategy::Router,
            ResourceKind::Subnet => AuditStrategy::Subnet,
            other => AuditStrategy::Unsupported(other),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            AuditStrategy::Router => ResourceKind::Router,
            AuditStrategy::Subnet => ResourceKind::Subnet,
            AuditStrategy::Unsupported(kind) => *kind,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, AuditStrategy::Unsupported(_))
    }

    /// Reads both inventories and scans them. Unsupported kinds yield no
    /// findings without touching either system.
    pub async fn run(&self, ctx: &AuditContext<'_>) -> Result<Vec<Finding>, AuditError> {
        match self {
            AuditStrategy::Router => run_router(ctx).await,
            AuditStrategy::Subnet => run_subnet(ctx).await,
            AuditStrategy::Unsupported(_) => Ok(Vec::new()),
        }
    }
}

async fn read_router_inventory(ctx: &AuditContext<'_>) -> Result<RouterInventory, AuditError> {
    let routers = ctx
        .inventory
        .list_routers()
        .await
        .map_err(AuditError::inventory("read_routers"))?;

    let mut ports = Vec::new();
    let mut links = Vec::new();
    for router in &routers {
        ports.extend(
            ctx.inventory
                .router_ports_by_router_id(&router.id)
                .await
                .map_err(AuditError::inventory("read_router_ports"))?,
        );
        links.extend(
            ctx.inventory
                .router_links_by_router_id(&router.id)
                .await
                .map_err(AuditError::inventory("read_router_links"))?,
        );
    }

    info!(
        routers = routers.len(),
        ports = ports.len(),
        links = links.len(),
        "Read local router inventory"
    );
    Ok(RouterInventory {
        routers,
        ports,
        links,
    })
}

async fn run_router(ctx: &AuditContext<'_>) -> Result<Vec<Finding>, AuditError> {
    let local = read_router_inventory(ctx).await?;
    let remote = RemoteFetcher::new(ctx.sites, ctx.config.page_size, ctx.config.parallel_fetch)
        .fetch(FetchPlan::Domains)
        .await?;
    info!(domains = remote.domains.len(), "Fetched remote domains");

    let mut sink = FindingSink::new(ResourceKind::Router);
    router::audit(&local, &remote.domains, ctx.registry, &mut sink);
    Ok(sink.drain())
}

async fn run_subnet(ctx: &AuditContext<'_>) -> Result<Vec<Finding>, AuditError> {
    let subnets = ctx
        .inventory
        .list_subnets()
        .await
        .map_err(AuditError::inventory("read_subnets"))?;
    let links = ctx
        .inventory
        .list_subnet_links()
        .await
        .map_err(AuditError::inventory("read_subnet_links"))?;
    info!(
        subnets = subnets.len(),
        links = links.len(),
        "Read local subnet inventory"
    );
    let local = SubnetInventory { subnets, links };

    let remote = RemoteFetcher::new(ctx.sites, ctx.config.page_size, ctx.config.parallel_fetch)
        .fetch(FetchPlan::SubnetTree)
        .await?;
    info!(
        templates = remote.l2domain_templates.len(),
        l2domains = remote.l2domains.len(),
        subnets = remote.subnets.len(),
        "Fetched remote subnet objects"
    );

    let mut sink = FindingSink::new(ResourceKind::Subnet);
    subnet::audit(&local, &remote, &mut sink);
    Ok(sink.drain())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_selection() {
        assert_eq!(AuditStrategy::for_kind(ResourceKind::Router), AuditStrategy::Router);
        assert_eq!(AuditStrategy::for_kind(ResourceKind::Subnet), AuditStrategy::Subnet);
        for kind in [
            ResourceKind::Port,
            ResourceKind::DummyFloatingIp,
            ResourceKind::SecurityGroup,
            ResourceKind::UnderlayAcl,
        ] {
            let strategy = AuditStrategy::for_kind(kind);
            assert!(!strategy.is_supported());
            assert_eq!(strategy.kind(), kind);
        }
    }
}
