//! Fetching controller collections from every partition.
//!
//! Each site is walked independently: open a session, resolve the tenant by
//! name, then page through the collections the plan asks for. Site results
//! are merged in configuration order whether or not the sites were fetched
//! concurrently.

use crate::error::AuditError;
use crate::model::RemoteResource;
use crate::partition::RemoteSite;
use futures::future::try_join_all;
use rsc_connectors::{ListScope, PaginatedFetcher, RemoteKind};
use tracing::{debug, info, instrument};

/// Which collections to fetch from each site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPlan {
    /// Tenant domains only.
    Domains,
    /// L2 domain templates, L2 domains, domains and every domain's subnets.
    SubnetTree,
}

/// Controller objects gathered from all partitions, tagged with their origin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteInventory {
    pub l2domain_templates: Vec<RemoteResource>,
    pub l2domains: Vec<RemoteResource>,
    pub domains: Vec<RemoteResource>,
    pub subnets: Vec<RemoteResource>,
}

impl RemoteInventory {
    /// Appends `other` after the objects already held.
    pub fn merge(&mut self, other: RemoteInventory) {
        self.l2domain_templates.extend(other.l2domain_templates);
        self.l2domains.extend(other.l2domains);
        self.domains.extend(other.domains);
        self.subnets.extend(other.subnets);
    }

    pub fn len(&self) -> usize {
        self.l2domain_templates.len() + self.l2domains.len() + self.domains.len() + self.subnets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fetches a [`RemoteInventory`] from a set of sites.
pub struct RemoteFetcher<'a> {
    sites: &'a [RemoteSite],
    page_size: u32,
    parallel: bool,
}

impl<'a> RemoteFetcher<'a> {
    pub fn new(sites: &'a [RemoteSite], page_size: u32, parallel: bool) -> Self {
        Self {
            sites,
            page_size,
            parallel,
        }
    }

    /// Fetches `plan` from every site. The first failing site fails the
    /// whole fetch.
    pub async fn fetch(&self, plan: FetchPlan) -> Result<RemoteInventory, AuditError> {
        let per_site = if self.parallel {
            try_join_all(
                self.sites
                    .iter()
                    .map(|site| fetch_site(site, self.page_size, plan)),
            )
            .await?
        } else {
            let mut results = Vec::with_capacity(self.sites.len());
            for site in self.sites {
                results.push(fetch_site(site, self.page_size, plan).await?);
            }
            results
        };

        let mut merged = RemoteInventory::default();
        for inventory in per_site {
            merged.merge(inventory);
        }
        Ok(merged)
    }
}

async fn fetch_collection(
    fetcher: &PaginatedFetcher<'_>,
    site: &RemoteSite,
    scope: &ListScope,
    kind: RemoteKind,
    stage: &'static str,
) -> Result<Vec<RemoteResource>, AuditError> {
    let zone = &site.partition.availability_zone;
    let objects = fetcher
        .fetch_all(scope, kind)
        .await
        .map_err(AuditError::remote(stage, zone))?;
    Ok(objects
        .into_iter()
        .map(|o| RemoteResource::from_object(o, kind, zone))
        .collect())
}

#[instrument(skip(site, page_size), fields(partition = %site.partition.availability_zone))]
async fn fetch_site(
    site: &RemoteSite,
    page_size: u32,
    plan: FetchPlan,
) -> Result<RemoteInventory, AuditError> {
    let zone = site.partition.availability_zone.as_str();
    let tenant_name = site.partition.tenant.as_str();
    let connector = site.connector.as_ref();

    connector
        .start_session()
        .await
        .map_err(AuditError::remote("start_session", zone))?;

    let tenant = connector
        .find_tenant(tenant_name)
        .await
        .map_err(AuditError::remote("find_tenant", zone))?
        .ok_or_else(|| AuditError::TenantNotFound {
            partition: zone.to_string(),
            tenant: tenant_name.to_string(),
        })?;
    let tenant_scope = ListScope::Tenant(tenant.id);

    let fetcher = PaginatedFetcher::new(connector, page_size);
    let mut inventory = RemoteInventory::default();

    if plan == FetchPlan::SubnetTree {
        info!(tenant = tenant_name, "Fetching L2 domain templates");
        inventory.l2domain_templates = fetch_collection(
            &fetcher,
            site,
            &tenant_scope,
            RemoteKind::L2DomainTemplate,
            "list_l2domain_templates",
        )
        .await?;

        info!(tenant = tenant_name, "Fetching L2 domains");
        inventory.l2domains = fetch_collection(
            &fetcher,
            site,
            &tenant_scope,
            RemoteKind::L2Domain,
            "list_l2domains",
        )
        .await?;
    }

    info!(tenant = tenant_name, "Fetching domains");
    inventory.domains = fetch_collection(
        &fetcher,
        site,
        &tenant_scope,
        RemoteKind::Domain,
        "list_domains",
    )
    .await?;

    if plan == FetchPlan::SubnetTree {
        for domain in &inventory.domains {
            debug!(domain_id = %domain.id, "Fetching domain subnets");
            let scope = ListScope::Domain(domain.id.clone());
            let subnets =
                fetch_collection(&fetcher, site, &scope, RemoteKind::Subnet, "list_subnets").await?;
            inventory.subnets.extend(subnets);
        }
    }

    info!(objects = inventory.len(), "Fetched partition");
    Ok(inventory)
}
