//! Router correlation.
//!
//! A local router maps to a controller domain whose external id is
//! `<router_id>@<cms_id>`. The CMS id comes from the router's zone mapping
//! resolved through the partition registry.

use super::{composite_external_id, parse_external_id};
use crate::finding::{FindingKind, FindingSink};
use crate::index::ResourceIndex;
use crate::model::{LocalRouter, RemoteResource, RouterLinkRecord, RouterPort};
use crate::partition::PartitionRegistry;
use std::collections::HashMap;
use tracing::debug;

const SCOPE_ROUTER: &str = "router";
const SCOPE_ROUTER_LINK: &str = "router_link";
const SCOPE_DOMAIN: &str = "domain";

/// Local rows needed to audit routers.
///
/// `ports` and `links` hold the keyed reads for every router in `routers`.
#[derive(Debug, Clone, Default)]
pub struct RouterInventory {
    pub routers: Vec<LocalRouter>,
    pub ports: Vec<RouterPort>,
    pub links: Vec<RouterLinkRecord>,
}

/// Lookups over one router snapshot.
pub struct RouterIndices<'a> {
    routers: ResourceIndex<'a, LocalRouter>,
    domains: ResourceIndex<'a, RemoteResource>,
    port_counts: HashMap<&'a str, usize>,
    links_by_router: HashMap<&'a str, Vec<&'a RouterLinkRecord>>,
}

impl<'a> RouterIndices<'a> {
    pub fn build(
        local: &'a RouterInventory,
        domains: &'a [RemoteResource],
        sink: &mut FindingSink,
    ) -> Self {
        let routers = ResourceIndex::by_id(&local.routers, SCOPE_ROUTER, sink);
        let domains = ResourceIndex::build(domains, SCOPE_DOMAIN, |d| d.correlation_key(), sink);

        let mut port_counts: HashMap<&'a str, usize> = HashMap::new();
        for port in &local.ports {
            *port_counts.entry(port.router_id.as_str()).or_insert(0) += 1;
        }

        let mut links_by_router: HashMap<&'a str, Vec<&'a RouterLinkRecord>> = HashMap::new();
        for link in &local.links {
            links_by_router
                .entry(link.local_router_id.as_str())
                .or_default()
                .push(link);
        }

        Self {
            routers,
            domains,
            port_counts,
            links_by_router,
        }
    }

    fn has_ports(&self, router_id: &str) -> bool {
        self.port_counts.get(router_id).copied().unwrap_or(0) > 0
    }
}

/// Checks that every provisioned local router has a domain in its zone.
pub fn forward_scan(
    local: &RouterInventory,
    indices: &RouterIndices<'_>,
    registry: &PartitionRegistry,
    sink: &mut FindingSink,
) {
    for router in &local.routers {
        if !indices.has_ports(&router.id) {
            debug!(router_id = %router.id, "Skipping router without interfaces");
            continue;
        }

        let Some(links) = indices.links_by_router.get(router.id.as_str()) else {
            continue;
        };

        for link in links {
            let Some(zone) = link.zone_name.as_deref() else {
                sink.emit(
                    FindingKind::UnresolvedPartition,
                    SCOPE_ROUTER_LINK,
                    &router.id,
                    None,
                    format!("availability zone is null for router {}", router.id),
                );
                continue;
            };

            let Some(cms_id) = registry.correlation_id(zone) else {
                sink.emit(
                    FindingKind::UnresolvedPartition,
                    SCOPE_ROUTER_LINK,
                    &router.id,
                    Some(zone),
                    format!("no CMS id configured for availability zone {}", zone),
                );
                continue;
            };

            let external_id = composite_external_id(&router.id, cms_id);
            if !indices.domains.contains(&external_id) {
                sink.emit(
                    FindingKind::LocalMissingRemote,
                    SCOPE_DOMAIN,
                    &router.id,
                    Some(zone),
                    format!("domain {} was not found", external_id),
                );
            }
        }
    }
}

/// Checks that every controller domain points back at a local router.
pub fn backward_scan(
    domains: &[RemoteResource],
    indices: &RouterIndices<'_>,
    sink: &mut FindingSink,
) {
    for domain in domains {
        let partition = Some(domain.partition.as_str());

        let Some(external_id) = domain.correlation_key() else {
            sink.emit(
                FindingKind::AmbiguousLink,
                SCOPE_DOMAIN,
                &domain.id,
                partition,
                format!("found domain {} with empty externalID", domain.id),
            );
            continue;
        };

        let Some((router_id, _)) = parse_external_id(external_id) else {
            sink.emit(
                FindingKind::AmbiguousLink,
                SCOPE_DOMAIN,
                &domain.id,
                partition,
                format!("invalid domain externalID {}", external_id),
            );
            continue;
        };

        if !indices.routers.contains(router_id) {
            sink.emit(
                FindingKind::RemoteMissingLocal,
                SCOPE_ROUTER,
                router_id,
                partition,
                format!("router.id {} was not found for domain {}", router_id, domain.id),
            );
        }
    }
}

/// Indexes both sides and runs both scans.
pub fn audit(
    local: &RouterInventory,
    domains: &[RemoteResource],
    registry: &PartitionRegistry,
    sink: &mut FindingSink,
) {
    let indices = RouterIndices::build(local, domains, sink);
    forward_scan(local, &indices, registry, sink);
    backward_scan(domains, &indices, sink);
}
