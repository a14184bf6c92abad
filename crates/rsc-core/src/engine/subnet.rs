//! Subnet correlation.
//!
//! Subnets correlate through the mapping table rather than an encoded id. A
//! mapping row with a template id points at an L2 domain template and the L2
//! domain built from it; a row without one points at a domain subnet.

use crate::finding::{FindingKind, FindingSink};
use crate::index::ResourceIndex;
use crate::model::{LocalSubnet, RemoteResource, SubnetLinkRecord};
use crate::remote::RemoteInventory;

const SCOPE_SUBNET: &str = "subnet";
const SCOPE_LINK_BY_SUBNET: &str = "subnet_link.subnet_id";
const SCOPE_LINK_BY_REMOTE: &str = "subnet_link.nuage_subnet_id";
const SCOPE_LINK_BY_TEMPLATE: &str = "subnet_link.nuage_l2dom_tmplt_id";
const SCOPE_TEMPLATE: &str = "l2domain_template";
const SCOPE_L2DOMAIN: &str = "l2domain";
const SCOPE_REMOTE_SUBNET: &str = "remote_subnet";

/// Local rows needed to audit subnets.
#[derive(Debug, Clone, Default)]
pub struct SubnetInventory {
    pub subnets: Vec<LocalSubnet>,
    pub links: Vec<SubnetLinkRecord>,
}

/// Lookups over one subnet snapshot.
///
/// The mapping rows are indexed three ways so that each direction can reach
/// them without rescanning.
pub struct SubnetIndices<'a> {
    subnets: ResourceIndex<'a, LocalSubnet>,
    links_by_subnet: ResourceIndex<'a, SubnetLinkRecord>,
    links_by_remote: ResourceIndex<'a, SubnetLinkRecord>,
    links_by_template: ResourceIndex<'a, SubnetLinkRecord>,
    templates: ResourceIndex<'a, RemoteResource>,
    l2domains: ResourceIndex<'a, RemoteResource>,
    remote_subnets: ResourceIndex<'a, RemoteResource>,
}

impl<'a> SubnetIndices<'a> {
    pub fn build(
        local: &'a SubnetInventory,
        remote: &'a RemoteInventory,
        sink: &mut FindingSink,
    ) -> Self {
        Self {
            subnets: ResourceIndex::by_id(&local.subnets, SCOPE_SUBNET, sink),
            links_by_subnet: ResourceIndex::by_id(&local.links, SCOPE_LINK_BY_SUBNET, sink),
            links_by_remote: ResourceIndex::build(
                &local.links,
                SCOPE_LINK_BY_REMOTE,
                |l| Some(l.remote_subnet_id.as_str()),
                sink,
            ),
            links_by_template: ResourceIndex::build(
                &local.links,
                SCOPE_LINK_BY_TEMPLATE,
                |l| l.remote_template_id.as_deref(),
                sink,
            ),
            templates: ResourceIndex::by_id(&remote.l2domain_templates, SCOPE_TEMPLATE, sink),
            l2domains: ResourceIndex::by_id(&remote.l2domains, SCOPE_L2DOMAIN, sink),
            remote_subnets: ResourceIndex::by_id(&remote.subnets, SCOPE_REMOTE_SUBNET, sink),
        }
    }
}

/// Checks that every local subnet has a mapping row and that the row's
/// remote objects exist.
pub fn forward_scan(local: &SubnetInventory, indices: &SubnetIndices<'_>, sink: &mut FindingSink) {
    for subnet in &local.subnets {
        let Some(link) = indices.links_by_subnet.get(&subnet.id) else {
            sink.emit(
                FindingKind::LocalMissingRemote,
                SCOPE_LINK_BY_SUBNET,
                &subnet.id,
                None,
                format!("nuage_subnet_l2dom_mapping.subnet_id {} was not found", subnet.id),
            );
            continue;
        };

        match link.remote_template_id.as_deref() {
            Some(template_id) => {
                if !indices.templates.contains(template_id) {
                    sink.emit(
                        FindingKind::LocalMissingRemote,
                        SCOPE_TEMPLATE,
                        &subnet.id,
                        None,
                        format!("l2domain template {} was not found", template_id),
                    );
                }
                if !indices.l2domains.contains(&link.remote_subnet_id) {
                    sink.emit(
                        FindingKind::LocalMissingRemote,
                        SCOPE_L2DOMAIN,
                        &subnet.id,
                        None,
                        format!("l2domain {} was not found", link.remote_subnet_id),
                    );
                }
            }
            None => {
                if !indices.remote_subnets.contains(&link.remote_subnet_id) {
                    sink.emit(
                        FindingKind::LocalMissingRemote,
                        SCOPE_REMOTE_SUBNET,
                        &subnet.id,
                        None,
                        format!("subnet {} was not found", link.remote_subnet_id),
                    );
                }
            }
        }
    }
}

/// Resolves one remote object back to a local subnet through `links`.
fn resolve_back(
    object: &RemoteResource,
    scope: &str,
    links: &ResourceIndex<'_, SubnetLinkRecord>,
    subnets: &ResourceIndex<'_, LocalSubnet>,
    sink: &mut FindingSink,
) {
    let partition = Some(object.partition.as_str());

    let Some(link) = links.get(&object.id) else {
        sink.emit(
            FindingKind::RemoteMissingLocal,
            scope,
            &object.id,
            partition,
            format!("{} {} was not found", links.key_space(), object.id),
        );
        return;
    };

    if !subnets.contains(&link.local_subnet_id) {
        sink.emit(
            FindingKind::RemoteMissingLocal,
            scope,
            &object.id,
            partition,
            format!(
                "subnet.id {} mapped from {} {} was not found",
                link.local_subnet_id, scope, object.id
            ),
        );
    }
}

/// Checks that every remote template, L2 domain and subnet maps back to a
/// local subnet. The three passes run independently.
pub fn backward_scan(remote: &RemoteInventory, indices: &SubnetIndices<'_>, sink: &mut FindingSink) {
    for template in &remote.l2domain_templates {
        resolve_back(
            template,
            SCOPE_TEMPLATE,
            &indices.links_by_template,
            &indices.subnets,
            sink,
        );
    }

    for l2domain in &remote.l2domains {
        resolve_back(
            l2domain,
            SCOPE_L2DOMAIN,
            &indices.links_by_remote,
            &indices.subnets,
            sink,
        );
    }

    for subnet in &remote.subnets {
        resolve_back(
            subnet,
            SCOPE_REMOTE_SUBNET,
            &indices.links_by_remote,
            &indices.subnets,
            sink,
        );
    }
}

/// Indexes both sides and runs both scans.
pub fn audit(local: &SubnetInventory, remote: &RemoteInventory, sink: &mut FindingSink) {
    let indices = SubnetIndices::build(local, remote, sink);
    forward_scan(local, &indices, sink);
    backward_scan(remote, &indices, sink);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::Finding;
    use crate::model::ResourceKind;
    use rsc_connectors::{RemoteKind, RemoteObject};

    fn remote_obj(id: &str, kind: RemoteKind) -> RemoteResource {
        RemoteResource::from_object(RemoteObject::new(id), kind, "az1")
    }

    fn subnet(id: &str) -> LocalSubnet {
        LocalSubnet {
            id: id.into(),
            network_id: format!("net-{}", id),
        }
    }

    fn link(local: &str, remote: &str, template: Option<&str>) -> SubnetLinkRecord {
        SubnetLinkRecord {
            local_subnet_id: local.into(),
            remote_subnet_id: remote.into(),
            remote_template_id: template.map(str::to_string),
        }
    }

    fn run(local: &SubnetInventory, remote: &RemoteInventory) -> Vec<Finding> {
        let mut sink = FindingSink::new(ResourceKind::Subnet);
        audit(local, remote, &mut sink);
        sink.drain()
    }

    fn consistent() -> (SubnetInventory, RemoteInventory) {
        let local = SubnetInventory {
            subnets: vec![subnet("S1"), subnet("S2")],
            links: vec![link("S1", "L2D1", Some("T1")), link("S2", "N2", None)],
        };
        let remote = RemoteInventory {
            l2domain_templates: vec![remote_obj("T1", RemoteKind::L2DomainTemplate)],
            l2domains: vec![remote_obj("L2D1", RemoteKind::L2Domain)],
            domains: vec![remote_obj("DOM1", RemoteKind::Domain)],
            subnets: vec![remote_obj("N2", RemoteKind::Subnet)],
        };
        (local, remote)
    }

    #[test]
    fn test_consistent_inventories_yield_nothing() {
        let (local, remote) = consistent();
        let findings = run(&local, &remote);
        assert!(findings.is_empty(), "{:?}", findings);
    }

    #[test]
    fn test_missing_mapping_is_reported_once() {
        let local = SubnetInventory {
            subnets: vec![subnet("S1")],
            links: vec![],
        };
        let findings = run(&local, &RemoteInventory::default());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::LocalMissingRemote);
        assert_eq!(findings[0].subject_id, "S1");
        assert_eq!(findings[0].scope, "subnet_link.subnet_id");
    }

    #[test]
    fn test_template_branch_checks_both_objects() {
        let (local, mut remote) = consistent();
        remote.l2domain_templates.clear();
        remote.l2domains.clear();
        let findings = run(&local, &remote);

        let forward: Vec<_> = findings
            .iter()
            .filter(|f| f.kind == FindingKind::LocalMissingRemote)
            .collect();
        assert_eq!(forward.len(), 2);
        assert_eq!(forward[0].scope, "l2domain_template");
        assert_eq!(forward[1].scope, "l2domain");
        assert!(forward.iter().all(|f| f.subject_id == "S1"));
    }

    #[test]
    fn test_plain_branch_checks_remote_subnet() {
        let (local, mut remote) = consistent();
        remote.subnets.clear();
        let findings = run(&local, &remote);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].scope, "remote_subnet");
        assert_eq!(findings[0].subject_id, "S2");
    }

    #[test]
    fn test_orphan_remote_objects_each_pass() {
        let (local, mut remote) = consistent();
        remote
            .l2domain_templates
            .push(remote_obj("T9", RemoteKind::L2DomainTemplate));
        remote.l2domains.push(remote_obj("L2D9", RemoteKind::L2Domain));
        remote.subnets.push(remote_obj("N9", RemoteKind::Subnet));
        let findings = run(&local, &remote);

        assert_eq!(findings.len(), 3);
        assert!(findings.iter().all(|f| f.kind == FindingKind::RemoteMissingLocal));
        let scopes: Vec<_> = findings.iter().map(|f| f.scope.as_str()).collect();
        assert_eq!(scopes, vec!["l2domain_template", "l2domain", "remote_subnet"]);
        assert_eq!(findings[0].partition.as_deref(), Some("az1"));
    }

    #[test]
    fn test_mapping_to_deleted_local_subnet() {
        let (mut local, remote) = consistent();
        local.subnets.retain(|s| s.id != "S2");
        let findings = run(&local, &remote);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::RemoteMissingLocal);
        assert_eq!(findings[0].subject_id, "N2");
        assert!(findings[0].message.contains("S2"));
    }

    #[test]
    fn test_duplicate_remote_ids_across_partitions() {
        let (local, mut remote) = consistent();
        let mut twin = remote_obj("N2", RemoteKind::Subnet);
        twin.partition = "az2".into();
        remote.subnets.push(twin);
        let findings = run(&local, &remote);

        let dups: Vec<_> = findings
            .iter()
            .filter(|f| f.kind == FindingKind::DuplicateKey)
            .collect();
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].partition.as_deref(), Some("az2"));
    }
}
