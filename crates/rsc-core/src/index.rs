//! Keyed lookup structures over resource collections.
//!
//! An index maps one key space (an id, an external id, a link-record column)
//! to the resources carrying that key. The first resource seen for a key wins;
//! every later one is reported as a duplicate-key finding and otherwise
//! ignored. Building an index never fails.

use crate::finding::{FindingKind, FindingSink};
use crate::model::{LocalRouter, LocalSubnet, RemoteResource, RouterLinkRecord, SubnetLinkRecord};
use std::collections::HashMap;

/// Resources that can be named in a finding.
pub trait Identified {
    fn id(&self) -> &str;

    /// Partition the resource was fetched from, for remote resources.
    fn partition(&self) -> Option<&str> {
        None
    }
}

impl Identified for LocalRouter {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for LocalSubnet {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for SubnetLinkRecord {
    fn id(&self) -> &str {
        &self.local_subnet_id
    }
}

impl Identified for RouterLinkRecord {
    fn id(&self) -> &str {
        &self.local_router_id
    }
}

impl Identified for RemoteResource {
    fn id(&self) -> &str {
        &self.id
    }

    fn partition(&self) -> Option<&str> {
        Some(&self.partition)
    }
}

/// A first-wins map from key to resource, borrowing the indexed collection.
#[derive(Debug)]
pub struct ResourceIndex<'a, T> {
    key_space: String,
    entries: HashMap<&'a str, &'a T>,
}

impl<'a, T: Identified> ResourceIndex<'a, T> {
    /// Indexes `items` by `key`. Items for which `key` returns `None` are
    /// left out of the index.
    pub fn build<F>(items: &'a [T], key_space: &str, key: F, sink: &mut FindingSink) -> Self
    where
        F: Fn(&'a T) -> Option<&'a str>,
    {
        let mut entries: HashMap<&'a str, &'a T> = HashMap::with_capacity(items.len());

        for item in items {
            let Some(k) = key(item) else {
                continue;
            };
            match entries.get(k) {
                Some(first) => {
                    sink.emit(
                        FindingKind::DuplicateKey,
                        key_space,
                        k,
                        item.partition(),
                        format!(
                            "duplicate key '{}' in {}: '{}' kept, '{}' ignored",
                            k,
                            key_space,
                            first.id(),
                            item.id()
                        ),
                    );
                }
                None => {
                    entries.insert(k, item);
                }
            }
        }

        Self {
            key_space: key_space.to_string(),
            entries,
        }
    }

    /// Indexes `items` by their own id.
    pub fn by_id(items: &'a [T], key_space: &str, sink: &mut FindingSink) -> Self {
        Self::build(items, key_space, |item| Some(item.id()), sink)
    }
}

impl<'a, T> ResourceIndex<'a, T> {
    pub fn get(&self, key: &str) -> Option<&'a T> {
        self.entries.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn key_space(&self) -> &str {
        &self.key_space
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResourceKind;
    use rsc_connectors::{RemoteKind, RemoteObject};

    fn domain(id: &str, external_id: Option<&str>, partition: &str) -> RemoteResource {
        let mut object = RemoteObject::new(id);
        object.external_id = external_id.map(str::to_string);
        RemoteResource::from_object(object, RemoteKind::Domain, partition)
    }

    #[test]
    fn test_three_sharing_one_key_yield_two_duplicates() {
        let domains = vec![
            domain("d1", Some("r1@cms1"), "az1"),
            domain("d2", Some("r1@cms1"), "az1"),
            domain("d3", Some("r1@cms1"), "az2"),
            domain("d4", Some("r2@cms1"), "az1"),
        ];
        let mut sink = FindingSink::new(ResourceKind::Router);
        let index = ResourceIndex::build(&domains, "domain", |d| d.correlation_key(), &mut sink);

        assert_eq!(index.len(), 2);
        assert_eq!(index.get("r1@cms1").unwrap().id, "d1");

        let findings = sink.drain();
        assert_eq!(findings.len(), 2);
        assert!(findings.iter().all(|f| f.kind == FindingKind::DuplicateKey));
        assert!(findings[0].message.contains("'d1' kept, 'd2' ignored"));
        assert!(findings[1].message.contains("'d1' kept, 'd3' ignored"));
        assert_eq!(findings[1].partition.as_deref(), Some("az2"));
    }

    #[test]
    fn test_missing_keys_are_skipped() {
        let domains = vec![
            domain("d1", None, "az1"),
            domain("d2", Some(""), "az1"),
            domain("d3", Some("r3@cms1"), "az1"),
        ];
        let mut sink = FindingSink::new(ResourceKind::Router);
        let index = ResourceIndex::build(&domains, "domain", |d| d.correlation_key(), &mut sink);

        assert_eq!(index.len(), 1);
        assert!(index.contains("r3@cms1"));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_same_collection_multiple_key_spaces() {
        let links = vec![
            SubnetLinkRecord {
                local_subnet_id: "s1".into(),
                remote_subnet_id: "n1".into(),
                remote_template_id: Some("t1".into()),
            },
            SubnetLinkRecord {
                local_subnet_id: "s2".into(),
                remote_subnet_id: "n2".into(),
                remote_template_id: None,
            },
        ];
        let mut sink = FindingSink::new(ResourceKind::Subnet);
        let by_local = ResourceIndex::by_id(&links, "subnet_link.subnet_id", &mut sink);
        let by_remote = ResourceIndex::build(
            &links,
            "subnet_link.nuage_subnet_id",
            |l| Some(l.remote_subnet_id.as_str()),
            &mut sink,
        );
        let by_template = ResourceIndex::build(
            &links,
            "subnet_link.nuage_l2dom_tmplt_id",
            |l| l.remote_template_id.as_deref(),
            &mut sink,
        );

        assert_eq!(by_local.len(), 2);
        assert_eq!(by_remote.get("n2").unwrap().local_subnet_id, "s2");
        assert_eq!(by_template.len(), 1);
        assert_eq!(by_template.get("t1").unwrap().local_subnet_id, "s1");
        assert_eq!(by_template.key_space(), "subnet_link.nuage_l2dom_tmplt_id");
        assert!(sink.is_empty());
    }
}
