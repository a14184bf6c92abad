//! Controller partitions and the availability-zone registry.

use rsc_connectors::ControllerConnector;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A configured controller site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    /// Availability zone served by this site.
    pub availability_zone: String,
    /// CMS id embedded in composite external ids.
    pub correlation_id: String,
    /// Tenant (enterprise) name that holds the audited objects.
    pub tenant: String,
}

/// Read-only lookup from availability zone to partition.
///
/// When two partitions declare the same zone, the first one configured wins.
#[derive(Debug, Clone, Default)]
pub struct PartitionRegistry {
    partitions: Vec<Partition>,
}

impl PartitionRegistry {
    pub fn new(partitions: Vec<Partition>) -> Self {
        Self { partitions }
    }

    pub fn get(&self, availability_zone: &str) -> Option<&Partition> {
        self.partitions
            .iter()
            .find(|p| p.availability_zone == availability_zone)
    }

    /// CMS id for a zone, if the zone is configured with a non-empty id.
    pub fn correlation_id(&self, availability_zone: &str) -> Option<&str> {
        self.get(availability_zone)
            .map(|p| p.correlation_id.as_str())
            .filter(|id| !id.is_empty())
    }

    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }
}

/// A partition together with the connector used to reach it.
#[derive(Clone)]
pub struct RemoteSite {
    pub partition: Partition,
    pub connector: Arc<dyn ControllerConnector>,
}

impl RemoteSite {
    pub fn new(partition: Partition, connector: Arc<dyn ControllerConnector>) -> Self {
        Self {
            partition,
            connector,
        }
    }
}

impl fmt::Debug for RemoteSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteSite")
            .field("partition", &self.partition)
            .field("connector", &self.connector.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partition(az: &str, cms: &str) -> Partition {
        Partition {
            availability_zone: az.to_string(),
            correlation_id: cms.to_string(),
            tenant: format!("OpenStack_{}", az),
        }
    }

    #[test]
    fn test_lookup_by_zone() {
        let registry = PartitionRegistry::new(vec![
            partition("beijing", "cms-bj"),
            partition("changsha", "cms-cs"),
        ]);
        assert_eq!(registry.correlation_id("changsha"), Some("cms-cs"));
        assert_eq!(registry.correlation_id("shanghai"), None);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_first_zone_wins() {
        let registry =
            PartitionRegistry::new(vec![partition("az1", "first"), partition("az1", "second")]);
        assert_eq!(registry.correlation_id("az1"), Some("first"));
    }

    #[test]
    fn test_empty_cms_id_is_unresolvable() {
        let registry = PartitionRegistry::new(vec![partition("az1", "")]);
        assert!(registry.get("az1").is_some());
        assert_eq!(registry.correlation_id("az1"), None);
    }
}
