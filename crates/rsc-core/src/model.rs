//! Data model shared by the inventory reader, the remote side and the engine.
//!
//! Local records mirror rows of the network service datastore. Nullable
//! columns are `Option`s; an empty string is never used to mean "absent".

use rsc_connectors::{RemoteKind, RemoteObject};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Resource kinds that can be selected for an audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    Subnet,
    Router,
    Port,
    DummyFloatingIp,
    SecurityGroup,
    UnderlayAcl,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Subnet,
        ResourceKind::Router,
        ResourceKind::Port,
        ResourceKind::DummyFloatingIp,
        ResourceKind::SecurityGroup,
        ResourceKind::UnderlayAcl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Subnet => "subnet",
            ResourceKind::Router => "router",
            ResourceKind::Port => "port",
            ResourceKind::DummyFloatingIp => "dummy-floating-ip",
            ResourceKind::SecurityGroup => "security-group",
            ResourceKind::UnderlayAcl => "underlay-acl",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    /// Accepts the kebab-case selector and the compact legacy spelling
    /// (`dummyfip`, `securitygroup`, `underlayacl`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "subnet" => Ok(ResourceKind::Subnet),
            "router" => Ok(ResourceKind::Router),
            "port" => Ok(ResourceKind::Port),
            "dummy-floating-ip" | "dummyfip" => Ok(ResourceKind::DummyFloatingIp),
            "security-group" | "securitygroup" => Ok(ResourceKind::SecurityGroup),
            "underlay-acl" | "underlayacl" => Ok(ResourceKind::UnderlayAcl),
            _ => Err(format!(
                "unknown resource kind '{}', expected one of: {}",
                s,
                ResourceKind::ALL
                    .iter()
                    .map(|k| k.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

/// Router row (`routers`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
pub struct LocalRouter {
    pub id: String,
}

/// Subnet row (`subnets`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
pub struct LocalSubnet {
    pub id: String,
    pub network_id: String,
}

/// Router interface row (`routerports`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
pub struct RouterPort {
    pub router_id: String,
    pub port_id: String,
}

/// Subnet mapping row (`nuage_subnet_l2dom_mapping`).
///
/// `remote_subnet_id` names either a remote subnet or, when
/// `remote_template_id` is set, an L2 domain instantiated from that template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
pub struct SubnetLinkRecord {
    #[cfg_attr(feature = "database", sqlx(rename = "subnet_id"))]
    pub local_subnet_id: String,
    #[cfg_attr(feature = "database", sqlx(rename = "nuage_subnet_id"))]
    pub remote_subnet_id: String,
    #[cfg_attr(feature = "database", sqlx(rename = "nuage_l2dom_tmplt_id"))]
    pub remote_template_id: Option<String>,
}

/// Router-to-zone mapping row (`newarch_az_router_nuage`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
pub struct RouterLinkRecord {
    #[cfg_attr(feature = "database", sqlx(rename = "router_id"))]
    pub local_router_id: String,
    #[cfg_attr(feature = "database", sqlx(rename = "az_name"))]
    pub zone_name: Option<String>,
    #[cfg_attr(feature = "database", sqlx(rename = "nuage_router_id"))]
    pub remote_router_id: Option<String>,
}

/// An object fetched from one controller partition, tagged with the
/// partition it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteResource {
    pub id: String,
    pub external_id: Option<String>,
    pub kind: RemoteKind,
    /// Availability zone of the partition the object was fetched from.
    pub partition: String,
}

impl RemoteResource {
    pub fn from_object(object: RemoteObject, kind: RemoteKind, partition: &str) -> Self {
        Self {
            id: object.id,
            external_id: object.external_id,
            kind,
            partition: partition.to_string(),
        }
    }

    /// External id when present and non-empty.
    pub fn correlation_key(&self) -> Option<&str> {
        self.external_id.as_deref().filter(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip_and_legacy_names() {
        for kind in ResourceKind::ALL {
            assert_eq!(kind.as_str().parse::<ResourceKind>().unwrap(), kind);
        }
        assert_eq!(
            "dummyfip".parse::<ResourceKind>().unwrap(),
            ResourceKind::DummyFloatingIp
        );
        assert_eq!("ROUTER".parse::<ResourceKind>().unwrap(), ResourceKind::Router);
    }

    #[test]
    fn test_unknown_kind_lists_choices() {
        let err = "network".parse::<ResourceKind>().unwrap_err();
        assert!(err.contains("network"));
        assert!(err.contains("underlay-acl"));
    }

    #[test]
    fn test_correlation_key_ignores_empty() {
        let mut r = RemoteResource::from_object(
            RemoteObject::new("d1").with_external_id(""),
            RemoteKind::Domain,
            "az1",
        );
        assert_eq!(r.correlation_key(), None);
        r.external_id = Some("r1@cms1".into());
        assert_eq!(r.correlation_key(), Some("r1@cms1"));
        r.external_id = None;
        assert_eq!(r.correlation_key(), None);
    }
}
