//! Connector trait definitions for the remote controller.
//!
//! This module defines the interface every controller connector implements,
//! so that the audit engine never depends on a concrete transport.

use crate::secure_string::SecureString;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Errors that can occur in connectors.
#[derive(Error, Debug, Clone)]
pub enum ConnectorError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Authorization denied: {0}")]
    AuthorizationDenied(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Rate limited: retry after {0} seconds")]
    RateLimited(u64),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for connector operations.
pub type ConnectorResult<T> = Result<T, ConnectorError>;

/// Transport configuration for a connector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Connector name, used in logs.
    pub name: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Default authentication.
    pub auth: AuthConfig,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum retries performed by the transport. Zero disables retries.
    pub max_retries: u32,
    /// Whether to verify TLS certificates.
    pub verify_tls: bool,
    /// Additional headers sent on every request.
    pub headers: HashMap<String, String>,
}

/// Authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthConfig {
    /// No authentication.
    None,
    /// Nuage `XREST` authentication: `Authorization: XREST base64(user:secret)`.
    XRest {
        username: String,
        password: SecureString,
    },
}

/// Base trait for all connectors.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Returns the connector name.
    fn name(&self) -> &str;

    /// Returns the connector type (e.g., "vsd", "mock").
    fn connector_type(&self) -> &str;
}

/// Remote object families that can be listed from a controller partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteKind {
    /// L2 domain template, owned by a tenant.
    L2DomainTemplate,
    /// L2 domain (leaf domain), owned by a tenant.
    L2Domain,
    /// L3 domain (container domain), owned by a tenant.
    Domain,
    /// Subnet, owned by an L3 domain.
    Subnet,
}

impl RemoteKind {
    /// REST collection name under the parent object.
    pub fn collection(&self) -> &'static str {
        match self {
            RemoteKind::L2DomainTemplate => "l2domaintemplates",
            RemoteKind::L2Domain => "l2domains",
            RemoteKind::Domain => "domains",
            RemoteKind::Subnet => "subnets",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteKind::L2DomainTemplate => "l2domain_template",
            RemoteKind::L2Domain => "l2domain",
            RemoteKind::Domain => "domain",
            RemoteKind::Subnet => "subnet",
        }
    }
}

impl fmt::Display for RemoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parent object a collection is listed under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListScope {
    /// A tenant (enterprise) by remote id.
    Tenant(String),
    /// An L3 domain by remote id.
    Domain(String),
}

impl ListScope {
    /// REST path of the parent object.
    pub fn path(&self) -> String {
        match self {
            ListScope::Tenant(id) => format!("enterprises/{}", id),
            ListScope::Domain(id) => format!("domains/{}", id),
        }
    }
}

/// One page request. Pages are zero-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

/// A remote object as returned by the controller.
///
/// `external_id` keeps the difference between a missing attribute (`None`)
/// and an attribute that is present but empty (`Some("")`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteObject {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "externalID", default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "parentID", default)]
    pub parent_id: Option<String>,
}

impl RemoteObject {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            external_id: None,
            name: None,
            parent_id: None,
        }
    }

    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }
}

/// Remote SDN controller connector for one partition.
///
/// Implementations own their session state. `start_session` must be called
/// before any listing call.
#[async_trait]
pub trait ControllerConnector: Connector {
    /// Establishes an authenticated session with the controller.
    async fn start_session(&self) -> ConnectorResult<()>;

    /// Looks up a tenant (enterprise) by exact name.
    async fn find_tenant(&self, name: &str) -> ConnectorResult<Option<RemoteObject>>;

    /// Lists one page of a collection under `scope`. An empty page marks the
    /// end of the collection.
    async fn list_page(
        &self,
        scope: &ListScope,
        kind: RemoteKind,
        page: PageRequest,
    ) -> ConnectorResult<Vec<RemoteObject>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_object_keeps_empty_external_id() {
        let parsed: RemoteObject =
            serde_json::from_str(r#"{"ID": "d1", "externalID": "", "name": "dom"}"#).unwrap();
        assert_eq!(parsed.external_id, Some(String::new()));

        let parsed: RemoteObject = serde_json::from_str(r#"{"ID": "d2"}"#).unwrap();
        assert_eq!(parsed.external_id, None);

        let parsed: RemoteObject =
            serde_json::from_str(r#"{"ID": "d3", "externalID": null}"#).unwrap();
        assert_eq!(parsed.external_id, None);
    }

    #[test]
    fn test_scope_paths() {
        assert_eq!(ListScope::Tenant("e1".into()).path(), "enterprises/e1");
        assert_eq!(ListScope::Domain("d1".into()).path(), "domains/d1");
        assert_eq!(RemoteKind::L2DomainTemplate.collection(), "l2domaintemplates");
    }
}
