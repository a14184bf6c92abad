//! Fixture helpers for tests that exercise connectors.

use crate::traits::{AuthConfig, ConnectorConfig, ListScope, RemoteKind, RemoteObject};
use crate::vsd::MockControllerConnector;
use std::collections::HashMap;

/// Creates a test connector config with sensible defaults and no retries.
pub fn test_connector_config(name: &str, base_url: &str) -> ConnectorConfig {
    ConnectorConfig {
        name: name.to_string(),
        base_url: base_url.to_string(),
        auth: AuthConfig::None,
        timeout_secs: 30,
        max_retries: 0,
        verify_tls: true,
        headers: HashMap::new(),
    }
}

/// A remote object with an external id attribute.
pub fn remote_with_external_id(id: &str, external_id: &str) -> RemoteObject {
    RemoteObject::new(id).with_external_id(external_id)
}

/// Builds a mock partition with one tenant and returns the tenant scope.
pub async fn mock_partition(name: &str, tenant: &str) -> (MockControllerConnector, ListScope) {
    let connector = MockControllerConnector::new(name);
    let tenant = connector.add_tenant(tenant).await;
    (connector, ListScope::Tenant(tenant.id))
}

/// Adds every object to the collection of `kind` under `scope`.
pub async fn seed_objects(
    connector: &MockControllerConnector,
    scope: &ListScope,
    kind: RemoteKind,
    objects: impl IntoIterator<Item = RemoteObject>,
) {
    for object in objects {
        connector.add_object(scope, kind, object).await;
    }
}
