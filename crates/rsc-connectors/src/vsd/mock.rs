//! Mock controller connector for testing.
//!
//! Holds collections in memory, serves them in pages of the requested size
//! and records every page request. Supports failure injection.

use crate::traits::{
    Connector, ConnectorError, ConnectorResult, ControllerConnector, ListScope, PageRequest,
    RemoteKind, RemoteObject,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Behavior configuration for failure injection.
#[derive(Debug, Clone, Default)]
pub enum MockBehavior {
    /// Normal operation.
    #[default]
    Normal,
    /// Session establishment fails.
    FailSession(ConnectorError),
    /// Any listing call for this page index fails.
    FailOnPage { page: u32, error: ConnectorError },
    /// Any listing call for this object kind fails.
    FailOnKind { kind: RemoteKind, error: ConnectorError },
}

/// Record of one page request for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    pub scope: ListScope,
    pub kind: RemoteKind,
    pub page: PageRequest,
}

/// In-memory controller partition.
pub struct MockControllerConnector {
    name: String,
    tenants: RwLock<Vec<RemoteObject>>,
    collections: RwLock<HashMap<(ListScope, RemoteKind), Vec<RemoteObject>>>,
    behavior: RwLock<MockBehavior>,
    session_started: AtomicBool,
    next_id: AtomicU64,
    requests: RwLock<Vec<PageRecord>>,
}

impl MockControllerConnector {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tenants: RwLock::new(Vec::new()),
            collections: RwLock::new(HashMap::new()),
            behavior: RwLock::new(MockBehavior::Normal),
            session_started: AtomicBool::new(false),
            next_id: AtomicU64::new(1),
            requests: RwLock::new(Vec::new()),
        }
    }

    /// Registers a tenant and returns it with a generated id.
    pub async fn add_tenant(&self, name: &str) -> RemoteObject {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let tenant = RemoteObject::new(format!("{}-enterprise-{}", self.name, n)).with_name(name);
        self.tenants.write().await.push(tenant.clone());
        tenant
    }

    /// Appends an object to the collection of `kind` under `scope`.
    pub async fn add_object(&self, scope: &ListScope, kind: RemoteKind, object: RemoteObject) {
        self.collections
            .write()
            .await
            .entry((scope.clone(), kind))
            .or_default()
            .push(object);
    }

    pub async fn set_behavior(&self, behavior: MockBehavior) {
        *self.behavior.write().await = behavior;
    }

    pub fn session_started(&self) -> bool {
        self.session_started.load(Ordering::SeqCst)
    }

    /// Every page request received so far, in order.
    pub async fn page_requests(&self) -> Vec<PageRecord> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl Connector for MockControllerConnector {
    fn name(&self) -> &str {
        &self.name
    }

    fn connector_type(&self) -> &str {
        "mock"
    }
}

#[async_trait]
impl ControllerConnector for MockControllerConnector {
    async fn start_session(&self) -> ConnectorResult<()> {
        if let MockBehavior::FailSession(error) = &*self.behavior.read().await {
            return Err(error.clone());
        }
        self.session_started.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn find_tenant(&self, name: &str) -> ConnectorResult<Option<RemoteObject>> {
        if !self.session_started() {
            return Err(ConnectorError::AuthenticationFailed(
                "no session started".to_string(),
            ));
        }
        let tenants = self.tenants.read().await;
        Ok(tenants
            .iter()
            .find(|t| t.name.as_deref() == Some(name))
            .cloned())
    }

    async fn list_page(
        &self,
        scope: &ListScope,
        kind: RemoteKind,
        page: PageRequest,
    ) -> ConnectorResult<Vec<RemoteObject>> {
        self.requests.write().await.push(PageRecord {
            scope: scope.clone(),
            kind,
            page,
        });

        if !self.session_started() {
            return Err(ConnectorError::AuthenticationFailed(
                "no session started".to_string(),
            ));
        }

        match &*self.behavior.read().await {
            MockBehavior::FailOnPage { page: p, error } if *p == page.page => {
                return Err(error.clone());
            }
            MockBehavior::FailOnKind { kind: k, error } if *k == kind => {
                return Err(error.clone());
            }
            _ => {}
        }

        let collections = self.collections.read().await;
        let items = collections
            .get(&(scope.clone(), kind))
            .map(|all| {
                all.iter()
                    .skip(page.page as usize * page.page_size as usize)
                    .take(page.page_size as usize)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pages_are_sliced() {
        let mock = MockControllerConnector::new("az1");
        mock.start_session().await.unwrap();
        let scope = ListScope::Domain("d1".into());
        for i in 0..5 {
            mock.add_object(&scope, RemoteKind::Subnet, RemoteObject::new(format!("s{}", i)))
                .await;
        }

        let page = |n| PageRequest { page: n, page_size: 2 };
        assert_eq!(mock.list_page(&scope, RemoteKind::Subnet, page(0)).await.unwrap().len(), 2);
        assert_eq!(mock.list_page(&scope, RemoteKind::Subnet, page(2)).await.unwrap().len(), 1);
        assert!(mock.list_page(&scope, RemoteKind::Subnet, page(3)).await.unwrap().is_empty());
        assert_eq!(mock.page_requests().await.len(), 3);
    }

    #[tokio::test]
    async fn test_find_tenant_by_name() {
        let mock = MockControllerConnector::new("az1");
        let tenant = mock.add_tenant("OpenStack_pike").await;
        mock.start_session().await.unwrap();

        assert_eq!(mock.find_tenant("OpenStack_pike").await.unwrap(), Some(tenant));
        assert_eq!(mock.find_tenant("other").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_session_failure() {
        let mock = MockControllerConnector::new("az1");
        mock.set_behavior(MockBehavior::FailSession(ConnectorError::AuthenticationFailed(
            "bad password".into(),
        )))
        .await;
        assert!(mock.start_session().await.is_err());
        assert!(!mock.session_started());
    }
}
