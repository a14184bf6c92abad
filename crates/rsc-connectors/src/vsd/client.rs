//! VSD REST API connector.

use crate::http::{HttpClient, RequestOptions};
use crate::secure_string::SecureString;
use crate::traits::{
    AuthConfig, Connector, ConnectorConfig, ConnectorError, ConnectorResult, ControllerConnector,
    ListScope, PageRequest, RemoteKind, RemoteObject,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{info, instrument};

const ORGANIZATION_HEADER: &str = "X-Nuage-Organization";
const PAGE_HEADER: &str = "X-Nuage-Page";
const PAGE_SIZE_HEADER: &str = "X-Nuage-PageSize";
const FILTER_HEADER: &str = "X-Nuage-Filter";

/// Connection settings for one VSD endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VsdConfig {
    /// Name used in logs, usually the availability zone.
    pub name: String,
    /// Controller endpoint, e.g. `https://10.0.0.1:8443`.
    pub endpoint: String,
    pub username: String,
    pub password: SecureString,
    /// Organization the user logs into (e.g. `csp`).
    pub organization: String,
    /// REST API version segment.
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub max_retries: u32,
    #[serde(default = "default_true")]
    pub verify_tls: bool,
}

fn default_api_version() -> String {
    "v6".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

/// Session state returned by `GET /me`.
#[derive(Debug, Deserialize)]
struct MeResponse {
    #[serde(rename = "APIKey")]
    api_key: String,
}

/// REST connector for one VSD partition.
pub struct VsdConnector {
    config: VsdConfig,
    client: HttpClient,
    api_key: RwLock<Option<SecureString>>,
}

impl VsdConnector {
    pub fn new(config: VsdConfig) -> ConnectorResult<Self> {
        let client = HttpClient::new(ConnectorConfig {
            name: config.name.clone(),
            base_url: config.endpoint.clone(),
            auth: AuthConfig::XRest {
                username: config.username.clone(),
                password: config.password.clone(),
            },
            timeout_secs: config.timeout_secs,
            max_retries: config.max_retries,
            verify_tls: config.verify_tls,
            headers: HashMap::new(),
        })?;
        info!(
            "VSD connector initialized for '{}' at {}",
            config.name, config.endpoint
        );
        Ok(Self {
            config,
            client,
            api_key: RwLock::new(None),
        })
    }

    fn api_path(&self, path: &str) -> String {
        format!("nuage/api/{}/{}", self.config.api_version, path)
    }

    /// Request options carrying the session key. Fails when no session exists.
    async fn session_options(&self) -> ConnectorResult<RequestOptions> {
        let api_key = self.api_key.read().await.clone().ok_or_else(|| {
            ConnectorError::AuthenticationFailed(format!(
                "no session started for '{}'",
                self.config.name
            ))
        })?;
        Ok(RequestOptions::default()
            .header(ORGANIZATION_HEADER, self.config.organization.clone())
            .credentials(self.config.username.clone(), api_key))
    }
}

/// Builds a controller filter expression matching an exact name.
pub(crate) fn name_filter(name: &str) -> String {
    format!("name == '{}'", name.replace('\'', "\\'"))
}

#[async_trait]
impl Connector for VsdConnector {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn connector_type(&self) -> &str {
        "vsd"
    }
}

#[async_trait]
impl ControllerConnector for VsdConnector {
    #[instrument(skip(self), fields(partition = %self.config.name))]
    async fn start_session(&self) -> ConnectorResult<()> {
        let options =
            RequestOptions::default().header(ORGANIZATION_HEADER, self.config.organization.clone());
        let me: Vec<MeResponse> = self.client.get_json_list(&self.api_path("me"), &options).await?;
        let api_key = me.into_iter().next().map(|m| m.api_key).ok_or_else(|| {
            ConnectorError::AuthenticationFailed("empty response from /me".to_string())
        })?;
        *self.api_key.write().await = Some(SecureString::new(api_key));
        info!("VSD session started");
        Ok(())
    }

    #[instrument(skip(self), fields(partition = %self.config.name))]
    async fn find_tenant(&self, name: &str) -> ConnectorResult<Option<RemoteObject>> {
        let options = self
            .session_options()
            .await?
            .header(FILTER_HEADER, name_filter(name));
        let tenants: Vec<RemoteObject> = self
            .client
            .get_json_list(&self.api_path("enterprises"), &options)
            .await?;
        Ok(tenants.into_iter().next())
    }

    async fn list_page(
        &self,
        scope: &ListScope,
        kind: RemoteKind,
        page: PageRequest,
    ) -> ConnectorResult<Vec<RemoteObject>> {
        let options = self
            .session_options()
            .await?
            .header(PAGE_HEADER, page.page.to_string())
            .header(PAGE_SIZE_HEADER, page.page_size.to_string());
        let path = self.api_path(&format!("{}/{}", scope.path(), kind.collection()));
        self.client.get_json_list(&path, &options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> VsdConfig {
        VsdConfig {
            name: "beijing".to_string(),
            endpoint: "https://vsd.example.com:8443".to_string(),
            username: "csproot".to_string(),
            password: SecureString::from("csproot"),
            organization: "csp".to_string(),
            api_version: default_api_version(),
            timeout_secs: 30,
            max_retries: 0,
            verify_tls: true,
        }
    }

    #[test]
    fn test_api_path() {
        let connector = VsdConnector::new(create_test_config()).unwrap();
        assert_eq!(connector.api_path("me"), "nuage/api/v6/me");
        assert_eq!(
            connector.api_path(&format!(
                "{}/{}",
                ListScope::Domain("d1".into()).path(),
                RemoteKind::Subnet.collection()
            )),
            "nuage/api/v6/domains/d1/subnets"
        );
    }

    #[test]
    fn test_name_filter_quotes() {
        assert_eq!(name_filter("OpenStack_pike"), "name == 'OpenStack_pike'");
        assert_eq!(name_filter("it's"), "name == 'it\\'s'");
    }

    #[tokio::test]
    async fn test_listing_requires_session() {
        let connector = VsdConnector::new(create_test_config()).unwrap();
        let result = connector
            .list_page(
                &ListScope::Tenant("e1".into()),
                RemoteKind::Domain,
                PageRequest { page: 0, page_size: 500 },
            )
            .await;
        assert!(matches!(result, Err(ConnectorError::AuthenticationFailed(_))));
    }

    #[test]
    fn test_config_defaults() {
        let config: VsdConfig = serde_json::from_str(
            r#"{"name": "az1", "endpoint": "https://vsd:8443", "username": "u",
                "password": "p", "organization": "csp"}"#,
        )
        .unwrap();
        assert_eq!(config.api_version, "v6");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.max_retries, 0);
        assert!(config.verify_tls);
    }
}
