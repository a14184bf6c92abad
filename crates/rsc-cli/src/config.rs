//! Configuration loading for the resscan CLI.
//!
//! The file names one datastore and any number of controller partitions.
//! JSON (`.json`) and YAML (anything else) are accepted; field aliases let
//! the legacy `neutron`/`vsd` JSON layout load unchanged.

use anyhow::{Context, Result};
use rsc_connectors::{SecureString, VsdConfig, DEFAULT_PAGE_SIZE};
use rsc_core::db::ConnectionSettings;
use rsc_core::{OrchestratorConfig, Partition};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Network service datastore.
    #[serde(alias = "neutron")]
    pub datastore: DatastoreConfig,

    /// Controller partitions, in lookup order.
    #[serde(default, alias = "vsd")]
    pub partitions: Vec<PartitionConfig>,

    /// Settings shared by every controller connection.
    #[serde(default)]
    pub remote: RemoteSettings,
}

/// Datastore connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatastoreConfig {
    pub username: String,

    #[serde(default)]
    pub password: SecureString,

    #[serde(alias = "ip_addr")]
    pub host: String,

    #[serde(default = "default_db_port")]
    pub port: u16,

    #[serde(alias = "db_name")]
    pub database_name: String,
}

fn default_db_port() -> u16 {
    3306
}

/// One controller partition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionConfig {
    pub username: String,

    #[serde(default)]
    pub password: SecureString,

    pub organization: String,

    #[serde(alias = "url")]
    pub endpoint: String,

    /// Tenant (enterprise) holding the audited objects.
    #[serde(alias = "net_partition", alias = "zone_name")]
    pub tenant: String,

    /// CMS id embedded in domain external ids.
    #[serde(alias = "cms_id")]
    pub correlation_id: String,

    #[serde(alias = "az")]
    pub availability_zone: String,

    /// REST API version segment.
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

fn default_api_version() -> String {
    "v6".to_string()
}

/// Controller client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteSettings {
    /// Items per page. Clamped to the controller maximum.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Transport-level retries per request.
    #[serde(default)]
    pub max_retries: u32,

    #[serde(default = "default_true")]
    pub verify_tls: bool,

    /// Fetch partitions concurrently.
    #[serde(default = "default_true")]
    pub parallel_fetch: bool,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            timeout_secs: default_timeout(),
            max_retries: 0,
            verify_tls: true,
            parallel_fetch: true,
        }
    }
}

impl AppConfig {
    /// Loads configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let config: Self = if is_json {
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        };

        Ok(config)
    }

    /// Renders the configuration as YAML. Passwords are redacted by
    /// [`SecureString`]'s serializer.
    pub fn to_redacted_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn connection_settings(&self) -> ConnectionSettings {
        ConnectionSettings {
            host: self.datastore.host.clone(),
            port: self.datastore.port,
            username: self.datastore.username.clone(),
            password: self.datastore.password.clone(),
            database: self.datastore.database_name.clone(),
        }
    }

    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            page_size: self.remote.page_size,
            parallel_fetch: self.remote.parallel_fetch,
        }
    }
}

impl PartitionConfig {
    pub fn partition(&self) -> Partition {
        Partition {
            availability_zone: self.availability_zone.clone(),
            correlation_id: self.correlation_id.clone(),
            tenant: self.tenant.clone(),
        }
    }

    pub fn vsd_config(&self, remote: &RemoteSettings) -> VsdConfig {
        VsdConfig {
            name: self.availability_zone.clone(),
            endpoint: self.endpoint.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            organization: self.organization.clone(),
            api_version: self.api_version.clone(),
            timeout_secs: remote.timeout_secs,
            max_retries: remote.max_retries,
            verify_tls: remote.verify_tls,
        }
    }
}
