//! Configuration validation for resscan.
//!
//! Runs before either system is contacted. Errors stop the audit; warnings
//! describe settings that load but behave differently than written.

use crate::config::AppConfig;
use colored::Colorize;
use rsc_connectors::MAX_PAGE_SIZE;
use std::collections::HashSet;

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Problems that prevent an audit.
    pub errors: Vec<String>,
    /// Problems that should be addressed but don't prevent an audit.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Prints the validation result to stderr.
    pub fn print(&self) {
        if !self.warnings.is_empty() {
            eprintln!();
            eprintln!("{}", "Configuration Warnings:".yellow().bold());
            for warning in &self.warnings {
                eprintln!("  {} {}", "⚠".yellow(), warning);
            }
        }

        if !self.errors.is_empty() {
            eprintln!();
            eprintln!("{}", "Configuration Errors:".red().bold());
            for error in &self.errors {
                eprintln!("  {} {}", "✗".red(), error);
            }
        }

        if self.errors.is_empty() && self.warnings.is_empty() {
            eprintln!("  {} Configuration OK", "✓".green());
        }
    }
}

/// Validates application configuration before an audit.
pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(config: &AppConfig) -> ValidationResult {
        let mut result = ValidationResult::new();

        Self::validate_datastore(config, &mut result);
        Self::validate_partitions(config, &mut result);
        Self::validate_remote(config, &mut result);

        result
    }

    fn validate_datastore(config: &AppConfig, result: &mut ValidationResult) {
        let ds = &config.datastore;
        if ds.host.trim().is_empty() {
            result.add_error("datastore.host is empty");
        }
        if ds.database_name.trim().is_empty() {
            result.add_error("datastore.database_name is empty");
        }
        if ds.username.trim().is_empty() {
            result.add_error("datastore.username is empty");
        }
        if ds.password.is_empty() {
            result.add_warning("datastore.password is empty");
        }
    }

    fn validate_partitions(config: &AppConfig, result: &mut ValidationResult) {
        if config.partitions.is_empty() {
            result.add_error("no controller partitions configured");
            return;
        }

        let mut zones = HashSet::new();
        let mut cms_ids = HashSet::new();

        for (i, p) in config.partitions.iter().enumerate() {
            let label = if p.availability_zone.is_empty() {
                format!("partitions[{}]", i)
            } else {
                format!("partition '{}'", p.availability_zone)
            };

            if p.endpoint.trim().is_empty() {
                result.add_error(format!("{}: endpoint is empty", label));
            } else if !p.endpoint.starts_with("http://") && !p.endpoint.starts_with("https://") {
                result.add_error(format!(
                    "{}: endpoint '{}' must start with http:// or https://",
                    label, p.endpoint
                ));
            } else if p.endpoint.starts_with("http://") {
                result.add_warning(format!(
                    "{}: endpoint '{}' is not using TLS",
                    label, p.endpoint
                ));
            }

            if p.availability_zone.trim().is_empty() {
                result.add_error(format!("{}: availability_zone is empty", label));
            } else if !zones.insert(p.availability_zone.as_str()) {
                result.add_warning(format!(
                    "{}: availability zone is declared more than once; the first declaration wins",
                    label
                ));
            }

            if p.correlation_id.trim().is_empty() {
                result.add_warning(format!(
                    "{}: correlation_id (cms_id) is empty; router links in this zone will be reported as unresolved",
                    label
                ));
            } else if !cms_ids.insert(p.correlation_id.as_str()) {
                result.add_warning(format!(
                    "{}: correlation_id '{}' is shared with another partition",
                    label, p.correlation_id
                ));
            }

            if p.tenant.trim().is_empty() {
                result.add_error(format!("{}: tenant (net_partition) is empty", label));
            }
            if p.username.trim().is_empty() {
                result.add_error(format!("{}: username is empty", label));
            }
        }
    }

    fn validate_remote(config: &AppConfig, result: &mut ValidationResult) {
        let remote = &config.remote;
        if remote.page_size == 0 || remote.page_size > MAX_PAGE_SIZE {
            result.add_warning(format!(
                "remote.page_size {} is outside 1..={} and will be clamped",
                remote.page_size, MAX_PAGE_SIZE
            ));
        }
        if !remote.verify_tls {
            result.add_warning("remote.verify_tls is disabled; controller certificates are not checked");
        }
        if remote.timeout_secs == 0 {
            result.add_error("remote.timeout_secs must be greater than zero");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DatastoreConfig, PartitionConfig, RemoteSettings};
    use rsc_connectors::SecureString;

    fn partition(az: &str, cms: &str) -> PartitionConfig {
        PartitionConfig {
            username: "csproot".into(),
            password: SecureString::from("csproot"),
            organization: "csp".into(),
            endpoint: format!("https://{}.vsd:8443", az),
            tenant: format!("OpenStack_{}", az),
            correlation_id: cms.into(),
            availability_zone: az.into(),
            api_version: "v6".into(),
        }
    }

    fn valid_config() -> AppConfig {
        AppConfig {
            datastore: DatastoreConfig {
                username: "neutron".into(),
                password: SecureString::from("pw"),
                host: "db.local".into(),
                port: 3306,
                database_name: "neutron".into(),
            },
            partitions: vec![partition("az1", "cms1"), partition("az2", "cms2")],
            remote: RemoteSettings::default(),
        }
    }

    #[test]
    fn test_valid_config() {
        let result = ConfigValidator::validate(&valid_config());
        assert!(!result.has_errors(), "{:?}", result.errors);
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    }

    #[test]
    fn test_no_partitions_is_error() {
        let mut config = valid_config();
        config.partitions.clear();
        let result = ConfigValidator::validate(&config);
        assert!(result.has_errors());
        assert!(result.errors[0].contains("no controller partitions"));
    }

    #[test]
    fn test_empty_fields_are_errors() {
        let mut config = valid_config();
        config.partitions[0].endpoint.clear();
        config.partitions[1].username.clear();
        config.partitions[1].tenant.clear();
        let result = ConfigValidator::validate(&config);
        assert_eq!(result.errors.len(), 3, "{:?}", result.errors);
    }

    #[test]
    fn test_empty_cms_id_is_warning() {
        let mut config = valid_config();
        config.partitions[0].correlation_id.clear();
        let result = ConfigValidator::validate(&config);
        assert!(!result.has_errors(), "{:?}", result.errors);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("unresolved"));
    }

    #[test]
    fn test_bad_scheme_is_error() {
        let mut config = valid_config();
        config.partitions[0].endpoint = "vsd1:8443".into();
        let result = ConfigValidator::validate(&config);
        assert!(result.errors.iter().any(|e| e.contains("http://")));
    }

    #[test]
    fn test_duplicates_are_warnings() {
        let mut config = valid_config();
        config.partitions.push(partition("az1", "cms2"));
        let result = ConfigValidator::validate(&config);
        assert!(!result.has_errors());
        assert_eq!(result.warnings.len(), 2, "{:?}", result.warnings);
        assert!(result.warnings[0].contains("first declaration wins"));
    }

    #[test]
    fn test_page_size_clamp_warning() {
        let mut config = valid_config();
        config.remote.page_size = 2000;
        let result = ConfigValidator::validate(&config);
        assert!(!result.has_errors());
        assert!(result.warnings.iter().any(|w| w.contains("clamped")));
    }
}
