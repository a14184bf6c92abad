//! Run-level errors.
//!
//! These abort the audit of one resource kind. Data-quality problems are
//! never errors; they are reported as findings.

use crate::db::DbError;
use rsc_connectors::ConnectorError;
use thiserror::Error;

/// Errors that abort an audit.
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Inventory read failed during {stage}: {source}")]
    Inventory {
        stage: &'static str,
        #[source]
        source: DbError,
    },

    #[error("Remote fetch failed during {stage} on partition '{partition}': {source}")]
    Remote {
        stage: &'static str,
        partition: String,
        #[source]
        source: ConnectorError,
    },

    #[error("Tenant '{tenant}' not found on partition '{partition}'")]
    TenantNotFound { partition: String, tenant: String },
}

impl AuditError {
    pub(crate) fn inventory(stage: &'static str) -> impl FnOnce(DbError) -> Self {
        move |source| AuditError::Inventory { stage, source }
    }

    pub(crate) fn remote(
        stage: &'static str,
        partition: &str,
    ) -> impl FnOnce(ConnectorError) -> Self {
        let partition = partition.to_string();
        move |source| AuditError::Remote {
            stage,
            partition,
            source,
        }
    }

    /// Name of the stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            AuditError::Inventory { stage, .. } | AuditError::Remote { stage, .. } => stage,
            AuditError::TenantNotFound { .. } => "find_tenant",
        }
    }

    /// Partition involved in the failure, if any.
    pub fn partition(&self) -> Option<&str> {
        match self {
            AuditError::Inventory { .. } => None,
            AuditError::Remote { partition, .. } | AuditError::TenantNotFound { partition, .. } => {
                Some(partition)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_names_stage_and_partition() {
        let err = AuditError::remote("list_domains", "az2")(ConnectorError::Timeout(
            "page 3".into(),
        ));
        assert_eq!(err.stage(), "list_domains");
        assert_eq!(err.partition(), Some("az2"));
        let text = err.to_string();
        assert!(text.contains("list_domains"));
        assert!(text.contains("az2"));
    }

    #[test]
    fn test_inventory_error_has_no_partition() {
        let err = AuditError::inventory("read_routers")(DbError::Connection("refused".into()));
        assert_eq!(err.stage(), "read_routers");
        assert_eq!(err.partition(), None);
    }

    #[test]
    fn test_tenant_not_found_stage() {
        let err = AuditError::TenantNotFound {
            partition: "az1".into(),
            tenant: "OpenStack_az1".into(),
        };
        assert_eq!(err.stage(), "find_tenant");
        assert!(err.to_string().contains("OpenStack_az1"));
    }
}
