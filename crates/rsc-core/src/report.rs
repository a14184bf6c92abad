//! Audit report: the drained findings of one run plus run metadata.

use crate::finding::{count_by_kind, group_by_severity, Finding, FindingKind, Severity};
use crate::model::ResourceKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Result of auditing one resource kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub run_id: Uuid,
    pub kind: ResourceKind,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// False when the kind has no correlation rules and nothing was scanned.
    pub scanned: bool,
    /// Findings in emission order.
    pub findings: Vec<Finding>,
}

impl AuditReport {
    pub fn by_severity(&self) -> BTreeMap<Severity, Vec<&Finding>> {
        group_by_severity(&self.findings)
    }

    pub fn counts(&self) -> BTreeMap<FindingKind, usize> {
        count_by_kind(&self.findings)
    }

    pub fn count(&self, kind: FindingKind) -> usize {
        self.findings.iter().filter(|f| f.kind == kind).count()
    }

    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::FindingSink;

    fn report() -> AuditReport {
        let mut sink = FindingSink::new(ResourceKind::Router);
        sink.emit(FindingKind::AmbiguousLink, "domain", "d1", Some("az1"), "a".into());
        sink.emit(FindingKind::LocalMissingRemote, "domain", "r1", None, "b".into());
        sink.emit(FindingKind::LocalMissingRemote, "domain", "r2", None, "c".into());
        let now = Utc::now();
        AuditReport {
            run_id: Uuid::new_v4(),
            kind: ResourceKind::Router,
            started_at: now,
            finished_at: now + chrono::Duration::milliseconds(250),
            scanned: true,
            findings: sink.drain(),
        }
    }

    #[test]
    fn test_counts() {
        let report = report();
        assert_eq!(report.count(FindingKind::LocalMissingRemote), 2);
        assert_eq!(report.counts()[&FindingKind::AmbiguousLink], 1);
        assert_eq!(report.by_severity()[&Severity::Warning].len(), 3);
        assert_eq!(report.duration_ms(), 250);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(report()).unwrap();
        assert_eq!(json["kind"], "router");
        assert_eq!(json["findings"].as_array().unwrap().len(), 3);
        assert_eq!(json["findings"][0]["direction"], "ambiguous-link");
    }
}
