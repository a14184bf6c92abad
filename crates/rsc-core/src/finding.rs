//! Findings and the per-run finding sink.
//!
//! A finding is a data-quality observation, not an error. Findings are
//! appended in emission order and never abort a scan.

use crate::model::ResourceKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

/// Classification of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FindingKind {
    /// A local resource, or its link record, has no remote counterpart.
    LocalMissingRemote,
    /// A remote resource has no local counterpart.
    RemoteMissingLocal,
    /// A remote correlation key is empty or cannot be parsed.
    AmbiguousLink,
    /// A link record names no zone, or a zone with no configured partition.
    UnresolvedPartition,
    /// A key appeared more than once within one key space.
    DuplicateKey,
}

impl FindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingKind::LocalMissingRemote => "local-missing-remote",
            FindingKind::RemoteMissingLocal => "remote-missing-local",
            FindingKind::AmbiguousLink => "ambiguous-link",
            FindingKind::UnresolvedPartition => "unresolved-partition",
            FindingKind::DuplicateKey => "duplicate-key",
        }
    }

    /// The engine raises no fatal findings; every kind is a warning.
    pub fn severity(&self) -> Severity {
        Severity::Warning
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// One reported discrepancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub resource_kind: ResourceKind,
    /// Direction of the discrepancy.
    #[serde(rename = "direction")]
    pub kind: FindingKind,
    /// Sub-object the finding is about (e.g. `l2domain`, `router_link`).
    pub scope: String,
    /// Id (or key) of the resource the finding is about.
    pub subject_id: String,
    /// Partition the subject belongs to, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    pub message: String,
}

impl Finding {
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

/// Append-only collector of findings for one audit of one resource kind.
#[derive(Debug)]
pub struct FindingSink {
    resource_kind: ResourceKind,
    findings: Vec<Finding>,
}

impl FindingSink {
    pub fn new(resource_kind: ResourceKind) -> Self {
        Self {
            resource_kind,
            findings: Vec::new(),
        }
    }

    /// Records a finding and logs it at warn level.
    pub fn emit(
        &mut self,
        kind: FindingKind,
        scope: &str,
        subject_id: &str,
        partition: Option<&str>,
        message: String,
    ) {
        warn!(
            resource_kind = %self.resource_kind,
            finding = %kind,
            scope = scope,
            subject_id = subject_id,
            partition = partition.unwrap_or("-"),
            "{}",
            message
        );
        self.findings.push(Finding {
            resource_kind: self.resource_kind,
            kind,
            scope: scope.to_string(),
            subject_id: subject_id.to_string(),
            partition: partition.map(str::to_string),
            message,
        });
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Consumes the sink, yielding every finding in emission order.
    pub fn drain(self) -> Vec<Finding> {
        self.findings
    }
}

/// Groups findings by severity, keeping emission order inside each group.
pub fn group_by_severity(findings: &[Finding]) -> BTreeMap<Severity, Vec<&Finding>> {
    let mut groups: BTreeMap<Severity, Vec<&Finding>> = BTreeMap::new();
    for finding in findings {
        groups.entry(finding.severity()).or_default().push(finding);
    }
    groups
}

/// Counts findings per kind.
pub fn count_by_kind(findings: &[Finding]) -> BTreeMap<FindingKind, usize> {
    let mut counts = BTreeMap::new();
    for finding in findings {
        *counts.entry(finding.kind).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_keeps_emission_order() {
        let mut sink = FindingSink::new(ResourceKind::Router);
        sink.emit(
            FindingKind::AmbiguousLink,
            "domain",
            "d1",
            Some("az1"),
            "empty external id".into(),
        );
        sink.emit(
            FindingKind::LocalMissingRemote,
            "domain",
            "r1@cms1",
            None,
            "domain not found".into(),
        );
        assert_eq!(sink.len(), 2);

        let findings = sink.drain();
        assert_eq!(findings[0].kind, FindingKind::AmbiguousLink);
        assert_eq!(findings[0].partition.as_deref(), Some("az1"));
        assert_eq!(findings[1].subject_id, "r1@cms1");
        assert_eq!(findings[1].resource_kind, ResourceKind::Router);
    }

    #[test]
    fn test_every_kind_is_a_warning() {
        for kind in [
            FindingKind::LocalMissingRemote,
            FindingKind::RemoteMissingLocal,
            FindingKind::AmbiguousLink,
            FindingKind::UnresolvedPartition,
            FindingKind::DuplicateKey,
        ] {
            assert_eq!(kind.severity(), Severity::Warning);
        }
    }

    #[test]
    fn test_group_and_count() {
        let mut sink = FindingSink::new(ResourceKind::Subnet);
        for id in ["s1", "s2"] {
            sink.emit(FindingKind::LocalMissingRemote, "subnet_link", id, None, "x".into());
        }
        sink.emit(FindingKind::DuplicateKey, "subnet", "k", None, "y".into());
        let findings = sink.drain();

        let groups = group_by_severity(&findings);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[&Severity::Warning].len(), 3);
        assert_eq!(groups[&Severity::Warning][0].subject_id, "s1");

        let counts = count_by_kind(&findings);
        assert_eq!(counts[&FindingKind::LocalMissingRemote], 2);
        assert_eq!(counts[&FindingKind::DuplicateKey], 1);
    }

    #[test]
    fn test_finding_serializes_kebab_case() {
        let mut sink = FindingSink::new(ResourceKind::Router);
        sink.emit(FindingKind::UnresolvedPartition, "router_link", "r1", None, "m".into());
        let json = serde_json::to_value(&sink.drain()[0]).unwrap();
        assert_eq!(json["direction"], "unresolved-partition");
        assert_eq!(json["resource_kind"], "router");
        assert!(json.get("partition").is_none());
    }
}
