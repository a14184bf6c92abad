//! Report rendering for the terminal.

use anyhow::Result;
use colored::Colorize;
use rsc_core::{AuditReport, FindingKind, Severity};
use std::fmt::Write;

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn render(report: &AuditReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Text => Ok(render_text(report)),
    }
}

fn severity_label(severity: Severity) -> colored::ColoredString {
    match severity {
        Severity::Warning => "WARNING".yellow().bold(),
    }
}

fn render_text(report: &AuditReport) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} {} (run {})",
        "Audit:".bold(),
        report.kind,
        report.run_id
    );

    if !report.scanned {
        let _ = writeln!(
            out,
            "  {} no correlation rules for {}; nothing scanned",
            "-".dimmed(),
            report.kind
        );
        return out;
    }

    for (severity, findings) in report.by_severity() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{} ({})", severity_label(severity), findings.len());
        for f in findings {
            let partition = f
                .partition
                .as_deref()
                .map(|p| format!(" [{}]", p))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "  {:<22} {:<32} {}{} {}",
                f.kind.as_str(),
                f.scope,
                f.subject_id,
                partition,
                f.message.dimmed()
            );
        }
    }

    let forward = report.count(FindingKind::LocalMissingRemote);
    let backward = report.count(FindingKind::RemoteMissingLocal);
    let other = report.findings.len() - forward - backward;

    let _ = writeln!(out);
    if report.is_clean() {
        let _ = writeln!(out, "{} no discrepancies found", "✓".green());
    } else {
        let _ = writeln!(
            out,
            "{} {} finding(s): {} local-missing-remote, {} remote-missing-local, {} other",
            "Summary:".bold(),
            report.findings.len(),
            forward,
            backward,
            other
        );
    }
    let _ = writeln!(out, "Completed in {} ms", report.duration_ms());

    out
}
