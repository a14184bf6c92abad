//! Logging infrastructure for resscan.
//!
//! This module provides structured logging using the tracing ecosystem.

use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Crates whose events pass the default filter.
const CRATES: [&str; 4] = ["rsc_core", "rsc_connectors", "rsc_observability", "resscan"];

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level.
    pub level: Level,
    /// Whether to use JSON format.
    pub json_format: bool,
    /// Whether to include span open/close events.
    pub include_spans: bool,
    /// Whether to include file/line info.
    pub include_location: bool,
    /// Whether to include thread IDs.
    pub include_thread_ids: bool,
    /// Whether to include target (module path).
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            json_format: false,
            include_spans: false,
            include_location: false,
            include_thread_ids: false,
            include_target: false,
        }
    }
}

impl LoggingConfig {
    /// Creates a development configuration with more verbose output.
    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            json_format: false,
            include_spans: true,
            include_location: true,
            include_thread_ids: true,
            include_target: true,
        }
    }

    /// Creates a configuration with JSON output for log shipping.
    pub fn production() -> Self {
        Self {
            level: Level::INFO,
            json_format: true,
            include_spans: false,
            include_location: false,
            include_thread_ids: false,
            include_target: true,
        }
    }

    /// Configuration for the command line: `WARN` unless raised by the
    /// info or debug switch. Debug wins over info.
    pub fn for_cli(info: bool, debug: bool, json_format: bool) -> Self {
        let base = if debug {
            Self::development()
        } else {
            Self::default()
        };
        let level = if debug {
            Level::DEBUG
        } else if info {
            Level::INFO
        } else {
            Level::WARN
        };
        Self {
            level,
            json_format,
            ..base
        }
    }

    /// Filter directives used when `RUST_LOG` is not set.
    pub fn filter_directives(&self) -> String {
        CRATES
            .iter()
            .map(|krate| format!("{}={}", krate, self.level))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Initializes the logging system with default configuration.
pub fn init_logging() {
    init_logging_with_config(LoggingConfig::default());
}

/// Initializes the logging system with the given configuration.
pub fn init_logging_with_config(config: LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter_directives()));

    let span_events = if config.include_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    if config.json_format {
        let fmt_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_span_events(span_events)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_thread_ids(config.include_thread_ids)
            .with_target(config.include_target);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .init();
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_span_events(span_events)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_thread_ids(config.include_thread_ids)
            .with_target(config.include_target);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .init();
    }
}

/// Creates a span for one audit run.
#[macro_export]
macro_rules! audit_span {
    ($run_id:expr, $kind:expr) => {
        tracing::info_span!("audit", run_id = %$run_id, kind = %$kind)
    };
    ($run_id:expr, $kind:expr, $($field:tt)*) => {
        tracing::info_span!("audit", run_id = %$run_id, kind = %$kind, $($field)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_quiet() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, Level::WARN);
        assert!(!config.json_format);
    }

    #[test]
    fn test_cli_levels() {
        assert_eq!(LoggingConfig::for_cli(false, false, false).level, Level::WARN);
        assert_eq!(LoggingConfig::for_cli(true, false, false).level, Level::INFO);
        assert_eq!(LoggingConfig::for_cli(true, true, false).level, Level::DEBUG);
        assert!(LoggingConfig::for_cli(false, true, false).include_location);
        assert!(LoggingConfig::for_cli(false, false, true).json_format);
    }

    #[test]
    fn test_filter_directives_cover_workspace() {
        let directives = LoggingConfig::for_cli(true, false, false).filter_directives();
        assert_eq!(
            directives,
            "rsc_core=INFO,rsc_connectors=INFO,rsc_observability=INFO,resscan=INFO"
        );
    }

    #[test]
    fn test_span_macros_expand() {
        let span = audit_span!("run-1", "router");
        let _guard = span.enter();
        let _detailed = audit_span!("run-2", "subnet", partitions = 2);
    }
}
