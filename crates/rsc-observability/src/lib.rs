//! # rsc-observability
//!
//! Logging infrastructure for resscan.
//!
//! Log lines go to stderr so that reports written to stdout stay parseable.
//! Findings are logged at `WARN` as they are emitted, which makes the default
//! `WARN` level show every finding and nothing else.

pub mod logging;

pub use logging::{init_logging, init_logging_with_config, LoggingConfig};
