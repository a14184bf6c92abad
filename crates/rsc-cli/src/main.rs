//! resscan CLI
//!
//! Audits the network service datastore against its SDN controller
//! partitions and reports resources that exist on only one side.

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, CommandFactory, FromArgMatches, Parser};
use colored::Colorize;
use rsc_connectors::VsdConnector;
use rsc_core::db::InventoryRepository;
use rsc_core::{AuditOrchestrator, RemoteSite, ResourceKind};
use rsc_observability::{init_logging_with_config, LoggingConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, warn};

mod config;
mod render;
mod validator;

use config::AppConfig;
use render::OutputFormat;
use validator::ConfigValidator;

#[derive(Parser)]
#[command(name = "resscan")]
#[command(version, disable_version_flag = true)]
#[command(
    about = "Finds resources that exist in the network datastore or in the SDN controller but not both",
    long_about = None
)]
struct Cli {
    /// Configuration file (.json, or YAML for any other extension)
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Resource kind to audit (subnet, router, port, dummy-floating-ip,
    /// security-group, underlay-acl)
    #[arg(
        value_name = "KIND",
        required_unless_present_any = ["validate_only", "show_config"]
    )]
    kind: Option<ResourceKind>,

    /// Set log level to info
    #[arg(short, long)]
    info: bool,

    /// Set log level to debug
    #[arg(long)]
    debug: bool,

    /// Emit log lines as JSON
    #[arg(long)]
    log_json: bool,

    /// Report format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Validate the configuration and exit without contacting either system
    #[arg(long)]
    validate_only: bool,

    /// Print the loaded configuration with secrets redacted
    #[arg(long)]
    show_config: bool,
}

/// The derived command plus `-v/--version`, the flag legacy scripts pass.
fn cli_command() -> clap::Command {
    Cli::command().arg(
        Arg::new("version")
            .short('v')
            .long("version")
            .action(ArgAction::Version)
            .help("Print version"),
    )
}

fn parse_cli<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = cli_command().try_get_matches_from(args)?;
    Cli::from_arg_matches(&matches)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match parse_cli(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    init_logging_with_config(LoggingConfig::for_cli(cli.info, cli.debug, cli.log_json));

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = AppConfig::load(&cli.config)?;

    if cli.show_config {
        println!("{}", config.to_redacted_yaml()?);
    }

    let validation = ConfigValidator::validate(&config);
    if cli.validate_only {
        validation.print();
        return Ok(if validation.has_errors() {
            eprintln!();
            eprintln!("{}", "Configuration validation failed.".red().bold());
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        });
    }
    if validation.has_errors() {
        validation.print();
        anyhow::bail!("configuration has {} error(s)", validation.errors.len());
    }
    for warning in &validation.warnings {
        warn!("{}", warning);
    }

    let Some(kind) = cli.kind else {
        return Ok(ExitCode::SUCCESS);
    };

    let sites = build_sites(&config)?;
    let inventory = open_inventory(&config).await?;
    let orchestrator =
        AuditOrchestrator::with_config(inventory, sites, config.orchestrator_config());

    let report = orchestrator
        .run(kind)
        .await
        .with_context(|| format!("audit of {} aborted", kind))?;

    println!("{}", render::render(&report, cli.format)?);
    Ok(ExitCode::SUCCESS)
}

fn build_sites(config: &AppConfig) -> Result<Vec<RemoteSite>> {
    config
        .partitions
        .iter()
        .map(|p| {
            let connector = VsdConnector::new(p.vsd_config(&config.remote)).with_context(|| {
                format!("Failed to create controller client for '{}'", p.availability_zone)
            })?;
            Ok(RemoteSite::new(p.partition(), Arc::new(connector)))
        })
        .collect()
}

#[cfg(feature = "database")]
async fn open_inventory(config: &AppConfig) -> Result<Arc<dyn InventoryRepository>> {
    use rsc_core::db::{create_pool, MySqlInventoryRepository};

    let settings = config.connection_settings();
    let pool = create_pool(&settings)
        .await
        .with_context(|| format!("Failed to open datastore at {}:{}", settings.host, settings.port))?;
    tracing::info!(database = %settings.database, "Connected to datastore");
    Ok(Arc::new(MySqlInventoryRepository::new(pool)))
}

#[cfg(not(feature = "database"))]
async fn open_inventory(_config: &AppConfig) -> Result<Arc<dyn InventoryRepository>> {
    anyhow::bail!("resscan was built without the `database` feature")
}
