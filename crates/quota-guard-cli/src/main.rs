//! quota-guard: polls quota usage and reports it to the usage sink.
//!
//! Configuration comes from the environment (see `Config::from_env`); flags
//! override it for a single run.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use quota_guard_checkers::CheckerRegistry;
use quota_guard_cli::{execute, init_tracing, InvocationResponse};
use quota_guard_core::{config::parse_region_list, Config, SinkBackend};

#[derive(Parser)]
#[command(name = "quota-guard", about = "Service quota usage poller")]
struct Cli {
    /// Environment file to load before reading configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Serve provider calls from a JSON fixture file instead of AWS
    #[arg(long, global = true)]
    fixtures: Option<PathBuf>,

    /// Usage sink: dynamodb, csv or memory
    #[arg(long, global = true)]
    sink: Option<SinkBackend>,

    /// Tabular file written by the csv sink
    #[arg(long, global = true)]
    csv_path: Option<PathBuf>,

    /// Comma separated regions to check regional quotas in
    #[arg(long, global = true)]
    regions: Option<String>,

    /// Local quota list file
    #[arg(long, global = true)]
    quota_list: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check every configured quota once and print the run summary
    Run,
    /// Handle a scheduled invocation and print the invocation response
    Invoke {
        /// Triggering event payload
        #[arg(long, default_value = "{}")]
        event: String,
    },
    /// List the registered checkers
    Checkers,
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<Config> {
        if let Some(path) = &self.config {
            dotenvy::from_path(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
        }

        let mut config = Config::from_env()?;
        if let Some(sink) = self.sink {
            config.sink = sink;
        }
        if let Some(path) = &self.csv_path {
            config.csv_path = path.clone();
        }
        if let Some(regions) = &self.regions {
            config.regions = parse_region_list(regions);
        }
        if let Some(path) = &self.quota_list {
            config.quota_list = Some(quota_guard_core::QuotaListSource::File(path.clone()));
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match &cli.command {
        Commands::Run => {
            let config = cli.load_config()?;
            let summary = execute(&config, cli.fixtures.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Invoke { event } => {
            let payload: serde_json::Value =
                serde_json::from_str(event).context("Event payload is not valid JSON")?;
            tracing::info!(event = %payload, "Invocation received");

            let config = cli.load_config()?;
            let summary = execute(&config, cli.fixtures.as_deref()).await?;
            tracing::info!(counters = ?summary.counters, "Invocation complete");

            println!("{}", serde_json::to_string(&InvocationResponse::ok())?);
        }
        Commands::Checkers => {
            let registry = CheckerRegistry::builtin().await;
            for info in registry.list().await {
                println!(
                    "{:<12} {:<22} {:<16} {:<20} {}",
                    info.quota_code,
                    info.service_code,
                    format!("{:?}", info.shape),
                    format!("{:?}/{:?}", info.rule.unit, info.rule.comparison),
                    info.description
                );
            }
        }
    }

    Ok(())
}
