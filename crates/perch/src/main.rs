//! `perch`: inspect transparency logs and their witnesses.
//!
//! Fetches a log's signed checkpoint, checks it against the witness
//! cosignatures collected by a distributor, and reads individual leaves.
//!
//! # Usage
//!
//! ```text
//! perch watch                               # follow the default log
//! perch watch --witnesses 2                 # require two cosignatures
//! perch leaf 1234 --log lvfs                # print one leaf
//! perch logs                                # list configured logs
//! perch -c perch.toml watch                 # use a config file
//! perch watch --custom-log-url file:///srv/log \
//!     --custom-log-vkey 'name+1234abcd+AQ...' --custom-log-type tiles
//! ```

mod config;
mod logs;
mod view;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use perch_engine::{Controller, ViewModel, spawn_refresher};
use perch_log::{LogConfig, LogRegistry};
use perch_types::LogFormat;
use perch_witness::{QuorumVerifier, RestDistributor};
use tokio::sync::watch;
use tracing::info;

use config::PerchConfig;
use view::ConsoleView;

// -----------------------------------------------------------------------
// CLI definition
// -----------------------------------------------------------------------

#[derive(Parser)]
#[command(
    name = "perch",
    version,
    about = "Inspect transparency logs and their witness cosignatures"
)]
struct Cli {
    /// Path to TOML config file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Initial witness quorum size.
    #[arg(long, global = true)]
    witnesses: Option<usize>,

    #[command(flatten)]
    custom: CustomLogArgs,

    #[command(subcommand)]
    command: Commands,
}

/// An extra log, registered ahead of the configured ones and selected by
/// default.
#[derive(Args)]
struct CustomLogArgs {
    /// Base URL of the custom log.
    #[arg(long, global = true)]
    custom_log_url: Option<String>,

    /// Origin of the custom log. Tiles logs default to the key name.
    #[arg(long, global = true, default_value = "")]
    custom_log_origin: String,

    /// Verifier key of the custom log.
    #[arg(long, global = true)]
    custom_log_vkey: Option<String>,

    /// Layout of the custom log: `tiles` or `serverless`.
    #[arg(long, global = true)]
    custom_log_type: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Follow the default log, refreshing its checkpoint until Ctrl-C.
    Watch,

    /// Fetch one leaf and write its contents to stdout.
    Leaf {
        /// Leaf index.
        index: u64,

        /// Origin of the log to read (defaults to the first configured).
        #[arg(long)]
        log: Option<String>,
    },

    /// List configured logs.
    Logs,
}

// -----------------------------------------------------------------------
// Entrypoint
// -----------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = PerchConfig::load(cli.config.as_deref()).context("failed to load config")?;

    setup_tracing(&config.log.level);

    let registry = build_registry(&config, &cli.custom)?;
    let witnesses = cli.witnesses.unwrap_or(config.refresh.witnesses);

    match cli.command {
        Commands::Watch => cmd_watch(&config, registry, witnesses).await,
        Commands::Leaf { index, log } => {
            cmd_leaf(&config, registry, witnesses, index, log.as_deref()).await
        }
        Commands::Logs => cmd_logs(&registry),
    }
}

/// Initialize the `tracing` subscriber with the given level filter.
///
/// Respects `RUST_LOG` env var if set, otherwise uses the config value.
fn setup_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// -----------------------------------------------------------------------
// Session setup
// -----------------------------------------------------------------------

/// The log given by `--custom-log-*` flags, if any.
fn custom_log(args: &CustomLogArgs) -> Result<Option<LogConfig>> {
    let Some(kind) = args.custom_log_type.as_deref().filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    let format = match kind.parse::<LogFormat>() {
        Ok(f @ (LogFormat::Tiles | LogFormat::Serverless)) => f,
        _ => bail!("custom log type {kind:?} not recognised (expected tiles or serverless)"),
    };
    let url = args
        .custom_log_url
        .as_deref()
        .context("--custom-log-url is required with --custom-log-type")?;
    let vkey = args
        .custom_log_vkey
        .as_deref()
        .context("--custom-log-vkey is required with --custom-log-type")?;
    Ok(Some(LogConfig::new(url, &args.custom_log_origin, vkey, format)))
}

fn build_registry(config: &PerchConfig, custom: &CustomLogArgs) -> Result<LogRegistry> {
    let mut logs = config.log_configs();
    if let Some(log) = custom_log(custom)? {
        logs.insert(0, log);
    }
    LogRegistry::from_configs(&logs).context("invalid log configuration")
}

/// Connect to the distributor and wire up a controller over `registry`.
async fn build_controller(
    config: &PerchConfig,
    registry: LogRegistry,
    witnesses: usize,
) -> Result<Arc<Controller>> {
    let distributor = RestDistributor::new(&config.distributor.url)
        .context("invalid distributor configuration")?;
    let quorum = QuorumVerifier::connect(Arc::new(distributor))
        .await
        .context("witnesses not available")?;
    info!(
        distributor = %config.distributor.url,
        witnesses = quorum.witnesses().len(),
        "connected to distributor"
    );

    let view = Arc::new(ConsoleView::new(witnesses));
    Ok(Arc::new(Controller::new(registry, Arc::new(quorum), view)))
}

/// Select `origin` and fail if its first checkpoint cannot be loaded.
async fn open_log(controller: &Controller, origin: &str) -> Result<()> {
    if !controller.select_log(origin).await {
        bail!("unknown log {origin:?}");
    }
    if let Some(e) = controller.model().checkpoint().error {
        bail!("failed to load checkpoint for {origin:?}: {e}");
    }
    Ok(())
}

fn default_origin(registry: &LogRegistry) -> Result<String> {
    registry
        .default_origin()
        .map(str::to_string)
        .context("no logs configured")
}

// -----------------------------------------------------------------------
// perch watch
// -----------------------------------------------------------------------

async fn cmd_watch(config: &PerchConfig, registry: LogRegistry, witnesses: usize) -> Result<()> {
    let origin = default_origin(&registry)?;
    let controller = build_controller(config, registry, witnesses).await?;
    open_log(&controller, &origin).await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let refresher = spawn_refresher(controller.clone(), config.refresh_interval(), shutdown_rx);
    info!(%origin, interval_secs = config.refresh_interval().as_secs(), "watching log");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;
    info!("shutting down");

    let _ = shutdown_tx.send(true);
    refresher.await.context("refresher task failed")?;
    Ok(())
}

// -----------------------------------------------------------------------
// perch leaf
// -----------------------------------------------------------------------

async fn cmd_leaf(
    config: &PerchConfig,
    registry: LogRegistry,
    witnesses: usize,
    index: u64,
    log: Option<&str>,
) -> Result<()> {
    let origin = match log {
        Some(o) => o.to_string(),
        None => default_origin(&registry)?,
    };
    let controller = build_controller(config, registry, witnesses).await?;
    open_log(&controller, &origin).await?;

    let size = controller
        .model()
        .checkpoint()
        .size()
        .context("no checkpoint available")?;
    controller.get_leaf(size, index).await;

    let state = controller.model().leaf();
    if let Some(e) = state.error {
        bail!("leaf {index} of {origin:?}: {e}");
    }
    let leaf = state.leaf.context("no leaf published")?;
    std::io::stdout()
        .write_all(&leaf.contents)
        .context("failed to write leaf")?;
    Ok(())
}

// -----------------------------------------------------------------------
// perch logs
// -----------------------------------------------------------------------

fn cmd_logs(registry: &LogRegistry) -> Result<()> {
    let default = registry.default_origin();
    for origin in registry.origins() {
        let Some(client) = registry.get(origin) else {
            continue;
        };
        let marker = if Some(origin.as_str()) == default { "*" } else { " " };
        println!("{marker} {:<10} {origin}", client.format().as_str());
    }
    Ok(())
}
