//! weave - run aspect plans against a proxied ledger
//!
//! Usage:
//!   weave run plan.toml                → run a plan, one JSON report per line
//!   weave run plan.toml --summary      → also print the final ledger state
//!   weave config                       → print the default config as TOML

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use weave::{run_plan, Plan};
use weave_core::{LoggingConfig, WeaveConfig};

#[derive(Parser)]
#[command(
    name = "weave",
    about = "Run aspect plans through the weave interception pipeline",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file (TOML)
    #[arg(short, long, global = true, default_value = "weave.toml")]
    config: PathBuf,

    /// Write logs to a file (in addition to stderr)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a plan file
    Run {
        /// Plan to execute
        plan: PathBuf,
        /// Print the final ledger state after the reports
        #[arg(long, default_value_t = false)]
        summary: bool,
    },
    /// Print the default configuration
    Config,
}

fn init_tracing(logging: &LoggingConfig, log_file: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.filter.as_str().into());
    let stderr = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let path = log_file.or(logging.file.as_deref());
    let Some(path) = path else {
        tracing_subscriber::registry().with(filter).with(stderr).init();
        return Ok(None);
    };

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);
    tracing_subscriber::registry()
        .with(filter)
        .with(stderr)
        .with(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false))
        .init();
    Ok(Some(guard))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Config => {
            print!("{}", WeaveConfig::default().to_toml());
        }
        Commands::Run { plan, summary } => {
            // Parse quietly first so the logging section can configure the subscriber.
            let config = std::fs::read_to_string(&cli.config)
                .ok()
                .and_then(|c| WeaveConfig::from_toml(&c).ok())
                .unwrap_or_default();
            let _guard = init_tracing(&config.logging, cli.log_file.as_deref())?;
            let config = WeaveConfig::load(&cli.config);

            let plan = Plan::load(&plan)
                .with_context(|| format!("loading plan {}", plan.display()))?;
            let report = run_plan(&plan, &config).context("running plan")?;

            for op in &report.operations {
                println!("{}", serde_json::to_string(op)?);
            }
            if summary {
                println!("{}", serde_json::to_string_pretty(&report.ledger)?);
            }
        }
    }

    Ok(())
}
