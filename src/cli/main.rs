use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dirnav::core::config::{ConfigStore, DEFAULT_CONFIG_PATH};
use dirnav::core::telemetry::logging::{init_logging, level_for_verbosity};

mod browse;
mod commands;

#[derive(Debug, Parser)]
#[command(name = "dirnav", version, about = "Browse drives and directories through the host bridge")]
struct Cli {
    /// JSON configuration file.
    #[arg(long, env = "DIRNAV_CONFIG", default_value = DEFAULT_CONFIG_PATH, global = true)]
    config: PathBuf,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List available drives and mount points.
    Roots,
    /// List a directory.
    Ls {
        /// Directory to list; defaults to the first root.
        path: Option<String>,
        /// Only show entries containing this text.
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Print a text file.
    Cat { path: String },
    /// Print a file's content every time it changes.
    Watch {
        path: String,
        #[arg(long, default_value_t = 100)]
        debounce_ms: u64,
    },
    /// Read or write configuration values.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Expose the bridge over HTTP.
    Serve {
        #[arg(long)]
        bind: Option<String>,
    },
    /// Interactive directory browser on stdin.
    Browse,
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    Get { key: String },
    /// VALUE is parsed as JSON, falling back to a plain string.
    Set { key: String, value: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(level_for_verbosity(cli.verbose));

    let store = ConfigStore::new(cli.config);
    let settings = store.settings()?;

    match cli.command {
        Command::Roots => commands::roots(&settings).await,
        Command::Ls { path, filter } => commands::ls(&settings, path, filter).await,
        Command::Cat { path } => commands::cat(&settings, &path).await,
        Command::Watch { path, debounce_ms } => commands::watch(&path, debounce_ms).await,
        Command::Config { action } => match action {
            ConfigAction::Get { key } => commands::config_get(&store, &key),
            ConfigAction::Set { key, value } => commands::config_set(&store, key, &value),
        },
        Command::Serve { bind } => commands::serve(store, &settings, bind).await,
        Command::Browse => browse::run(store, &settings).await,
    }
}
