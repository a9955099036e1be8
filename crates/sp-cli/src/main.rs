//! shellport CLI
//!
//! Single binary for all shellport operations:
//! - Connect commands (open, forward, fast-open)
//! - Catalog inspection (list, resolve)
//! - An interactive loop that keeps sessions across commands
//! - Configuration and environment checks

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shellport::commands::{self, Runtime, RuntimeOptions};
use sp_core::config;

#[derive(Parser)]
#[command(name = "shellport")]
#[command(author, version, about = "SSH session manager")]
#[command(propagate_version = true)]
struct Cli {
    /// Server definitions (JSON array); repeat to merge several files
    #[arg(long = "servers", global = true)]
    servers: Vec<PathBuf>,

    /// Settings file
    #[arg(long, global = true, env = "SHELLPORT_SETTINGS")]
    settings: Option<PathBuf>,

    /// Print the lines that would be typed instead of opening a terminal
    #[arg(long, global = true)]
    dry_run: bool,

    /// Shell that hosts sessions
    #[arg(long, global = true, env = "SHELLPORT_SHELL")]
    shell: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open (or reuse) a session on a server
    Open {
        /// Server name; asks when omitted
        server: Option<String>,
    },

    /// Open a port forwarding session
    Forward {
        /// Server name; asks when omitted
        server: Option<String>,
        /// Forwarding arguments such as "-L 9000:localhost:9000"; skips the wizard
        #[arg(long, requires = "server", allow_hyphen_values = true)]
        spec: Option<String>,
    },

    /// Connect to the server whose project contains a local file
    FastOpen {
        /// Local file path
        file: PathBuf,
    },

    /// Show which server owns a local file
    Resolve {
        /// Local file path
        file: PathBuf,
    },

    /// List configured servers
    #[command(alias = "ls")]
    List {
        /// Show project mappings and startup commands
        #[arg(short, long)]
        long: bool,
    },

    /// Keep one session manager running and read commands from the terminal
    #[command(alias = "i")]
    Interactive,

    /// Check that the ssh utility is available
    Check,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show config directory and file paths
    Path,
    /// Show effective settings
    Show,
    /// Show merged server definitions
    Servers,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let servers = if cli.servers.is_empty() {
        vec![config::default_servers_path()]
    } else {
        cli.servers.clone()
    };
    let settings = cli
        .settings
        .clone()
        .unwrap_or_else(config::default_settings_path);

    // Inspection commands never start a shell
    let runtime = |cli: &Cli, sessions: bool| {
        Runtime::build(RuntimeOptions {
            servers: servers.clone(),
            settings: settings.clone(),
            dry_run: cli.dry_run || !sessions,
            shell: cli.shell.clone(),
            echo_log: !cli.quiet,
        })
    };

    match &cli.command {
        Commands::Open { server } => {
            commands::open_command(&runtime(&cli, true)?, server.as_deref()).await
        }
        Commands::Forward { server, spec } => {
            commands::forward_command(&runtime(&cli, true)?, server.as_deref(), spec.as_deref()).await
        }
        Commands::FastOpen { file } => commands::fast_open_command(&runtime(&cli, true)?, file).await,
        Commands::Resolve { file } => commands::resolve_command(&runtime(&cli, false)?, file),
        Commands::List { long } => commands::list_command(&runtime(&cli, false)?, *long),
        Commands::Interactive => commands::interactive_command(&runtime(&cli, true)?).await,
        Commands::Check => commands::check_command(),
        Commands::Config { action } => match action {
            ConfigAction::Path => commands::config_path(&settings, &servers),
            ConfigAction::Show => commands::config_show(&settings),
            ConfigAction::Servers => commands::config_servers(&servers),
        },
    }
}
