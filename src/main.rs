use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use ecorvm::cli;

#[derive(Debug, Parser)]
#[command(name = "ecorvm")]
#[command(about = "Eco-RVM recycling rewards dashboard client")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load dashboard statistics from the backend and render them
    Dashboard {
        /// Print final values without the counter animation
        #[arg(long)]
        no_animate: bool,
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Redeem a reward for a user
    Redeem {
        /// User id
        #[arg(long)]
        user: u64,
        /// Reward id
        #[arg(long)]
        reward: u64,
    },
    /// Format values with thousands separators
    Format {
        #[arg(required = true, allow_hyphen_values = true)]
        values: Vec<String>,
    },
    /// Print the weekly recycling chart configuration for a JSON mapping file
    ChartConfig {
        /// File containing {"<date>": <count>, ...}
        path: PathBuf,
    },
    /// Check configuration, backend reachability and the client log
    Health,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Write a default ~/.ecorvm/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a dotted key, e.g. `api.base_url`
    Set { key: String, value: String },
    /// Reset the global config file to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Dashboard { no_animate, format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_dashboard(!no_animate, fmt)
        }
        Commands::Redeem { user, reward } => cli::run_redeem(user, reward),
        Commands::Format { values } => {
            cli::run_format(&values);
            Ok(())
        }
        Commands::ChartConfig { path } => cli::run_chart_config(&path),
        Commands::Health => cli::run_health(),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
