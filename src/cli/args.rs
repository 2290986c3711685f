//! CLI argument definitions using clap derive
//!
//! Defines all command-line arguments and subcommands.

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Volatility index monitor
///
/// Polls the DVOL index, sends Telegram alerts when it crosses the configured
/// thresholds, and a briefing once a day.
#[derive(Parser, Debug)]
#[command(name = "volwatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "VOLWATCH_CONFIG")]
    pub config: Option<String>,

    /// Print messages instead of sending them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Defaults to `run`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// The selected command, `run` when none was given
    pub fn selected_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Run(RunArgs::default()))
    }
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the health check, then poll until killed
    Run(RunArgs),

    /// Run the startup health check only
    Check,

    /// Write the default configuration file
    Init(InitArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for the run command
#[derive(Parser, Debug, Clone, Default)]
pub struct RunArgs {
    /// Exit after a single poll cycle
    #[arg(long)]
    pub once: bool,

    /// Poll interval in seconds (overrides the config file)
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,
}

/// Arguments for the init command
#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Where to write the file (defaults to the per-user config path)
    #[arg(long)]
    pub path: Option<String>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Output format
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON format for machine parsing
    Json,
}

/// Generate shell completions and print to stdout
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}
