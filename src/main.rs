//! volwatch - volatility index monitor
//!
//! Polls the volatility index and sends Telegram alerts on threshold
//! crossings, plus a daily briefing.

use clap::Parser;
use volwatch::cli::args::{generate_completions, Cli, Commands};
use volwatch::commands::{run_check, run_init, run_monitor};
use volwatch::error::{AppError, ConfigError};

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG still wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .init();

    // Run the appropriate command
    let result = run(&cli);

    if let Err(e) = result {
        log::error!("{}", e);
        print_error(&e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let config = cli.config.as_deref();

    match cli.selected_command() {
        Commands::Run(args) => run_monitor(&args, config, cli.dry_run),

        Commands::Check => run_check(cli.format, config, cli.dry_run),

        Commands::Init(args) => run_init(&args, cli.format),

        Commands::Completions { shell } => {
            generate_completions(shell);
            Ok(())
        }
    }
}

fn print_error(err: &AppError) {
    eprintln!("Error: {}", err);

    // Print helpful hints for common errors
    match err {
        AppError::Config(ConfigError::MissingField(field)) if field.starts_with("telegram.") => {
            eprintln!();
            eprintln!("Hint: Set {} in the config file, or export", field);
            eprintln!("      VOLWATCH_TELEGRAM_BOT_TOKEN / VOLWATCH_TELEGRAM_CHAT_ID.");
            eprintln!("      Use --dry-run to try the monitor without Telegram.");
        }
        AppError::Config(ConfigError::FileNotFound(_)) => {
            eprintln!();
            eprintln!("Hint: Run 'volwatch init' to write a default configuration.");
        }
        AppError::HealthCheckFailed(_) => {
            eprintln!();
            eprintln!("Hint: Run 'volwatch check' for the full health report.");
        }
        _ => {}
    }
}
