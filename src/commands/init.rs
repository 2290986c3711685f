//! Init command implementation
//!
//! Writes a default configuration file to edit.

use crate::cli::args::{InitArgs, OutputFormat};
use crate::cli::output::{print_output, Message};
use crate::config::{Config, ConfigFile};
use crate::error::Result;

use std::path::PathBuf;

/// Execute the init command
pub fn run_init(args: &InitArgs, format: OutputFormat) -> Result<()> {
    let path = args
        .path
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(ConfigFile::user_path);

    ConfigFile::save(&Config::default(), &path, args.force)?;

    let msg = Message {
        message: format!(
            "Wrote default configuration to {}; set telegram.bot_token and telegram.chat_id before running",
            path.display()
        ),
        success: true,
    };
    print_output(&msg, format)?;
    Ok(())
}
