//! Command handlers
//!
//! Each command handler orchestrates the execution of a CLI command.

pub mod check;
pub mod init;
pub mod run;
pub mod setup;

pub use check::run_check;
pub use init::run_init;
pub use run::run_monitor;
