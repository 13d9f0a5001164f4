//! CLI command handlers
//!
//! Argument structs and the functions that turn pipeline results into
//! terminal output.

pub mod backup;
pub mod config;

pub use backup::{handle_list_command, handle_run_command, RunArgs, RunOutcome};
pub use config::handle_config_command;
