//! CLI module for tourneydb
//!
//! Provides command-line interface for:
//! - serve: Run the HTTP API over a data directory
//! - init: Create the data directory and empty tables
//! - history: Print a deleted-record archive

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command, StoreOptions};
pub use commands::{history, init, run, run_command, serve};
pub use config::ServiceConfig;
pub use errors::{CliError, CliErrorCode, CliResult};
