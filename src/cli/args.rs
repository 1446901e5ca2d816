//! CLI argument definitions using clap
//!
//! Commands:
//! - tourneydb serve [--config <path>] [--data-dir <dir>] [--host <host>] [--port <port>]
//! - tourneydb init [--config <path>] [--data-dir <dir>]
//! - tourneydb history <teams|matches|reports> [--config <path>] [--data-dir <dir>]

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::schema::EntityKind;

/// tourneydb - flat-file record service for tournament teams, matches and reports
#[derive(Parser, Debug)]
#[command(name = "tourneydb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct StoreOptions {
    /// Path to configuration file (defaults apply when omitted)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Data directory holding the tables (overrides the config file)
    #[arg(long)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server
    Serve {
        #[command(flatten)]
        store: StoreOptions,

        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides the config file)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Create the data directory and empty tables
    Init {
        #[command(flatten)]
        store: StoreOptions,
    },

    /// Print the deleted-record archive of one entity type as JSON
    History {
        /// Entity type: teams, matches or reports
        kind: EntityKind,

        #[command(flatten)]
        store: StoreOptions,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
