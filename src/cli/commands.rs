//! CLI command implementations

use serde_json::json;

use crate::http_server::HttpServer;
use crate::observability::init_logging;
use crate::schema::EntityKind;
use crate::store::Database;

use super::args::{Command, StoreOptions};
use super::config::ServiceConfig;
use super::errors::{CliError, CliResult};
use super::io::{write_pretty, write_response};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { store, host, port } => serve(&store, host, port),
        Command::Init { store } => init(&store),
        Command::History { kind, store } => history(kind, &store),
    }
}

/// Loads the config file (if any) and applies command line overrides
fn resolve_config(
    store: &StoreOptions,
    host: Option<String>,
    port: Option<u16>,
) -> CliResult<ServiceConfig> {
    ServiceConfig::load_or_default(store.config.as_deref())?.with_overrides(
        store.data_dir.clone(),
        host,
        port,
    )
}

fn runtime() -> CliResult<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
        .map_err(|e| CliError::io_error(format!("Failed to create tokio runtime: {}", e)))
}

/// Run the HTTP server until it fails
pub fn serve(store: &StoreOptions, host: Option<String>, port: Option<u16>) -> CliResult<()> {
    let config = resolve_config(store, host, port)?;
    init_logging(&config.log_filter);

    tracing::info!("tourneydb v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("data directory: {}", config.data_dir);

    let database = Database::open_local(config.data_path())?;
    let server = HttpServer::new(config.http.clone(), &database);

    runtime()?.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Create the data directory and header-only live tables
///
/// Fails when every live table already exists.
pub fn init(store: &StoreOptions) -> CliResult<()> {
    let config = resolve_config(store, None, None)?;
    init_logging(&config.log_filter);

    let database = Database::open_local(config.data_path())?;
    let created = database.initialize_tables()?;

    if created.is_empty() {
        return Err(CliError::already_initialized());
    }

    let tables: Vec<&str> = created.iter().map(|kind| kind.table_name()).collect();
    tracing::info!(?tables, "tables initialized");

    write_response(json!({
        "initialized": true,
        "data_dir": config.data_dir,
        "tables": tables,
    }))
}

/// Print the archive rows of `kind` to stdout
pub fn history(kind: EntityKind, store: &StoreOptions) -> CliResult<()> {
    let config = resolve_config(store, None, None)?;
    init_logging(&config.log_filter);

    let database = Database::open_local(config.data_path())?;
    let rows = runtime()?.block_on(database.history(kind))?;

    write_pretty(&mut std::io::stdout(), &rows)
}
