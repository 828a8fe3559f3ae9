//! CLI command implementations
//!
//! Both commands load the source table exactly once. `serve` then hands
//! it to the HTTP server; `inspect` prints a summary and exits.

use serde::Serialize;
use tracing::info;

use crate::http_server::HttpServer;
use crate::observability::{init_logging, Event};
use crate::table::TableService;

use super::args::{Command, SourceArgs};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::write_response;

/// Summary printed by `inspect`
#[derive(Debug, Serialize)]
pub struct TableSummary {
    pub source: String,
    pub columns: Vec<String>,
    pub rows: usize,
    pub categories: Vec<String>,
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    init_logging();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve {
            source,
            output,
            port,
        } => serve(&source, output, port),
        Command::Inspect { source } => inspect(&source),
    }
}

/// Load the table and serve it until Ctrl-C
pub fn serve(
    source: &SourceArgs,
    output: Option<std::path::PathBuf>,
    port: Option<u16>,
) -> CliResult<()> {
    info!(event = %Event::BootStart, version = env!("CARGO_PKG_VERSION"), "starting");

    let config = Config::resolve(source, output, port)?;
    info!(
        event = %Event::ConfigLoaded,
        source = %config.source_path.display(),
        output = %config.output_path.display(),
        addr = %config.server.socket_addr(),
        "configuration resolved"
    );

    let service = TableService::open(&config.table_config())?;
    let server = HttpServer::new(config.server.clone(), service);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Load the table and print columns, row count and categories
pub fn inspect(source: &SourceArgs) -> CliResult<()> {
    let summary = summarize(source)?;
    write_response(&summary)
}

/// Build the `inspect` summary without printing it
pub fn summarize(source: &SourceArgs) -> CliResult<TableSummary> {
    let config = Config::resolve(source, None, None)?;
    let service = TableService::open(&config.table_config())?;
    let table = service.snapshot()?;

    Ok(TableSummary {
        source: config.source_path.display().to_string(),
        columns: table.columns().to_vec(),
        rows: table.len(),
        categories: table.categories(),
    })
}
