//! CLI module for sheetbase
//!
//! Provides command-line interface for:
//! - serve: load the table and serve it over HTTP
//! - inspect: load the table and print a JSON summary

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command, SourceArgs};
pub use commands::{inspect, run, run_command, serve, summarize, TableSummary};
pub use config::{Config, PORT_ENV};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_response, write_response_to};
