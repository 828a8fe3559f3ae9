//! CLI argument definitions using clap
//!
//! Commands:
//! - sheetbase serve [--config <path>] [--source <path>] [--output <path>] [--port <n>]
//! - sheetbase inspect [--config <path>] [--source <path>]

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// sheetbase - serve and edit a spreadsheet table over HTTP
#[derive(Parser, Debug)]
#[command(name = "sheetbase")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command that loads the table
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Path to JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Spreadsheet to load (overrides config)
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Worksheet name (defaults to the first sheet)
    #[arg(long)]
    pub sheet: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load the table and serve it over HTTP
    Serve {
        #[command(flatten)]
        source: SourceArgs,

        /// File rewritten after every update or delete (overrides config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Port to listen on (overrides config and PORT)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Load the table, print a JSON summary and exit
    Inspect {
        #[command(flatten)]
        source: SourceArgs,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::parse_from([
            "sheetbase", "serve", "--source", "in.xlsx", "--output", "out.xlsx", "--port", "9000",
        ]);
        match cli.command {
            Command::Serve {
                source,
                output,
                port,
            } => {
                assert_eq!(source.source, Some(PathBuf::from("in.xlsx")));
                assert_eq!(output, Some(PathBuf::from("out.xlsx")));
                assert_eq!(port, Some(9000));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_inspect_defaults() {
        let cli = Cli::parse_from(["sheetbase", "inspect"]);
        assert!(matches!(
            cli.command,
            Command::Inspect { source } if source.config.is_none() && source.sheet.is_none()
        ));
    }
}
