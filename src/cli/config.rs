//! Configuration file and overrides
//!
//! Resolution order, lowest to highest: built-in defaults, JSON config
//! file, `PORT` environment variable, command-line flags.

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::http_server::HttpServerConfig;
use crate::table::{TableConfig, TableLayout};

use super::args::SourceArgs;
use super::errors::{CliError, CliResult};

/// Environment variable that overrides the configured port
pub const PORT_ENV: &str = "PORT";

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Spreadsheet loaded once at startup (default "source.xlsx")
    #[serde(default = "default_source_path")]
    pub source_path: PathBuf,

    /// File rewritten after each mutation (default "data.xlsx")
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Worksheet name (default: first sheet)
    #[serde(default)]
    pub sheet: Option<String>,

    #[serde(default = "default_category_column")]
    pub category_column: String,

    #[serde(default = "default_description_column")]
    pub description_column: String,

    #[serde(default = "default_price_column")]
    pub price_column: String,

    /// host, port, cors_origins
    #[serde(flatten)]
    pub server: HttpServerConfig,
}

fn default_source_path() -> PathBuf {
    PathBuf::from("source.xlsx")
}
fn default_output_path() -> PathBuf {
    PathBuf::from("data.xlsx")
}
fn default_category_column() -> String {
    TableLayout::default().category_column
}
fn default_description_column() -> String {
    TableLayout::default().description_column
}
fn default_price_column() -> String {
    TableLayout::default().price_column
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_path: default_source_path(),
            output_path: default_output_path(),
            sheet: None,
            category_column: default_category_column(),
            description_column: default_description_column(),
            price_column: default_price_column(),
            server: HttpServerConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, or defaults when no file is given
    pub fn load(path: Option<&Path>) -> CliResult<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))
    }

    /// Resolve the full configuration for a command
    pub fn resolve(source: &SourceArgs, output: Option<PathBuf>, port: Option<u16>) -> CliResult<Self> {
        let mut config = Self::load(source.config.as_deref())?;

        config.apply_env_port(std::env::var(PORT_ENV).ok().as_deref())?;

        if let Some(path) = &source.source {
            config.source_path = path.clone();
        }
        if let Some(sheet) = &source.sheet {
            config.sheet = Some(sheet.clone());
        }
        if let Some(path) = output {
            config.output_path = path;
        }
        if let Some(port) = port {
            config.server.port = port;
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply the value of the `PORT` environment variable, if set
    pub fn apply_env_port(&mut self, value: Option<&str>) -> CliResult<()> {
        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return Ok(());
        };

        self.server.port = value.parse().map_err(|_| {
            CliError::config_error(format!("Invalid {} value: '{}'", PORT_ENV, value))
        })?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> CliResult<()> {
        if same_location(&self.source_path, &self.output_path) {
            return Err(CliError::config_error(format!(
                "output_path must differ from source_path ({})",
                self.source_path.display()
            )));
        }

        for (key, value) in [
            ("category_column", &self.category_column),
            ("description_column", &self.description_column),
            ("price_column", &self.price_column),
        ] {
            if value.trim().is_empty() {
                return Err(CliError::config_error(format!("{} must not be empty", key)));
            }
        }

        Ok(())
    }

    pub fn table_config(&self) -> TableConfig {
        TableConfig {
            source_path: self.source_path.clone(),
            output_path: self.output_path.clone(),
            sheet: self.sheet.clone(),
            layout: TableLayout {
                category_column: self.category_column.clone(),
                description_column: self.description_column.clone(),
                price_column: self.price_column.clone(),
            },
        }
    }
}

/// Whether two paths name the same file.
///
/// Existing files are compared after resolving symlinks; otherwise the
/// absolute paths are compared with `.` and `..` folded away.
fn same_location(a: &Path, b: &Path) -> bool {
    if let (Ok(a), Ok(b)) = (fs::canonicalize(a), fs::canonicalize(b)) {
        return a == b;
    }
    normalize(a) == normalize(b)
}

fn normalize(path: &Path) -> PathBuf {
    let mut normalized = if path.is_absolute() {
        PathBuf::new()
    } else {
        std::env::current_dir().unwrap_or_default()
    };

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}
