//! # Table Store Trait

use std::path::PathBuf;

use super::errors::TableResult;
use super::table::Table;
use super::workbook;

/// Persistence target for the table
pub trait TableStore: Send + Sync + std::fmt::Debug {
    /// Replace the stored copy with the full contents of `table`
    fn save(&self, table: &Table) -> TableResult<()>;

    /// Human readable location, used in logs
    fn location(&self) -> String;
}

/// Writes the table to a spreadsheet file on every save
#[derive(Debug)]
pub struct WorkbookStore {
    output_path: PathBuf,
}

impl WorkbookStore {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }
}

impl TableStore for WorkbookStore {
    fn save(&self, table: &Table) -> TableResult<()> {
        workbook::write_table(table, &self.output_path)
    }

    fn location(&self) -> String {
        self.output_path.display().to_string()
    }
}
