//! Table Service
//!
//! Owns the in-memory table and its persistence target. Reads share a read
//! lock; each mutation holds the write lock across apply and save, so
//! mutations are serialized and a failed save is rolled back before the lock
//! is released.

use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{error, info};

use crate::observability::Event;

use super::errors::{TableError, TableResult};
use super::row::{RowId, RowRecord};
use super::store::{TableStore, WorkbookStore};
use super::table::{Table, TableLayout};
use super::workbook;

/// Where the table comes from and where edits go
#[derive(Debug, Clone)]
pub struct TableConfig {
    pub source_path: PathBuf,
    pub output_path: PathBuf,
    pub sheet: Option<String>,
    pub layout: TableLayout,
}

/// Shared table with serialized, persisted mutations
#[derive(Debug)]
pub struct TableService {
    table: RwLock<Table>,
    store: Box<dyn TableStore>,
}

impl TableService {
    pub fn new(table: Table, store: Box<dyn TableStore>) -> Self {
        Self {
            table: RwLock::new(table),
            store,
        }
    }

    /// Load the source file once and persist edits to the output file
    pub fn open(config: &TableConfig) -> TableResult<Self> {
        let table = workbook::load_table(
            &config.source_path,
            config.sheet.as_deref(),
            config.layout.clone(),
        )?;

        info!(
            event = %Event::TableLoaded,
            source = %config.source_path.display(),
            rows = table.len(),
            columns = table.columns().len(),
            "table loaded"
        );

        Ok(Self::new(
            table,
            Box::new(WorkbookStore::new(&config.output_path)),
        ))
    }

    /// Distinct category values in first-occurrence order
    pub fn list_distinct_categories(&self) -> TableResult<Vec<String>> {
        Ok(self.read()?.categories())
    }

    /// Rows whose category matches exactly
    pub fn get_rows_by_category(&self, category: &str) -> TableResult<Vec<RowRecord>> {
        Ok(self.read()?.rows_in_category(category))
    }

    pub fn get_row(&self, id: RowId) -> TableResult<RowRecord> {
        self.read()?.record(id)
    }

    pub fn len(&self) -> TableResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> TableResult<bool> {
        Ok(self.read()?.is_empty())
    }

    /// Copy of the current table
    pub fn snapshot(&self) -> TableResult<Table> {
        Ok(self.read()?.clone())
    }

    /// Overwrite description and price of a row, then rewrite the output file
    pub fn update_row(&self, id: RowId, description: &str, price: f64) -> TableResult<()> {
        let mut table = self.write()?;
        let previous = table.update_row(id, description, price)?;

        if let Err(e) = self.persist(&table) {
            table.restore_updated(previous);
            return Err(e);
        }

        info!(event = %Event::RowUpdated, id = %id, "row updated");
        Ok(())
    }

    /// Remove a row, then rewrite the output file
    pub fn delete_row(&self, id: RowId) -> TableResult<()> {
        let mut table = self.write()?;
        let (pos, removed) = table.delete_row(id)?;

        if let Err(e) = self.persist(&table) {
            table.restore_deleted(pos, removed);
            return Err(e);
        }

        info!(event = %Event::RowDeleted, id = %id, remaining = table.len(), "row deleted");
        Ok(())
    }

    fn persist(&self, table: &Table) -> TableResult<()> {
        match self.store.save(table) {
            Ok(()) => {
                info!(
                    event = %Event::TableSaved,
                    output = %self.store.location(),
                    rows = table.len(),
                    "table saved"
                );
                Ok(())
            }
            Err(e) => {
                error!(
                    event = %Event::SaveFailed,
                    output = %self.store.location(),
                    error = %e,
                    "table save failed, change rolled back"
                );
                Err(e)
            }
        }
    }

    fn read(&self) -> TableResult<RwLockReadGuard<'_, Table>> {
        self.table
            .read()
            .map_err(|_| TableError::Internal("table lock poisoned".to_string()))
    }

    fn write(&self) -> TableResult<RwLockWriteGuard<'_, Table>> {
        self.table
            .write()
            .map_err(|_| TableError::Internal("table lock poisoned".to_string()))
    }
}
