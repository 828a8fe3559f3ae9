//! In-memory table
//!
//! Holds the column header and the rows loaded from the source sheet.
//! All lookups are linear scans or a binary search on the row id; rows are
//! kept in ascending id order because ids are handed out in load order and
//! deletes never reorder. Ids at or past `next_id` were never assigned and
//! are reported as invalid; ids below it that are gone were deleted.

use std::collections::HashSet;
use std::sync::Arc;

use super::errors::{TableError, TableResult};
use super::row::{CellValue, Row, RowId, RowRecord, ROW_ID_KEY};

/// Names of the columns the service reads and writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    pub category_column: String,
    pub description_column: String,
    pub price_column: String,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            category_column: "Subcategory".to_string(),
            description_column: "Description".to_string(),
            price_column: "Price".to_string(),
        }
    }
}

/// Ordered rows plus their column header
#[derive(Debug, Clone)]
pub struct Table {
    columns: Arc<[String]>,
    rows: Vec<Row>,
    next_id: u64,
    category_col: usize,
    description_col: usize,
    price_col: usize,
}

impl Table {
    /// Build a table from a header and raw rows.
    ///
    /// Rows receive ids `0..n` in the order given.
    pub fn new(
        columns: Vec<String>,
        rows: Vec<Vec<CellValue>>,
        layout: TableLayout,
    ) -> TableResult<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if column == ROW_ID_KEY {
                return Err(TableError::ReservedColumn(column.clone()));
            }
            if !seen.insert(column.as_str()) {
                return Err(TableError::DuplicateColumn(column.clone()));
            }
        }

        let find = |name: &str| {
            columns
                .iter()
                .position(|c| c == name)
                .ok_or_else(|| TableError::MissingColumn(name.to_string()))
        };
        let category_col = find(&layout.category_column)?;
        let description_col = find(&layout.description_column)?;
        let price_col = find(&layout.price_column)?;

        let width = columns.len();
        let rows: Vec<Row> = rows
            .into_iter()
            .enumerate()
            .map(|(pos, mut cells)| {
                cells.resize(width, CellValue::Empty);
                Row::new(RowId(pos as u64), cells)
            })
            .collect();

        Ok(Self {
            columns: columns.into(),
            next_id: rows.len() as u64,
            rows,
            category_col,
            description_col,
            price_col,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct category values in first-occurrence order. Blank cells are skipped.
    pub fn categories(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut categories = Vec::new();

        for row in &self.rows {
            if let Some(value) = row.cell(self.category_col).display_text() {
                if seen.insert(value.clone()) {
                    categories.push(value);
                }
            }
        }

        categories
    }

    /// Rows whose category equals `category` exactly, in table order
    pub fn rows_in_category(&self, category: &str) -> Vec<RowRecord> {
        self.rows
            .iter()
            .filter(|row| row.cell(self.category_col).matches_text(category))
            .map(|row| self.record_of(row))
            .collect()
    }

    /// Look up a single row
    pub fn record(&self, id: RowId) -> TableResult<RowRecord> {
        let pos = self.position(id)?;
        Ok(self.record_of(&self.rows[pos]))
    }

    /// Overwrite description and price of a row. Returns the row as it was.
    pub fn update_row(&mut self, id: RowId, description: &str, price: f64) -> TableResult<Row> {
        let pos = self.position(id)?;
        let (description_col, price_col) = (self.description_col, self.price_col);

        let row = &mut self.rows[pos];
        let previous = row.clone();
        row.set_cell(description_col, CellValue::from_text(description));
        row.set_cell(price_col, CellValue::from_number(price));

        Ok(previous)
    }

    /// Remove a row. Returns its former position and contents.
    pub fn delete_row(&mut self, id: RowId) -> TableResult<(usize, Row)> {
        let pos = self.position(id)?;
        Ok((pos, self.rows.remove(pos)))
    }

    /// Put back a row previously returned by [`Table::update_row`]
    pub(crate) fn restore_updated(&mut self, previous: Row) {
        if let Ok(pos) = self.position(previous.id) {
            self.rows[pos] = previous;
        }
    }

    /// Put back a row previously returned by [`Table::delete_row`]
    pub(crate) fn restore_deleted(&mut self, pos: usize, row: Row) {
        let pos = pos.min(self.rows.len());
        self.rows.insert(pos, row);
    }

    fn position(&self, id: RowId) -> TableResult<usize> {
        if id.0 >= self.next_id {
            return Err(TableError::InvalidIndex(
                i64::try_from(id.0).unwrap_or(i64::MAX),
            ));
        }
        self.rows
            .binary_search_by_key(&id, |row| row.id)
            .map_err(|_| TableError::RowNotFound(id))
    }

    fn record_of(&self, row: &Row) -> RowRecord {
        RowRecord::new(Arc::clone(&self.columns), row.clone())
    }
}
