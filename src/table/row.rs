//! Rows, cells and stable row identifiers

use std::fmt;
use std::sync::Arc;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::errors::{TableError, TableResult};

/// Key under which a row's identifier is serialized
pub const ROW_ID_KEY: &str = "index";

/// Largest integer an f64 holds exactly
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

static EMPTY_CELL: CellValue = CellValue::Empty;

/// Stable row identifier.
///
/// Assigned once at load time from the row's position in the source sheet.
/// Deleting a row never renumbers the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub u64);

impl RowId {
    /// Convert a client supplied index into a row id
    pub fn from_index(index: i64) -> TableResult<Self> {
        u64::try_from(index)
            .map(RowId)
            .map_err(|_| TableError::InvalidIndex(index))
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single cell value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Blank cell, serialized as `null`
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    /// Build a numeric cell, keeping integral values as integers
    pub fn from_number(value: f64) -> Self {
        if value.is_finite() && value.fract() == 0.0 && value.abs() < MAX_EXACT_INT {
            CellValue::Int(value as i64)
        } else {
            CellValue::Float(value)
        }
    }

    /// Build a text cell, treating an empty string as a blank cell
    pub fn from_text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Textual form used for grouping and file output. `None` for blank cells.
    pub fn display_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::Int(i) => Some(i.to_string()),
            CellValue::Float(f) => Some(f.to_string()),
            CellValue::Text(s) => Some(s.clone()),
        }
    }

    /// Exact, case-sensitive comparison against a category value
    pub fn matches_text(&self, text: &str) -> bool {
        match self {
            CellValue::Text(s) => s == text,
            CellValue::Empty => false,
            other => other.display_text().as_deref() == Some(text),
        }
    }
}

/// One record in the table. Cells are aligned with the table's columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: RowId,
    pub cells: Vec<CellValue>,
}

impl Row {
    pub fn new(id: RowId, cells: Vec<CellValue>) -> Self {
        Self { id, cells }
    }

    /// Cell at a column position. Missing trailing cells read as blank.
    pub fn cell(&self, column: usize) -> &CellValue {
        self.cells.get(column).unwrap_or(&EMPTY_CELL)
    }

    pub(crate) fn set_cell(&mut self, column: usize, value: CellValue) {
        if self.cells.len() <= column {
            self.cells.resize(column + 1, CellValue::Empty);
        }
        self.cells[column] = value;
    }
}

/// An owned row paired with the table's column names.
///
/// Serializes as a JSON object: the row id under `index`, then every
/// column in sheet order.
#[derive(Debug, Clone, PartialEq)]
pub struct RowRecord {
    columns: Arc<[String]>,
    row: Row,
}

impl RowRecord {
    pub fn new(columns: Arc<[String]>, row: Row) -> Self {
        Self { columns, row }
    }

    pub fn id(&self) -> RowId {
        self.row.id
    }

    /// Value of a named column
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|pos| self.row.cell(pos))
    }
}

impl Serialize for RowRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len() + 1))?;
        map.serialize_entry(ROW_ID_KEY, &self.row.id)?;
        for (pos, column) in self.columns.iter().enumerate() {
            map.serialize_entry(column, self.row.cell(pos))?;
        }
        map.end()
    }
}
