//! # Table Module
//!
//! The single in-memory table served over HTTP.
//!
//! - `row` - cells, rows and stable row ids
//! - `table` - the table and its read/mutate operations
//! - `workbook` - spreadsheet file reading and writing
//! - `store` - persistence seam
//! - `service` - locking and persist-on-mutate

pub mod errors;
pub mod row;
pub mod service;
pub mod store;
pub mod table;
pub mod workbook;

pub use errors::{ErrorResponse, TableError, TableResult};
pub use row::{CellValue, Row, RowId, RowRecord, ROW_ID_KEY};
pub use service::{TableConfig, TableService};
pub use store::{TableStore, WorkbookStore};
pub use table::{Table, TableLayout};
