//! Spreadsheet file I/O
//!
//! Reading goes through calamine (`.xlsx`, `.xlsm`, `.xls`, `.ods`) or the
//! csv crate (`.csv`). Writing produces `.csv` for a `.csv` path and `.xlsx`
//! for everything else. The first row of a sheet is always the header.

use std::fs;
use std::io::Write;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::{Workbook, XlsxError};
use tempfile::NamedTempFile;

use super::errors::{TableError, TableResult};
use super::row::CellValue;
use super::table::{Table, TableLayout};

/// Date-formatted cells are read as text in this form
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Header row plus data rows, before validation
type RawSheet = (Vec<String>, Vec<Vec<CellValue>>);

/// Load a table from a spreadsheet file.
///
/// `sheet` selects a worksheet by name; the first sheet is used otherwise.
/// It is ignored for CSV files.
pub fn load_table(path: &Path, sheet: Option<&str>, layout: TableLayout) -> TableResult<Table> {
    let (columns, rows) = if is_csv(path) {
        read_csv(path)?
    } else {
        read_workbook(path, sheet)?
    };

    Table::new(columns, rows, layout)
}

/// Write the whole table to `path`, replacing any existing file.
///
/// The bytes go to a temporary file in the same directory which is then
/// renamed over `path`, so readers see either the old or the new file.
pub fn write_table(table: &Table, path: &Path) -> TableResult<()> {
    let bytes = if is_csv(path) {
        csv_bytes(table, path)?
    } else {
        xlsx_bytes(table, path)?
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| TableError::persist(path, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| TableError::persist(path, e))?;
    tmp.write_all(&bytes)
        .map_err(|e| TableError::persist(path, e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| TableError::persist(path, e))?;
    tmp.persist(path)
        .map_err(|e| TableError::persist(path, e.error))?;

    Ok(())
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

// ==================
// Reading
// ==================

fn read_workbook(path: &Path, sheet: Option<&str>) -> TableResult<RawSheet> {
    let mut workbook = open_workbook_auto(path).map_err(|e| TableError::load(path, e))?;
    let sheet_names = workbook.sheet_names();

    let sheet_name = match sheet {
        Some(name) if sheet_names.iter().any(|n| n == name) => name.to_string(),
        Some(name) => return Err(TableError::SheetNotFound(name.to_string())),
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| TableError::load(path, "workbook has no sheets"))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| TableError::load(path, e))?;

    let mut rows = range.rows();
    let columns = match rows.next() {
        Some(header) => header_names(header.iter().map(cell_from_data)),
        None => Vec::new(),
    };
    let rows = rows
        .map(|row| row.iter().map(cell_from_data).collect::<Vec<_>>())
        .filter(|cells| !cells.iter().all(CellValue::is_empty))
        .collect();

    Ok((columns, rows))
}

fn read_csv(path: &Path) -> TableResult<RawSheet> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| TableError::load(path, e))?;

    let header = reader.headers().map_err(|e| TableError::load(path, e))?;
    let columns = header_names(header.iter().map(CellValue::from_text));

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| TableError::load(path, e))?;
        let cells: Vec<CellValue> = record.iter().map(cell_from_text).collect();
        if !cells.iter().all(CellValue::is_empty) {
            rows.push(cells);
        }
    }

    Ok((columns, rows))
}

/// Blank header cells are named after their position
fn header_names(cells: impl Iterator<Item = CellValue>) -> Vec<String> {
    cells
        .enumerate()
        .map(|(pos, cell)| {
            cell.display_text()
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| format!("Unnamed: {}", pos))
        })
        .collect()
}

fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::from_number(*f),
        Data::String(s) => CellValue::from_text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) if dt.is_datetime() => dt
            .as_datetime()
            .map(|value| CellValue::Text(value.format(DATETIME_FORMAT).to_string()))
            .unwrap_or_else(|| CellValue::from_number(dt.as_f64())),
        Data::DateTime(dt) => CellValue::from_number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::from_text(s.clone()),
        // error cells and blanks
        _ => CellValue::Empty,
    }
}

fn cell_from_text(field: &str) -> CellValue {
    if field.is_empty() {
        return CellValue::Empty;
    }
    if let Ok(i) = field.parse::<i64>() {
        return CellValue::Int(i);
    }
    if let Ok(f) = field.parse::<f64>() {
        return CellValue::from_number(f);
    }
    match field.to_ascii_lowercase().as_str() {
        "true" => CellValue::Bool(true),
        "false" => CellValue::Bool(false),
        _ => CellValue::Text(field.to_string()),
    }
}

// ==================
// Writing
// ==================

fn xlsx_bytes(table: &Table, path: &Path) -> TableResult<Vec<u8>> {
    let xlsx_err = |e: XlsxError| TableError::persist(path, e);
    let too_wide = |col: usize| TableError::persist(path, format!("column {} out of range", col));

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, name) in table.columns().iter().enumerate() {
        let col = u16::try_from(col).map_err(|_| too_wide(col))?;
        worksheet.write_string(0, col, name).map_err(xlsx_err)?;
    }

    for (pos, row) in table.rows().iter().enumerate() {
        let line = u32::try_from(pos + 1)
            .map_err(|_| TableError::persist(path, "too many rows"))?;

        for (col, cell) in row.cells.iter().enumerate() {
            let col = u16::try_from(col).map_err(|_| too_wide(col))?;
            match cell {
                CellValue::Empty => {}
                CellValue::Bool(b) => {
                    worksheet.write_boolean(line, col, *b).map_err(xlsx_err)?;
                }
                CellValue::Int(i) => {
                    worksheet.write_number(line, col, *i as f64).map_err(xlsx_err)?;
                }
                CellValue::Float(f) if f.is_finite() => {
                    worksheet.write_number(line, col, *f).map_err(xlsx_err)?;
                }
                CellValue::Float(_) => {}
                CellValue::Text(s) => {
                    worksheet.write_string(line, col, s).map_err(xlsx_err)?;
                }
            }
        }
    }

    workbook.save_to_buffer().map_err(xlsx_err)
}

fn csv_bytes(table: &Table, path: &Path) -> TableResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(table.columns())
        .map_err(|e| TableError::persist(path, e))?;
    for row in table.rows() {
        let fields = (0..table.columns().len())
            .map(|col| row.cell(col).display_text().unwrap_or_default());
        writer
            .write_record(fields)
            .map_err(|e| TableError::persist(path, e))?;
    }

    writer
        .into_inner()
        .map_err(|e| TableError::persist(path, e.error()))
}
