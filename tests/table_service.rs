//! Table Service Tests
//!
//! Exercises the service against real spreadsheet files:
//! - distinct categories in first-occurrence order
//! - exact-match category filtering
//! - update and delete rewrite the output file with the whole table
//! - rejected mutations leave table and output file untouched
//! - row ids stay stable across deletes
//! - concurrent mutations leave memory and file in agreement

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use sheetbase::table::{
    workbook, CellValue, RowId, Table, TableConfig, TableError, TableLayout, TableService,
};
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn header() -> Vec<String> {
    vec!["Subcategory".into(), "Description".into(), "Price".into()]
}

fn row(category: &str, description: &str, price: f64) -> Vec<CellValue> {
    vec![
        CellValue::from_text(category),
        CellValue::from_text(description),
        CellValue::from_number(price),
    ]
}

/// Write `rows` to a source file and open a service over it
fn open_service(dir: &Path, rows: Vec<Vec<CellValue>>) -> (TableService, PathBuf) {
    let source = dir.join("source.xlsx");
    let output = dir.join("data.xlsx");

    let table = Table::new(header(), rows, TableLayout::default()).unwrap();
    workbook::write_table(&table, &source).unwrap();

    let service = TableService::open(&TableConfig {
        source_path: source,
        output_path: output.clone(),
        sheet: None,
        layout: TableLayout::default(),
    })
    .unwrap();

    (service, output)
}

fn four_rows() -> Vec<Vec<CellValue>> {
    vec![
        row("A", "lamp", 10.0),
        row("B", "flowers", 20.0),
        row("A", "oil", 30.0),
        row("C", "coconut", 40.0),
    ]
}

fn three_rows() -> Vec<Vec<CellValue>> {
    vec![
        row("A", "lamp", 10.0),
        row("B", "flowers", 20.0),
        row("C", "coconut", 40.0),
    ]
}

fn reload(path: &Path) -> Table {
    workbook::load_table(path, None, TableLayout::default()).unwrap()
}

fn descriptions(table: &Table) -> Vec<CellValue> {
    table.rows().iter().map(|r| r.cell(1).clone()).collect()
}

// =============================================================================
// Reads
// =============================================================================

#[test]
fn test_distinct_categories_first_occurrence() {
    let dir = TempDir::new().unwrap();
    let (service, _) = open_service(dir.path(), four_rows());

    assert_eq!(service.list_distinct_categories().unwrap(), vec!["A", "B", "C"]);
}

#[test]
fn test_empty_table_has_no_categories() {
    let dir = TempDir::new().unwrap();
    let (service, _) = open_service(dir.path(), vec![]);

    assert!(service.list_distinct_categories().unwrap().is_empty());
    assert!(service.is_empty().unwrap());
}

#[test]
fn test_rows_by_category() {
    let dir = TempDir::new().unwrap();
    let (service, _) = open_service(dir.path(), four_rows());

    let rows = service.get_rows_by_category("A").unwrap();
    let ids: Vec<_> = rows.iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec![RowId(0), RowId(2)]);
    assert_eq!(rows[1].get("Description"), Some(&CellValue::Text("oil".into())));

    assert!(service.get_rows_by_category("Z").unwrap().is_empty());
}

#[test]
fn test_rows_by_category_is_repeatable() {
    let dir = TempDir::new().unwrap();
    let (service, _) = open_service(dir.path(), four_rows());

    let first = service.get_rows_by_category("A").unwrap();
    let second = service.get_rows_by_category("A").unwrap();
    assert_eq!(first, second);
}

// =============================================================================
// Update
// =============================================================================

#[test]
fn test_update_rewrites_output() {
    let dir = TempDir::new().unwrap();
    let (service, output) = open_service(dir.path(), three_rows());

    service.update_row(RowId(1), "New desc", 9.99).unwrap();

    let saved = reload(&output);
    assert_eq!(saved.len(), 3);
    assert_eq!(
        descriptions(&saved),
        vec![
            CellValue::Text("lamp".into()),
            CellValue::Text("New desc".into()),
            CellValue::Text("coconut".into()),
        ]
    );
    assert_eq!(saved.rows()[1].cell(2), &CellValue::Float(9.99));
    assert_eq!(saved.rows()[0].cell(2), &CellValue::Int(10));
    assert_eq!(saved.rows()[2].cell(2), &CellValue::Int(40));

    // in-memory table matches the file
    assert_eq!(service.snapshot().unwrap().rows(), saved.rows());
}

#[test]
fn test_update_unknown_row_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let (service, output) = open_service(dir.path(), three_rows());
    let before = service.snapshot().unwrap();

    let err = service.update_row(RowId(99), "x", 1.0).unwrap_err();
    assert!(matches!(err, TableError::InvalidIndex(99)));

    assert_eq!(service.snapshot().unwrap().rows(), before.rows());
    assert!(!output.exists());
}

#[test]
fn test_update_failure_keeps_previous_output() {
    let dir = TempDir::new().unwrap();
    let (service, output) = open_service(dir.path(), three_rows());

    service.update_row(RowId(0), "first edit", 1.0).unwrap();
    let saved = std::fs::read(&output).unwrap();

    assert!(service.update_row(RowId(42), "x", 2.0).is_err());
    assert_eq!(std::fs::read(&output).unwrap(), saved);
}

// =============================================================================
// Delete
// =============================================================================

#[test]
fn test_delete_rewrites_output() {
    let dir = TempDir::new().unwrap();
    let (service, output) = open_service(dir.path(), three_rows());

    service.delete_row(RowId(1)).unwrap();

    let saved = reload(&output);
    assert_eq!(
        descriptions(&saved),
        vec![CellValue::Text("lamp".into()), CellValue::Text("coconut".into())]
    );

    let table = service.snapshot().unwrap();
    assert_eq!(table.len(), 2);
    // former row 2 now sits at position 1 but keeps its id
    assert_eq!(table.rows()[1].id, RowId(2));
}

#[test]
fn test_ids_stay_stable_after_delete() {
    let dir = TempDir::new().unwrap();
    let (service, _) = open_service(dir.path(), three_rows());

    service.delete_row(RowId(0)).unwrap();
    service.update_row(RowId(2), "still coconut row", 41.0).unwrap();

    let record = service.get_row(RowId(2)).unwrap();
    assert_eq!(
        record.get("Description"),
        Some(&CellValue::Text("still coconut row".into()))
    );
    assert_eq!(
        service.get_row(RowId(1)).unwrap().get("Description"),
        Some(&CellValue::Text("flowers".into()))
    );
    assert!(matches!(
        service.get_row(RowId(0)),
        Err(TableError::RowNotFound(RowId(0)))
    ));
}

#[test]
fn test_delete_unknown_row_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let (service, output) = open_service(dir.path(), three_rows());

    assert!(matches!(
        service.delete_row(RowId(3)),
        Err(TableError::InvalidIndex(3))
    ));
    assert_eq!(service.len().unwrap(), 3);
    assert!(!output.exists());
}

#[test]
fn test_deleted_row_is_not_found() {
    let dir = TempDir::new().unwrap();
    let (service, output) = open_service(dir.path(), three_rows());

    service.delete_row(RowId(2)).unwrap();
    let saved = std::fs::read(&output).unwrap();

    // the highest id stays assigned after its row is gone
    assert!(matches!(
        service.delete_row(RowId(2)),
        Err(TableError::RowNotFound(RowId(2)))
    ));
    assert!(matches!(
        service.update_row(RowId(2), "x", 1.0),
        Err(TableError::RowNotFound(RowId(2)))
    ));
    assert_eq!(std::fs::read(&output).unwrap(), saved);
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_concurrent_mutations_match_output() {
    let dir = TempDir::new().unwrap();
    let rows = (0..8)
        .map(|i| row(if i % 2 == 0 { "A" } else { "B" }, &format!("item {}", i), i as f64))
        .collect();
    let (service, output) = open_service(dir.path(), rows);
    let service = Arc::new(service);

    let handles: Vec<_> = (0..8u64)
        .map(|i| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                if i < 4 {
                    service.update_row(RowId(i), &format!("edit {}", i), i as f64 + 0.5)
                } else {
                    service.delete_row(RowId(i))
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    let table = service.snapshot().unwrap();
    assert_eq!(table.len(), 4);
    let ids: Vec<_> = table.rows().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![RowId(0), RowId(1), RowId(2), RowId(3)]);
    for (i, record) in table.rows().iter().enumerate() {
        assert_eq!(record.cell(1), &CellValue::Text(format!("edit {}", i)));
        assert_eq!(record.cell(2), &CellValue::Float(i as f64 + 0.5));
    }

    // the last save wrote the final state
    assert_eq!(reload(&output).rows(), table.rows());
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn test_source_is_never_overwritten() {
    let dir = TempDir::new().unwrap();
    let (service, _) = open_service(dir.path(), three_rows());
    let source = dir.path().join("source.xlsx");
    let original = std::fs::read(&source).unwrap();

    service.delete_row(RowId(0)).unwrap();
    assert_eq!(std::fs::read(&source).unwrap(), original);
}

#[test]
fn test_custom_layout_columns() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("items.csv");
    std::fs::write(&source, "Group,Item,Cost\nx,a,1\ny,b,2\nx,c,3\n").unwrap();

    let layout = TableLayout {
        category_column: "Group".into(),
        description_column: "Item".into(),
        price_column: "Cost".into(),
    };
    let service = TableService::open(&TableConfig {
        source_path: source,
        output_path: dir.path().join("out.csv"),
        sheet: None,
        layout,
    })
    .unwrap();

    assert_eq!(service.list_distinct_categories().unwrap(), vec!["x", "y"]);
    service.update_row(RowId(2), "cc", 3.5).unwrap();

    let written = std::fs::read_to_string(dir.path().join("out.csv")).unwrap();
    assert_eq!(written, "Group,Item,Cost\nx,a,1\ny,b,2\nx,cc,3.5\n");
}

#[test]
fn test_missing_layout_column_fails_open() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("bad.csv");
    std::fs::write(&source, "Subcategory,Description\nA,x\n").unwrap();

    let err = TableService::open(&TableConfig {
        source_path: source,
        output_path: dir.path().join("out.csv"),
        sheet: None,
        layout: TableLayout::default(),
    })
    .unwrap_err();
    assert!(matches!(err, TableError::MissingColumn(c) if c == "Price"));
}
