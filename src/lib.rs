//! # restsheet
//!
//! Read REST API test cases out of Excel (.xlsx) workbooks.
//!
//! The package is opened once, every worksheet's stored rows are decoded into
//! column-aligned cell text, and rows below a header row can be projected into
//! [`GenericRow`]s keyed by header name.
//!
//! ## Quick Start
//!
//! ```no_run
//! // One call: header names in row 1, data from row 2 on
//! let rows = restsheet::load_rows("RestApi.xlsx", "RestApiTests", 1)?;
//! for row in rows.iter().filter(|r| r.is_test_case()) {
//!     println!("row {}: {:?}", row.row_num, row.get("url"));
//! }
//! # Ok::<(), restsheet::Error>(())
//! ```
//!
//! ## Working With the Grid
//!
//! ```no_run
//! use restsheet::{open_workbook, LoadOptions};
//! use restsheet::helper::rows_from_worksheet;
//!
//! let workbook = open_workbook("RestApi.xlsx")?;
//! for title in workbook.titles() {
//!     println!("{}", title);
//! }
//!
//! // Title lookup ignores case
//! let sheet = workbook.worksheet("restapitests")?;
//! println!("{} rows x {} columns", sheet.row_count(), sheet.column_count());
//!
//! let options = LoadOptions::new()
//!     .with_header_row(2)
//!     .with_columns(["isTestCase", "testCase", "url"])
//!     .with_test_cases_only(true);
//! let rows = rows_from_worksheet(sheet, &options)?;
//! # Ok::<(), restsheet::Error>(())
//! ```

pub mod container;
pub mod error;
pub mod helper;
pub mod model;
pub mod options;
pub mod render;
pub mod workbook;
pub mod xlsx;
pub mod xml;

#[cfg(test)]
mod test_support;

// Re-exports
pub use container::{OoxmlContainer, Relationship, Relationships};
pub use error::{Error, Result};
pub use helper::{load_rows, load_rows_with_options, ColumnMapping, GenericRow};
pub use model::{Cell, CellKind, Row, Worksheet};
pub use options::LoadOptions;
pub use workbook::Workbook;

use std::path::Path;

/// Open an .xlsx file and decode all of its worksheets.
///
/// # Example
///
/// ```no_run
/// let workbook = restsheet::open_workbook("RestApi.xlsx")?;
/// println!("Worksheets: {}", workbook.len());
/// # Ok::<(), restsheet::Error>(())
/// ```
pub fn open_workbook(path: impl AsRef<Path>) -> Result<Workbook> {
    Workbook::open(path)
}

/// Open an .xlsx package held in memory.
///
/// # Example
///
/// ```no_run
/// let data = std::fs::read("RestApi.xlsx")?;
/// let workbook = restsheet::open_workbook_bytes(&data)?;
/// # Ok::<(), restsheet::Error>(())
/// ```
pub fn open_workbook_bytes(data: &[u8]) -> Result<Workbook> {
    Workbook::from_bytes(data.to_vec())
}

/// Render one worksheet's rows as JSON.
///
/// # Example
///
/// ```no_run
/// let json = restsheet::rows_to_json("RestApi.xlsx", "RestApiTests", 1)?;
/// std::fs::write("cases.json", json)?;
/// # Ok::<(), restsheet::Error>(())
/// ```
pub fn rows_to_json(path: impl AsRef<Path>, title: &str, header_row: usize) -> Result<String> {
    let rows = load_rows(path, title, header_row)?;
    render::rows_to_json(&rows, render::JsonFormat::Pretty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::workbook_bytes;

    #[test]
    fn test_open_workbook_bytes() {
        let bytes = workbook_bytes(&[("Data", &[&["a", "b"], &["1", ""]])]);
        let workbook = open_workbook_bytes(&bytes).unwrap();
        assert_eq!(workbook.titles(), vec!["Data"]);
        assert_eq!(workbook.worksheet("data").unwrap().column_count(), 2);
    }

    #[test]
    fn test_open_missing_file() {
        let err = open_workbook("definitely/not/here.xlsx").unwrap_err();
        assert!(matches!(err, Error::PackageNotFound(_)));
    }
}
