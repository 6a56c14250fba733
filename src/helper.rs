//! Header-keyed row projection for spreadsheet-driven test cases.
//!
//! A header row names the columns; every data row below it becomes a
//! [`GenericRow`] mapping those names to the row's cell text.

use crate::error::{Error, Result};
use crate::model::{Row, Worksheet};
use crate::options::{LoadOptions, DEFAULT_TEST_CASE_COLUMN};
use crate::workbook::Workbook;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Column names recognized in a header row, with their column indexes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    columns: Vec<(String, usize)>,
}

impl ColumnMapping {
    /// Map every header name up to the first empty or absent header cell.
    pub fn from_header(header: &Row) -> Self {
        Self::scan(header, |_| true)
    }

    /// Map only the `recognized` names found before the first empty or absent
    /// header cell. Other header text is ignored.
    pub fn recognized<S: AsRef<str>>(header: &Row, recognized: &[S]) -> Self {
        Self::scan(header, |text| recognized.iter().any(|n| n.as_ref() == text))
    }

    fn scan(header: &Row, keep: impl Fn(&str) -> bool) -> Self {
        let mut columns: Vec<(String, usize)> = Vec::new();
        for (index, slot) in header.cells.iter().enumerate() {
            let Some(text) = slot.as_ref().map(|c| c.text.as_str()).filter(|t| !t.is_empty())
            else {
                break;
            };
            if !keep(text) {
                continue;
            }
            if columns.iter().any(|(name, _)| name == text) {
                log::warn!(
                    "header '{}' repeated in row {}; keeping the first column",
                    text,
                    header.number
                );
                continue;
            }
            columns.push((text.to_string(), index));
        }
        Self { columns }
    }

    /// Column index of a recognized name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, index)| index)
    }

    /// Recognized (name, column index) pairs, left to right.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.columns.iter().map(|(name, index)| (name.as_str(), *index))
    }

    /// Number of recognized columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if no column was recognized.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// One data row keyed by header name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GenericRow {
    /// 1-based spreadsheet row number
    pub row_num: usize,

    /// Header name to cell text, in header column order; columns without a
    /// cell have no key
    pub cell_values: IndexMap<String, String>,
}

impl GenericRow {
    /// Project `row` through `mapping`.
    ///
    /// Returns `None` when the row's first cell is absent.
    pub fn from_row(row: &Row, mapping: &ColumnMapping) -> Option<Self> {
        row.cell(0)?;

        let cell_values = mapping
            .iter()
            .filter_map(|(name, index)| row.text(index).map(|text| (name.to_string(), text.to_string())))
            .collect();

        Some(Self {
            row_num: row.number,
            cell_values,
        })
    }

    /// Cell text for a column name.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cell_values.get(column).map(String::as_str)
    }

    /// Whether `column` holds `true` (any case).
    pub fn flag(&self, column: &str) -> bool {
        self.get(column)
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
    }

    /// Whether the `isTestCase` column holds `true`.
    pub fn is_test_case(&self) -> bool {
        self.flag(DEFAULT_TEST_CASE_COLUMN)
    }
}

/// Project a worksheet's data rows using `options`.
///
/// Rows after the header row are visited in order; rows whose first cell is
/// absent are skipped. A header row inside the sheet that the part does not
/// store maps no columns.
pub fn rows_from_worksheet(sheet: &Worksheet, options: &LoadOptions) -> Result<Vec<GenericRow>> {
    if options.header_row == 0 || options.header_row > sheet.last_row_number() {
        return Err(Error::HeaderRowNotFound {
            sheet: sheet.title().to_string(),
            row: options.header_row,
        });
    }

    let mapping = match (sheet.row(options.header_row), &options.columns) {
        (Some(header), Some(names)) => ColumnMapping::recognized(header, names.as_slice()),
        (Some(header), None) => ColumnMapping::from_header(header),
        (None, _) => ColumnMapping::default(),
    };
    log::debug!(
        "'{}': {} columns mapped from row {}",
        sheet.title(),
        mapping.len(),
        options.header_row
    );

    let rows = sheet
        .rows()
        .iter()
        .filter(|row| row.number > options.header_row)
        .filter_map(|row| GenericRow::from_row(row, &mapping))
        .filter(|row| !options.test_cases_only || row.flag(&options.test_case_column))
        .collect();

    Ok(rows)
}

/// Load a workbook and project one worksheet's rows below `header_row`.
///
/// # Example
///
/// ```no_run
/// let rows = restsheet::load_rows("RestApi.xlsx", "RestApiTests", 1)?;
/// for row in rows.iter().filter(|r| r.is_test_case()) {
///     println!("{}: {:?}", row.row_num, row.get("url"));
/// }
/// # Ok::<(), restsheet::Error>(())
/// ```
pub fn load_rows(path: impl AsRef<Path>, title: &str, header_row: usize) -> Result<Vec<GenericRow>> {
    load_rows_with_options(path, title, &LoadOptions::new().with_header_row(header_row))
}

/// Load a workbook and project one worksheet's rows with `options`.
pub fn load_rows_with_options(
    path: impl AsRef<Path>,
    title: &str,
    options: &LoadOptions,
) -> Result<Vec<GenericRow>> {
    let workbook = Workbook::open(path)?;
    rows_from_worksheet(workbook.worksheet(title)?, options)
}
