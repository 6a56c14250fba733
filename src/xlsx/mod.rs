//! SpreadsheetML part parsers.
//!
//! One hand-written decoder per document shape: the workbook's sheet catalog,
//! the shared string pool, and worksheets. Package relationships live in
//! [`crate::container`].
//!
//! # Example
//!
//! ```no_run
//! use restsheet::container::OoxmlContainer;
//! use restsheet::xlsx::{parse_worksheet, SharedStrings};
//!
//! let container = OoxmlContainer::open("RestApi.xlsx")?;
//! let shared = SharedStrings::parse(
//!     "xl/sharedStrings.xml",
//!     &container.read_xml("xl/sharedStrings.xml")?,
//! )?;
//! let part = "xl/worksheets/sheet1.xml";
//! let grid = parse_worksheet(part, &container.read_xml(part)?, &shared)?;
//! println!("{} rows x {} columns", grid.rows.len(), grid.column_count);
//! # Ok::<(), restsheet::Error>(())
//! ```

mod catalog;
mod grid;
mod reference;
mod shared_strings;

pub use catalog::{SheetCatalog, SheetEntry};
pub use grid::{parse_worksheet, SheetGrid, MAX_ROW_NUMBER};
pub use reference::{column_index, column_name, CellReference, MAX_COLUMN_INDEX};
pub use shared_strings::SharedStrings;
