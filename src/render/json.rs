//! JSON renderer implementation.

use crate::error::{Error, Result};
use crate::helper::GenericRow;
use crate::model::Worksheet;
use serde::Serialize;

/// JSON output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Compact single-line JSON
    Compact,
    /// Pretty-printed with 2-space indentation
    #[default]
    Pretty,
}

fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let rendered = match format {
        JsonFormat::Compact => serde_json::to_string(value),
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
    };
    rendered.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Render projected rows as a JSON array.
pub fn rows_to_json(rows: &[GenericRow], format: JsonFormat) -> Result<String> {
    to_json(rows, format)
}

/// Render a whole worksheet (title, column count, dense rows) as JSON.
pub fn worksheet_to_json(sheet: &Worksheet, format: JsonFormat) -> Result<String> {
    to_json(sheet, format)
}
