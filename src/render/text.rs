//! Plain text renderer implementation.

use crate::model::{Row, Worksheet};
use crate::xlsx::column_name;

/// Render a worksheet as tab-separated text under a column-letter header.
///
/// Each line starts with the row number. With `populated_only`, only rows whose
/// first cell has text are written.
pub fn worksheet_to_text(sheet: &Worksheet, populated_only: bool) -> String {
    let mut output = String::new();

    output.push('#');
    for column in 0..sheet.column_count() {
        output.push('\t');
        output.push_str(&column_name(column));
    }
    output.push('\n');

    let rows: Vec<&Row> = if populated_only {
        sheet.populated_rows()
    } else {
        sheet.rows().iter().collect()
    };

    for row in rows {
        output.push_str(&row.number.to_string());
        for slot in &row.cells {
            output.push('\t');
            if let Some(cell) = slot {
                output.push_str(&escape_cell(&cell.text));
            }
        }
        output.push('\n');
    }

    output
}

/// Keep one cell on one field: tabs and line breaks become escapes.
fn escape_cell(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('\t', "\\t")
        .replace('\r', "\\r")
        .replace('\n', "\\n")
}
