//! Worksheet and row model structures.

use super::Cell;
use serde::Serialize;
use std::sync::OnceLock;

/// A dense row: one slot per worksheet column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Row {
    /// 1-based spreadsheet row number
    pub number: usize,

    /// One slot per column; `None` where the sheet has no cell
    pub cells: Vec<Option<Cell>>,
}

impl Row {
    /// Create a row of `width` absent slots.
    pub fn empty(number: usize, width: usize) -> Self {
        Self {
            number,
            cells: vec![None; width],
        }
    }

    /// Get the cell at a column, if present.
    pub fn cell(&self, column: usize) -> Option<&Cell> {
        self.cells.get(column).and_then(Option::as_ref)
    }

    /// Get the text at a column, if a cell is present.
    pub fn text(&self, column: usize) -> Option<&str> {
        self.cell(column).map(|c| c.text.as_str())
    }

    /// Number of slots (the worksheet's column count).
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the row has no slots.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Check if every slot is absent.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Whether the first cell is present and has text.
    pub fn is_populated(&self) -> bool {
        self.cell(0).is_some_and(|c| !c.is_empty())
    }
}

/// A worksheet: title, column count and the rows stored in its part.
///
/// Each stored row is dense (one slot per column). Rows the part leaves out
/// are not stored; [`Worksheet::row`] returns `None` for them.
#[derive(Debug, Clone, Serialize)]
pub struct Worksheet {
    title: String,
    part: String,
    column_count: usize,
    rows: Vec<Row>,
    #[serde(skip)]
    populated: OnceLock<Vec<usize>>,
}

impl Worksheet {
    /// Create a worksheet from its rows.
    ///
    /// Every row must be `column_count` wide, with row numbers strictly ascending.
    pub fn new(
        title: impl Into<String>,
        part: impl Into<String>,
        column_count: usize,
        rows: Vec<Row>,
    ) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == column_count));
        debug_assert!(rows.windows(2).all(|w| w[0].number < w[1].number));
        Self {
            title: title.into(),
            part: part.into(),
            column_count,
            rows,
            populated: OnceLock::new(),
        }
    }

    /// Title as declared in the workbook.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Package part this worksheet was read from.
    pub fn part(&self) -> &str {
        &self.part
    }

    /// Width of every row.
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Stored rows, in sheet order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of stored rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of the last stored row, 0 for an empty sheet.
    pub fn last_row_number(&self) -> usize {
        self.rows.last().map_or(0, |r| r.number)
    }

    /// Get a stored row by 1-based row number.
    pub fn row(&self, number: usize) -> Option<&Row> {
        self.rows
            .binary_search_by_key(&number, |r| r.number)
            .ok()
            .map(|i| &self.rows[i])
    }

    /// Get a cell by 1-based row number and zero-based column.
    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.row(row).and_then(|r| r.cell(column))
    }

    /// Rows whose first cell is present with non-empty text, in sheet order.
    ///
    /// Computed on first call and cached.
    pub fn populated_rows(&self) -> Vec<&Row> {
        self.populated
            .get_or_init(|| {
                self.rows
                    .iter()
                    .enumerate()
                    .filter(|(_, row)| row.is_populated())
                    .map(|(i, _)| i)
                    .collect()
            })
            .iter()
            .map(|&i| &self.rows[i])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellKind;

    fn row(number: usize, texts: &[Option<&str>]) -> Row {
        Row {
            number,
            cells: texts
                .iter()
                .enumerate()
                .map(|(i, t)| t.map(|t| Cell::new(i, t, CellKind::InlineString)))
                .collect(),
        }
    }

    #[test]
    fn test_populated_rows_filter_on_first_cell() {
        let sheet = Worksheet::new(
            "Data",
            "xl/worksheets/sheet1.xml",
            3,
            vec![
                row(1, &[Some("name"), Some("value"), None]),
                row(2, &[None, Some("orphan"), Some("x")]),
                row(3, &[Some(""), Some("blank first"), None]),
                row(4, &[None, None, None]),
                row(5, &[Some("kept"), None, None]),
            ],
        );

        let populated = sheet.populated_rows();
        let numbers: Vec<usize> = populated.iter().map(|r| r.number).collect();
        assert_eq!(numbers, vec![1, 5]);

        // Cached view is stable.
        assert_eq!(sheet.populated_rows().len(), 2);
    }

    #[test]
    fn test_row_and_cell_lookup() {
        let sheet = Worksheet::new(
            "Data",
            "xl/worksheets/sheet1.xml",
            2,
            vec![row(1, &[Some("a"), None]), row(2, &[None, Some("b")])],
        );

        assert_eq!(sheet.row(0), None);
        assert_eq!(sheet.row(2).unwrap().text(1), Some("b"));
        assert_eq!(sheet.cell(1, 0).unwrap().text, "a");
        assert!(sheet.cell(1, 1).is_none());
        assert!(sheet.cell(3, 0).is_none());
        assert!(sheet.row(2).unwrap().text(5).is_none());
    }

    #[test]
    fn test_row_lookup_skips_gaps() {
        let sheet = Worksheet::new(
            "Data",
            "xl/worksheets/sheet1.xml",
            1,
            vec![
                row(2, &[Some("a")]),
                row(7, &[Some("b")]),
                row(1_048_576, &[None]),
            ],
        );

        assert_eq!(sheet.row_count(), 3);
        assert_eq!(sheet.last_row_number(), 1_048_576);
        assert!(sheet.row(1).is_none());
        assert!(sheet.row(3).is_none());
        assert_eq!(sheet.row(7).unwrap().text(0), Some("b"));
        assert!(sheet.row(1_048_576).unwrap().is_blank());
    }

    #[test]
    fn test_row_blank() {
        assert!(Row::empty(4, 3).is_blank());
        assert_eq!(Row::empty(4, 3).len(), 3);
        assert!(!row(1, &[None, Some("x")]).is_blank());
    }
}
