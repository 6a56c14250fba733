//! Worksheet parsing: sparse `<row>`/`<c>` XML into a dense grid.

use crate::error::{Error, Result};
use crate::model::{Cell, CellKind, Row};
use crate::xml::{XmlElement, XmlEvent, XmlProjector};

use super::reference::{CellReference, MAX_COLUMN_INDEX};
use super::shared_strings::{read_string_item, SharedStrings};

/// Highest row number a worksheet may use.
pub const MAX_ROW_NUMBER: usize = 1_048_576;

/// The rows stored in a worksheet part, each expanded to a uniform width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetGrid {
    /// Width of every row: highest column index seen plus one
    pub column_count: usize,
    /// Rows present in the part, ascending by number; gaps are not stored
    pub rows: Vec<Row>,
}

/// A row as stored: only its filled cells.
#[derive(Debug)]
struct SparseRow {
    number: usize,
    cells: Vec<Cell>,
}

/// Parse one worksheet part into a dense grid.
///
/// Shared-string cells are resolved against `shared`. Only rows present in the
/// XML are kept; each carries its own row number.
pub fn parse_worksheet(part: &str, xml: &str, shared: &SharedStrings) -> Result<SheetGrid> {
    let mut projector = XmlProjector::new(part, xml);
    let mut sparse: Vec<SparseRow> = Vec::new();
    let mut max_column: Option<usize> = None;
    let mut in_sheet_data = false;

    loop {
        match projector.next_event()? {
            XmlEvent::Start(el) if el.is("sheetData") => in_sheet_data = true,
            XmlEvent::End(name) if name == "sheetData" => in_sheet_data = false,
            XmlEvent::Start(el) if in_sheet_data && el.is("row") => {
                let number = row_number(part, &el, sparse.last())?;
                let cells = read_row(&mut projector, shared)?;
                if let Some(widest) = cells.iter().map(|c| c.column).max() {
                    max_column = max_column.max(Some(widest));
                }
                sparse.push(SparseRow { number, cells });
            }
            XmlEvent::Empty(el) if in_sheet_data && el.is("row") => {
                let number = row_number(part, &el, sparse.last())?;
                sparse.push(SparseRow {
                    number,
                    cells: Vec::new(),
                });
            }
            XmlEvent::Eof => break,
            _ => {}
        }
    }

    let column_count = max_column.map_or(0, |m| m + 1);
    log::debug!(
        "{}: {} stored rows, {} columns",
        part,
        sparse.len(),
        column_count
    );

    Ok(SheetGrid {
        column_count,
        rows: densify(part, sparse, column_count),
    })
}

/// Row number from `r`, or one past the previous row.
fn row_number(part: &str, el: &XmlElement, previous: Option<&SparseRow>) -> Result<usize> {
    let after = previous.map_or(0, |p| p.number);
    let number = match el.attr("r") {
        Some(r) => r
            .trim()
            .parse::<usize>()
            .map_err(|_| Error::malformed(part, format!("invalid row number '{}'", r)))?,
        None => after + 1,
    };

    if number == 0 || number > MAX_ROW_NUMBER {
        return Err(Error::malformed(
            part,
            format!("row number {} out of range", number),
        ));
    }
    if number <= after {
        return Err(Error::malformed(
            part,
            format!("row {} follows row {}", number, after),
        ));
    }
    Ok(number)
}

/// Read the cells of the `<row>` just opened, up to its end tag.
fn read_row(projector: &mut XmlProjector<'_>, shared: &SharedStrings) -> Result<Vec<Cell>> {
    let mut cells: Vec<Cell> = Vec::new();
    loop {
        match projector.next_event()? {
            XmlEvent::Start(el) if el.is("c") => {
                let column = cell_column(projector.part(), &el, cells.last())?;
                let cell = read_cell(projector, &el, column, shared)?;
                cells.push(cell);
            }
            XmlEvent::Empty(el) if el.is("c") => {
                let column = cell_column(projector.part(), &el, cells.last())?;
                let kind = CellKind::from_type_attr(el.attr("t"));
                cells.push(Cell::new(column, String::new(), kind));
            }
            XmlEvent::Start(el) => projector.skip(&el.name)?,
            XmlEvent::End(name) if name == "row" => return Ok(cells),
            XmlEvent::Eof => return Err(projector.unexpected_eof("row")),
            _ => {}
        }
    }
}

/// Column from the cell's `r` reference, or one past the previous cell.
fn cell_column(part: &str, el: &XmlElement, previous: Option<&Cell>) -> Result<usize> {
    match el.attr("r") {
        Some(r) => CellReference::parse(r)
            .map(|reference| reference.column)
            .ok_or_else(|| Error::malformed(part, format!("invalid cell reference '{}'", r))),
        None => {
            let column = previous.map_or(0, |p| p.column + 1);
            if column > MAX_COLUMN_INDEX {
                return Err(Error::malformed(
                    part,
                    format!("cell after column {} is past XFD", MAX_COLUMN_INDEX),
                ));
            }
            Ok(column)
        }
    }
}

/// Read the `<c>` just opened and resolve its text.
fn read_cell(
    projector: &mut XmlProjector<'_>,
    el: &XmlElement,
    column: usize,
    shared: &SharedStrings,
) -> Result<Cell> {
    let kind = CellKind::from_type_attr(el.attr("t"));
    let mut value: Option<String> = None;
    let mut inline: Option<String> = None;

    loop {
        match projector.next_event()? {
            XmlEvent::Start(child) => match child.name.as_str() {
                "v" => value = Some(projector.read_text("v")?),
                "is" => inline = Some(read_string_item(projector, "is")?),
                other => projector.skip(other)?,
            },
            XmlEvent::End(name) if name == "c" => break,
            XmlEvent::Eof => return Err(projector.unexpected_eof("c")),
            _ => {}
        }
    }

    let text = match kind {
        CellKind::SharedString => match value {
            Some(v) => {
                let index = v.trim().parse::<usize>().map_err(|_| {
                    Error::malformed(
                        projector.part(),
                        format!("invalid shared string index '{}'", v),
                    )
                })?;
                shared.get(index)?.to_string()
            }
            None => String::new(),
        },
        CellKind::InlineString => inline.or(value).unwrap_or_default(),
        CellKind::Boolean => match value.as_deref().map(str::trim) {
            Some("1") => "TRUE".to_string(),
            Some("0") => "FALSE".to_string(),
            _ => value.unwrap_or_default(),
        },
        _ => value.unwrap_or_default(),
    };

    Ok(Cell::new(column, text, kind))
}

/// Lay stored rows out as dense rows of `width` slots.
///
/// A column filled twice in one row keeps the later cell.
fn densify(part: &str, sparse: Vec<SparseRow>, width: usize) -> Vec<Row> {
    sparse
        .into_iter()
        .map(|stored| {
            let mut row = Row::empty(stored.number, width);
            for cell in stored.cells {
                let Some(slot) = row.cells.get_mut(cell.column) else {
                    continue;
                };
                if slot.is_some() {
                    log::warn!(
                        "{}: cell {} repeated; keeping the later one",
                        part,
                        CellReference {
                            column: cell.column,
                            row: stored.number
                        }
                    );
                }
                *slot = Some(cell);
            }
            row
        })
        .collect()
}
