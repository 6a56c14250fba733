//! Cell model structures.

use serde::{Deserialize, Serialize};

/// How a cell's text was stored in the worksheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CellKind {
    /// Index into the shared string pool (`t="s"`)
    SharedString,
    /// Inline rich string (`t="inlineStr"`)
    InlineString,
    /// Cached result of a string formula (`t="str"`)
    FormulaString,
    /// Boolean (`t="b"`), rendered as `TRUE`/`FALSE`
    Boolean,
    /// Error value (`t="e"`), e.g. `#N/A`
    Error,
    /// ISO 8601 date (`t="d"`)
    Date,
    /// Number kept as its literal text (default)
    #[default]
    Number,
}

impl CellKind {
    /// Map the `t` attribute of a `<c>` element.
    pub fn from_type_attr(t: Option<&str>) -> Self {
        match t {
            Some("s") => CellKind::SharedString,
            Some("inlineStr") => CellKind::InlineString,
            Some("str") => CellKind::FormulaString,
            Some("b") => CellKind::Boolean,
            Some("e") => CellKind::Error,
            Some("d") => CellKind::Date,
            _ => CellKind::Number,
        }
    }
}

/// A filled cell with its resolved text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Zero-based column index
    pub column: usize,

    /// Resolved text (shared strings already dereferenced)
    pub text: String,

    /// Storage kind
    #[serde(default)]
    pub kind: CellKind,
}

impl Cell {
    /// Create a cell.
    pub fn new(column: usize, text: impl Into<String>, kind: CellKind) -> Self {
        Self {
            column,
            text: text.into(),
            kind,
        }
    }

    /// Check if the cell text is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
