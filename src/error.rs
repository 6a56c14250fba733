//! Error types for the restsheet library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for restsheet operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading a spreadsheet package.
///
/// Every variant is fatal to a load: no partially built workbook is returned.
#[derive(Error, Debug)]
pub enum Error {
    /// The package file does not exist or could not be opened.
    #[error("Package not found: {}", .0.display())]
    PackageNotFound(PathBuf),

    /// The ZIP container or one of its XML parts could not be parsed.
    #[error("Malformed package: {0}")]
    MalformedPackage(String),

    /// A part the reader depends on is absent from the package.
    #[error("Missing required part: {0}")]
    MissingRequiredPart(String),

    /// No worksheet with the requested title exists.
    #[error("Worksheet not found: {0}")]
    TitleNotFound(String),

    /// A cell referenced a shared string past the end of the pool.
    #[error("Shared string index {index} out of range (pool holds {len})")]
    SharedStringIndexOutOfRange {
        /// Index the cell referenced
        index: usize,
        /// Number of strings in the pool
        len: usize,
    },

    /// A sheet declared in the workbook references an unknown relationship id.
    #[error("Sheet '{sheet}' references unknown relationship '{id}'")]
    RelationshipNotResolved {
        /// Declared sheet title
        sheet: String,
        /// Relationship id that did not resolve
        id: String,
    },

    /// The requested header row does not exist in the worksheet.
    #[error("Header row {row} not found in worksheet '{sheet}'")]
    HeaderRowNotFound {
        /// Worksheet title
        sheet: String,
        /// 1-based row number that was requested
        row: usize,
    },

    /// I/O error while reading the package.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error while rendering rows or worksheets.
    #[error("Render error: {0}")]
    Render(String),
}

impl Error {
    /// Build a [`Error::MalformedPackage`] naming the offending part.
    pub(crate) fn malformed(part: &str, reason: impl std::fmt::Display) -> Self {
        Error::MalformedPackage(format!("{}: {}", part, reason))
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::MalformedPackage(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::MalformedPackage(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::MalformedPackage(err.to_string())
    }
}
