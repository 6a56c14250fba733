//! In-memory table model for loaded spreadsheets.
//!
//! Parsers turn worksheet XML into these structures; nothing here touches the
//! package once it has been built.

mod cell;
mod worksheet;

pub use cell::*;
pub use worksheet::*;
