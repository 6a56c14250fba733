//! Output rendering for loaded rows and worksheets.
//!
//! # Example
//!
//! ```no_run
//! use restsheet::render::{rows_to_json, JsonFormat};
//!
//! let rows = restsheet::load_rows("RestApi.xlsx", "RestApiTests", 1)?;
//! println!("{}", rows_to_json(&rows, JsonFormat::Pretty)?);
//! # Ok::<(), restsheet::Error>(())
//! ```

mod json;
mod text;

pub use json::{rows_to_json, worksheet_to_json, JsonFormat};
pub use text::worksheet_to_text;
