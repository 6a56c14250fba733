//! Workbook facade: loads every worksheet of a package and indexes them by title.

use crate::container::{OoxmlContainer, Relationships};
use crate::error::{Error, Result};
use crate::model::Worksheet;
use crate::xlsx::{parse_worksheet, SharedStrings, SheetCatalog};
use std::collections::HashMap;
use std::path::Path;

/// Workbook part declaring the sheet list.
pub const WORKBOOK_PART: &str = "xl/workbook.xml";

/// Directory holding worksheet parts.
pub const WORKSHEETS_PREFIX: &str = "xl/worksheets/";

/// Shared strings location when the workbook relationships do not name one.
const DEFAULT_SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";

/// A fully loaded, immutable workbook.
///
/// Worksheets are addressed by title, case-insensitively.
#[derive(Debug, Clone)]
pub struct Workbook {
    worksheets: Vec<Worksheet>,
    by_title: HashMap<String, usize>,
}

impl Workbook {
    /// Open and load a workbook from a file path.
    ///
    /// The file is read completely and closed before this returns.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use restsheet::Workbook;
    ///
    /// let workbook = Workbook::open("RestApi.xlsx")?;
    /// let sheet = workbook.worksheet("restapitests")?;
    /// println!("{} populated rows", sheet.populated_rows().len());
    /// # Ok::<(), restsheet::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("loading workbook {}", path.display());
        let container = OoxmlContainer::open(path)?;
        Self::from_container(&container)
    }

    /// Load a workbook from the bytes of a package.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let container = OoxmlContainer::from_bytes(data)?;
        Self::from_container(&container)
    }

    /// Load a workbook from an opened container.
    pub fn from_container(container: &OoxmlContainer) -> Result<Self> {
        let rels = container.read_relationships(WORKBOOK_PART)?;
        let catalog = SheetCatalog::parse(WORKBOOK_PART, &container.read_xml(WORKBOOK_PART)?, &rels)?;
        let shared = load_shared_strings(container, &rels)?;

        if let Some(missing) = catalog
            .entries()
            .iter()
            .find(|e| e.part.starts_with(WORKSHEETS_PREFIX) && !container.exists(&e.part))
        {
            return Err(Error::MissingRequiredPart(missing.part.clone()));
        }

        // Parts are visited in name order; a later part wins a title collision.
        let mut loaded: HashMap<String, (usize, Worksheet)> = HashMap::new();
        for part in container
            .entries_with_prefix(WORKSHEETS_PREFIX)
            .filter(|p| is_worksheet_part(p))
        {
            let Some(position) = catalog.position_of_part(part) else {
                log::warn!("{}: no sheet in {} points here; skipped", part, WORKBOOK_PART);
                continue;
            };
            let title = &catalog.entries()[position].name;

            let grid = parse_worksheet(part, &container.read_xml(part)?, &shared)?;
            let sheet = Worksheet::new(title.as_str(), part, grid.column_count, grid.rows);

            if let Some((_, replaced)) = loaded.insert(title.to_lowercase(), (position, sheet)) {
                log::warn!(
                    "worksheet title '{}' collides with '{}'; keeping {}",
                    title,
                    replaced.title(),
                    part
                );
            }
        }

        let mut ordered: Vec<(usize, Worksheet)> = loaded.into_values().collect();
        ordered.sort_by_key(|(position, _)| *position);

        let worksheets: Vec<Worksheet> = ordered.into_iter().map(|(_, sheet)| sheet).collect();
        let by_title = worksheets
            .iter()
            .enumerate()
            .map(|(i, sheet)| (sheet.title().to_lowercase(), i))
            .collect();

        log::debug!("loaded {} worksheets", worksheets.len());
        Ok(Self {
            worksheets,
            by_title,
        })
    }

    /// Get a worksheet by title, ignoring case.
    ///
    /// Fails with [`Error::TitleNotFound`] if no worksheet has that title.
    pub fn worksheet(&self, title: &str) -> Result<&Worksheet> {
        self.get(title)
            .ok_or_else(|| Error::TitleNotFound(title.to_string()))
    }

    /// Get a worksheet by title, ignoring case.
    pub fn get(&self, title: &str) -> Option<&Worksheet> {
        self.by_title
            .get(&title.to_lowercase())
            .map(|&i| &self.worksheets[i])
    }

    /// Worksheets in declaration order.
    pub fn worksheets(&self) -> &[Worksheet] {
        &self.worksheets
    }

    /// Worksheet titles in declaration order.
    pub fn titles(&self) -> Vec<&str> {
        self.worksheets.iter().map(Worksheet::title).collect()
    }

    /// Number of worksheets.
    pub fn len(&self) -> usize {
        self.worksheets.len()
    }

    /// Check if the workbook has no worksheets.
    pub fn is_empty(&self) -> bool {
        self.worksheets.is_empty()
    }
}

/// Worksheet parts sit directly under [`WORKSHEETS_PREFIX`]; `_rels/` does not count.
fn is_worksheet_part(part: &str) -> bool {
    part.strip_prefix(WORKSHEETS_PREFIX)
        .is_some_and(|name| !name.contains('/') && name.ends_with(".xml"))
}

/// Shared strings named by the workbook relationships, else the default part.
///
/// A declared part must exist; an undeclared, absent default yields an empty pool.
fn load_shared_strings(container: &OoxmlContainer, rels: &Relationships) -> Result<SharedStrings> {
    let part = match rels.find_by_type_suffix("/sharedStrings") {
        Some(rel) => OoxmlContainer::resolve_path(WORKBOOK_PART, &rel.target),
        None if container.exists(DEFAULT_SHARED_STRINGS_PART) => {
            DEFAULT_SHARED_STRINGS_PART.to_string()
        }
        None => {
            log::debug!("no shared strings part; using an empty pool");
            return Ok(SharedStrings::default());
        }
    };

    SharedStrings::parse(&part, &container.read_xml(&part)?)
}
