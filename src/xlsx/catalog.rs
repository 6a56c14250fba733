//! Sheet catalog from workbook.xml.

use crate::container::{OoxmlContainer, Relationships};
use crate::error::{Error, Result};
use crate::xml::{for_each_element, NS_RELATIONSHIPS, NS_RELATIONSHIPS_STRICT};

/// A `<sheet>` declared in workbook.xml, resolved to its package part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetEntry {
    /// Sheet title
    pub name: String,
    /// Relationship id (`r:id`)
    pub rel_id: String,
    /// Resolved part name, e.g. `xl/worksheets/sheet1.xml`
    pub part: String,
}

/// The workbook's declared sheets, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct SheetCatalog {
    entries: Vec<SheetEntry>,
}

/// Sheet info as declared, before relationship resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DeclaredSheet {
    name: String,
    rel_id: Option<String>,
}

impl SheetCatalog {
    /// Parse workbook.xml and resolve every sheet through `rels`.
    ///
    /// Fails with [`Error::RelationshipNotResolved`] when a sheet's `r:id` is
    /// missing or not present in `rels`.
    pub fn parse(part: &str, xml: &str, rels: &Relationships) -> Result<Self> {
        let declared = parse_declared(part, xml)?;

        let mut entries = Vec::with_capacity(declared.len());
        for sheet in declared {
            let rel_id = sheet.rel_id.unwrap_or_default();
            let target = rels
                .get(&rel_id)
                .ok_or_else(|| Error::RelationshipNotResolved {
                    sheet: sheet.name.clone(),
                    id: rel_id.clone(),
                })?;

            entries.push(SheetEntry {
                part: OoxmlContainer::resolve_path(part, &target.target),
                name: sheet.name,
                rel_id,
            });
        }

        Ok(Self { entries })
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[SheetEntry] {
        &self.entries
    }

    /// Title of the sheet stored in `part`.
    pub fn title_for_part(&self, part: &str) -> Option<&str> {
        self.position_of_part(part)
            .map(|i| self.entries[i].name.as_str())
    }

    /// Declaration position of the sheet stored in `part`.
    pub fn position_of_part(&self, part: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.part == part)
    }

    /// Number of declared sheets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no sheets are declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_declared(part: &str, xml: &str) -> Result<Vec<DeclaredSheet>> {
    let mut sheets = Vec::new();

    for_each_element(part, xml, "sheet", |el| {
        let name = el.attr("name").unwrap_or_default();
        if name.is_empty() {
            return Err(Error::malformed(part, "<sheet> without a name"));
        }
        sheets.push(DeclaredSheet {
            name: name.to_string(),
            rel_id: el
                .attr_in(&[NS_RELATIONSHIPS, NS_RELATIONSHIPS_STRICT], "id")
                .map(String::from),
        });
        Ok(())
    })?;

    Ok(sheets)
}
