//! XLSX shared strings parsing.

use crate::error::{Error, Result};
use crate::xml::{XmlEvent, XmlProjector};

/// Shared strings table.
///
/// Built once per load and handed by reference to every worksheet parse.
#[derive(Debug, Clone, Default)]
pub struct SharedStrings {
    /// All strings in order
    strings: Vec<String>,
}

impl SharedStrings {
    /// Parse shared strings from XML content.
    ///
    /// Each `<si>` becomes one string: a plain `<t>`, or the concatenated `<t>`
    /// of its rich-text runs. Phonetic hints (`<rPh>`) are not part of the value.
    pub fn parse(part: &str, xml: &str) -> Result<Self> {
        let mut strings = Vec::new();
        let mut projector = XmlProjector::new(part, xml);

        loop {
            match projector.next_event()? {
                XmlEvent::Start(el) if el.is("si") => {
                    strings.push(read_string_item(&mut projector, "si")?);
                }
                XmlEvent::Empty(el) if el.is("si") => strings.push(String::new()),
                XmlEvent::Eof => break,
                _ => {}
            }
        }

        log::debug!("{}: {} shared strings", part, strings.len());
        Ok(Self { strings })
    }

    /// Get a string by index.
    ///
    /// Fails with [`Error::SharedStringIndexOutOfRange`] past the end of the pool.
    pub fn get(&self, index: usize) -> Result<&str> {
        self.strings
            .get(index)
            .map(String::as_str)
            .ok_or(Error::SharedStringIndexOutOfRange {
                index,
                len: self.strings.len(),
            })
    }

    /// Get the count of shared strings.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

/// Read the text of a string item (`<si>` or an inline `<is>`) just opened.
///
/// Concatenates every `<t>`, directly or inside `<r>` runs, and drops `<rPh>`.
pub(crate) fn read_string_item(projector: &mut XmlProjector<'_>, name: &str) -> Result<String> {
    let mut text = String::new();
    loop {
        match projector.next_event()? {
            XmlEvent::Start(el) => match el.name.as_str() {
                "t" => text.push_str(&projector.read_text("t")?),
                "rPh" => projector.skip("rPh")?,
                _ => {}
            },
            XmlEvent::End(end) if end == name => return Ok(text),
            XmlEvent::Eof => return Err(projector.unexpected_eof(name)),
            _ => {}
        }
    }
}
