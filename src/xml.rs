//! Namespace-aware XML projection shared by every part parser.
//!
//! Each document shape (relationships, sheet catalog, shared strings, worksheets)
//! is decoded by a hand-written function that walks the owned [`XmlEvent`]s
//! produced here. The projector only resolves names and unescapes values; it
//! does no schema validation, and unknown elements or attributes simply flow
//! past the caller.

use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;

/// Transitional OOXML relationships namespace (the usual `r:` prefix).
pub const NS_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Strict OOXML relationships namespace.
pub const NS_RELATIONSHIPS_STRICT: &str = "http://purl.oclc.org/ooxml/officeDocument/relationships";

/// An attribute with its resolved namespace and local name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    /// Namespace URI, `None` for unprefixed attributes
    pub namespace: Option<String>,
    /// Local name (prefix stripped)
    pub name: String,
    /// Unescaped value
    pub value: String,
}

/// An element start tag, owned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    /// Local name (prefix stripped)
    pub name: String,
    /// Attributes in document order, namespace declarations excluded
    pub attributes: Vec<XmlAttribute>,
}

impl XmlElement {
    /// Check the element's local name.
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    /// Get an unqualified attribute by local name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.namespace.is_none() && a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Get a namespace-qualified attribute, accepting any of `namespaces`.
    pub fn attr_in(&self, namespaces: &[&str], name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| {
                a.name == name
                    && a
                        .namespace
                        .as_deref()
                        .is_some_and(|ns| namespaces.contains(&ns))
            })
            .map(|a| a.value.as_str())
    }
}

/// One step of a projected document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlEvent {
    /// `<name ...>`
    Start(XmlElement),
    /// `<name .../>`
    Empty(XmlElement),
    /// Character data (text or CDATA), unescaped
    Text(String),
    /// `</name>` (local name)
    End(String),
    /// End of document
    Eof,
}

/// Pull parser yielding owned [`XmlEvent`]s for one package part.
pub struct XmlProjector<'a> {
    part: &'a str,
    reader: NsReader<&'a [u8]>,
    buf: Vec<u8>,
}

impl<'a> XmlProjector<'a> {
    /// Create a projector over the XML text of `part`.
    ///
    /// `part` is only used to name the part in error messages.
    pub fn new(part: &'a str, xml: &'a str) -> Self {
        let mut reader = NsReader::from_str(xml);
        // Whitespace inside <t> elements is significant.
        reader.config_mut().trim_text(false);
        Self {
            part,
            reader,
            buf: Vec::new(),
        }
    }

    /// Name of the part being read.
    pub fn part(&self) -> &str {
        self.part
    }

    /// Read the next element, text, or end event.
    ///
    /// Declarations, comments, processing instructions and doctypes are skipped.
    pub fn next_event(&mut self) -> Result<XmlEvent> {
        loop {
            self.buf.clear();
            let event = self
                .reader
                .read_event_into(&mut self.buf)
                .map_err(|e| Error::malformed(self.part, e))?;

            let projected = match event {
                Event::Start(ref e) => XmlEvent::Start(project(&self.reader, e, self.part)?),
                Event::Empty(ref e) => XmlEvent::Empty(project(&self.reader, e, self.part)?),
                Event::Text(ref t) => XmlEvent::Text(
                    t.unescape()
                        .map_err(|e| Error::malformed(self.part, e))?
                        .into_owned(),
                ),
                Event::CData(ref c) => XmlEvent::Text(String::from_utf8_lossy(c).into_owned()),
                Event::End(ref e) => {
                    XmlEvent::End(String::from_utf8_lossy(e.local_name().as_ref()).into_owned())
                }
                Event::Eof => XmlEvent::Eof,
                _ => continue,
            };
            return Ok(projected);
        }
    }

    /// Collect all text inside the element `name` that was just opened.
    ///
    /// Consumes events up to and including the matching end tag.
    pub fn read_text(&mut self, name: &str) -> Result<String> {
        let mut text = String::new();
        let mut depth = 0usize;
        loop {
            match self.next_event()? {
                XmlEvent::Text(t) => text.push_str(&t),
                XmlEvent::Start(_) => depth += 1,
                XmlEvent::End(end) => {
                    if depth == 0 && end == name {
                        return Ok(text);
                    }
                    depth = depth.saturating_sub(1);
                }
                XmlEvent::Empty(_) => {}
                XmlEvent::Eof => return Err(self.unexpected_eof(name)),
            }
        }
    }

    /// Skip the element `name` that was just opened, including its children.
    pub fn skip(&mut self, name: &str) -> Result<()> {
        let mut depth = 0usize;
        loop {
            match self.next_event()? {
                XmlEvent::Start(_) => depth += 1,
                XmlEvent::End(end) => {
                    if depth == 0 && end == name {
                        return Ok(());
                    }
                    depth = depth.saturating_sub(1);
                }
                XmlEvent::Eof => return Err(self.unexpected_eof(name)),
                _ => {}
            }
        }
    }

    /// Error for a document that ends inside `name`.
    pub fn unexpected_eof(&self, name: &str) -> Error {
        Error::malformed(self.part, format!("document ended inside <{}>", name))
    }
}

/// Visit every element named `name` (start or self-closing) in document order.
///
/// Used for flat repeated records such as `<Relationship/>` and `<sheet/>`.
pub fn for_each_element<F>(part: &str, xml: &str, name: &str, mut visit: F) -> Result<()>
where
    F: FnMut(&XmlElement) -> Result<()>,
{
    let mut projector = XmlProjector::new(part, xml);
    loop {
        match projector.next_event()? {
            XmlEvent::Start(el) | XmlEvent::Empty(el) if el.is(name) => visit(&el)?,
            XmlEvent::Eof => return Ok(()),
            _ => {}
        }
    }
}

fn project(reader: &NsReader<&[u8]>, start: &BytesStart<'_>, part: &str) -> Result<XmlElement> {
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::malformed(part, e))?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }

        let (resolved, local) = reader.resolve_attribute(attr.key);
        let namespace = match resolved {
            ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.as_ref()).into_owned()),
            _ => None,
        };
        let value = attr
            .unescape_value()
            .map_err(|e| Error::malformed(part, e))?
            .into_owned();

        attributes.push(XmlAttribute {
            namespace,
            name: String::from_utf8_lossy(local.as_ref()).into_owned(),
            value,
        });
    }

    Ok(XmlElement {
        name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
        attributes,
    })
}
