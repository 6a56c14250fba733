//! ZIP container abstraction for OOXML spreadsheet packages.
//!
//! The whole archive is read and inflated when the container is opened; no
//! file handle outlives [`OoxmlContainer::open`].

use crate::error::{Error, Result};
use crate::xml::for_each_element;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::ops::Bound;
use std::path::Path;

/// A relationship entry from a .rels file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path as written (relative or absolute)
    pub target: String,
    /// Whether the target is external
    pub external: bool,
}

/// Relationship index parsed from a .rels file.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    by_id: HashMap<String, Relationship>,
}

impl Relationships {
    /// Create a new empty relationships collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the XML of a .rels part.
    ///
    /// A repeated id replaces the earlier declaration.
    pub fn parse(part: &str, xml: &str) -> Result<Self> {
        let mut rels = Self::new();
        if xml.trim().is_empty() {
            return Ok(rels);
        }

        for_each_element(part, xml, "Relationship", |el| {
            let id = el.attr("Id").unwrap_or_default();
            if id.is_empty() {
                return Ok(());
            }
            rels.add(Relationship {
                id: id.to_string(),
                rel_type: el.attr("Type").unwrap_or_default().to_string(),
                target: el.attr("Target").unwrap_or_default().to_string(),
                external: el
                    .attr("TargetMode")
                    .is_some_and(|m| m.eq_ignore_ascii_case("external")),
            });
            Ok(())
        })?;

        Ok(rels)
    }

    /// Get a relationship by ID.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.by_id.get(id)
    }

    /// Find the first relationship whose type URI ends with `suffix`.
    ///
    /// Matching on the suffix covers both transitional and strict type URIs.
    pub fn find_by_type_suffix(&self, suffix: &str) -> Option<&Relationship> {
        let mut matches: Vec<&Relationship> = self
            .by_id
            .values()
            .filter(|r| r.rel_type.ends_with(suffix))
            .collect();
        matches.sort_by(|a, b| a.id.cmp(&b.id));
        matches.into_iter().next()
    }

    /// Add a relationship, replacing any earlier one with the same id.
    pub fn add(&mut self, rel: Relationship) {
        if let Some(previous) = self.by_id.insert(rel.id.clone(), rel) {
            log::warn!(
                "relationship '{}' declared more than once; keeping the later target",
                previous.id
            );
        }
    }

    /// Number of relationships.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Fix XML encoding declaration from UTF-16 to UTF-8.
///
/// Once UTF-16 bytes are decoded into a Rust `String`, the declaration no
/// longer describes the text it heads.
fn fix_xml_encoding_declaration(content: &str) -> String {
    if content.starts_with("<?xml") {
        if let Some(end_decl) = content.find("?>") {
            let decl = &content[..end_decl + 2];
            let rest = &content[end_decl + 2..];

            let fixed_decl = decl
                .replace("encoding=\"UTF-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='UTF-16'", "encoding='UTF-8'")
                .replace("encoding=\"utf-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='utf-16'", "encoding='UTF-8'");

            return format!("{}{}", fixed_decl, rest);
        }
    }
    content.to_string()
}

/// Decode XML bytes handling UTF-8 (with or without BOM) and BOM-marked UTF-16.
pub fn decode_xml_bytes(part: &str, bytes: &[u8]) -> Result<String> {
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8(rest.to_vec()).map_err(|e| Error::malformed(part, e));
    }

    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        let content = decode_utf16(part, rest, u16::from_le_bytes)?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let content = decode_utf16(part, rest, u16::from_be_bytes)?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    String::from_utf8(bytes.to_vec()).map_err(|e| Error::malformed(part, e))
}

fn decode_utf16(part: &str, bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::malformed(part, e))
}

/// Largest up-front buffer reserved for one part.
const PREALLOC_LIMIT: usize = 1 << 20;

/// OOXML container holding every package part in memory.
///
/// Parts are kept in a name-sorted map so prefix enumeration is deterministic.
pub struct OoxmlContainer {
    parts: BTreeMap<String, Vec<u8>>,
}

impl OoxmlContainer {
    /// Open a package from a file path.
    ///
    /// Fails with [`Error::PackageNotFound`] if the file cannot be opened and
    /// [`Error::MalformedPackage`] if it is not a readable ZIP archive.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use restsheet::container::OoxmlContainer;
    ///
    /// let container = OoxmlContainer::open("RestApi.xlsx")?;
    /// assert!(container.exists("xl/workbook.xml"));
    /// # Ok::<(), restsheet::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            log::debug!("cannot open {}: {}", path.display(), e);
            Error::PackageNotFound(path.to_path_buf())
        })?;
        let mut reader = BufReader::new(file);
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Create a container from the bytes of a package.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(Cursor::new(data))?;
        let mut parts = BTreeMap::new();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            // Header sizes are not verified before inflating.
            let mut bytes = Vec::with_capacity((file.size() as usize).min(PREALLOC_LIMIT));
            file.read_to_end(&mut bytes)
                .map_err(|e| Error::malformed(file.name(), e))?;
            parts.insert(file.name().to_string(), bytes);
        }

        log::debug!("package holds {} parts", parts.len());
        Ok(Self { parts })
    }

    /// Raw bytes of a part.
    ///
    /// Fails with [`Error::MissingRequiredPart`] if no part has exactly that name.
    pub fn entry(&self, name: &str) -> Result<&[u8]> {
        self.parts
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::MissingRequiredPart(name.to_string()))
    }

    /// Read an XML part as a string.
    pub fn read_xml(&self, name: &str) -> Result<String> {
        decode_xml_bytes(name, self.entry(name)?)
    }

    /// Check if a part exists.
    pub fn exists(&self, name: &str) -> bool {
        self.parts.contains_key(name)
    }

    /// All part names, sorted.
    pub fn list_files(&self) -> Vec<&str> {
        self.parts.keys().map(String::as_str).collect()
    }

    /// Part names starting with `prefix`, sorted.
    pub fn entries_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> {
        self.parts
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .map(|(name, _)| name.as_str())
            .take_while(move |name| name.starts_with(prefix))
    }

    /// Read the relationships of `part_path` (its sibling `_rels/<name>.rels`).
    pub fn read_relationships(&self, part_path: &str) -> Result<Relationships> {
        let rels_path = Self::relationships_path(part_path);
        let xml = self.read_xml(&rels_path)?;
        Relationships::parse(&rels_path, &xml)
    }

    /// Name of the .rels part describing `part_path`.
    pub fn relationships_path(part_path: &str) -> String {
        if part_path.is_empty() || part_path == "/" {
            return "_rels/.rels".to_string();
        }
        match part_path.rsplit_once('/') {
            Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
            None => format!("_rels/{}.rels", part_path),
        }
    }

    /// Resolve a relationship target against the part that declares it.
    pub fn resolve_path(base: &str, relative: &str) -> String {
        if let Some(stripped) = relative.strip_prefix('/') {
            return stripped.to_string();
        }

        let mut segments: Vec<&str> = match base.rsplit_once('/') {
            Some((dir, _)) => dir.split('/').collect(),
            None => Vec::new(),
        };
        for component in relative.split('/') {
            match component {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                name => segments.push(name),
            }
        }

        segments.join("/")
    }
}

impl std::fmt::Debug for OoxmlContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OoxmlContainer")
            .field("parts", &self.parts.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::zip_bytes;

    #[test]
    fn test_resolve_path() {
        assert_eq!(
            OoxmlContainer::resolve_path("xl/workbook.xml", "worksheets/sheet1.xml"),
            "xl/worksheets/sheet1.xml"
        );
        assert_eq!(
            OoxmlContainer::resolve_path("xl/workbook.xml", "/xl/worksheets/sheet2.xml"),
            "xl/worksheets/sheet2.xml"
        );
        assert_eq!(
            OoxmlContainer::resolve_path("xl/worksheets/sheet1.xml", "../sharedStrings.xml"),
            "xl/sharedStrings.xml"
        );
        assert_eq!(
            OoxmlContainer::resolve_path("xl/workbook.xml", "./styles.xml"),
            "xl/styles.xml"
        );
    }

    #[test]
    fn test_relationships_path() {
        assert_eq!(
            OoxmlContainer::relationships_path("xl/workbook.xml"),
            "xl/_rels/workbook.xml.rels"
        );
        assert_eq!(OoxmlContainer::relationships_path(""), "_rels/.rels");
    }

    #[test]
    fn test_relationships_later_declaration_wins() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet9.xml"/>
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="http://example.com" TargetMode="External"/>
</Relationships>"#;

        let rels = Relationships::parse("xl/_rels/workbook.xml.rels", xml).unwrap();
        assert_eq!(rels.len(), 3);
        assert_eq!(rels.get("rId1").unwrap().target, "worksheets/sheet9.xml");
        assert!(rels.get("rId3").unwrap().external);
        assert!(rels.get("rId4").is_none());
        assert_eq!(
            rels.find_by_type_suffix("/sharedStrings").unwrap().target,
            "sharedStrings.xml"
        );
    }

    #[test]
    fn test_empty_relationships() {
        let rels = Relationships::parse("_rels/.rels", "  ").unwrap();
        assert!(rels.is_empty());
    }

    #[test]
    fn test_open_missing_file() {
        let err = OoxmlContainer::open("does/not/exist.xlsx").unwrap_err();
        assert!(matches!(err, Error::PackageNotFound(_)));
    }

    #[test]
    fn test_not_a_zip() {
        let err = OoxmlContainer::from_bytes(b"plain text, not a package".to_vec()).unwrap_err();
        assert!(matches!(err, Error::MalformedPackage(_)));
    }

    #[test]
    fn test_entries_sorted_by_prefix() {
        let data = zip_bytes(&[
            ("xl/worksheets/sheet2.xml", "<worksheet/>"),
            ("xl/workbook.xml", "<workbook/>"),
            ("xl/worksheets/sheet10.xml", "<worksheet/>"),
            ("xl/worksheets/sheet1.xml", "<worksheet/>"),
            ("docProps/app.xml", "<Properties/>"),
        ]);
        let container = OoxmlContainer::from_bytes(data).unwrap();

        let sheets: Vec<&str> = container.entries_with_prefix("xl/worksheets/").collect();
        assert_eq!(
            sheets,
            vec![
                "xl/worksheets/sheet1.xml",
                "xl/worksheets/sheet10.xml",
                "xl/worksheets/sheet2.xml",
            ]
        );

        assert!(container.entry("xl/workbook.xml").is_ok());
        assert!(matches!(
            container.entry("xl/sharedStrings.xml"),
            Err(Error::MissingRequiredPart(_))
        ));
    }

    #[test]
    fn test_part_larger_than_prealloc_limit() {
        let big = "x".repeat(PREALLOC_LIMIT * 3 + 7);
        let data = zip_bytes(&[("xl/media/blob.bin", big.as_str())]);
        let container = OoxmlContainer::from_bytes(data).unwrap();
        assert_eq!(container.entry("xl/media/blob.bin").unwrap().len(), big.len());
    }

    #[test]
    fn test_utf16_decoding() {
        let utf16_le = b"\xFF\xFE<\0?\0x\0m\0l\0>\0";
        assert_eq!(decode_xml_bytes("a.xml", utf16_le).unwrap(), "<?xml>");

        let utf16_be = b"\xFE\xFF\0<\0?\0x\0m\0l\0>";
        assert_eq!(decode_xml_bytes("a.xml", utf16_be).unwrap(), "<?xml>");

        let utf8_bom = b"\xEF\xBB\xBF<?xml>";
        assert_eq!(decode_xml_bytes("a.xml", utf8_bom).unwrap(), "<?xml>");

        assert!(matches!(
            decode_xml_bytes("a.xml", b"\xC3\x28"),
            Err(Error::MalformedPackage(_))
        ));
    }

    #[test]
    fn test_utf16_declaration_rewritten() {
        let text = r#"<?xml version="1.0" encoding="UTF-16"?><a/>"#;
        let mut bytes = vec![0xFF, 0xFE];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let decoded = decode_xml_bytes("a.xml", &bytes).unwrap();
        assert_eq!(decoded, r#"<?xml version="1.0" encoding="UTF-8"?><a/>"#);
    }
}
