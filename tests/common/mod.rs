//! Shared helpers for building .xlsx packages on disk.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::PathBuf;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const SPREADSHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
pub const RELATIONSHIPS_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub const WORKSHEET_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
pub const SHARED_STRINGS_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings";

/// Collects package parts and writes them as a zip.
#[derive(Default)]
pub struct PackageBuilder {
    parts: Vec<(String, Vec<u8>)>,
}

impl PackageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn part(mut self, name: &str, content: &str) -> Self {
        self.parts.push((name.to_string(), content.as_bytes().to_vec()));
        self
    }

    pub fn raw_part(mut self, name: &str, content: Vec<u8>) -> Self {
        self.parts.push((name.to_string(), content));
        self
    }

    /// `sheets` are (title, r:id, target relative to xl/).
    pub fn workbook(self, sheets: &[(&str, &str, &str)]) -> Self {
        let entries: String = sheets
            .iter()
            .enumerate()
            .map(|(i, (name, id, _))| {
                format!(r#"<sheet name="{}" sheetId="{}" r:id="{}"/>"#, name, i + 1, id)
            })
            .collect();
        let rels: String = sheets
            .iter()
            .map(|(_, id, target)| {
                format!(
                    r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
                    id, WORKSHEET_REL, target
                )
            })
            .collect();

        self.part(
            "xl/workbook.xml",
            &format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="{}" xmlns:r="{}"><sheets>{}</sheets></workbook>"#,
                SPREADSHEET_NS, RELATIONSHIPS_NS, entries
            ),
        )
        .part(
            "xl/_rels/workbook.xml.rels",
            &format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}<Relationship Id="rIdSst" Type="{}" Target="sharedStrings.xml"/></Relationships>"#,
                rels, SHARED_STRINGS_REL
            ),
        )
    }

    pub fn shared_strings(self, strings: &[&str]) -> Self {
        let items: String = strings
            .iter()
            .map(|s| format!("<si><t>{}</t></si>", s))
            .collect();
        self.part(
            "xl/sharedStrings.xml",
            &format!(r#"<sst xmlns="{}">{}</sst>"#, SPREADSHEET_NS, items),
        )
    }

    pub fn sheet(self, part: &str, sheet_data: &str) -> Self {
        self.part(
            part,
            &format!(
                r#"<worksheet xmlns="{}"><sheetData>{}</sheetData></worksheet>"#,
                SPREADSHEET_NS, sheet_data
            ),
        )
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        for (name, content) in &self.parts {
            zip.start_file(name.as_str(), options).unwrap();
            zip.write_all(content).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    /// Write the package into a fresh temp dir; keep the dir alive while reading.
    pub fn write(&self, file_name: &str) -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(file_name);
        std::fs::write(&path, self.to_bytes()).unwrap();
        (dir, path)
    }
}

/// The RestApiTests workbook: header in row 1, one test case in row 2.
pub fn rest_api_package() -> PackageBuilder {
    PackageBuilder::new()
        .workbook(&[("RestApiTests", "rId1", "worksheets/sheet1.xml")])
        .shared_strings(&["isTestCase", "testCase", "url", "TRUE", "Case1", "http://x"])
        .sheet(
            "xl/worksheets/sheet1.xml",
            r#"<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c><c r="C1" t="s"><v>2</v></c></row><row r="2"><c r="A2" t="s"><v>3</v></c><c r="B2" t="s"><v>4</v></c><c r="C2" t="s"><v>5</v></c></row>"#,
        )
}
