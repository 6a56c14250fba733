//! Synthetic package builders for unit tests.

use crate::xlsx::column_name;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Zip the given (name, content) parts.
pub(crate) fn zip_bytes(parts: &[(&str, &str)]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (name, content) in parts {
        zip.start_file(*name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

/// Build a minimal xlsx package.
///
/// Each sheet is (title, rows); an empty string leaves the cell out entirely.
/// Every text cell goes through the shared string pool.
pub(crate) fn workbook_bytes(sheets: &[(&str, &[&[&str]])]) -> Vec<u8> {
    let mut strings: Vec<String> = Vec::new();
    let mut parts: Vec<(String, String)> = Vec::new();
    let mut sheet_entries = String::new();
    let mut rels = String::new();

    for (i, (title, rows)) in sheets.iter().enumerate() {
        let n = i + 1;
        sheet_entries.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            title, n, n
        ));
        rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            n, n
        ));

        let mut data = String::new();
        for (r, row) in rows.iter().enumerate() {
            data.push_str(&format!(r#"<row r="{}">"#, r + 1));
            for (c, text) in row.iter().enumerate() {
                if text.is_empty() {
                    continue;
                }
                let index = strings.iter().position(|s| s == text).unwrap_or_else(|| {
                    strings.push(text.to_string());
                    strings.len() - 1
                });
                data.push_str(&format!(
                    r#"<c r="{}{}" t="s"><v>{}</v></c>"#,
                    column_name(c),
                    r + 1,
                    index
                ));
            }
            data.push_str("</row>");
        }
        parts.push((
            format!("xl/worksheets/sheet{}.xml", n),
            format!(
                r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
                data
            ),
        ));
    }

    rels.push_str(r#"<Relationship Id="rIdSst" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>"#);
    let sst: String = strings
        .iter()
        .map(|s| format!("<si><t>{}</t></si>", s))
        .collect();

    parts.push((
        "xl/workbook.xml".to_string(),
        format!(
            r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{}</sheets></workbook>"#,
            sheet_entries
        ),
    ));
    parts.push((
        "xl/_rels/workbook.xml.rels".to_string(),
        format!(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
            rels
        ),
    ));
    parts.push((
        "xl/sharedStrings.xml".to_string(),
        format!(
            r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">{}</sst>"#,
            sst
        ),
    ));

    let borrowed: Vec<(&str, &str)> = parts
        .iter()
        .map(|(name, content)| (name.as_str(), content.as_str()))
        .collect();
    zip_bytes(&borrowed)
}
