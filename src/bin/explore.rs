//! Utility to explore XLSX package structure for development
use restsheet::container::OoxmlContainer;
use restsheet::workbook::WORKBOOK_PART;
use restsheet::xlsx::SheetCatalog;

fn preview(content: &str, limit: usize) -> String {
    content.chars().take(limit).collect()
}

fn main() -> restsheet::Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or("test-files/RestApi.xlsx".to_string());
    let container = OoxmlContainer::open(&path)?;

    println!("=== Files in archive ===");
    for file in container.list_files() {
        println!("  {}", file);
    }

    println!("\n=== Relationships of {} ===", WORKBOOK_PART);
    let rels = container.read_relationships(WORKBOOK_PART)?;
    println!("  {} entries", rels.len());

    println!("\n=== Sheet catalog ===");
    let catalog = SheetCatalog::parse(WORKBOOK_PART, &container.read_xml(WORKBOOK_PART)?, &rels)?;
    for entry in catalog.entries() {
        println!("  {} ({}) -> {}", entry.name, entry.rel_id, entry.part);
    }

    if let Some(first) = catalog.entries().first() {
        println!("\n=== {} (first 3000 chars) ===", first.part);
        if let Ok(content) = container.read_xml(&first.part) {
            println!("{}", preview(&content, 3000));
        }
    }

    println!("\n=== xl/sharedStrings.xml (first 2000 chars) ===");
    if let Ok(content) = container.read_xml("xl/sharedStrings.xml") {
        println!("{}", preview(&content, 2000));
    }

    Ok(())
}
