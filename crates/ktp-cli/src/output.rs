//! Catalog listing output (table or JSON).

use anyhow::Context;
use clap::ValueEnum;
use ktp_core::{format_size, format_uploaded_at, FileRecord};
use serde::Serialize;

use crate::truncate_string;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// One listing row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordRow {
    pub id: String,
    pub name: String,
    pub size: u64,
    pub size_display: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub uploaded_at: String,
    pub available: bool,
}

impl From<&FileRecord> for RecordRow {
    fn from(record: &FileRecord) -> Self {
        RecordRow {
            id: record.id().to_string(),
            name: record.name().to_string(),
            size: record.size(),
            size_display: format_size(record.size()),
            mime_type: record.mime_type().to_string(),
            uploaded_at: format_uploaded_at(&record.uploaded_at()),
            available: record.is_available(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Listing<'a> {
    title: &'a str,
    breadcrumb: &'a str,
    files: &'a [RecordRow],
}

pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

pub fn print_listing(
    title: &str,
    breadcrumb: &str,
    records: &[FileRecord],
    format: OutputFormat,
) -> anyhow::Result<()> {
    let rows: Vec<RecordRow> = records.iter().map(RecordRow::from).collect();

    match format {
        OutputFormat::Json => print_json(&Listing {
            title,
            breadcrumb,
            files: &rows,
        }),
        OutputFormat::Table => {
            print!("{}", render_table(title, breadcrumb, &rows));
            Ok(())
        }
    }
}

/// Render the listing as a fixed-width table.
pub fn render_table(title: &str, breadcrumb: &str, rows: &[RecordRow]) -> String {
    let mut out = format!("\n=== {} ===\n{}\n", title, breadcrumb);

    if rows.is_empty() {
        out.push_str("\nNo files uploaded yet.\n\n");
        return out;
    }

    out.push_str(&format!(
        "\n{:<32} {:<30} {:>10} {:<24} {:<10} {:<9}\n",
        "ID", "Name", "Size", "Type", "Uploaded", "Available"
    ));
    out.push_str(&"-".repeat(120));
    out.push('\n');

    for row in rows {
        out.push_str(&format!(
            "{:<32} {:<30} {:>10} {:<24} {:<10} {:<9}\n",
            truncate_string(&row.id, 32),
            truncate_string(&row.name, 30),
            row.size_display,
            truncate_string(&row.mime_type, 24),
            row.uploaded_at,
            if row.available { "yes" } else { "no" }
        ));
    }

    out.push_str(&format!("\n{} file(s)\n\n", rows.len()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use ktp_core::{FileId, FileMetadata};

    fn reloaded_record() -> FileRecord {
        FileRecord::from_metadata(FileMetadata {
            id: FileId::from("abc"),
            name: "b.png".to_string(),
            size: 2048,
            mime_type: "image/png".to_string(),
            uploaded_at: Utc.with_ymd_and_hms(2024, 6, 1, 9, 15, 27).unwrap(),
        })
    }

    #[test]
    fn row_formats_size_and_date() {
        let row = RecordRow::from(&reloaded_record());
        assert_eq!(row.size_display, "2 KB");
        assert_eq!(row.uploaded_at, "2024-06-01");
        assert!(!row.available);
    }

    #[test]
    fn row_serializes_with_type_field() {
        let value = serde_json::to_value(RecordRow::from(&reloaded_record())).unwrap();
        assert_eq!(value["type"], "image/png");
        assert_eq!(value["sizeDisplay"], "2 KB");
        assert_eq!(value["uploadedAt"], "2024-06-01");
    }

    #[test]
    fn table_lists_rows() {
        let rows = vec![RecordRow::from(&reloaded_record())];
        let table = render_table("Frontend Developer Resources", "Atlas → ", &rows);

        assert!(table.contains("=== Frontend Developer Resources ==="));
        assert!(table.contains("b.png"));
        assert!(table.contains("2 KB"));
        assert!(table.contains("1 file(s)"));
    }

    #[test]
    fn empty_table_says_so() {
        let table = render_table("QA Engineer Resources", " → ", &[]);
        assert!(table.contains("No files uploaded yet."));
    }
}
