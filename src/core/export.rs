use crate::core::analytics::{AnalyticsReport, SectionBody};
use crate::core::RedactedDocument;
use crate::utils::error::Result;
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

/// Zip archive with the redacted JSON, the analytics report and one CSV per chart.
pub fn export_bundle(document: &RedactedDocument, report: &AnalyticsReport) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    zip.start_file(document.file_name.as_str(), SimpleFileOptions::default())?;
    zip.write_all(document.to_pretty_json()?.as_bytes())?;

    zip.start_file("analytics.json", SimpleFileOptions::default())?;
    zip.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

    let mut written = 0usize;
    for section in &report.sections {
        let csv_data = match &section.body {
            SectionBody::Series { points } => {
                let mut writer = csv::Writer::from_writer(Vec::new());
                writer.write_record(["label", "value"])?;
                for point in points {
                    let value = point.value.to_string();
                    writer.write_record([point.label.as_str(), value.as_str()])?;
                }
                writer.into_inner().map_err(|e| e.into_error())?
            }
            SectionBody::Table { columns, rows } => {
                let mut writer = csv::Writer::from_writer(Vec::new());
                writer.write_record(columns)?;
                for row in rows {
                    writer.write_record(row.iter().map(cell))?;
                }
                writer.into_inner().map_err(|e| e.into_error())?
            }
            SectionBody::Metric { .. } | SectionBody::Note { .. } => continue,
        };

        zip.start_file(
            format!("series/{}.csv", slug(&section.title)),
            SimpleFileOptions::default(),
        )?;
        zip.write_all(&csv_data)?;
        written += 1;
    }

    tracing::debug!("Bundled {} CSV files for {}", written, document.file_name);
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

fn cell(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `"Posts by Hour of Day"` -> `"posts_by_hour_of_day"`.
fn slug(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_matches('_').to_string()
}
