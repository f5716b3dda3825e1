use crate::output::{ExportError, OutputFormat};
use crate::scraper::ScrapeReport;
use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes `data` to `path` in the given format
///
/// Missing parent directories are created. CSV export needs `data` to
/// serialize as an array of objects; the header is the union of all object
/// keys in the order they first appear.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use webglean::output::{export, OutputFormat};
///
/// let rows = vec![serde_json::json!({"url": "https://example.com/", "status": "success"})];
/// export(&rows, Path::new("out/results.csv"), OutputFormat::Csv).unwrap();
/// ```
pub fn export<T: Serialize + ?Sized>(
    data: &T,
    path: &Path,
    format: OutputFormat,
) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    match format {
        OutputFormat::Json => write_json(data, path)?,
        OutputFormat::Csv => write_csv(&serde_json::to_value(data)?, path)?,
    }

    tracing::info!("Exported {} to {}", format, path.display());
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(data: &T, path: &Path) -> Result<(), ExportError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, data)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

fn write_csv(value: &Value, path: &Path) -> Result<(), ExportError> {
    let rows = value
        .as_array()
        .ok_or_else(|| ExportError::NotTabular("expected an array of records".to_string()))?;

    let mut records: Vec<&Map<String, Value>> = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let record = row
            .as_object()
            .ok_or_else(|| ExportError::NotTabular(format!("row {} is not an object", index)))?;
        records.push(record);
    }

    let mut columns: Vec<&str> = Vec::new();
    for record in &records {
        for key in record.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    if !columns.is_empty() {
        writer.write_record(&columns)?;
    }

    for record in &records {
        writer.write_record(
            columns
                .iter()
                .map(|column| cell(record.get(*column).unwrap_or(&Value::Null))),
        )?;
    }

    writer.flush()?;
    Ok(())
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Builds `{dir}/crawled_data_YYYYmmdd_HHMMSS.{ext}`
pub fn default_export_path(dir: &Path, format: OutputFormat, now: NaiveDateTime) -> PathBuf {
    dir.join(format!(
        "crawled_data_{}.{}",
        now.format("%Y%m%d_%H%M%S"),
        format.extension()
    ))
}

/// Flattens a report into one CSV-friendly record
///
/// Custom selector fields follow the fixed columns, with multiple matches
/// joined by `"; "`.
pub fn flatten_report(report: &ScrapeReport) -> Map<String, Value> {
    let mut record = Map::new();

    record.insert("url".into(), Value::from(report.url.clone()));
    record.insert("status".into(), serde_json::to_value(report.status).unwrap_or(Value::Null));
    record.insert("scraped_at".into(), Value::from(report.scraped_at.to_rfc3339()));

    let data = report.data.as_ref();
    record.insert(
        "title".into(),
        data.map(|d| Value::from(d.metadata.title.clone())).unwrap_or(Value::Null),
    );
    record.insert(
        "description".into(),
        data.map(|d| Value::from(d.metadata.description.clone())).unwrap_or(Value::Null),
    );
    record.insert(
        "word_count".into(),
        data.map(|d| Value::from(d.article.word_count)).unwrap_or(Value::Null),
    );
    record.insert(
        "error".into(),
        report.error.clone().map(Value::from).unwrap_or(Value::Null),
    );

    if let Some(custom) = &report.custom {
        for (name, field) in custom {
            let value = if field.is_null() {
                Value::Null
            } else {
                Value::from(field.to_text())
            };
            record.insert(name.clone(), value);
        }
    }

    record
}
