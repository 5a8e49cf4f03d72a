//! Loaders turning feed exports (JSON or CSV) into [`SourceBatch`]es.

use super::pipeline::SourceBatch;
use super::property::RawListing;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

const UNLABELLED_SOURCE: &str = "generic";

#[derive(Debug, Error)]
pub enum ListingInputError {
    #[error("failed to read listing export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid listing JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid listing CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("unsupported listing export '{0}': expected .json or .csv")]
    UnsupportedFormat(String),
    #[error("unexpected listing payload: {0}")]
    InvalidShape(String),
}

/// Accepts `[{..}, ..]` (grouped by each record's own `source`, falling back to
/// `source_hint`) or `{"feed": [{..}, ..], ..}`.
pub fn load_json<R: Read>(reader: R, source_hint: &str) -> Result<Vec<SourceBatch>, ListingInputError> {
    let payload: Value = serde_json::from_reader(reader)?;
    batches_from_value(payload, source_hint)
}

pub fn batches_from_value(
    payload: Value,
    source_hint: &str,
) -> Result<Vec<SourceBatch>, ListingInputError> {
    match payload {
        Value::Array(items) => {
            let mut grouped: Vec<SourceBatch> = Vec::new();
            for (index, item) in items.into_iter().enumerate() {
                let record = into_record(item, index)?;
                let source = record
                    .get("source")
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|source| !source.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| fallback_source(source_hint));

                match grouped.iter_mut().find(|batch| batch.source == source) {
                    Some(batch) => batch.records.push(record),
                    None => grouped.push(SourceBatch::new(source, vec![record])),
                }
            }
            Ok(grouped)
        }
        Value::Object(feeds) => feeds
            .into_iter()
            .map(|(source, records)| match records {
                Value::Array(items) => items
                    .into_iter()
                    .enumerate()
                    .map(|(index, item)| into_record(item, index))
                    .collect::<Result<Vec<_>, _>>()
                    .map(|records| SourceBatch::new(source, records)),
                other => Err(ListingInputError::InvalidShape(format!(
                    "feed '{source}' must be an array of listings, found {}",
                    kind_of(&other)
                ))),
            })
            .collect(),
        other => Err(ListingInputError::InvalidShape(format!(
            "expected an array or an object of feeds, found {}",
            kind_of(&other)
        ))),
    }
}

/// Header row names the fields; empty cells are omitted so the normalizer
/// treats them as missing.
pub fn load_csv<R: Read>(reader: R, source: &str) -> Result<SourceBatch, ListingInputError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let mut record = RawListing::new();
        for (header, cell) in headers.iter().zip(row.iter()) {
            let header = header.trim_start_matches('\u{feff}');
            if header.is_empty() || cell.is_empty() {
                continue;
            }
            record.insert(header.to_string(), Value::String(cell.to_string()));
        }
        records.push(record);
    }

    Ok(SourceBatch::new(fallback_source(source), records))
}

pub fn load_path<P: AsRef<Path>>(
    path: P,
    source_hint: &str,
) -> Result<Vec<SourceBatch>, ListingInputError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("json") => load_json(std::fs::File::open(path)?, source_hint),
        Some("csv") => {
            let source = if source_hint.trim().is_empty() {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .unwrap_or(UNLABELLED_SOURCE)
                    .to_string()
            } else {
                source_hint.to_string()
            };
            Ok(vec![load_csv(std::fs::File::open(path)?, &source)?])
        }
        _ => Err(ListingInputError::UnsupportedFormat(
            path.display().to_string(),
        )),
    }
}

/// Record counts per feed, for logging.
pub fn batch_sizes(batches: &[SourceBatch]) -> BTreeMap<&str, usize> {
    let mut sizes = BTreeMap::new();
    for batch in batches {
        *sizes.entry(batch.source.as_str()).or_default() += batch.records.len();
    }
    sizes
}

fn into_record(item: Value, index: usize) -> Result<RawListing, ListingInputError> {
    match item {
        Value::Object(record) => Ok(record),
        other => Err(ListingInputError::InvalidShape(format!(
            "listing #{index} must be an object, found {}",
            kind_of(&other)
        ))),
    }
}

fn fallback_source(source_hint: &str) -> String {
    let hint = source_hint.trim();
    if hint.is_empty() {
        UNLABELLED_SOURCE.to_string()
    } else {
        hint.to_string()
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
