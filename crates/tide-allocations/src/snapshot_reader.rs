//! Structural parsing of pipeline snapshot files.
//!
//! Allocation snapshots are CSV with a header row; a `.json` snapshot is read
//! as an array of row objects. Summary snapshots are arbitrary JSON documents.

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::allocation_record::RawAllocationRow;

const UTF8_BOM: char = '\u{feff}';

/// A snapshot file that could not be read or is structurally broken.
#[derive(Debug, Error)]
pub enum SnapshotParseError {
    #[error("failed to read snapshot {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed csv snapshot {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("malformed json snapshot {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("snapshot {} must contain {expected}", .path.display())]
    Shape {
        path: PathBuf,
        expected: &'static str,
    },
}

impl SnapshotParseError {
    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. }
            | Self::Csv { path, .. }
            | Self::Json { path, .. }
            | Self::Shape { path, .. } => path.as_path(),
        }
    }
}

fn is_json_path(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case("json"))
}

/// Parses CSV bytes into raw rows keyed by (trimmed) header name.
///
/// Rows whose field count differs from the header are a structural error.
pub fn parse_allocation_csv(raw: &[u8]) -> Result<Vec<RawAllocationRow>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .trim(csv::Trim::All)
        .from_reader(raw);
    let headers = reader
        .headers()?
        .iter()
        .map(|header| header.trim_start_matches(UTF8_BOM).trim().to_string())
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = RawAllocationRow::new();
        for (header, cell) in headers.iter().zip(record.iter()) {
            if header.is_empty() {
                continue;
            }
            row.insert(header.clone(), Value::String(cell.to_string()));
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Parses a JSON array of row objects. `Ok(None)` means the document is valid
/// JSON of the wrong shape.
pub fn parse_allocation_json(raw: &[u8]) -> Result<Option<Vec<RawAllocationRow>>, serde_json::Error> {
    let Value::Array(items) = serde_json::from_slice::<Value>(raw)? else {
        return Ok(None);
    };
    let mut rows = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Object(row) => rows.push(row),
            _ => return Ok(None),
        }
    }
    Ok(Some(rows))
}

pub fn read_allocation_snapshot(path: &Path) -> Result<Vec<RawAllocationRow>, SnapshotParseError> {
    let raw = std::fs::read(path).map_err(|source| SnapshotParseError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if is_json_path(path) {
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        return parse_allocation_json(&raw)
            .map_err(|source| SnapshotParseError::Json {
                path: path.to_path_buf(),
                source,
            })?
            .ok_or_else(|| SnapshotParseError::Shape {
                path: path.to_path_buf(),
                expected: "a json array of row objects",
            });
    }
    parse_allocation_csv(&raw).map_err(|source| SnapshotParseError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_summary_document(path: &Path) -> Result<Value, SnapshotParseError> {
    let raw = std::fs::read(path).map_err(|source| SnapshotParseError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice::<Value>(&raw).map_err(|source| SnapshotParseError::Json {
        path: path.to_path_buf(),
        source,
    })
}
