// 💾 CSV Export
// Writes the three result tables, index column(s) first.
//
// Headers are written explicitly so an empty table still produces a file
// with its header line. Each written file is hashed (SHA-256) so repeated
// runs can be compared for byte-identical output.

use crate::config::{
    PipelineConfig, COUNT_MISSING_FILE, OLDEST_BUSINESS_CONTINENT_FILE,
    OLDEST_BY_CONTINENT_CATEGORY_FILE,
};
use crate::entities::{MissingCount, OldestBusiness, OldestByCategory};
use crate::pipeline::PipelineOutput;
use anyhow::{Context, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

// ============================================================================
// RESULT TABLE TRAIT
// ============================================================================

/// A row type that is exported as its own CSV file.
pub trait ResultTable: Serialize {
    const FILE_NAME: &'static str;

    /// Column names, in field order.
    const HEADERS: &'static [&'static str];
}

impl ResultTable for OldestBusiness {
    const FILE_NAME: &'static str = OLDEST_BUSINESS_CONTINENT_FILE;
    const HEADERS: &'static [&'static str] = &["business", "year_founded", "country", "continent"];
}

impl ResultTable for MissingCount {
    const FILE_NAME: &'static str = COUNT_MISSING_FILE;
    const HEADERS: &'static [&'static str] = &["continent", "countries_without_businesses"];
}

impl ResultTable for OldestByCategory {
    const FILE_NAME: &'static str = OLDEST_BY_CONTINENT_CATEGORY_FILE;
    const HEADERS: &'static [&'static str] = &["continent", "category", "year_founded"];
}

// ============================================================================
// WRITING
// ============================================================================

/// One exported file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub path: PathBuf,
    pub rows: usize,
    /// Hex SHA-256 of the file contents
    pub sha256: String,
}

/// Serialize `rows` to CSV bytes, header first.
pub fn to_csv_bytes<T: ResultTable>(rows: &[T]) -> Result<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    wtr.write_record(T::HEADERS)
        .with_context(|| format!("Failed to write header for {}", T::FILE_NAME))?;

    for row in rows {
        wtr.serialize(row)
            .with_context(|| format!("Failed to serialize row for {}", T::FILE_NAME))?;
    }

    wtr.into_inner()
        .with_context(|| format!("Failed to flush {}", T::FILE_NAME))
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Write one result table into `output_dir`.
pub fn write_table<T: ResultTable>(output_dir: &Path, rows: &[T]) -> Result<ExportedFile> {
    let path = output_dir.join(T::FILE_NAME);
    let bytes = to_csv_bytes(rows)?;

    fs::write(&path, &bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(path = %path.display(), rows = rows.len(), "exported table");

    Ok(ExportedFile {
        path,
        rows: rows.len(),
        sha256: sha256_hex(&bytes),
    })
}

/// Write all three result tables into `config.output_dir`.
pub fn export_all(output: &PipelineOutput, config: &PipelineConfig) -> Result<Vec<ExportedFile>> {
    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("Failed to create output directory {}", config.output_dir.display())
    })?;

    Ok(vec![
        write_table(&config.output_dir, &output.oldest_business_continent)?,
        write_table(&config.output_dir, &output.count_missing)?,
        write_table(&config.output_dir, &output.oldest_by_continent_category)?,
    ])
}
