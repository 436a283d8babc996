//! Drop CSV rows whose URL column contains a blocked substring
//! (social and messaging hosts by default).

use std::fs;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use tracing::{debug, warn};

use crate::error::PrepError;
use crate::settings::FilterSettings;

#[derive(Debug)]
pub struct FilterStats {
    pub kept: usize,
    pub dropped: usize,
}

/// Case-insensitive substring check against the block-list. No URL parsing.
pub fn should_keep(url: &str, blocked: &[String]) -> bool {
    let lower = url.to_lowercase();
    !blocked
        .iter()
        .any(|bad| lower.contains(bad.to_lowercase().as_str()))
}

pub fn run(settings: &FilterSettings) -> Result<FilterStats> {
    let input = &settings.input;
    if !input.exists() {
        return Err(PrepError::MissingInput(input.clone()).into());
    }

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_path(input)
        .with_context(|| format!("Failed to open {}", input.display()))?;
    let headers = reader.headers()?.clone();
    if headers.iter().all(str::is_empty) {
        return Err(PrepError::NoDataRows(input.clone()).into());
    }
    let url_idx = headers.iter().position(|h| h == settings.url_column);
    if url_idx.is_none() {
        warn!(
            column = %settings.url_column,
            path = %input.display(),
            "URL column not found, every row will be kept"
        );
    }

    let mut kept: Vec<StringRecord> = Vec::new();
    let mut dropped = 0;
    for record in reader.records() {
        let record = record.with_context(|| format!("Failed to parse {}", input.display()))?;
        let url = url_idx.and_then(|i| record.get(i)).unwrap_or("");
        if should_keep(url, &settings.blocked) {
            kept.push(record);
        } else {
            debug!(url, "blocked");
            dropped += 1;
        }
    }

    let output = &settings.output;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    // ragged rows are written back with their own width
    let mut writer = WriterBuilder::new()
        .flexible(true)
        .from_path(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    writer.write_record(&headers)?;
    for record in &kept {
        writer.write_record(record)?;
    }
    writer.flush()?;

    Ok(FilterStats {
        kept: kept.len(),
        dropped,
    })
}
