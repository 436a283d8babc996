//! File helpers shared by the subcommands: URL list reading, tolerant JSON
//! loading, and pretty JSON output.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

use crate::error::PrepError;

/// Read a URL list: split on `\n` / `\r\n`, drop blank lines, trim the rest.
/// The header line is returned as the first element.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(PrepError::MissingInput(path.to_path_buf()).into());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(split_lines(&raw))
}

pub fn split_lines(raw: &str) -> Vec<String> {
    raw.split('\n')
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Outcome of reading one JSON file whose failure should not stop the batch.
#[derive(Debug)]
pub enum JsonLoad {
    Missing,
    Unreadable(std::io::Error),
    Empty,
    Invalid(serde_json::Error),
    Parsed(Value),
}

pub fn load_json(path: &Path) -> JsonLoad {
    if !path.exists() {
        return JsonLoad::Missing;
    }
    let raw = match fs::read_to_string(path) {
        Ok(r) => r,
        Err(e) => return JsonLoad::Unreadable(e),
    };
    if raw.trim().is_empty() {
        return JsonLoad::Empty;
    }
    match serde_json::from_str(&raw) {
        Ok(v) => JsonLoad::Parsed(v),
        Err(e) => JsonLoad::Invalid(e),
    }
}

/// Load a required JSON array; anything else aborts the run.
pub fn load_required_array(path: &Path) -> Result<Vec<Value>> {
    if !path.exists() {
        return Err(PrepError::MissingInput(path.to_path_buf()).into());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let data: Value = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse JSON in {}", path.display()))?;
    match data {
        Value::Array(items) => Ok(items),
        _ => Err(PrepError::NotAnArray(path.to_path_buf()).into()),
    }
}

/// Write `value` as 2-space indented JSON, creating parent directories.
pub fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let body = serde_json::to_string_pretty(value)?;
    write_text(path, &body)
}

pub fn write_text(path: &Path, body: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, body).with_context(|| format!("Failed to write {}", path.display()))
}
