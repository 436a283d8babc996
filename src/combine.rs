//! Concatenate the per-part metadata files into one array, in a fixed order.

use anyhow::Result;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::io::{self, JsonLoad};
use crate::settings::CombineSettings;

#[derive(Debug)]
pub struct CombineStats {
    pub merged: usize,
    pub skipped: usize,
    pub records: usize,
}

pub fn run(settings: &CombineSettings) -> Result<CombineStats> {
    let mut combined: Vec<Value> = Vec::new();
    let mut merged = 0;
    let mut skipped = 0;

    for name in &settings.files {
        let path = settings.input_dir.join(name);
        match io::load_json(&path) {
            JsonLoad::Missing => {
                warn!(path = %path.display(), "Skipping missing file");
                skipped += 1;
            }
            JsonLoad::Empty => {
                warn!(path = %path.display(), "File is empty, skipping");
                skipped += 1;
            }
            JsonLoad::Unreadable(e) => {
                error!(path = %path.display(), error = %e, "Failed to read file");
                skipped += 1;
            }
            JsonLoad::Invalid(e) => {
                error!(path = %path.display(), error = %e, "Failed to parse JSON");
                skipped += 1;
            }
            JsonLoad::Parsed(Value::Array(items)) => {
                info!(path = %path.display(), records = items.len(), "Reading");
                combined.extend(items);
                merged += 1;
            }
            JsonLoad::Parsed(other) => {
                warn!(
                    path = %path.display(),
                    "File does not contain an array, wrapping as single item"
                );
                combined.push(other);
                merged += 1;
            }
        }
    }

    info!(path = %settings.output.display(), "Writing combined output");
    io::write_json_pretty(&settings.output, &combined)?;

    Ok(CombineStats {
        merged,
        skipped,
        records: combined.len(),
    })
}
