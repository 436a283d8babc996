//! Divide one JSON array into N contiguous chunks whose sizes differ by at
//! most one; the first `total % N` chunks carry the extra element.

use std::ops::Range;

use anyhow::Result;
use tracing::{info, warn};

use crate::error::PrepError;
use crate::io;
use crate::settings::SplitSettings;

#[derive(Debug)]
pub struct SplitStats {
    pub total: usize,
    pub files: usize,
}

/// Index ranges for `parts` chunks over `total` items. `parts` must be non-zero.
pub fn chunk_bounds(total: usize, parts: usize) -> Vec<Range<usize>> {
    let base = total / parts;
    let remainder = total % parts;

    let mut start = 0;
    (0..parts)
        .map(|i| {
            let size = base + usize::from(i < remainder);
            let range = start..start + size;
            start += size;
            range
        })
        .collect()
}

pub fn split_even<T>(items: &[T], parts: usize) -> Vec<&[T]> {
    chunk_bounds(items.len(), parts)
        .into_iter()
        .map(|r| &items[r])
        .collect()
}

pub fn run(settings: &SplitSettings) -> Result<SplitStats> {
    if settings.parts == 0 {
        return Err(PrepError::ZeroParts.into());
    }
    let data = io::load_required_array(&settings.input)?;
    let total = data.len();
    info!(total, "Total objects");

    let mut start = 0;
    for (i, chunk) in split_even(&data, settings.parts).into_iter().enumerate() {
        let path = settings
            .output_dir
            .join(format!("{}{}.json", settings.file_prefix, i + 1));
        io::write_json_pretty(&path, chunk)?;

        if chunk.is_empty() {
            info!(path = %path.display(), "Wrote 0 objects");
        } else {
            info!(
                path = %path.display(),
                "Wrote {} objects (indices {}-{})",
                chunk.len(),
                start,
                start + chunk.len() - 1
            );
        }
        start += chunk.len();
    }

    if start != total {
        warn!(used = start, total, "Not all objects were used");
    }

    Ok(SplitStats {
        total,
        files: settings.parts,
    })
}
