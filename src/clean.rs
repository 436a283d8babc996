//! Separate failed-fetch records from real metadata across a directory of
//! JSON array files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::error::PrepError;
use crate::io::{self, JsonLoad};
use crate::settings::CleanSettings;

#[derive(Debug)]
pub struct CleanStats {
    pub normal: usize,
    pub errors: usize,
    pub files_processed: usize,
    pub files_skipped: usize,
    pub write_failures: usize,
}

#[derive(Debug, Default)]
pub struct Buckets {
    pub normal: Vec<Value>,
    pub errors: Vec<Value>,
}

impl Buckets {
    pub fn route(&mut self, record: Value, prefix: &str) {
        if is_error_record(&record, prefix) {
            self.errors.push(record);
        } else {
            self.normal.push(record);
        }
    }
}

/// An object whose `description` is a string starting with `prefix`.
pub fn is_error_record(record: &Value, prefix: &str) -> bool {
    record
        .as_object()
        .and_then(|obj| obj.get("description"))
        .and_then(Value::as_str)
        .is_some_and(|desc| desc.starts_with(prefix))
}

/// `.json` entries of `dir` (extension compared case-insensitively), sorted by name.
pub fn json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to list {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.to_lowercase().ends_with(".json"))
        })
        .collect();
    files.sort();
    Ok(files)
}

pub fn run(settings: &CleanSettings) -> Result<CleanStats> {
    let dir = &settings.input_dir;
    if !dir.is_dir() {
        return Err(PrepError::MissingInputDir(dir.clone()).into());
    }
    let files = json_files(dir)?;
    if files.is_empty() {
        return Err(PrepError::NoJsonFiles(dir.clone()).into());
    }

    let mut buckets = Buckets::default();
    let mut processed = 0;
    let mut skipped = 0;

    for path in &files {
        info!(path = %path.display(), "Processing");
        let items = match io::load_json(path) {
            JsonLoad::Parsed(Value::Array(items)) => items,
            JsonLoad::Parsed(_) => {
                warn!(path = %path.display(), "Top-level JSON is not an array, skipping");
                skipped += 1;
                continue;
            }
            JsonLoad::Empty => {
                warn!(path = %path.display(), "File is empty or whitespace only, skipping");
                skipped += 1;
                continue;
            }
            JsonLoad::Invalid(e) => {
                error!(path = %path.display(), error = %e, "Failed to parse JSON");
                skipped += 1;
                continue;
            }
            JsonLoad::Unreadable(e) => {
                error!(path = %path.display(), error = %e, "Failed to read file");
                skipped += 1;
                continue;
            }
            JsonLoad::Missing => {
                error!(path = %path.display(), "File vanished before it could be read");
                skipped += 1;
                continue;
            }
        };

        for record in items {
            buckets.route(record, &settings.error_prefix);
        }
        processed += 1;
    }

    let mut write_failures = 0;
    for (path, items) in [
        (&settings.normal_output, &buckets.normal),
        (&settings.error_output, &buckets.errors),
    ] {
        match io::write_json_pretty(path, items) {
            Ok(()) => info!(path = %path.display(), records = items.len(), "Wrote"),
            Err(e) => {
                error!(path = %path.display(), error = ?e, "Write failed");
                write_failures += 1;
            }
        }
    }

    Ok(CleanStats {
        normal: buckets.normal.len(),
        errors: buckets.errors.len(),
        files_processed: processed,
        files_skipped: skipped,
        write_failures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    const PREFIX: &str = "ERROR: 406 Client Error:";

    #[test]
    fn classifies_by_description_prefix() {
        assert!(is_error_record(
            &json!({"id": 1, "description": "ERROR: 406 Client Error: Not Acceptable"}),
            PREFIX
        ));
        assert!(!is_error_record(&json!({"description": "ERROR: 500 Server Error"}), PREFIX));
        assert!(!is_error_record(&json!({"description": null}), PREFIX));
        assert!(!is_error_record(&json!({"description": 406}), PREFIX));
        assert!(!is_error_record(&json!({"id": 2}), PREFIX));
        assert!(!is_error_record(&json!("ERROR: 406 Client Error: x"), PREFIX));
    }

    #[test]
    fn partitions_across_files_and_skips_bad_ones() {
        let dir = tempdir().expect("tempdir");
        let input = dir.path().join("output_jsons");
        fs::create_dir(&input).unwrap();
        fs::write(
            input.join("part_1.json"),
            r#"[
                {"id": 1, "description": "Build things"},
                {"id": 2, "description": "ERROR: 406 Client Error: Not Acceptable"},
                {"id": 3, "description": null}
            ]"#,
        )
        .unwrap();
        fs::write(
            input.join("PART_2.JSON"),
            r#"[{"id": 4, "description": "ERROR: 406 Client Error: again"}, {"id": 5}]"#,
        )
        .unwrap();
        fs::write(input.join("part_3.json"), r#"{"id": 6}"#).unwrap();
        fs::write(input.join("part_4.json"), "").unwrap();
        fs::write(input.join("part_5.json"), "[nope").unwrap();
        fs::write(input.join("notes.txt"), "[]").unwrap();

        let settings = CleanSettings {
            input_dir: input,
            normal_output: dir.path().join("final_output.json"),
            error_output: dir.path().join("final_output_redo.json"),
            ..CleanSettings::default()
        };
        let stats = run(&settings).unwrap();
        assert_eq!(stats.files_processed, 2);
        assert_eq!(stats.files_skipped, 3);
        assert_eq!(stats.write_failures, 0);

        let normal: Value =
            serde_json::from_str(&fs::read_to_string(&settings.normal_output).unwrap()).unwrap();
        let errors: Value =
            serde_json::from_str(&fs::read_to_string(&settings.error_output).unwrap()).unwrap();
        // "PART_2.JSON" sorts before "part_1.json"
        assert_eq!(
            normal,
            json!([{"id": 5}, {"id": 1, "description": "Build things"}, {"id": 3, "description": null}])
        );
        assert_eq!(errors[0]["id"], 4);
        assert_eq!(errors[1]["id"], 2);
    }

    #[test]
    fn failed_write_is_counted_and_other_output_still_written() {
        let dir = tempdir().expect("tempdir");
        let input = dir.path().join("output_jsons");
        fs::create_dir(&input).unwrap();
        fs::write(
            input.join("part_1.json"),
            r#"[{"id": 1}, {"id": 2, "description": "ERROR: 406 Client Error: x"}]"#,
        )
        .unwrap();
        // a directory where the normal output file should go
        let blocked = dir.path().join("final_output.json");
        fs::create_dir(&blocked).unwrap();

        let settings = CleanSettings {
            input_dir: input,
            normal_output: blocked.clone(),
            error_output: dir.path().join("final_output_redo.json"),
            ..CleanSettings::default()
        };
        let stats = run(&settings).unwrap();
        assert_eq!(stats.write_failures, 1);
        assert_eq!(stats.normal, 1);
        assert_eq!(stats.errors, 1);
        assert!(blocked.is_dir());

        let errors: Value =
            serde_json::from_str(&fs::read_to_string(&settings.error_output).unwrap()).unwrap();
        assert_eq!(errors[0]["id"], 2);
    }

    #[test]
    fn missing_dir_and_empty_dir_are_fatal() {
        let dir = tempdir().expect("tempdir");
        let mut settings = CleanSettings {
            input_dir: dir.path().join("absent"),
            normal_output: dir.path().join("n.json"),
            error_output: dir.path().join("e.json"),
            ..CleanSettings::default()
        };
        let err = run(&settings).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PrepError>(),
            Some(PrepError::MissingInputDir(_))
        ));

        settings.input_dir = dir.path().to_path_buf();
        let err = run(&settings).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PrepError>(),
            Some(PrepError::NoJsonFiles(_))
        ));
        assert!(!settings.normal_output.exists());
    }
}
