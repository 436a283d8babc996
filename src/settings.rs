//! Layered settings: built-in defaults, an optional TOML file, then
//! `JOBPREP_*` environment variables (`__` separates nested keys, e.g.
//! `JOBPREP_SPLIT__PARTS=4`). CLI flags are applied on top in `main`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "jobprep.toml";
const ENV_PREFIX: &str = "JOBPREP";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub filter: FilterSettings,
    pub sample: SampleSettings,
    pub titles: TitleSettings,
    pub combine: CombineSettings,
    pub clean: CleanSettings,
    pub split: SplitSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    pub input: PathBuf,
    pub output: PathBuf,
    pub url_column: String,
    /// Case-insensitive substrings; a row whose URL contains any of them is dropped.
    pub blocked: Vec<String>,
}

impl Default for FilterSettings {
    fn default() -> Self {
        FilterSettings {
            input: PathBuf::from("URLS_So_Far.csv"),
            output: PathBuf::from("URLS_So_Far_cleaned.csv"),
            url_column: "job_url".to_string(),
            blocked: vec!["linkedin".to_string(), "wa.me".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SampleSettings {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Default for SampleSettings {
    fn default() -> Self {
        SampleSettings {
            input: PathBuf::from("URLS_So_Far_cleaned.csv"),
            output: PathBuf::from("one_link_per_domain.csv"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TitleSettings {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Path segments that precede a title slug. Matched case-sensitively.
    pub markers: Vec<String>,
    /// Lowercase substrings that mark a URL as already carrying a resolved id.
    pub excluded_tokens: Vec<String>,
    /// Number emitted records 1..=k instead of by source line.
    pub dense_ids: bool,
}

impl Default for TitleSettings {
    fn default() -> Self {
        TitleSettings {
            input: PathBuf::from("URLS_So_Far_cleaned_2.csv"),
            output: PathBuf::from("job_titles.json"),
            markers: vec![
                "FolderDetail".to_string(),
                "JobDetail".to_string(),
                "PipelineDetail".to_string(),
            ],
            excluded_tokens: vec!["pipelineid".to_string(), "jobid".to_string()],
            dense_ids: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CombineSettings {
    pub input_dir: PathBuf,
    /// File names under `input_dir`, combined in this order.
    pub files: Vec<String>,
    pub output: PathBuf,
}

impl Default for CombineSettings {
    fn default() -> Self {
        let mut files: Vec<String> = (1..=10)
            .map(|i| format!("jobs_with_metadata_part_{}.json", i))
            .collect();
        files.push("final_main_output_1.json".to_string());

        CombineSettings {
            input_dir: PathBuf::from("final_metadata/output_jsons"),
            files,
            output: PathBuf::from("main_output.json"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CleanSettings {
    pub input_dir: PathBuf,
    pub normal_output: PathBuf,
    pub error_output: PathBuf,
    pub error_prefix: String,
}

impl Default for CleanSettings {
    fn default() -> Self {
        CleanSettings {
            input_dir: PathBuf::from("final_metadata/output_jsons"),
            normal_output: PathBuf::from("final_metadata/final_output.json"),
            error_output: PathBuf::from("final_metadata/final_output_redo.json"),
            error_prefix: "ERROR: 406 Client Error:".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SplitSettings {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub file_prefix: String,
    pub parts: usize,
}

impl Default for SplitSettings {
    fn default() -> Self {
        SplitSettings {
            input: PathBuf::from("final_metadata/final_output_redo.json"),
            output_dir: PathBuf::from("final_metadata/split_job_titles"),
            file_prefix: "job_titles_with_title_part_".to_string(),
            parts: 10,
        }
    }
}

/// Load settings. An explicitly named config file must exist; the default
/// `jobprep.toml` is optional.
pub fn load(explicit: Option<&Path>) -> Result<Settings> {
    let file = match explicit {
        Some(p) => File::from(p.to_path_buf()).required(true),
        None => File::from(PathBuf::from(DEFAULT_CONFIG_FILE)).required(false),
    };

    let settings = Config::builder()
        .add_source(file)
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?
        .try_deserialize::<Settings>()
        .context("Invalid configuration")?;

    Ok(settings)
}
