//! Job title extraction from URL paths of the form
//! `.../<Marker>/<Title-Slug>/...`.

use std::sync::OnceLock;

use anyhow::Result;
use regex::Regex;
use serde::Serialize;
use url::Url;

use crate::io;
use crate::settings::TitleSettings;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobTitle {
    pub id: usize,
    pub application_url: String,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdMode {
    /// 1-based position among the non-blank data lines, matched or not.
    Line,
    /// 1..=k over emitted records only.
    Dense,
}

#[derive(Debug)]
pub struct TitleStats {
    pub written: usize,
    pub skipped: usize,
}

pub struct TitleExtractor {
    markers: Vec<String>,
    excluded: Vec<String>,
}

impl TitleExtractor {
    pub fn new(markers: Vec<String>, excluded_tokens: Vec<String>) -> Self {
        TitleExtractor {
            markers,
            excluded: excluded_tokens.iter().map(|t| t.to_lowercase()).collect(),
        }
    }

    pub fn from_settings(settings: &TitleSettings) -> Self {
        Self::new(settings.markers.clone(), settings.excluded_tokens.clone())
    }

    /// Title for a single URL, or None when the URL does not carry one.
    pub fn extract(&self, raw: &str) -> Option<String> {
        let url = Url::parse(raw).ok()?;

        let lower = raw.to_lowercase();
        if self.excluded.iter().any(|t| lower.contains(t.as_str())) {
            return None;
        }

        let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
        let marker_idx = segments
            .iter()
            .position(|s| self.markers.iter().any(|m| m.as_str() == *s))?;
        let slug = segments.get(marker_idx + 1)?;

        let decoded = urlencoding::decode(slug).ok()?;
        let title = normalize_slug(&decoded);
        if title.is_empty() {
            None
        } else {
            Some(title)
        }
    }

    pub fn extract_records<'a, I>(&self, urls: I, mode: IdMode) -> Vec<JobTitle>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut records = Vec::new();
        for (idx, line) in urls.into_iter().enumerate() {
            let application_url = line.trim();
            if application_url.is_empty() {
                continue;
            }
            let Some(title) = self.extract(application_url) else {
                continue;
            };
            let id = match mode {
                IdMode::Line => idx + 1,
                IdMode::Dense => records.len() + 1,
            };
            records.push(JobTitle {
                id,
                application_url: application_url.to_string(),
                title,
            });
        }
        records
    }
}

/// Hyphens to spaces, whitespace runs collapsed, ends trimmed.
pub fn normalize_slug(slug: &str) -> String {
    static WS: OnceLock<Regex> = OnceLock::new();
    let re = WS.get_or_init(|| Regex::new(r"\s+").unwrap());
    let spaced = slug.replace('-', " ");
    re.replace_all(&spaced, " ").trim().to_string()
}

pub fn run(settings: &TitleSettings) -> Result<TitleStats> {
    let lines = io::read_lines(&settings.input)?;
    // first line is the header
    let data = lines.get(1..).unwrap_or_default();

    let mode = if settings.dense_ids {
        IdMode::Dense
    } else {
        IdMode::Line
    };
    let extractor = TitleExtractor::from_settings(settings);
    let records = extractor.extract_records(data.iter().map(String::as_str), mode);

    io::write_json_pretty(&settings.output, &records)?;

    Ok(TitleStats {
        written: records.len(),
        skipped: data.len() - records.len(),
    })
}
