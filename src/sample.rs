//! Keep one URL per hostname: the first one seen.

use std::collections::HashSet;

use anyhow::Result;
use url::Url;

use crate::error::PrepError;
use crate::io;
use crate::settings::SampleSettings;

#[derive(Debug)]
pub struct SampleStats {
    pub unique: usize,
    pub skipped: usize,
}

/// Lowercased hostname, or None when the line is not an absolute URL with a host.
pub fn host_of(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;
    let host = url.host_str()?;
    if host.is_empty() {
        None
    } else {
        Some(host.to_lowercase())
    }
}

/// First URL per distinct host, in first-occurrence order.
pub fn first_per_host<'a, I>(urls: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    urls.into_iter()
        .filter(|u| match host_of(u) {
            Some(host) => seen.insert(host),
            None => false,
        })
        .collect()
}

pub fn run(settings: &SampleSettings) -> Result<SampleStats> {
    let lines = io::read_lines(&settings.input)?;
    if lines.len() <= 1 {
        return Err(PrepError::NoDataRows(settings.input.clone()).into());
    }

    let header = lines[0].as_str();
    let data = &lines[1..];
    let unique = first_per_host(data.iter().map(String::as_str));

    let mut out = Vec::with_capacity(unique.len() + 1);
    out.push(header);
    out.extend(unique.iter().copied());
    io::write_text(&settings.output, &out.join("\n"))?;

    Ok(SampleStats {
        unique: unique.len(),
        skipped: data.len() - unique.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn host_is_lowercased() {
        assert_eq!(host_of("https://Jobs.Example.COM/a"), Some("jobs.example.com".into()));
        assert_eq!(host_of("not a url"), None);
        assert_eq!(host_of("mailto:someone@example.com"), None);
    }

    #[test]
    fn keeps_first_url_per_host() {
        let urls = [
            "https://a.com/1",
            "https://b.com/1",
            "garbage",
            "https://A.com/2",
            "http://b.com/3",
            "https://c.com/",
        ];
        let kept = first_per_host(urls.iter().copied());
        assert_eq!(kept, vec!["https://a.com/1", "https://b.com/1", "https://c.com/"]);

        let hosts: HashSet<String> = kept.iter().filter_map(|u| host_of(u)).collect();
        assert_eq!(hosts.len(), kept.len());
    }

    #[test]
    fn run_writes_header_and_unique_urls() {
        let dir = tempdir().expect("tempdir");
        let input = dir.path().join("in.csv");
        let output = dir.path().join("out.csv");
        fs::write(
            &input,
            "job_url\r\nhttps://a.com/1\r\n\r\nhttps://a.com/2\r\n::bad::\r\nhttps://b.com/9\r\n",
        )
        .unwrap();

        let stats = run(&SampleSettings { input, output: output.clone() }).unwrap();
        assert_eq!(stats.unique, 2);
        assert_eq!(stats.skipped, 2);
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "job_url\nhttps://a.com/1\nhttps://b.com/9"
        );
    }

    #[test]
    fn header_only_input_is_fatal() {
        let dir = tempdir().expect("tempdir");
        let input = dir.path().join("in.csv");
        fs::write(&input, "job_url\n\n").unwrap();
        let err = run(&SampleSettings {
            input,
            output: dir.path().join("out.csv"),
        })
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PrepError>(),
            Some(PrepError::NoDataRows(_))
        ));
    }
}
