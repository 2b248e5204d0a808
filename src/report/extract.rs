//! Category/topic statistics extraction from raw analysis markdown

use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Frequency counts extracted from one raw analysis file.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedData {
    pub categories: BTreeMap<String, u64>,
    pub topics: BTreeMap<String, u64>,
}

/// Parse a raw analysis markdown file and write the counts as pretty JSON
/// named `<date>_extracted_data.json` in `output_dir`.
pub fn extract_data(markdown_path: &Path, output_dir: &Path) -> Result<PathBuf> {
    tracing::info!("Starting data extraction from {}", markdown_path.display());

    if !markdown_path.exists() {
        anyhow::bail!(
            "Markdown analysis file not found at {}",
            markdown_path.display()
        );
    }

    let content = std::fs::read_to_string(markdown_path)
        .with_context(|| format!("Failed to read {}", markdown_path.display()))?;
    let data = parse_markdown(&content);

    tracing::info!(
        "Found {} unique categories and {} unique topics",
        data.categories.len(),
        data.topics.len()
    );

    let date = markdown_path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(date_prefix)
        .map(str::to_string)
        .unwrap_or_else(|| {
            tracing::warn!("Could not extract date from filename, using current date");
            Local::now().format("%Y-%m-%d").to_string()
        });

    let json_path = output_dir.join(format!("{date}_extracted_data.json"));
    std::fs::create_dir_all(output_dir)?;
    std::fs::write(&json_path, serde_json::to_string_pretty(&data)?)
        .with_context(|| format!("Failed to write {}", json_path.display()))?;

    tracing::info!("Extracted data saved to {}", json_path.display());
    Ok(json_path)
}

/// Count `Category:` values and comma-separated `Topics:` values.
pub fn parse_markdown(content: &str) -> ExtractedData {
    let mut data = ExtractedData::default();

    for line in content.lines() {
        if let Some(category) = key_value(line, "Category:") {
            *data.categories.entry(category.to_string()).or_insert(0) += 1;
        } else if let Some(topics) = key_value(line, "Topics:") {
            for topic in topics.split(',') {
                let topic = topic.trim();
                if !topic.is_empty() {
                    *data.topics.entry(topic.to_string()).or_insert(0) += 1;
                }
            }
        }
    }

    data
}

/// All non-empty `Description:` values, in file order.
pub fn descriptions(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| key_value(line, "Description:"))
        .map(str::to_string)
        .collect()
}

/// Load previously extracted data from its JSON file.
pub fn load(json_path: &Path) -> Result<ExtractedData> {
    if !json_path.exists() {
        anyhow::bail!("Extracted data file not found at {}", json_path.display());
    }
    let content = std::fs::read_to_string(json_path)
        .with_context(|| format!("Failed to read {}", json_path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", json_path.display()))
}

/// Case-insensitive `Key: value` line match; returns the trimmed, non-empty value.
fn key_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    // byte-wise compare; slicing the str by key.len() could land inside a
    // multibyte character on non-matching lines
    if line.len() < key.len()
        || !line.is_char_boundary(key.len())
        || !line.as_bytes()[..key.len()].eq_ignore_ascii_case(key.as_bytes())
    {
        return None;
    }
    let value = line[key.len()..].trim();
    (!value.is_empty()).then_some(value)
}

/// Leading `YYYY-MM-DD` prefix of a filename, if present.
pub fn date_prefix(filename: &str) -> Option<&str> {
    let candidate = filename.get(..10)?;
    let bytes = candidate.as_bytes();
    let digits_at = |range: std::ops::Range<usize>| {
        bytes[range].iter().all(|b| b.is_ascii_digit())
    };
    (digits_at(0..4) && bytes[4] == b'-' && digits_at(5..7) && bytes[7] == b'-' && digits_at(8..10))
        .then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = "\
Title: Rust Book\n\
URL: https://example.com/1\n\
Description: A guide to ownership.\n\
Category: Programming\n\
Topics: Rust, Ownership\n\
\n\
---\n\
\n\
Title: Python News\n\
URL: https://example.com/2\n\
Description: Release notes for Python.\n\
category: Programming\n\
Topics: Python, Rust\n\
\n\
---\n";

    #[test]
    fn parse_counts_categories_and_topics() {
        let data = parse_markdown(SAMPLE);

        assert_eq!(data.categories.get("Programming"), Some(&2));
        assert_eq!(data.topics.get("Rust"), Some(&2));
        assert_eq!(data.topics.get("Python"), Some(&1));
        assert_eq!(data.topics.get("Ownership"), Some(&1));
    }

    #[test]
    fn parse_skips_multibyte_lines_without_panicking() {
        // continuation lines from multi-sentence descriptions can start with
        // non-ASCII text
        let data = parse_markdown("ééééé\nCategory: News\nTopics: Café, Münster\n");
        assert_eq!(data.categories.get("News"), Some(&1));
        assert_eq!(data.topics.get("Café"), Some(&1));
        assert_eq!(data.topics.get("Münster"), Some(&1));
    }

    #[test]
    fn parse_ignores_empty_values() {
        let data = parse_markdown("Category:\nTopics: , ,\n");
        assert!(data.categories.is_empty());
        assert!(data.topics.is_empty());
    }

    #[test]
    fn descriptions_are_collected_in_order() {
        let found = descriptions(SAMPLE);
        assert_eq!(
            found,
            vec!["A guide to ownership.", "Release notes for Python."]
        );
    }

    #[test]
    fn date_prefix_matches_iso_dates() {
        assert_eq!(
            date_prefix("2024-05-15_raw_analysis.md"),
            Some("2024-05-15")
        );
        assert_eq!(date_prefix("raw_analysis.md"), None);
        assert_eq!(date_prefix("2024_05_15.md"), None);
        assert_eq!(date_prefix("short"), None);
    }

    #[test]
    fn extract_writes_dated_json() {
        let tmp = tempdir().unwrap();
        let markdown_path = tmp.path().join("2024-05-15_raw_analysis.md");
        std::fs::write(&markdown_path, SAMPLE).unwrap();

        let json_path = extract_data(&markdown_path, tmp.path()).unwrap();
        assert!(json_path.ends_with("2024-05-15_extracted_data.json"));

        let reloaded = load(&json_path).unwrap();
        assert_eq!(reloaded, parse_markdown(SAMPLE));
    }

    #[test]
    fn extract_rejects_missing_file() {
        let tmp = tempdir().unwrap();
        let err = extract_data(&tmp.path().join("missing.md"), tmp.path()).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
