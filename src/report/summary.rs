//! LLM-generated browsing summary

use anyhow::{Context, Result};
use chrono::Local;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::llm::{prompts, LlmProvider};
use crate::report::extract::{self, date_prefix};

/// Generate a textual summary of browsing activity and write it next to the
/// extracted data as `<date>_browsing_summary.md`.
pub async fn generate_browsing_summary(
    settings: &Settings,
    provider: &dyn LlmProvider,
    markdown_path: &Path,
    json_path: &Path,
    output_dir: &Path,
) -> Result<PathBuf> {
    tracing::info!("Starting browsing summary generation");
    tracing::info!("Reading descriptions from {}", markdown_path.display());
    tracing::info!("Reading statistics from {}", json_path.display());

    if !markdown_path.exists() {
        anyhow::bail!(
            "Markdown analysis file not found at {}",
            markdown_path.display()
        );
    }

    let markdown = std::fs::read_to_string(markdown_path)
        .with_context(|| format!("Failed to read {}", markdown_path.display()))?;
    let descriptions = extract::descriptions(&markdown);
    let stats = extract::load(json_path)?;

    let top_categories = format_statistics(&stats.categories, settings.report.top_categories);
    let top_topics = format_statistics(&stats.topics, settings.report.top_topics);

    let sample_descriptions = if descriptions.is_empty() {
        tracing::warn!("No descriptions found; summary may be less specific");
        "N/A".to_string()
    } else {
        prompts::bullet_list(&descriptions[..descriptions.len().min(settings.report.sample_descriptions)])
    };
    if stats.categories.is_empty() {
        tracing::warn!("No category data found; summary may be less specific");
    }
    if stats.topics.is_empty() {
        tracing::warn!("No topic data found; summary may be less specific");
    }

    tracing::info!("Requesting browsing summary from LLM");
    let summary = provider
        .complete(prompts::browsing_summary_request(
            &top_categories,
            &top_topics,
            &sample_descriptions,
        ))
        .await
        .context("Browsing summary generation failed")?;
    let summary = summary.trim();
    if summary.is_empty() {
        anyhow::bail!("LLM returned an empty browsing summary");
    }

    let date = json_path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(date_prefix)
        .map(str::to_string)
        .unwrap_or_else(|| {
            tracing::warn!("Could not extract date from JSON filename, using current date");
            Local::now().format("%Y-%m-%d").to_string()
        });

    let summary_path = output_dir.join(format!("{date}_browsing_summary.md"));
    std::fs::create_dir_all(output_dir)?;
    std::fs::write(&summary_path, summary)
        .with_context(|| format!("Failed to write {}", summary_path.display()))?;

    tracing::info!("Browsing summary saved to {}", summary_path.display());
    Ok(summary_path)
}

/// Format the top `top_n` entries as `- name (count)`, count descending with
/// name as the tie-break; `N/A` when empty.
fn format_statistics(stats: &BTreeMap<String, u64>, top_n: usize) -> String {
    if stats.is_empty() {
        return "N/A".to_string();
    }

    let mut entries: Vec<(&String, &u64)> = stats.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    entries
        .iter()
        .take(top_n)
        .map(|(name, count)| format!("- {name} ({count})"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{ChunkSummary, PageSummary};
    use crate::llm::{ChunkRequest, PromptRequest, ReduceInputs};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::tempdir;

    struct RecordingProvider {
        last_prompt: Mutex<Option<String>>,
        response: String,
    }

    #[async_trait]
    impl LlmProvider for RecordingProvider {
        async fn analyze_chunk(&self, _request: ChunkRequest<'_>) -> Result<ChunkSummary> {
            unreachable!("not used in summary generation")
        }

        async fn reduce_summaries(&self, _inputs: ReduceInputs<'_>) -> Result<PageSummary> {
            unreachable!("not used in summary generation")
        }

        async fn complete(&self, request: PromptRequest) -> Result<String> {
            *self.last_prompt.lock().unwrap() = Some(request.messages[1].content.clone());
            Ok(self.response.clone())
        }
    }

    #[test]
    fn statistics_sort_by_count_then_name() {
        let mut stats = BTreeMap::new();
        stats.insert("Python".to_string(), 3);
        stats.insert("AI models".to_string(), 5);
        stats.insert("Databases".to_string(), 3);

        let formatted = format_statistics(&stats, 2);
        assert_eq!(formatted, "- AI models (5)\n- Databases (3)");
    }

    #[test]
    fn empty_statistics_are_na() {
        assert_eq!(format_statistics(&BTreeMap::new(), 5), "N/A");
    }

    #[tokio::test]
    async fn summary_is_written_with_substituted_prompt() {
        let tmp = tempdir().unwrap();
        let markdown_path = tmp.path().join("2024-05-15_raw_analysis.md");
        std::fs::write(
            &markdown_path,
            "Description: A guide to ownership.\nCategory: Programming\nTopics: Rust\n",
        )
        .unwrap();

        let json_path = crate::report::extract_data(&markdown_path, tmp.path()).unwrap();

        let provider = RecordingProvider {
            last_prompt: Mutex::new(None),
            response: "  You mostly read about Rust.  ".to_string(),
        };

        let settings = Settings::default();
        let summary_path = generate_browsing_summary(
            &settings,
            &provider,
            &markdown_path,
            &json_path,
            tmp.path(),
        )
        .await
        .unwrap();

        assert!(summary_path.ends_with("2024-05-15_browsing_summary.md"));
        let written = std::fs::read_to_string(&summary_path).unwrap();
        assert_eq!(written, "You mostly read about Rust.");

        let prompt = provider.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("- Programming (1)"));
        assert!(prompt.contains("- Rust (1)"));
        assert!(prompt.contains("- A guide to ownership."));
    }

    #[tokio::test]
    async fn missing_markdown_is_an_error() {
        let tmp = tempdir().unwrap();
        let provider = RecordingProvider {
            last_prompt: Mutex::new(None),
            response: "summary".to_string(),
        };

        let err = generate_browsing_summary(
            &Settings::default(),
            &provider,
            &tmp.path().join("missing.md"),
            &tmp.path().join("missing.json"),
            tmp.path(),
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("not found"));
    }
}
