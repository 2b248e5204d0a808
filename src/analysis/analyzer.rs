//! History analysis pipeline
//!
//! Walks recent history records, summarizes their content chunk by chunk,
//! reduces the chunk results, and appends one markdown entry per page.

use anyhow::{Context, Result};
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use crate::analysis::chunking::split_with_overlap;
use crate::analysis::summary::{fallback_reduce, ChunkSummary, PageSummary};
use crate::config::Settings;
use crate::llm::{ChunkRequest, LlmProvider, ReduceInputs};
use crate::storage::{HistoryDatabase, HistoryRecord};

/// Result of one analysis run.
#[derive(Debug)]
pub struct AnalysisOutcome {
    /// Path to the raw analysis markdown file
    pub markdown_path: PathBuf,
    /// Records found in the configured day window
    pub total_records: usize,
    /// Records that produced a markdown entry
    pub processed: usize,
    /// Records skipped (no content or no successful chunk analysis)
    pub skipped: usize,
}

/// Analyze recent history records and write results to a dated markdown file.
pub async fn analyze_history(
    settings: &Settings,
    provider: &dyn LlmProvider,
) -> Result<AnalysisOutcome> {
    tracing::info!("Starting history analysis");

    let db = HistoryDatabase::open(settings)?;
    let records = db.recent_records(settings.history.days_to_filter)?;
    let total_records = records.len();
    tracing::info!("Found {} records to process", total_records);

    let today = Local::now().date_naive();
    let run_dir = settings.run_dir(today);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("Failed to create output directory: {}", run_dir.display()))?;

    let markdown_path = run_dir.join(format!("{}_raw_analysis.md", today.format("%Y-%m-%d")));
    if markdown_path.exists() {
        tracing::warn!(
            "Markdown file {} already exists. Overwriting.",
            markdown_path.display()
        );
    }
    std::fs::write(&markdown_path, "")
        .with_context(|| format!("Failed to create {}", markdown_path.display()))?;

    let run_start = Instant::now();
    let mut processed = 0;
    let mut skipped = 0;

    for (index, record) in records.iter().enumerate() {
        let record_start = Instant::now();
        let number = index + 1;

        tracing::info!(
            "Processing record {}/{} (id {}): {}",
            number,
            total_records,
            record.id,
            truncate(&record.title, 50)
        );

        match analyze_record(settings, provider, record).await {
            Some(summary) => {
                append_markdown_entry(&markdown_path, record, &summary)?;
                processed += 1;
            }
            None => {
                skipped += 1;
            }
        }

        tracing::info!(
            "Finished record {}/{} in {:.2}s",
            number,
            total_records,
            record_start.elapsed().as_secs_f64()
        );
    }

    let total_secs = run_start.elapsed().as_secs_f64();
    if processed > 0 {
        tracing::info!(
            "Processed {} of {} records in {:.2}s (avg {:.2}s per record)",
            processed,
            total_records,
            total_secs,
            total_secs / processed as f64
        );
    } else if total_records > 0 {
        tracing::warn!("No records were successfully processed");
    } else {
        tracing::info!("No records found in the configured window");
    }
    tracing::info!("Analysis results saved to {}", markdown_path.display());

    Ok(AnalysisOutcome {
        markdown_path,
        total_records,
        processed,
        skipped,
    })
}

/// Analyze one record; `None` means the record was skipped.
async fn analyze_record(
    settings: &Settings,
    provider: &dyn LlmProvider,
    record: &HistoryRecord,
) -> Option<PageSummary> {
    if !record.has_content() {
        tracing::warn!("Record {}: no content available, skipping", record.id);
        return None;
    }
    let content = record.content.as_deref().unwrap_or_default();

    let chunks = split_with_overlap(
        content,
        settings.analysis.max_content_length,
        settings.analysis.chunk_overlap,
    );
    if chunks.len() > 1 {
        tracing::info!(
            "Record {}: content split into {} chunks",
            record.id,
            chunks.len()
        );
    }

    let mut chunk_summaries: Vec<ChunkSummary> = Vec::with_capacity(chunks.len());
    for (chunk_index, chunk) in chunks.iter().enumerate() {
        tracing::info!(
            "Record {}: analyzing chunk {}/{}",
            record.id,
            chunk_index + 1,
            chunks.len()
        );

        match provider
            .analyze_chunk(ChunkRequest {
                title: &record.title,
                content: chunk,
            })
            .await
        {
            Ok(summary) => chunk_summaries.push(summary),
            Err(error) => {
                tracing::error!(
                    "Record {}: chunk {}/{} analysis failed: {:#}",
                    record.id,
                    chunk_index + 1,
                    chunks.len(),
                    error
                );
            }
        }
    }

    if chunk_summaries.is_empty() {
        tracing::warn!(
            "Record {}: no chunk analysis succeeded, cannot summarize",
            record.id
        );
        return None;
    }

    if chunk_summaries.len() == 1 {
        return chunk_summaries.pop().map(PageSummary::from_single_chunk);
    }

    reduce_chunks(provider, record, chunk_summaries).await
}

/// Reduce multiple chunk summaries into one page summary, falling back to the
/// deterministic merge when the LLM reduction fails.
async fn reduce_chunks(
    provider: &dyn LlmProvider,
    record: &HistoryRecord,
    chunk_summaries: Vec<ChunkSummary>,
) -> Option<PageSummary> {
    tracing::info!(
        "Record {}: combining {} chunk analyses into a final summary",
        record.id,
        chunk_summaries.len()
    );

    let descriptions: Vec<String> = chunk_summaries
        .iter()
        .map(|c| c.description.clone())
        .collect();
    let categories: Vec<String> = chunk_summaries.iter().map(|c| c.category.clone()).collect();

    // uncapped order-preserving dedup; the reducer prompt sees every topic once
    let mut topics: Vec<String> = Vec::new();
    for topic in chunk_summaries.iter().flat_map(|c| c.topics.iter()) {
        if !topics.contains(topic) {
            topics.push(topic.clone());
        }
    }

    match provider
        .reduce_summaries(ReduceInputs {
            descriptions: &descriptions,
            categories: &categories,
            topics: &topics,
        })
        .await
    {
        Ok(summary) => Some(summary),
        Err(error) => {
            tracing::error!("Record {}: summary reduction failed: {:#}", record.id, error);
            tracing::warn!(
                "Record {}: using fallback summarization (first description, most common category, unique topics)",
                record.id
            );
            fallback_reduce(&chunk_summaries)
        }
    }
}

/// Append one page result to the raw analysis markdown file.
fn append_markdown_entry(
    path: &PathBuf,
    record: &HistoryRecord,
    summary: &PageSummary,
) -> Result<()> {
    let mut entry = String::new();
    entry.push_str(&format!("Title: {}\n", record.title));
    entry.push_str(&format!("URL: {}\n", record.url));
    entry.push_str(&format!("Description: {}\n", summary.description));
    entry.push_str(&format!("Category: {}\n", summary.category));
    entry.push_str(&format!("Topics: {}\n", summary.topics.join(", ")));
    entry.push_str("\n---\n\n");

    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    file.write_all(entry.as_bytes())
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len).collect();
        format!("{cut}...")
    }
}
