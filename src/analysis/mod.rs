//! Page analysis pipeline
//!
//! Chunks page content, summarizes each chunk through the LLM, and reduces
//! chunk summaries into one result per page.

mod analyzer;
mod chunking;
mod summary;

pub use analyzer::{analyze_history, AnalysisOutcome};
pub use chunking::split_with_overlap;
pub use summary::{dedup_topics, fallback_reduce, ChunkSummary, PageSummary, MAX_TOPICS};
