//! Summary records produced by the LLM stages and their invariants

use serde::{Deserialize, Serialize};

use crate::HindsightError;

/// Maximum number of topics a summary may carry.
pub const MAX_TOPICS: usize = 3;

/// Structured summary of a single content chunk.
///
/// Immutable once produced; consumed only by the reducer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkSummary {
    /// Short description (one or two sentences)
    pub description: String,

    /// One- or two-word category
    pub category: String,

    /// Key topics, between one and three
    pub topics: Vec<String>,
}

/// Final summary for a whole page, reduced from its chunk summaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSummary {
    pub description: String,
    pub category: String,
    pub topics: Vec<String>,
}

impl ChunkSummary {
    pub fn validate(&self) -> crate::Result<()> {
        validate_shape(&self.description, &self.category, &self.topics)
    }
}

impl PageSummary {
    pub fn validate(&self) -> crate::Result<()> {
        validate_shape(&self.description, &self.category, &self.topics)
    }

    /// Promote a lone chunk summary to a page summary.
    ///
    /// Single-chunk pages skip the reducer entirely; topics are still
    /// deduplicated and capped.
    pub fn from_single_chunk(chunk: ChunkSummary) -> Self {
        Self {
            description: chunk.description,
            category: chunk.category,
            topics: dedup_topics(chunk.topics),
        }
    }
}

/// Shape checks shared by both summary kinds.
///
/// `topics` must have between 1 and [`MAX_TOPICS`] entries; `description` and
/// `category` must be non-empty after trimming.
fn validate_shape(description: &str, category: &str, topics: &[String]) -> crate::Result<()> {
    if description.trim().is_empty() {
        return Err(HindsightError::SchemaValidation(
            "description is empty".to_string(),
        ));
    }
    if category.trim().is_empty() {
        return Err(HindsightError::SchemaValidation(
            "category is empty".to_string(),
        ));
    }
    if topics.is_empty() || topics.len() > MAX_TOPICS {
        return Err(HindsightError::SchemaValidation(format!(
            "topics must have 1..={} entries, got {}",
            MAX_TOPICS,
            topics.len()
        )));
    }
    if topics.iter().any(|t| t.trim().is_empty()) {
        return Err(HindsightError::SchemaValidation(
            "topics contain an empty entry".to_string(),
        ));
    }
    Ok(())
}

/// Deduplicate topics preserving first-seen order, capped at [`MAX_TOPICS`].
pub fn dedup_topics(topics: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(topics.len().min(MAX_TOPICS));
    for topic in topics {
        if !seen.contains(&topic) {
            seen.push(topic);
        }
        if seen.len() == MAX_TOPICS {
            break;
        }
    }
    seen
}

/// Deterministic reduction used when the LLM reducer is unavailable or its
/// output fails validation: first description (marked as a fallback), most
/// frequent category with first-seen tie-break, deduplicated topics.
pub fn fallback_reduce(chunks: &[ChunkSummary]) -> Option<PageSummary> {
    let first = chunks.first()?;

    let mut counts: Vec<(&str, usize)> = Vec::new();
    for chunk in chunks {
        match counts.iter_mut().find(|(cat, _)| *cat == chunk.category) {
            Some((_, n)) => *n += 1,
            None => counts.push((&chunk.category, 1)),
        }
    }
    // strict comparison keeps the first-seen category on ties
    let mut best: Option<(&str, usize)> = None;
    for (cat, n) in &counts {
        if best.map_or(true, |(_, m)| *n > m) {
            best = Some((cat, *n));
        }
    }
    let category = best.map(|(cat, _)| cat.to_string())?;

    let topics = dedup_topics(
        chunks
            .iter()
            .flat_map(|chunk| chunk.topics.iter().cloned())
            .collect(),
    );

    Some(PageSummary {
        description: format!("{} (summarization failed)", first.description),
        category,
        topics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(description: &str, category: &str, topics: &[&str]) -> ChunkSummary {
        ChunkSummary {
            description: description.to_string(),
            category: category.to_string(),
            topics: topics.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn validate_accepts_well_formed_summary() {
        let summary = chunk("A page about Rust.", "Programming", &["Rust", "Tooling"]);
        assert!(summary.validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_description() {
        let summary = chunk("  ", "Programming", &["Rust"]);
        let err = summary.validate().unwrap_err();
        assert!(err.to_string().contains("description"));
    }

    #[test]
    fn validate_rejects_empty_topics() {
        let summary = chunk("A page.", "Programming", &[]);
        assert!(summary.validate().is_err());
    }

    #[test]
    fn validate_rejects_too_many_topics() {
        let summary = chunk("A page.", "Programming", &["a", "b", "c", "d"]);
        let err = summary.validate().unwrap_err();
        assert!(err.to_string().contains("1..=3"));
    }

    #[test]
    fn dedup_preserves_order_and_caps() {
        let topics = vec![
            "AI models".to_string(),
            "Python".to_string(),
            "AI models".to_string(),
            "Web development".to_string(),
            "Databases".to_string(),
        ];
        assert_eq!(
            dedup_topics(topics),
            vec!["AI models", "Python", "Web development"]
        );
    }

    #[test]
    fn single_chunk_promotion_dedups_topics() {
        let summary = PageSummary::from_single_chunk(chunk(
            "A page.",
            "Programming",
            &["Rust", "Rust", "Tooling"],
        ));
        assert_eq!(summary.topics, vec!["Rust", "Tooling"]);
        assert_eq!(summary.category, "Programming");
    }

    #[test]
    fn fallback_reduce_picks_most_frequent_category() {
        let chunks = vec![
            chunk("First chunk.", "News", &["AI models", "Python"]),
            chunk("Second chunk.", "Programming", &["Python", "Web development"]),
            chunk("Third chunk.", "Programming", &["Databases"]),
        ];

        let summary = fallback_reduce(&chunks).unwrap();
        assert_eq!(summary.category, "Programming");
        assert_eq!(summary.description, "First chunk. (summarization failed)");
        assert_eq!(summary.topics, vec!["AI models", "Python", "Web development"]);
    }

    #[test]
    fn fallback_reduce_breaks_category_ties_by_first_seen() {
        let chunks = vec![
            chunk("One.", "News", &["a"]),
            chunk("Two.", "Programming", &["b"]),
        ];
        let summary = fallback_reduce(&chunks).unwrap();
        assert_eq!(summary.category, "News");
    }

    #[test]
    fn fallback_reduce_on_empty_input_is_none() {
        assert!(fallback_reduce(&[]).is_none());
    }

    #[test]
    fn summaries_deserialize_from_response_json() {
        let summary: PageSummary = serde_json::from_str(
            r#"{"description": "A page.", "category": "News", "topics": ["AI models"]}"#,
        )
        .unwrap();
        assert!(summary.validate().is_ok());
        assert_eq!(summary.topics.len(), 1);
    }
}
