use anyhow::Result;
use async_trait::async_trait;

use crate::analysis::{ChunkSummary, PageSummary};
use crate::config::Settings;
use crate::llm::openai::OpenAiClient;
use crate::llm::prompts::PromptRequest;

/// Chunk analysis request payload.
pub struct ChunkRequest<'a> {
    pub title: &'a str,
    pub content: &'a str,
}

/// Gathered chunk results for one page, grouped per field.
pub struct ReduceInputs<'a> {
    pub descriptions: &'a [String],
    pub categories: &'a [String],
    pub topics: &'a [String],
}

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Summarize one content chunk into a structured record.
    async fn analyze_chunk(&self, request: ChunkRequest<'_>) -> Result<ChunkSummary>;

    /// Merge chunk-level results into one page summary.
    async fn reduce_summaries(&self, inputs: ReduceInputs<'_>) -> Result<PageSummary>;

    /// Free-text completion for an arbitrary prompt.
    async fn complete(&self, request: PromptRequest) -> Result<String>;
}

/// Build an LLM provider from runtime settings.
pub fn build_provider(settings: &Settings) -> Result<Box<dyn LlmProvider>> {
    match settings.llm.provider.to_lowercase().as_str() {
        "openai" => Ok(Box::new(OpenAiClient::from_settings(settings)?)),
        other => anyhow::bail!(
            "Unsupported llm.provider '{}'. Supported providers: openai",
            other
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    #[test]
    fn unsupported_provider_returns_error() {
        let mut settings = Settings::default();
        settings.llm.provider = "unknown".to_string();

        let err = match build_provider(&settings) {
            Ok(_) => panic!("expected provider creation to fail"),
            Err(e) => e.to_string(),
        };
        assert!(err.contains("Unsupported llm.provider"));
    }

    #[test]
    fn openai_provider_requires_api_key() {
        let mut settings = Settings::default();
        settings.llm.api_key = String::new();

        let err = match build_provider(&settings) {
            Ok(_) => panic!("expected provider creation to fail"),
            Err(e) => e.to_string(),
        };
        assert!(err.contains("API key is missing"));
    }
}
