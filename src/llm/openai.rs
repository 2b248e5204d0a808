use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analysis::{ChunkSummary, PageSummary};
use crate::config::Settings;
use crate::llm::client::{ChunkRequest, LlmProvider, ReduceInputs};
use crate::llm::prompts::{self, ChatMessage, PromptRequest};

const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com/v1";
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Client for any OpenAI-compatible chat-completions endpoint.
pub struct OpenAiClient {
    http: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl OpenAiClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.llm.api_key.trim().to_string();
        if api_key.is_empty() {
            anyhow::bail!(
                "API key is missing. Set llm.api_key in config or HINDSIGHT_API_KEY."
            );
        }

        let model = settings.llm.model.trim().to_string();
        if model.is_empty() {
            anyhow::bail!("Model name is missing. Set llm.model in config.");
        }

        let endpoint = normalize_endpoint(&settings.llm.endpoint);

        Ok(Self {
            http: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .context("Failed to build HTTP client")?,
            api_key,
            model,
            endpoint,
        })
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint)
    }

    /// Send one chat-completions call and return the first non-empty choice.
    async fn chat(&self, request: PromptRequest) -> Result<String> {
        let response_format = request.response_format();
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: request.messages,
            temperature: 0.0,
            response_format,
        };

        tracing::debug!(model = %self.model, url = %self.chat_url(), "Sending chat completion request");

        let response = self
            .http
            .post(self.chat_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("Chat completion request failed")?;

        let response = response
            .error_for_status()
            .context("LLM returned an error status")?;

        let payload: ChatCompletionResponse = response
            .json()
            .await
            .context("Failed to parse chat completion response")?;

        let content = payload
            .choices
            .iter()
            .filter_map(|choice| choice.message.content.as_deref())
            .map(str::trim)
            .find(|text| !text.is_empty())
            .map(str::to_string)
            .context("Chat completion response did not contain content")?;

        Ok(content)
    }

    fn parse_summary<T>(content: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        serde_json::from_str(content).with_context(|| {
            format!(
                "LLM response is not valid summary JSON: {}",
                snippet(content, 200)
            )
        })
    }
}

#[async_trait]
impl LlmProvider for OpenAiClient {
    async fn analyze_chunk(&self, request: ChunkRequest<'_>) -> Result<ChunkSummary> {
        let prompt = prompts::page_analysis_request(request.title, request.content);
        let content = self.chat(prompt).await?;

        let summary: ChunkSummary = Self::parse_summary(&content)?;
        summary.validate()?;
        Ok(summary)
    }

    async fn reduce_summaries(&self, inputs: ReduceInputs<'_>) -> Result<PageSummary> {
        let prompt =
            prompts::reduction_request(inputs.descriptions, inputs.categories, inputs.topics);
        let content = self.chat(prompt).await?;

        let summary: PageSummary = Self::parse_summary(&content)?;
        summary.validate()?;
        Ok(summary)
    }

    async fn complete(&self, request: PromptRequest) -> Result<String> {
        self.chat(request).await
    }
}

impl PromptRequest {
    /// Wire representation of the attached response schema, if any.
    fn response_format(&self) -> Option<ResponseFormat> {
        self.response_schema
            .as_ref()
            .map(|schema| ResponseFormat {
                format_type: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: schema.name,
                    schema: schema.schema.clone(),
                },
            })
    }
}

fn normalize_endpoint(endpoint: &str) -> String {
    let trimmed = endpoint.trim();
    if trimmed.is_empty() {
        return DEFAULT_OPENAI_ENDPOINT.to_string();
    }

    let mut endpoint = trimmed.trim_end_matches('/').to_string();
    // local gateways usually expose the OpenAI surface under /v1
    if !endpoint.contains("api.openai.com") && !endpoint.ends_with("/v1") {
        endpoint.push_str("/v1");
    }
    endpoint
}

fn snippet(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{cut}...")
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
    json_schema: JsonSchemaFormat,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat {
    name: &'static str,
    schema: Value,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(endpoint: &str) -> OpenAiClient {
        let mut settings = Settings::default();
        settings.llm.api_key = "test-key".to_string();
        settings.llm.endpoint = endpoint.to_string();
        OpenAiClient::from_settings(&settings).unwrap()
    }

    fn completion_body(content: &str) -> Value {
        json!({
            "choices": [
                { "message": { "role": "assistant", "content": content } }
            ]
        })
    }

    #[test]
    fn endpoint_defaults_to_openai() {
        assert_eq!(normalize_endpoint(""), "https://api.openai.com/v1");
        assert_eq!(
            normalize_endpoint("https://api.openai.com/v1/"),
            "https://api.openai.com/v1"
        );
    }

    #[test]
    fn local_endpoint_gains_v1_suffix() {
        assert_eq!(
            normalize_endpoint("http://192.168.50.246:1234"),
            "http://192.168.50.246:1234/v1"
        );
        assert_eq!(
            normalize_endpoint("http://localhost:1234/v1"),
            "http://localhost:1234/v1"
        );
    }

    #[tokio::test]
    async fn analyze_chunk_parses_structured_response() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/chat/completions")
                    .header("authorization", "Bearer test-key")
                    .json_body_partial(
                        r#"{ "temperature": 0.0, "response_format": { "type": "json_schema" } }"#,
                    );
                then.status(200).json_body(completion_body(
                    r#"{"description": "A guide to Rust ownership.", "category": "Programming", "topics": ["Rust", "Ownership"]}"#,
                ));
            })
            .await;

        let client = client_for(&server.base_url());
        let summary = client
            .analyze_chunk(ChunkRequest {
                title: "Rust Book",
                content: "Ownership is central to Rust.",
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(summary.category, "Programming");
        assert_eq!(summary.topics, vec!["Rust", "Ownership"]);
    }

    #[tokio::test]
    async fn analyze_chunk_rejects_schema_violations() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(200).json_body(completion_body(
                    r#"{"description": "Too many topics.", "category": "News", "topics": ["a", "b", "c", "d"]}"#,
                ));
            })
            .await;

        let client = client_for(&server.base_url());
        let err = client
            .analyze_chunk(ChunkRequest {
                title: "T",
                content: "C",
            })
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Schema validation failed"));
    }

    #[tokio::test]
    async fn analyze_chunk_rejects_non_json_content() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(200)
                    .json_body(completion_body("Sorry, I cannot answer that."));
            })
            .await;

        let client = client_for(&server.base_url());
        let err = client
            .analyze_chunk(ChunkRequest {
                title: "T",
                content: "C",
            })
            .await
            .unwrap_err();

        assert!(err.to_string().contains("not valid summary JSON"));
    }

    #[tokio::test]
    async fn reduce_summaries_returns_page_summary() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(200).json_body(completion_body(
                    r#"{"description": "A long article about Python tooling.", "category": "Programming", "topics": ["Python", "Tooling"]}"#,
                ));
            })
            .await;

        let client = client_for(&server.base_url());
        let descriptions = vec!["Part one.".to_string(), "Part two.".to_string()];
        let categories = vec!["Programming".to_string(), "Programming".to_string()];
        let topics = vec!["Python".to_string(), "Tooling".to_string()];

        let summary = client
            .reduce_summaries(ReduceInputs {
                descriptions: &descriptions,
                categories: &categories,
                topics: &topics,
            })
            .await
            .unwrap();

        assert_eq!(summary.description, "A long article about Python tooling.");
        assert_eq!(summary.topics.len(), 2);
    }

    #[tokio::test]
    async fn error_status_is_surfaced() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(500).body("upstream exploded");
            })
            .await;

        let client = client_for(&server.base_url());
        let err = client
            .complete(prompts::browsing_summary_request("- a (1)", "- b (1)", "- c"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("error status"));
    }
}
