//! Prompt templates for the analysis stages
//!
//! Placeholders are substituted literally: `[Title]` and `[Text content]` in
//! the chunk-analysis prompt, `{combined_descriptions}`,
//! `{combined_categories}`, `{combined_topics}` in the reduction prompt, and
//! `{top_categories}`, `{top_topics}`, `{sample_descriptions}` in the
//! browsing-summary prompt.

use serde::Serialize;
use serde_json::{json, Value};

/// One role-tagged chat message.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Named response schema attached to a structured request.
#[derive(Debug, Clone)]
pub struct ResponseSchema {
    pub name: &'static str,
    pub schema: Value,
}

/// Outbound call shape: ordered messages plus an optional response schema.
#[derive(Debug, Clone)]
pub struct PromptRequest {
    pub messages: Vec<ChatMessage>,
    pub response_schema: Option<ResponseSchema>,
}

const PAGE_ANALYSIS_SYSTEM: &str = "You analyze the content of web pages. \
Respond only with JSON matching the requested schema: a short description \
(one or two sentences), a category (one or two words), and one to three topics.";

const PAGE_ANALYSIS_USER: &str = "Analyze this page content.\n\n\
Title: [Title]\n\n\
Content:\n[Text content]";

const REDUCTION_SYSTEM: &str = "You consolidate partial summaries of a single \
web page into one final summary. Respond only with JSON matching the requested \
schema: one description (one or two sentences), the most representative \
category (one or two words), and up to three deduplicated topics.";

const REDUCTION_USER: &str = "These summaries describe different parts of the same page. \
Merge them into one final summary.\n\n\
Descriptions:\n{combined_descriptions}\n\n\
Categories:\n{combined_categories}\n\n\
Topics:\n{combined_topics}";

const BROWSING_SUMMARY_SYSTEM: &str = "You write short, readable overviews of \
a person's recent browsing activity. Use plain prose, two or three paragraphs, \
and only the information provided.";

const BROWSING_SUMMARY_USER: &str = "Summarize this browsing activity.\n\n\
Top categories:\n{top_categories}\n\n\
Top topics:\n{top_topics}\n\n\
Sample page descriptions:\n{sample_descriptions}";

/// JSON schema both structured stages must satisfy.
pub fn summary_response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "description": { "type": "string" },
            "category": { "type": "string" },
            "topics": {
                "type": "array",
                "items": { "type": "string" },
                "minItems": 1,
                "maxItems": 3
            }
        },
        "required": ["description", "category", "topics"]
    })
}

/// Build the chunk-analysis request for one page chunk.
pub fn page_analysis_request(title: &str, content: &str) -> PromptRequest {
    let user = PAGE_ANALYSIS_USER
        .replace("[Title]", title)
        .replace("[Text content]", content);

    PromptRequest {
        messages: vec![
            ChatMessage::system(PAGE_ANALYSIS_SYSTEM),
            ChatMessage::user(user),
        ],
        response_schema: Some(ResponseSchema {
            name: "page_analysis_schema",
            schema: summary_response_schema(),
        }),
    }
}

/// Build the reduction request from gathered chunk results.
pub fn reduction_request(
    descriptions: &[String],
    categories: &[String],
    topics: &[String],
) -> PromptRequest {
    let user = REDUCTION_USER
        .replace("{combined_descriptions}", &bullet_list(descriptions))
        .replace("{combined_categories}", &bullet_list(categories))
        .replace("{combined_topics}", &bullet_list(topics));

    PromptRequest {
        messages: vec![
            ChatMessage::system(REDUCTION_SYSTEM),
            ChatMessage::user(user),
        ],
        response_schema: Some(ResponseSchema {
            name: "final_page_analysis_schema",
            schema: summary_response_schema(),
        }),
    }
}

/// Build the free-text browsing-summary request.
pub fn browsing_summary_request(
    top_categories: &str,
    top_topics: &str,
    sample_descriptions: &str,
) -> PromptRequest {
    let user = BROWSING_SUMMARY_USER
        .replace("{top_categories}", top_categories)
        .replace("{top_topics}", top_topics)
        .replace("{sample_descriptions}", sample_descriptions);

    PromptRequest {
        messages: vec![
            ChatMessage::system(BROWSING_SUMMARY_SYSTEM),
            ChatMessage::user(user),
        ],
        response_schema: None,
    }
}

/// Format items as a `- item` bullet list.
pub fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}
