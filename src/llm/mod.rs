//! LLM module for hindsight
//!
//! Prompt construction and the OpenAI-compatible chat-completions client
//! behind the [`LlmProvider`] trait.

mod client;
mod openai;
pub mod prompts;

pub use client::{build_provider, ChunkRequest, LlmProvider, ReduceInputs};
pub use openai::OpenAiClient;
pub use prompts::{ChatMessage, PromptRequest};
