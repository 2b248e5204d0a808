//! hindsight - A local-first CLI for AI-powered insights from your browsing history
//!
//! Reads a browsing-history SQLite database, summarizes page content through an
//! OpenAI-compatible LLM endpoint, and turns the results into markdown,
//! statistics, and an HTML report.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod llm;
pub mod report;
pub mod storage;

use thiserror::Error;

/// Main error type for hindsight
#[derive(Error, Debug)]
pub enum HindsightError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Schema validation failed: {0}")]
    SchemaValidation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, HindsightError>;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "hindsight";
