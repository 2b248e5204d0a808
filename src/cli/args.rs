//! CLI argument definitions using clap

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// hindsight - Browsing history analysis and AI-powered insights
#[derive(Parser, Debug)]
#[command(name = "hindsight")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze recent history records into a raw analysis markdown file
    Analyze {
        /// How many past days of history to analyze (overrides config)
        #[arg(short, long)]
        days: Option<i64>,
    },

    /// Extract category and topic statistics from a raw analysis file
    Extract {
        /// Raw analysis markdown file (defaults to today's run)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Generate an LLM browsing summary from extracted statistics
    Summary {
        /// Run date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Generate an HTML report from extracted statistics
    Report {
        /// Run date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Run the full pipeline: analyze, extract, summary, report
    Run {
        /// How many past days of history to analyze (overrides config)
        #[arg(short, long)]
        days: Option<i64>,
    },

    /// Show history database statistics
    Status,

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., llm.model)
        key: String,

        /// Value to set
        value: String,
    },
}
