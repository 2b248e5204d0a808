//! CLI command implementations

use anyhow::Result;
use chrono::{Local, NaiveDate};
use std::path::PathBuf;

use crate::analysis::analyze_history;
use crate::cli::args::ConfigCommand;
use crate::config::Settings;
use crate::llm::build_provider;
use crate::report;
use crate::storage::HistoryDatabase;

/// Run the analysis stage over recent history records.
pub async fn analyze(settings: &Settings, days: Option<i64>) -> Result<()> {
    let settings = with_days(settings, days);
    settings.ensure_dirs()?;

    let provider = build_provider(&settings)?;
    let outcome = analyze_history(&settings, provider.as_ref()).await?;

    println!(
        "Analyzed {} of {} records ({} skipped)",
        outcome.processed, outcome.total_records, outcome.skipped
    );
    println!("Raw analysis: {}", outcome.markdown_path.display());

    Ok(())
}

/// Extract category/topic statistics from a raw analysis markdown file.
pub fn extract(settings: &Settings, input: Option<PathBuf>) -> Result<()> {
    let markdown_path = match input {
        Some(path) => path,
        None => run_paths(settings, today()).markdown,
    };
    let output_dir = markdown_path
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| settings.output_dir());

    let json_path = report::extract_data(&markdown_path, &output_dir)?;
    println!("Extracted data: {}", json_path.display());

    Ok(())
}

/// Generate the LLM browsing summary for a run date.
pub async fn summary(settings: &Settings, date: Option<NaiveDate>) -> Result<()> {
    let paths = run_paths(settings, date.unwrap_or_else(today));

    let provider = build_provider(settings)?;
    let summary_path = report::generate_browsing_summary(
        settings,
        provider.as_ref(),
        &paths.markdown,
        &paths.json,
        &paths.dir,
    )
    .await?;

    println!("Browsing summary: {}", summary_path.display());

    Ok(())
}

/// Generate the HTML report for a run date.
pub fn html_report(settings: &Settings, date: Option<NaiveDate>) -> Result<()> {
    let paths = run_paths(settings, date.unwrap_or_else(today));

    let html_path = report::generate_html_report(&paths.json, &paths.dir)?;
    println!("HTML report: {}", html_path.display());

    Ok(())
}

/// Run all pipeline stages for today's date.
pub async fn run_pipeline(settings: &Settings, days: Option<i64>) -> Result<()> {
    let settings = with_days(settings, days);
    settings.ensure_dirs()?;

    let provider = build_provider(&settings)?;
    let outcome = analyze_history(&settings, provider.as_ref()).await?;
    println!(
        "Analyzed {} of {} records ({} skipped)",
        outcome.processed, outcome.total_records, outcome.skipped
    );
    println!("Raw analysis: {}", outcome.markdown_path.display());

    let paths = run_paths(&settings, today());
    let json_path = report::extract_data(&outcome.markdown_path, &paths.dir)?;
    println!("Extracted data: {}", json_path.display());

    let summary_path = report::generate_browsing_summary(
        &settings,
        provider.as_ref(),
        &outcome.markdown_path,
        &json_path,
        &paths.dir,
    )
    .await?;
    println!("Browsing summary: {}", summary_path.display());

    let html_path = report::generate_html_report(&json_path, &paths.dir)?;
    println!("HTML report: {}", html_path.display());

    Ok(())
}

/// Show history database statistics.
pub fn status(settings: &Settings) -> Result<()> {
    let db = HistoryDatabase::open(settings)?;
    let stats = db.stats()?;

    println!("History database: {}", settings.history.db_path.display());
    println!("  Total records: {}", stats.total_records);
    println!("  With content: {}", stats.with_content);
    println!("Output directory: {}", settings.output_dir().display());

    Ok(())
}

/// Handle config subcommands
pub fn config_command(settings: &Settings, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let toml = toml::to_string_pretty(settings)?;
            println!("{}", toml);
        }
        ConfigCommand::Path => {
            let path = Settings::config_path()?;
            println!("{}", path.display());
        }
        ConfigCommand::Init { force } => {
            let path = Settings::config_path()?;
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Settings::write_default(&path)?;
            println!("Configuration initialized at: {}", path.display());
        }
        ConfigCommand::Set { key, value } => {
            // Nested keys like "llm.model" would need a structured editor.
            println!("Setting {}={}", key, value);
            println!("(Note: Manual config editing is recommended for now)");
        }
    }

    Ok(())
}

struct RunPaths {
    dir: PathBuf,
    markdown: PathBuf,
    json: PathBuf,
}

fn run_paths(settings: &Settings, date: NaiveDate) -> RunPaths {
    let dir = settings.run_dir(date);
    let prefix = date.format("%Y-%m-%d");
    RunPaths {
        markdown: dir.join(format!("{prefix}_raw_analysis.md")),
        json: dir.join(format!("{prefix}_extracted_data.json")),
        dir,
    }
}

fn with_days(settings: &Settings, days: Option<i64>) -> Settings {
    let mut settings = settings.clone();
    if let Some(days) = days {
        settings.history.days_to_filter = days;
    }
    settings
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_paths_use_dated_filenames() {
        let settings = Settings::default();
        let date = NaiveDate::from_ymd_opt(2025, 5, 15).unwrap();
        let paths = run_paths(&settings, date);

        assert!(paths.markdown.ends_with("2025-05-15/2025-05-15_raw_analysis.md"));
        assert!(paths.json.ends_with("2025-05-15/2025-05-15_extracted_data.json"));
    }

    #[test]
    fn days_override_replaces_config_value() {
        let settings = Settings::default();
        assert_eq!(with_days(&settings, Some(30)).history.days_to_filter, 30);
        assert_eq!(with_days(&settings, None).history.days_to_filter, 7);
    }
}
