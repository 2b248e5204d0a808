//! hindsight - Browsing history analysis and AI-powered insights
//!
//! Entry point for the hindsight CLI application.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hindsight::cli::{Cli, Commands};
use hindsight::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging; --verbose lowers the default filter to debug
    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Completions { shell } => {
            hindsight::cli::completions::print(shell);
        }
        command => {
            // Load configuration only for runtime commands.
            let settings = Settings::load()?;

            match command {
                Commands::Analyze { days } => {
                    hindsight::cli::commands::analyze(&settings, days).await?;
                }
                Commands::Extract { input } => {
                    hindsight::cli::commands::extract(&settings, input)?;
                }
                Commands::Summary { date } => {
                    hindsight::cli::commands::summary(&settings, date).await?;
                }
                Commands::Report { date } => {
                    hindsight::cli::commands::html_report(&settings, date)?;
                }
                Commands::Run { days } => {
                    hindsight::cli::commands::run_pipeline(&settings, days).await?;
                }
                Commands::Status => {
                    hindsight::cli::commands::status(&settings)?;
                }
                Commands::Config(config_cmd) => {
                    hindsight::cli::commands::config_command(&settings, config_cmd)?;
                }
                Commands::Completions { .. } => unreachable!(),
            }
        }
    }

    Ok(())
}
