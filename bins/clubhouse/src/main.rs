//! Clubhouse CLI
//!
//! Reads news, events and team rosters from the CMS and tournament data
//! from the tournament provider, in the terminal or as JSON.

use clap::{Parser, Subcommand};
use clubhouse_cli::OutputFormat;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod context;

use commands::{cms, tournament};
use context::Context;

/// Clubhouse content from the command line
#[derive(Parser)]
#[command(name = "clubhouse")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (defaults to clubhouse.toml in the usual places)
    #[arg(short, long, global = true, env = "CLUBHOUSE_CONFIG")]
    config: Option<PathBuf>,

    /// Locale to read content in (defaults to the configured default locale)
    #[arg(short, long, global = true)]
    locale: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List published news
    News {
        /// Page size
        #[arg(short = 'n', long, default_value = "10")]
        limit: u32,

        /// Page number, starting at 1
        #[arg(short, long, default_value = "1")]
        page: u32,

        /// Only news in this category
        #[arg(long)]
        category: Option<i64>,

        /// Only news with a main image
        #[arg(long)]
        with_image: bool,
    },

    /// Show a single news entry
    NewsOne {
        /// News entry id
        id: String,
    },

    /// List calendar events
    Events {
        /// Page size
        #[arg(short = 'n', long, default_value = "10")]
        limit: u32,

        /// Page number, starting at 1
        #[arg(short, long, default_value = "1")]
        page: u32,

        /// Only events in this category
        #[arg(long)]
        category: Option<i64>,

        /// Only events starting in this month (YYYY-MM)
        #[arg(short, long, value_parser = parse_month)]
        month: Option<String>,

        /// Only events starting from now on
        #[arg(short, long)]
        upcoming: bool,
    },

    /// Show a team and its active roster
    Team {
        /// Team slug, in any locale
        slug: String,
    },

    /// Show a tournament with its groups, rounds and matches
    Tournament {
        /// Tournament id
        id: String,
    },

    /// Show the standings of a group
    Standings {
        /// Group id
        group_id: String,
    },

    /// List upcoming matches of a season
    Upcoming {
        /// Season id (defaults to tournament.season_id from the configuration)
        season_id: Option<String>,
    },

    /// Show a single match
    Match {
        /// Match id
        id: String,
    },

    /// List the teams of a tournament
    Teams {
        /// Tournament id
        tournament_id: String,
    },
}

fn parse_month(value: &str) -> Result<String, String> {
    chrono::NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d")
        .map(|_| value.to_string())
        .map_err(|_| format!("expected YYYY-MM, got '{value}'"))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let ctx = match Context::new(cli.config.as_deref(), cli.locale.as_deref(), cli.verbose, cli.format) {
        Ok(ctx) => ctx,
        Err(e) => return report(&e),
    };

    let result = match cli.command {
        Commands::News {
            limit,
            page,
            category,
            with_image,
        } => cms::news(&ctx, limit, page, category, with_image).await,

        Commands::NewsOne { id } => cms::news_one(&ctx, &id).await,

        Commands::Events {
            limit,
            page,
            category,
            month,
            upcoming,
        } => cms::events(&ctx, limit, page, category, month, upcoming).await,

        Commands::Team { slug } => cms::team(&ctx, &slug).await,

        Commands::Tournament { id } => tournament::show(&ctx, &id).await,

        Commands::Standings { group_id } => tournament::standings(&ctx, &group_id).await,

        Commands::Upcoming { season_id } => tournament::upcoming(&ctx, season_id.as_deref()).await,

        Commands::Match { id } => tournament::show_match(&ctx, &id).await,

        Commands::Teams { tournament_id } => tournament::teams(&ctx, &tournament_id).await,
    };

    tracing::debug!(
        session_id = clubhouse_telemetry::session_id(),
        metrics = %clubhouse_telemetry::metrics().export_json(),
        "Session finished"
    );

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e),
    }
}

fn report(error: &anyhow::Error) -> ExitCode {
    eprintln!("{} {}", "Error:".red().bold(), error);
    if let Some(suggestion) = context::suggestion(error) {
        eprintln!("  {} {}", "Hint:".yellow(), suggestion);
    }
    ExitCode::from(context::exit_code(error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2024-06").as_deref(), Ok("2024-06"));
        assert!(parse_month("2024-13").is_err());
        assert!(parse_month("June").is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["clubhouse", "news", "--locale", "fr", "--format", "json"]).unwrap();
        assert_eq!(cli.locale.as_deref(), Some("fr"));
        assert!(cli.format.is_json());
        assert!(matches!(cli.command, Commands::News { limit: 10, page: 1, .. }));
    }
}
