//! newsbrief CLI - summarise a batch of news articles
//!
//! The engine lives in lib.rs; this file parses arguments, sets up logging and
//! prints results.

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use newsbrief::article::articles_from_json;
use newsbrief::{Article, Config, Summary, SummaryEngine};
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "newsbrief")]
#[command(author, version, about = "Extractive summarisation of news articles", long_about = None)]
struct Cli {
    /// Path to a newsbrief.toml config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarise a JSON array of articles ("-" reads stdin)
    Summarise {
        /// Articles file
        input: String,
        /// Print the raw output record as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the themes shared across articles
    Themes {
        /// Articles file
        input: String,
    },
    /// Score the similarity of two sentences
    Similarity { a: String, b: String },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = &cli.command {
        clap_complete::generate(
            *shell,
            &mut Cli::command(),
            "newsbrief",
            &mut std::io::stdout(),
        );
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;
    init_logging(&config)?;

    let engine = SummaryEngine::new(config.engine.clone())?;
    let result = run(&engine, cli.command).await;
    engine.shutdown();
    result
}

async fn run(engine: &SummaryEngine, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Summarise { input, json } => {
            let value = read_input(&input)?;
            let summary = engine.summarize_value(&value).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                let articles = value.as_array().map(|items| articles_from_json(items));
                print_summary(&summary, articles.as_deref().unwrap_or_default());
            }
        }
        Commands::Themes { input } => {
            let value = read_input(&input)?;
            let items = value
                .as_array()
                .context("Expected a JSON array of articles")?;
            let themes = engine.detect_themes(&articles_from_json(items)).await?;

            if themes.is_empty() {
                println!("No shared themes found.");
            } else {
                for (rank, theme) in themes.iter().enumerate() {
                    println!("{:>3}. {}", rank + 1, theme);
                }
            }
        }
        Commands::Similarity { a, b } => {
            println!("{:.3}", engine.similarity(&a, &b));
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

fn init_logging(config: &Config) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

fn read_input(input: &str) -> anyhow::Result<serde_json::Value> {
    let content = if input == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        buffer
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))?
    };
    serde_json::from_str(&content).context("Input is not valid JSON")
}

fn print_summary(summary: &Summary, articles: &[Article]) {
    if summary.is_fallback() {
        println!("{}", summary.summary.yellow());
        if let Some(error) = &summary.error {
            println!("  {}", error.dimmed());
        }
        if let (Some(processed), Some(total)) = (summary.processed_articles, summary.total_articles)
        {
            println!("  processed {} of {} articles", processed, total);
        }
        return;
    }

    println!("{}\n", summary.summary);

    if !summary.themes.is_empty() {
        println!("{}", "🏷️  Themes:".bold());
        for theme in &summary.themes {
            println!("  • {}", theme);
        }
        println!();
    }

    let mut dates: Vec<_> = articles.iter().filter_map(Article::published_at).collect();
    dates.sort();
    if let (Some(first), Some(last)) = (dates.first(), dates.last()) {
        println!(
            "📅 Coverage: {} to {}",
            first.format("%Y-%m-%d %H:%M"),
            last.format("%Y-%m-%d %H:%M")
        );
    }

    println!(
        "📊 Confidence {:.0}% ({} of {} articles)",
        summary.confidence * 100.0,
        summary.processed_articles.unwrap_or(0),
        summary.total_articles.unwrap_or(0)
    );
    if let Some(metrics) = &summary.metrics {
        println!(
            "{}",
            format!(
                "   {:.1} ms total, cache {} hits / {} misses",
                metrics.total_processing_time, metrics.cache_hits, metrics.cache_misses
            )
            .dimmed()
        );
    }
}
