//! Reviewscope CLI - Place Reviews Collection and Summarization
//!
//! Collects complete review sets for a place from the search provider and
//! produces LLM-generated summaries of the collected reviews.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use indicatif::ProgressBar;
use reviewscope_collect::{ReviewCollector, SerpApiClient};
use reviewscope_core::{
    load_collection_inputs, review_texts, CollectionDocument, LlmSettings, Review,
    SerpApiSettings,
};
use reviewscope_llm::{CharEstimator, LlmClient, Summarizer, SummarizerConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "reviewscope")]
#[command(about = "Collect and summarize place reviews")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for places matching a query
    Search {
        /// Free-text place query (e.g. "Honest restaurant Gujarat")
        query: String,

        /// Bias results to a "lat,long" location
        #[arg(long)]
        ll: Option<String>,

        /// Write the results as JSON to this file
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Show details for one place
    Place {
        /// Provider place ID
        place_id: String,
    },

    /// Collect every review for a place into a JSON document
    Collect {
        /// Provider place ID
        place_id: String,

        /// Directory to write the collection document into
        #[arg(short = 'o', long, default_value = ".")]
        output_dir: PathBuf,

        /// Skip the API-key validation request
        #[arg(long)]
        skip_validation: bool,
    },

    /// Summarize collected reviews with the LLM
    Summarize {
        /// Collection JSON file, or a directory of them
        input: PathBuf,

        /// Re-chunk partial summaries when they overflow the token budget
        #[arg(long)]
        recursive_reduce: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Search { query, ll, output } => run_search(&query, ll.as_deref(), output).await,
        Commands::Place { place_id } => run_place(&place_id).await,
        Commands::Collect {
            place_id,
            output_dir,
            skip_validation,
        } => run_collect(&place_id, &output_dir, skip_validation).await,
        Commands::Summarize {
            input,
            recursive_reduce,
        } => run_summarize(&input, recursive_reduce).await,
    }
}

async fn run_search(query: &str, ll: Option<&str>, output: Option<PathBuf>) -> Result<()> {
    let client = SerpApiClient::new(SerpApiSettings::from_env()?)?;
    let branches = client.search_places(query, ll).await?;

    if branches.is_empty() {
        println!("No places found for \"{}\".", query);
        return Ok(());
    }

    println!("Found {} places.\n", branches.len());
    for (index, branch) in branches.iter().enumerate() {
        println!(
            "{}. {} - {} (Place ID: {})",
            index + 1,
            branch.title,
            branch.address,
            branch.place_id.as_deref().unwrap_or("unknown")
        );
    }

    if let Some(path) = output {
        std::fs::write(&path, serde_json::to_string_pretty(&branches)?)?;
        println!("\n✅ Results saved to: {}", path.display());
    }
    Ok(())
}

async fn run_place(place_id: &str) -> Result<()> {
    let client = SerpApiClient::new(SerpApiSettings::from_env()?)?;
    let Some(place) = client.place_info(place_id).await? else {
        bail!("Failed to retrieve place information. Please check the place ID.");
    };

    println!("🏢 Place: {}", place.title);
    println!("📍 Address: {}", place.address);
    println!(
        "⭐ Rating: {} ({} reviews)",
        format_opt(place.rating),
        format_opt(place.reviews_count)
    );
    println!("📞 Phone: {}", place.phone.as_deref().unwrap_or("N/A"));
    println!("🌐 Website: {}", place.website.as_deref().unwrap_or("N/A"));
    Ok(())
}

async fn run_collect(place_id: &str, output_dir: &Path, skip_validation: bool) -> Result<()> {
    let client = SerpApiClient::new(SerpApiSettings::from_env()?)?;
    let collector = ReviewCollector::new(client);

    if !skip_validation {
        collector.client().validate_key().await?;
    }

    println!("🔍 Using Place ID: {}", place_id);
    let Some(place) = collector.client().place_info(place_id).await? else {
        bail!("Failed to retrieve place information. Please check the place ID.");
    };

    println!("\n🏢 Place: {}", place.title);
    println!("📍 Address: {}", place.address);
    println!(
        "⭐ Rating: {} ({} reviews)",
        format_opt(place.rating),
        format_opt(place.reviews_count)
    );

    println!("\n⏳ Fetching reviews...");
    let reviews = collector.collect(place_id).await?;
    println!("✅ Fetched {} reviews.", reviews.len());

    let document = CollectionDocument::new(place, reviews);
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(document.file_name());
    document.save(&path)?;
    println!("\n✅ Place info and reviews saved to: {}", path.display());

    display_sample_reviews(&document.reviews, 3);
    Ok(())
}

async fn run_summarize(input: &Path, recursive_reduce: bool) -> Result<()> {
    let settings = LlmSettings::from_env()?;
    let documents = load_collection_inputs(input)?;
    let texts = review_texts(&documents)?;
    println!(
        "📚 Loaded {} reviews from {} document(s).",
        texts.len(),
        documents.len()
    );

    let config = SummarizerConfig {
        max_tokens_per_chunk: settings.max_tokens_per_chunk,
        recursive_reduce,
    };
    let client = LlmClient::new(settings)?;
    let summarizer = Summarizer::new(Arc::new(client), Box::new(CharEstimator::default()), config);

    let spinner = ProgressBar::new_spinner();
    spinner.set_message("Summarizing reviews...");
    spinner.enable_steady_tick(Duration::from_millis(120));
    let summary = summarizer.summarize(&texts).await;
    spinner.finish_and_clear();

    println!("\n===== REVIEW SUMMARY =====");
    println!("{}", summary?);
    Ok(())
}

fn display_sample_reviews(reviews: &[Review], count: usize) {
    if reviews.is_empty() {
        return;
    }
    println!("\n📌 Sample reviews:");
    for (index, review) in reviews.iter().take(count).enumerate() {
        println!("\nReview {}:", index + 1);
        println!("Rating: {} stars", format_opt(review.rating));
        println!("Date: {}", review.date.as_deref().unwrap_or("N/A"));
        let preview: String = review.text().unwrap_or("N/A").chars().take(200).collect();
        println!("Text: {}...", preview);
    }
}

fn format_opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}
