use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use tracing::info;

use palisade::config;
use palisade::registry::traits::RegistryResolver;

/// Palisade: phishing risk scoring for URLs.
///
/// Runs structural and registration-data analyzers over a URL and folds
/// their findings into a single weighted risk verdict.
#[derive(Parser)]
#[command(name = "palisade", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single URL and print the verdict
    Analyze {
        /// The URL to analyze (e.g. https://example.com/login)
        url: String,

        /// Print the full verdict as JSON instead of the terminal view
        #[arg(long)]
        json: bool,

        /// Skip the registration-data analyzer (no network calls)
        #[arg(long)]
        no_registry: bool,
    },

    /// Analyze every URL in a file, one per line
    Batch {
        /// Path to the URL list ('#' lines and blanks are skipped)
        file: String,

        /// Print all verdicts as a JSON array instead of the table
        #[arg(long)]
        json: bool,

        /// Skip the registration-data analyzer (no network calls)
        #[arg(long)]
        no_registry: bool,

        /// Number of URLs to analyze in parallel (default: 4)
        #[arg(long, default_value = "4")]
        concurrency: u32,
    },

    /// Fetch and display the raw registration record for a domain
    Lookup {
        /// The domain to look up (e.g. example.com)
        domain: String,

        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("palisade=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            url,
            json,
            no_registry,
        } => {
            let config = config::Config::load()?;
            let pipeline = build_pipeline(&config, no_registry)?;

            if !json {
                println!("Analyzing {url}...");
            }

            let verdict = pipeline.analyze(&url).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&verdict)?);
            } else {
                palisade::output::terminal::display_verdict(&verdict);
            }
        }

        Commands::Batch {
            file,
            json,
            no_registry,
            concurrency,
        } => {
            let config = config::Config::load()?;
            let pipeline = build_pipeline(&config, no_registry)?;

            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read URL list from {file}"))?;
            let urls: Vec<&str> = raw
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .collect();

            if urls.is_empty() {
                println!("No URLs found in {file}.");
                return Ok(());
            }

            info!(urls = urls.len(), concurrency, "Starting batch analysis");
            if !json {
                println!(
                    "Analyzing {} URLs ({} concurrent)...",
                    urls.len(),
                    concurrency,
                );
            }

            let pb = ProgressBar::new(urls.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("  Analyzing [{bar:30}] {pos}/{len} ({eta})")
                    .unwrap(),
            );

            let pipeline_ref = &pipeline;
            let pb_ref = &pb;
            let verdicts: Vec<palisade::scoring::verdict::AggregateResult> =
                stream::iter(urls.into_iter().map(|url| async move {
                    let verdict = pipeline_ref.analyze(url).await;
                    pb_ref.inc(1);
                    verdict
                }))
                .buffer_unordered(concurrency as usize)
                .collect()
                .await;
            pb.finish_and_clear();

            if json {
                println!("{}", serde_json::to_string_pretty(&verdicts)?);
            } else {
                palisade::output::terminal::display_batch(&verdicts);
            }
        }

        Commands::Lookup { domain, json } => {
            let config = config::Config::load()?;
            let resolver = palisade::registry::rdap::RdapResolver::new(
                &config.rdap_base_url,
                config.registry_timeout,
            )?;

            let domain = domain.trim().to_ascii_lowercase();
            if !json {
                println!("Looking up registration for {domain}...");
            }

            let record = resolver.lookup(&domain).await?;
            let analysis = palisade::analyzers::registry::evaluate_record(
                &palisade::analyzers::registry::RegistryHeuristics::default(),
                &domain,
                &record,
                chrono::Utc::now(),
            );

            if json {
                let combined = serde_json::json!({
                    "record": record,
                    "analysis": analysis,
                });
                println!("{}", serde_json::to_string_pretty(&combined)?);
            } else {
                palisade::output::terminal::display_registry_record(&domain, &record);
                palisade::output::terminal::display_registry_analysis(&analysis);
            }
        }
    }

    Ok(())
}

/// Assemble the analyzer pipeline.
///
/// The URL analyzer always runs and registers first, so its metadata
/// labels the verdict. The registration analyzer joins unless the caller
/// asked for a fully offline run.
fn build_pipeline(
    config: &config::Config,
    no_registry: bool,
) -> Result<palisade::pipeline::AnalysisPipeline> {
    let engine = palisade::scoring::engine::ScoringEngine::new();
    let mut pipeline = palisade::pipeline::AnalysisPipeline::new(engine);

    pipeline.register(Box::new(palisade::analyzers::url::UrlAnalyzer::new(
        config.trusted_domains.clone(),
    )));

    if no_registry {
        info!("Registration analyzer disabled, structural checks only");
    } else {
        let resolver = palisade::registry::rdap::RdapResolver::new(
            &config.rdap_base_url,
            config.registry_timeout,
        )?;
        let cache = Arc::new(palisade::registry::cache::RegistryCache::new(
            config.cache_ttl,
        ));
        pipeline.register(Box::new(
            palisade::analyzers::registry::RegistryAnalyzer::new(Arc::new(resolver), cache),
        ));
    }

    Ok(pipeline)
}
