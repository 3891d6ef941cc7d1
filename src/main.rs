//! Readability pipeline: binary entrypoint.
//! Loads config and lexicon, opens the store and dispatches one subcommand.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use article_readability::batch::BatchOptions;
use article_readability::config::load_config;
use article_readability::lexicon::Lexicon;
use article_readability::pipeline::Pipeline;
use article_readability::segment::JiebaSegmenter;
use article_readability::store::JsonFileStore;

const DEFAULT_LOG_FILTER: &str = "batch=info,enrich=info,export=info,lexicon=info,pipeline=info,warn";

#[derive(Debug, Parser)]
#[command(name = "readability", about = "Readability and rhetoric metrics for health articles")]
struct Cli {
    /// Pipeline config (TOML). Falls back to $READABILITY_CONFIG_PATH, then config/pipeline.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Args)]
struct MetricsArgs {
    /// Process at most this many articles.
    #[arg(long)]
    limit: Option<usize>,
    /// Skip articles whose metric record is already complete.
    #[arg(long)]
    skip_completed: bool,
    /// Records per bulk write.
    #[arg(long)]
    chunk_size: Option<usize>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Segment and tag article text (writes `words` and `pos`).
    Segment,
    /// Score sentences (writes `sentiment_list`).
    Sentiment,
    /// Compute metric records.
    Metrics(MetricsArgs),
    /// Copy metric records under external field names.
    Export,
    /// Join engagement records with the exported metrics.
    Merge,
    /// Delete documents missing any of the given fields.
    Prune {
        #[arg(long)]
        collection: Option<String>,
        #[arg(long = "field", default_value = "text")]
        fields: Vec<String>,
    },
    /// prune, segment, sentiment, metrics, export, merge.
    Run(MetricsArgs),
}

/// Compact logs by default, JSON when READABILITY_LOG_JSON=1.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = std::env::var("READABILITY_LOG_JSON")
        .ok()
        .is_some_and(|v| v == "1");

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

fn batch_options(base: BatchOptions, args: &MetricsArgs) -> BatchOptions {
    BatchOptions {
        limit: args.limit.or(base.limit),
        skip_completed: args.skip_completed || base.skip_completed,
        chunk_size: args.chunk_size.filter(|&n| n > 0).unwrap_or(base.chunk_size),
        ..base
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    let cfg = load_config(cli.config.as_deref())?;
    let lexicon = Lexicon::load(&cfg.lexicon).context("loading lexical resources")?;
    let store = JsonFileStore::open(&cfg.store_dir)
        .await
        .with_context(|| format!("opening store at {}", cfg.store_dir.display()))?;

    let base = BatchOptions::from_config(&cfg);
    let pipeline = Pipeline::new(
        cfg,
        Arc::new(store),
        Arc::new(lexicon),
        Arc::new(JiebaSegmenter::new()),
    );

    match cli.command {
        Command::Segment => {
            pipeline.segment().await?;
        }
        Command::Sentiment => {
            pipeline.sentiment().await?;
        }
        Command::Metrics(args) => {
            pipeline.metrics(&batch_options(base, &args)).await?;
        }
        Command::Export => {
            pipeline.export().await?;
        }
        Command::Merge => {
            pipeline.merge().await?;
        }
        Command::Prune { collection, fields } => {
            let collection =
                collection.unwrap_or_else(|| pipeline.config().collections.articles.clone());
            pipeline.prune(&collection, &fields).await?;
        }
        Command::Run(args) => {
            pipeline.run_all(&batch_options(base, &args)).await?;
        }
    }
    Ok(())
}
