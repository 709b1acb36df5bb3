use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use market_mapper::analysis::{self, Clusterer};
use market_mapper::config::constants::DEFAULT_FEED_CATEGORY;
use market_mapper::config::PipelineConfig;
use market_mapper::enrichment::WebsiteEnricher;
use market_mapper::extraction::{ChunkerConfig, CommandInvoker, ExtractionOrchestrator};
use market_mapper::ops::telemetry;
use market_mapper::persistence;
use market_mapper::progress::TracingSink;
use market_mapper::research::ResearchCollector;
use market_mapper::{Pipeline, PipelineError, PipelineReport, StageSinks};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Parser)]
#[command(name = "market-mapper", version, about = "Map startup landscapes from news feeds with a local LLM")]
struct Cli {
    /// TOML file layered over the built-in defaults
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Json)]
    log_format: LogFormat,

    /// Print Prometheus metrics to stdout when done
    #[arg(long, global = true, default_value_t = false)]
    print_metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Collect sources, extract startups, enrich, cluster and save
    Run {
        /// Topic the model should extract startups for
        #[arg(long, default_value = "AI")]
        topic: String,

        /// Feed category to collect from
        #[arg(long, default_value = DEFAULT_FEED_CATEGORY)]
        category: String,

        /// JSON array of source records to use instead of fetching feeds
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,

        #[arg(long)]
        model: Option<String>,

        #[arg(long)]
        clusters: Option<usize>,

        #[arg(long)]
        max_entries_per_feed: Option<usize>,

        /// Skip the OpenVC dataset
        #[arg(long, default_value_t = false)]
        no_openvc: bool,

        /// Scrape company websites for thin descriptions
        #[arg(long, default_value_t = false)]
        enrich: bool,

        #[arg(long, value_name = "DIR")]
        data_dir: Option<PathBuf>,
    },

    /// Dedup, cluster and summarize an existing startups JSON file
    Analyze {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[arg(long)]
        clusters: Option<usize>,

        /// Write the clustered startups here
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// List feed categories and their feeds
    Feeds,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.log_format {
        LogFormat::Json => telemetry::init_tracing(),
        LogFormat::Pretty => telemetry::init_tracing_pretty(),
    }

    let mut config = match &cli.config {
        Some(path) => PipelineConfig::load(path).context("Failed to load configuration")?,
        None => PipelineConfig::default(),
    };

    match cli.command {
        Command::Run {
            topic,
            category,
            input,
            model,
            clusters,
            max_entries_per_feed,
            no_openvc,
            enrich,
            data_dir,
        } => {
            if let Some(model) = model {
                config.model = model;
            }
            if let Some(clusters) = clusters {
                config.clusters = clusters;
            }
            if let Some(max) = max_entries_per_feed {
                config.max_entries_per_feed = max;
            }
            if let Some(dir) = data_dir {
                config.data_dir = dir;
            }
            config.include_openvc &= !no_openvc;
            config.enrich |= enrich;

            run(config, &topic, &category, input).await?;
        }
        Command::Analyze {
            input,
            clusters,
            output,
        } => {
            if let Some(clusters) = clusters {
                config.clusters = clusters;
            }
            analyze(&config, input, output)?;
        }
        Command::Feeds => {
            for (category, feeds) in &config.feeds {
                println!("{} ({} feeds)", category, feeds.len());
                for feed in feeds {
                    println!("  {}", feed);
                }
            }
        }
    }

    if cli.print_metrics {
        print!("{}", telemetry::get_metrics_string());
    }

    Ok(())
}

async fn run(config: PipelineConfig, topic: &str, category: &str, input: Option<PathBuf>) -> Result<()> {
    let records = match input {
        Some(path) => persistence::load_source_records(&path)
            .with_context(|| format!("Failed to read source records from {}", path.display()))?,
        None => {
            let collector = ResearchCollector::new(config.clone()).context("Failed to build HTTP client")?;
            collector
                .fetch_all_sources(category, config.include_openvc, &TracingSink::new("research"))
                .await
        }
    };

    let invoker = CommandInvoker::new(
        config.model_program.clone(),
        vec!["run".to_string(), config.model.clone()],
        config.model.clone(),
    )
    .with_timeout(Duration::from_secs(config.model_timeout_secs));

    let extractor = ExtractionOrchestrator::new(invoker)
        .with_chunker(ChunkerConfig {
            chunk_size: config.chunk_size,
            max_content_chars: config.max_content_chars,
            ..Default::default()
        })
        .with_keywords(config.relevance_keywords.clone());

    let mut pipeline = Pipeline::new(extractor, Clusterer::new(config.clusters)).with_output_dir(&config.data_dir);
    if config.enrich {
        let enricher = WebsiteEnricher::new(
            Duration::from_secs(config.enrichment_timeout_secs),
            Duration::from_millis(config.enrichment_delay_ms),
        )
        .context("Failed to build enrichment client")?;
        pipeline = pipeline.with_enricher(enricher);
    }

    let extraction = TracingSink::new("extraction");
    let enrichment = TracingSink::new("enrichment");
    let analysis = TracingSink::new("analysis");
    let sinks = StageSinks {
        extraction: &extraction,
        enrichment: &enrichment,
        analysis: &analysis,
    };

    match pipeline.run(&records, topic, sinks).await {
        Ok(report) => {
            print_report(&report)?;
            Ok(())
        }
        Err(PipelineError::NoSourceData) => {
            anyhow::bail!("No data found from sources. Check your connection or try a different category.")
        }
        Err(e) => Err(e.into()),
    }
}

fn analyze(config: &PipelineConfig, input: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let startups = persistence::load_startups(&input)
        .with_context(|| format!("Failed to read startups from {}", input.display()))?;

    let result = analysis::analyze(startups, &Clusterer::new(config.clusters), &TracingSink::new("analysis"));
    let mut report = PipelineReport::from_analysis(result);

    if let Some(path) = output {
        persistence::save_startups(&path, &report.startups)?;
        report.output_path = Some(path);
    }

    print_report(&report)
}

fn print_report(report: &PipelineReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
