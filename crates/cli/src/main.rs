//! commentprep CLI
//!
//! Cleans and enriches social-media comment tables for analysis

mod config;
mod progress;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use commentprep_core::Pipeline;
use commentprep_formats::{open_dataset, write_dataset};
use std::path::{Path, PathBuf};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use config::PipelineFileConfig;
use progress::ProgressReporter;

#[derive(Parser)]
#[command(name = "commentprep")]
#[command(version, about = "Clean and enrich social-media comment datasets", long_about = None)]
#[command(author = "commentprep")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output statistics in JSON format
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Add cleaned text, product and language columns to every record
    Enrich {
        /// Input file (CSV, TSV or JSONL, optionally gzipped)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (CSV, TSV or JSONL)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Run config file (YAML or TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Field holding the raw comment text
        #[arg(short = 'f', long)]
        text_field: Option<String>,

        /// Target language code
        #[arg(short, long)]
        target: Option<String>,

        /// Number of worker threads
        #[arg(long)]
        threads: Option<usize>,

        /// Show statistics without writing output
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the derived fields for a single comment
    Clean {
        /// Raw comment text
        #[arg(value_name = "TEXT")]
        text: String,

        /// Run config file (YAML or TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Target language code
        #[arg(short, long)]
        target: Option<String>,
    },

    /// Inspect a dataset file
    Inspect {
        /// Path to the dataset file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Number of records to show
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
    },

    /// Count records in a dataset
    Count {
        /// Path to the dataset file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_ansi(!cli.json) // Disable colors if JSON output
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Enrich {
            input,
            output,
            config,
            text_field,
            target,
            threads,
            dry_run,
        } => {
            let overrides = Overrides {
                input,
                output,
                text_field,
                target,
                threads,
            };
            enrich(config, overrides, dry_run, cli.json).await?;
        }
        Commands::Clean {
            text,
            config,
            target,
        } => {
            clean_text(text, config, target).await?;
        }
        Commands::Inspect { input, limit } => {
            inspect_dataset(input, limit).await?;
        }
        Commands::Count { input } => {
            count_dataset(input).await?;
        }
        Commands::Completions { shell } => {
            generate_completions(shell);
        }
    }

    Ok(())
}

/// Command-line values that take precedence over the config file
#[derive(Default)]
struct Overrides {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    text_field: Option<String>,
    target: Option<String>,
    threads: Option<usize>,
}

impl Overrides {
    fn apply(self, config: &mut PipelineFileConfig) {
        if let Some(input) = self.input {
            config.input.path = Some(input.to_string_lossy().into_owned());
        }
        if let Some(output) = self.output {
            config.output.path = Some(output.to_string_lossy().into_owned());
        }
        if let Some(field) = self.text_field {
            config.input.text_field = field;
        }
        if let Some(target) = self.target {
            config.language.target = target;
        }
        if let Some(threads) = self.threads {
            config.processing.num_threads = Some(threads);
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<PipelineFileConfig> {
    match path {
        Some(path) => {
            info!("Loading config: {:?}", path);
            PipelineFileConfig::load(path)
        }
        None => Ok(PipelineFileConfig::default()),
    }
}

async fn enrich(
    config_path: Option<PathBuf>,
    overrides: Overrides,
    dry_run: bool,
    json_output: bool,
) -> Result<()> {
    let mut config = load_config(config_path.as_deref())?;
    overrides.apply(&mut config);

    let input = config
        .input
        .path
        .as_deref()
        .map(PathBuf::from)
        .context("No input file given (use --input or input.path in the config)")?;
    let output = config.output.path.as_deref().map(PathBuf::from);
    if output.is_none() && !dry_run {
        anyhow::bail!("No output file given (use --output or output.path in the config)");
    }

    info!("Starting comment enrichment");
    info!("  Input: {:?}", input);
    if let Some(ref output) = output {
        info!("  Output: {:?}", output);
    }
    info!("  Text field: {}", config.input.text_field);
    info!("  Target language: {}", config.language.target);
    info!("  Products: {}", config.products.phrases.len());

    // Build before reading so bad configuration fails without touching data
    let pipeline_config = config.pipeline_config();
    let chunk_size = pipeline_config.chunk_size;
    let pipeline = Pipeline::new(pipeline_config).context("Invalid pipeline configuration")?;

    let mut reader =
        open_dataset(&input).with_context(|| format!("Failed to open input: {}", input.display()))?;

    let progress = ProgressReporter::new(reader.total_bytes().unwrap_or(0))?;
    let mut records = Vec::new();
    while let Some(result) = reader.next() {
        let record = result.with_context(|| format!("Failed to read input: {}", input.display()))?;
        records.push(record);

        if records.len() % 1000 == 0 {
            progress.update_read(reader.bytes_processed(), records.len());
        }
    }
    progress.update_read(reader.bytes_processed(), records.len());
    progress.finish();
    debug!("Read {} records", records.len());

    let progress = ProgressReporter::new_record_based(records.len() as u64)?;
    let mut enriched = Vec::with_capacity(records.len());
    for chunk in records.chunks(chunk_size) {
        enriched.extend(pipeline.enrich(chunk).context("Enrichment aborted")?);
        progress.update_enrich(&pipeline.stats());
    }
    progress.finish();

    let written = match output.as_deref() {
        Some(output) if !dry_run => {
            write_dataset(output, &enriched)
                .with_context(|| format!("Failed to write output: {}", output.display()))?;
            Some(output)
        }
        _ => None,
    };

    let stats = pipeline.stats();

    if json_output {
        let report = serde_json::json!({
            "input": input.to_string_lossy().to_string(),
            "output": written.map(|p| p.to_string_lossy().to_string()),
            "target_language": pipeline.target_code(),
            "target_language_rate": stats.target_language_rate(),
            "product_rate": stats.product_rate(),
            "stats": &stats,
            "dry_run": dry_run,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        progress::print_summary_report(&input, written, pipeline.target_code(), &stats);
    }

    Ok(())
}

async fn clean_text(text: String, config_path: Option<PathBuf>, target: Option<String>) -> Result<()> {
    let mut config = load_config(config_path.as_deref())?;
    Overrides {
        target,
        ..Default::default()
    }
    .apply(&mut config);

    let pipeline = Pipeline::new(config.pipeline_config()).context("Invalid pipeline configuration")?;
    let derived = pipeline.derive(Some(&text));

    println!("{}", serde_json::to_string_pretty(&derived)?);

    Ok(())
}

async fn inspect_dataset(input: PathBuf, limit: usize) -> Result<()> {
    info!("Inspecting dataset: {:?}", input);

    let mut reader = open_dataset(&input)?;
    let mut count = 0;

    while let Some(result) = reader.next() {
        if count >= limit {
            break;
        }

        let record = result?;
        println!(
            "Record #{}: {}",
            record.source_line,
            serde_json::to_string_pretty(&record.data)?
        );
        count += 1;
    }

    info!(
        "Processed {} records ({} bytes)",
        reader.records_processed(),
        reader.bytes_processed()
    );

    Ok(())
}

async fn count_dataset(input: PathBuf) -> Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};

    info!("Counting records in: {:?}", input);

    let mut reader = open_dataset(&input)?;

    let pb = if let Some(total) = reader.total_bytes() {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut count = 0;
    while let Some(result) = reader.next() {
        let _record = result?;
        count += 1;

        if let Some(ref pb) = pb {
            pb.set_position(reader.bytes_processed());
        }

        if count % 10000 == 0 {
            info!("Processed {} records...", count);
        }
    }

    if let Some(pb) = pb {
        pb.finish();
    }

    println!("Total records: {}", count);
    info!("Processed {} bytes", reader.bytes_processed());

    Ok(())
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
}
