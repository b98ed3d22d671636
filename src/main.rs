//! solverstat - summary statistics for solver benchmark tables
//!
//! A CLI tool that filters benchmark result tables to successful runs,
//! computes per-method shifted geometric means and comparison counts
//! against a baseline, and downloads benchmark instances by name.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Error (bad arguments, schema mismatch, domain error, failed download)

mod analysis;
mod cli;
mod config;
mod error;
mod fetch;
mod models;
mod report;
mod table;

use analysis::SummaryOptions;
use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, Command, FetchArgs, OutputFormat, SummarizeArgs};
use config::{Config, CONFIG_FILE};
use error::StatsError;
use models::{Report, ReportMetadata};
use std::path::PathBuf;
use std::time::Instant;
use table::{RunTable, Schema};
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    let mut config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(&args, &config);

    info!("solverstat v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    let result = match args.command {
        Some(Command::Summarize(ref cmd)) => {
            run_summarize(&config, cmd, args.quiet).map(|_| ())
        }
        Some(Command::Fetch(ref cmd)) => run_fetch(&config, cmd, args.quiet).await,
        None => Ok(()),
    };

    if let Err(e) = result {
        error!("Failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .solverstat.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to declare methods, the baseline, shifts, and download paths.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args, config: &Config) {
    let level = if config.general.verbose && !args.quiet {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Warning: tracing subscriber already set");
    }
}

/// Load configuration from the explicit path, the default file, or defaults.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    Ok(Config::load_default()?.unwrap_or_default())
}

/// Run the summary workflow. Returns the path the report was written to.
fn run_summarize(config: &Config, cmd: &SummarizeArgs, quiet: bool) -> Result<PathBuf> {
    let start_time = Instant::now();

    // Step 1: Load and validate the table
    let table = RunTable::from_path(&cmd.input)
        .with_context(|| format!("Failed to load run table {}", cmd.input.display()))?;
    info!("Loaded {} runs from {}", table.len(), cmd.input.display());

    let schema = Schema::configured_or_discovered(&config.schema.methods, &table);
    let validated = schema.validate(&table, config.schema.strict_schema)?;

    let baseline = match config.schema.baseline {
        Some(ref baseline) => baseline.clone(),
        None => validated
            .methods()
            .first()
            .map(|m| m.method.clone())
            .ok_or(StatsError::NoMethods)?,
    };
    info!(
        "Methods: {} (baseline {})",
        validated
            .methods()
            .iter()
            .map(|m| m.method.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        baseline
    );

    // Step 2: Filter to successful runs
    let success = &config.schema.success_status;
    let terminations = analysis::tally_terminations(&table, &schema)?;
    let filtered = analysis::filter_successful(&table, success)?;
    info!(
        "{} of {} runs ended with {} for every method",
        filtered.len(),
        table.len(),
        success
    );

    // Step 3: Aggregate
    let options = SummaryOptions {
        iteration_shift: config.stats.iteration_shift,
        time_shift: config.stats.time_shift,
    };
    let summaries = analysis::summarize(&filtered, &validated, &baseline, &options)?;

    let report = Report {
        metadata: ReportMetadata {
            source: cmd.input.display().to_string(),
            generated_at: Utc::now(),
            baseline: baseline.clone(),
            success_status: success.clone(),
            total_rows: table.len(),
            successful_rows: filtered.len(),
            iteration_shift: options.iteration_shift,
            time_shift: options.time_shift,
        },
        summaries,
        terminations,
        excluded: validated.excluded().to_vec(),
    };

    // Step 4: Emit
    let precision = config.stats.precision;
    let output = match cmd.format {
        OutputFormat::Csv => report::generate_csv_report(&report.summaries, precision)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report, precision),
        OutputFormat::Json => report::generate_json_report(&report)?,
    };

    let output_path = match cmd.output {
        Some(ref path) => path.clone(),
        None => report::derive_output_path(
            &cmd.input,
            &config.stats.tables_dir,
            &config.stats.stats_dir,
        )?,
    };
    report::write_report(&output, &output_path)?;

    if !quiet {
        println!(
            "\n📊 Summary ({} of {} runs, baseline {}):",
            filtered.len(),
            table.len(),
            baseline
        );
        for s in &report.summaries {
            println!(
                "   {:<16} iter SGM {:>12.*}  time SGM {:>10.*}  better/equal/worse {}/{}/{}",
                s.method,
                precision,
                s.iteration_sgm,
                precision,
                s.time_sgm,
                s.comparison.better,
                s.comparison.equal,
                s.comparison.worse
            );
        }
        println!("   Duration: {:.2}s", start_time.elapsed().as_secs_f64());
        println!("\n✅ Summary saved to: {}", output_path.display());
    }

    Ok(output_path)
}

/// Run the instance download workflow.
async fn run_fetch(config: &Config, cmd: &FetchArgs, quiet: bool) -> Result<()> {
    let names = fetch::read_instance_list(&cmd.list)?;
    info!("Fetching {} instances from {}", names.len(), cmd.list.display());

    let downloader = fetch::InstanceDownloader::new(config.fetch_options(!quiet))?;
    let saved = downloader.download_all(&names).await?;

    if !quiet {
        println!(
            "\n✅ Downloaded {} instances to {}",
            saved.len(),
            config.fetch.output_dir.display()
        );
    }

    Ok(())
}
