//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// solverstat - summary statistics for solver benchmark tables
///
/// Filters a benchmark result table to successful runs and reports shifted
/// geometric means, means, and win/tie/loss counts against a baseline.
///
/// Examples:
///   solverstat summarize output/table/netlib/merged_time_180.0.csv
///   solverstat summarize runs.csv --output stats.csv --baseline adaPDLP
///   solverstat summarize runs.csv --methods adaPDLP,osPDLP --format markdown
///   solverstat fetch data/missing_files --output-dir data/MIPLIB383
///   solverstat --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(arg_required_else_help = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .solverstat.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Generate a default .solverstat.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Summarize a benchmark result table
    #[command(visible_alias = "stats")]
    Summarize(SummarizeArgs),

    /// Download benchmark instances listed in a file
    Fetch(FetchArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct SummarizeArgs {
    /// Run table (CSV) to summarize
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file path
    ///
    /// Defaults to the input path with its tables directory renamed to the
    /// stats directory (e.g. output/table/x.csv -> output/stats/x.csv).
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Methods to summarize (comma-separated column suffixes)
    ///
    /// Example: --methods adaPDLP,osPDLP,ifosPDLP
    #[arg(long, value_name = "METHODS", value_delimiter = ',')]
    pub methods: Option<Vec<String>>,

    /// Baseline method for better/equal/worse counts
    #[arg(short, long, value_name = "METHOD")]
    pub baseline: Option<String>,

    /// Termination string that marks a successful run
    #[arg(long, value_name = "STATUS")]
    pub success_status: Option<String>,

    /// Shift added to iteration counts before the geometric mean
    #[arg(long, value_name = "SHIFT", allow_negative_numbers = true)]
    pub iteration_shift: Option<f64>,

    /// Shift added to solve times before the geometric mean
    #[arg(long, value_name = "SHIFT", allow_negative_numbers = true)]
    pub time_shift: Option<f64>,

    /// Decimal places in the written table
    #[arg(long, value_name = "DIGITS")]
    pub precision: Option<usize>,

    /// Fail if any method is missing a column instead of skipping it
    #[arg(long)]
    pub strict: bool,

    /// Output format (csv, markdown, json)
    #[arg(long, default_value = "csv", value_name = "FORMAT")]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug, Clone)]
pub struct FetchArgs {
    /// Newline-delimited list of instance names
    #[arg(value_name = "LIST")]
    pub list: PathBuf,

    /// Directory the instances are saved to
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// URL template; {name} is replaced by the instance name
    #[arg(long, value_name = "URL")]
    pub url_template: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// Output format for the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// CSV table (default)
    #[default]
    Csv,
    /// Markdown report
    Markdown,
    /// JSON report
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        match &self.command {
            Some(Command::Summarize(cmd)) => cmd.validate(),
            Some(Command::Fetch(cmd)) => cmd.validate(),
            None => Err("A subcommand is required (summarize or fetch)".to_string()),
        }
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

impl SummarizeArgs {
    fn validate(&self) -> Result<(), String> {
        if !self.input.is_file() {
            return Err(format!("Input table does not exist: {}", self.input.display()));
        }

        for (flag, shift) in [
            ("--iteration-shift", self.iteration_shift),
            ("--time-shift", self.time_shift),
        ] {
            if let Some(shift) = shift {
                if !shift.is_finite() {
                    return Err(format!("{} must be a finite number", flag));
                }
            }
        }

        if let Some(ref methods) = self.methods {
            if methods.iter().any(|m| m.trim().is_empty()) {
                return Err("Method names must not be empty".to_string());
            }
        }

        Ok(())
    }
}

impl FetchArgs {
    fn validate(&self) -> Result<(), String> {
        if !self.list.is_file() {
            return Err(format!("Instance list does not exist: {}", self.list.display()));
        }

        if let Some(ref template) = self.url_template {
            if !template.starts_with("http://") && !template.starts_with("https://") {
                return Err("URL template must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        Ok(())
    }
}
