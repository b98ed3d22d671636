//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.solverstat.toml` files.

use crate::analysis::{DEFAULT_ITERATION_SHIFT, DEFAULT_SUCCESS_STATUS, DEFAULT_TIME_SHIFT};
use crate::cli::{Args, Command};
use crate::fetch::FetchOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name.
pub const CONFIG_FILE: &str = ".solverstat.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Method column schema.
    #[serde(default)]
    pub schema: SchemaConfig,

    /// Statistics settings.
    #[serde(default)]
    pub stats: StatsConfig,

    /// Instance download settings.
    #[serde(default)]
    pub fetch: FetchConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Which methods to summarize and how their runs are judged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Method identifiers (column suffixes). Empty means discover from the header.
    #[serde(default)]
    pub methods: Vec<String>,

    /// Baseline method. Defaults to the first method in the table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline: Option<String>,

    /// Termination string counted as success.
    #[serde(default = "default_success_status")]
    pub success_status: String,

    /// Fail instead of skipping methods with missing columns.
    #[serde(default)]
    pub strict_schema: bool,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            methods: Vec::new(),
            baseline: None,
            success_status: default_success_status(),
            strict_schema: false,
        }
    }
}

fn default_success_status() -> String {
    DEFAULT_SUCCESS_STATUS.to_string()
}

/// Statistics and output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Shift added to iteration counts before the geometric mean.
    #[serde(default = "default_iteration_shift")]
    pub iteration_shift: f64,

    /// Shift added to solve times before the geometric mean.
    #[serde(default = "default_time_shift")]
    pub time_shift: f64,

    /// Decimal places in the written table.
    #[serde(default = "default_precision")]
    pub precision: usize,

    /// Directory name that marks input tables.
    #[serde(default = "default_tables_dir")]
    pub tables_dir: String,

    /// Directory name that replaces `tables_dir` in the output path.
    #[serde(default = "default_stats_dir")]
    pub stats_dir: String,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            iteration_shift: default_iteration_shift(),
            time_shift: default_time_shift(),
            precision: default_precision(),
            tables_dir: default_tables_dir(),
            stats_dir: default_stats_dir(),
        }
    }
}

fn default_iteration_shift() -> f64 {
    DEFAULT_ITERATION_SHIFT
}

fn default_time_shift() -> f64 {
    DEFAULT_TIME_SHIFT
}

fn default_precision() -> usize {
    2
}

fn default_tables_dir() -> String {
    "table".to_string()
}

fn default_stats_dir() -> String {
    "stats".to_string()
}

/// Instance download settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// URL template; `{name}` is replaced by the instance name.
    #[serde(default = "default_url_template")]
    pub url_template: String,

    /// Local file name template.
    #[serde(default = "default_file_template")]
    pub file_template: String,

    /// Directory downloaded files are written to.
    #[serde(default = "default_fetch_dir")]
    pub output_dir: PathBuf,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            url_template: default_url_template(),
            file_template: default_file_template(),
            output_dir: default_fetch_dir(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_url_template() -> String {
    FetchOptions::default().url_template
}

fn default_file_template() -> String {
    FetchOptions::default().file_template
}

fn default_fetch_dir() -> PathBuf {
    FetchOptions::default().output_dir
}

fn default_timeout() -> u64 {
    FetchOptions::default().timeout_seconds
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence; only explicitly provided values override.
    pub fn merge_with_args(&mut self, args: &Args) {
        if args.verbose {
            self.general.verbose = true;
        }

        match &args.command {
            Some(Command::Summarize(cmd)) => {
                if let Some(ref methods) = cmd.methods {
                    // Headers are trimmed on load, so "A, B" must name "B".
                    self.schema.methods = methods
                        .iter()
                        .map(|m| m.trim().to_string())
                        .filter(|m| !m.is_empty())
                        .collect();
                }
                if let Some(ref baseline) = cmd.baseline {
                    self.schema.baseline = Some(baseline.trim().to_string());
                }
                if let Some(ref status) = cmd.success_status {
                    self.schema.success_status = status.clone();
                }
                if cmd.strict {
                    self.schema.strict_schema = true;
                }
                if let Some(shift) = cmd.iteration_shift {
                    self.stats.iteration_shift = shift;
                }
                if let Some(shift) = cmd.time_shift {
                    self.stats.time_shift = shift;
                }
                if let Some(precision) = cmd.precision {
                    self.stats.precision = precision;
                }
            }
            Some(Command::Fetch(cmd)) => {
                if let Some(ref template) = cmd.url_template {
                    self.fetch.url_template = template.clone();
                }
                if let Some(ref dir) = cmd.output_dir {
                    self.fetch.output_dir = dir.clone();
                }
                if let Some(timeout) = cmd.timeout {
                    self.fetch.timeout_seconds = timeout;
                }
            }
            None => {}
        }
    }

    /// Download options for the fetch subcommand.
    pub fn fetch_options(&self, show_progress: bool) -> FetchOptions {
        FetchOptions {
            url_template: self.fetch.url_template.clone(),
            file_template: self.fetch.file_template.clone(),
            output_dir: self.fetch.output_dir.clone(),
            timeout_seconds: self.fetch.timeout_seconds,
            show_progress,
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{FetchArgs, OutputFormat, SummarizeArgs};

    fn summarize_args(cmd: SummarizeArgs) -> Args {
        Args {
            command: Some(Command::Summarize(cmd)),
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    fn empty_summarize() -> SummarizeArgs {
        SummarizeArgs {
            input: PathBuf::from("output/table/netlib/runs.csv"),
            output: None,
            methods: None,
            baseline: None,
            success_status: None,
            iteration_shift: None,
            time_shift: None,
            precision: None,
            strict: false,
            format: OutputFormat::Csv,
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.schema.success_status, "OPTIMAL");
        assert!(config.schema.methods.is_empty());
        assert_eq!(config.stats.iteration_shift, 10.0);
        assert_eq!(config.stats.time_shift, 0.0);
        assert_eq!(config.stats.precision, 2);
        assert!(config.fetch.url_template.contains("{name}"));
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[schema]
methods = ["adaPDLP", "osPDLP", "ifosPDLP"]
baseline = "adaPDLP"

[stats]
iteration_shift = 1.0
stats_dir = "summary"

[fetch]
output_dir = "data/MIPLIB383"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.schema.methods.len(), 3);
        assert_eq!(config.schema.baseline.as_deref(), Some("adaPDLP"));
        assert_eq!(config.schema.success_status, "OPTIMAL");
        assert_eq!(config.stats.iteration_shift, 1.0);
        assert_eq!(config.stats.time_shift, 0.0);
        assert_eq!(config.stats.stats_dir, "summary");
        assert_eq!(config.fetch.output_dir, PathBuf::from("data/MIPLIB383"));
    }

    #[test]
    fn test_merge_with_summarize_args() {
        let mut config = Config::default();
        config.schema.baseline = Some("adaPDLP".to_string());

        let mut cmd = empty_summarize();
        cmd.methods = Some(vec!["A".to_string(), "B".to_string()]);
        cmd.iteration_shift = Some(1.0);
        cmd.strict = true;
        config.merge_with_args(&summarize_args(cmd));

        assert_eq!(config.schema.methods, vec!["A", "B"]);
        assert_eq!(config.schema.baseline.as_deref(), Some("adaPDLP"));
        assert!(config.schema.strict_schema);
        assert_eq!(config.stats.iteration_shift, 1.0);
        assert_eq!(config.stats.time_shift, 0.0);
    }

    #[test]
    fn test_merge_trims_method_names() {
        let mut config = Config::default();

        let mut cmd = empty_summarize();
        cmd.methods = Some(vec!["adaPDLP".to_string(), " osPDLP ".to_string()]);
        cmd.baseline = Some(" osPDLP".to_string());
        config.merge_with_args(&summarize_args(cmd));

        assert_eq!(config.schema.methods, vec!["adaPDLP", "osPDLP"]);
        assert_eq!(config.schema.baseline.as_deref(), Some("osPDLP"));
    }

    #[test]
    fn test_merge_with_fetch_args() {
        let mut config = Config::default();
        let args = Args {
            command: Some(Command::Fetch(FetchArgs {
                list: PathBuf::from("data/missing_files"),
                output_dir: Some(PathBuf::from("data/MIPLIB383")),
                url_template: None,
                timeout: Some(30),
            })),
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        };

        config.merge_with_args(&args);
        let options = config.fetch_options(false);

        assert_eq!(options.output_dir, PathBuf::from("data/MIPLIB383"));
        assert_eq!(options.timeout_seconds, 30);
        assert_eq!(options.url_template, FetchOptions::default().url_template);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[schema]"));
        assert!(toml_str.contains("[stats]"));
        assert!(toml_str.contains("[fetch]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.stats.precision, 2);
    }
}
