//! Benchmark instance downloads.
//!
//! Reads a list of instance names and fetches each one from a public
//! archive, one request at a time. The first failure aborts the batch.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Placeholder substituted with the instance name in URL and file templates.
pub const NAME_PLACEHOLDER: &str = "{name}";

/// Options for downloading instances.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// URL template containing `{name}`.
    pub url_template: String,
    /// Local file name template containing `{name}`.
    pub file_template: String,
    /// Directory the files are written to.
    pub output_dir: PathBuf,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
    /// Whether to show a progress bar.
    pub show_progress: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            url_template: "https://miplib.zib.de/WebData/instances/{name}.mps.gz".to_string(),
            file_template: "{name}.mps.gz".to_string(),
            output_dir: PathBuf::from("data/instances"),
            timeout_seconds: 300,
            show_progress: true,
        }
    }
}

/// Substitute an instance name into a template.
pub fn instance_url(template: &str, name: &str) -> String {
    template.replace(NAME_PLACEHOLDER, name)
}

/// Parse newline-delimited instance names.
///
/// Whitespace is trimmed, blank lines are skipped, and repeated names are
/// kept only once (first occurrence wins).
pub fn parse_instance_list(content: &str) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut names: Vec<String> = Vec::new();
    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if seen.insert(line) {
            names.push(line.to_string());
        }
    }
    names
}

/// Read instance names from a file.
pub fn read_instance_list(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read instance list: {}", path.display()))?;
    Ok(parse_instance_list(&content))
}

/// Sequential instance downloader.
pub struct InstanceDownloader {
    client: reqwest::Client,
    options: FetchOptions,
}

impl InstanceDownloader {
    /// Create a downloader with its own HTTP client.
    pub fn new(options: FetchOptions) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, options })
    }

    /// Local path an instance is saved to.
    pub fn target_path(&self, name: &str) -> PathBuf {
        self.options
            .output_dir
            .join(instance_url(&self.options.file_template, name))
    }

    /// Download one instance and return the path it was written to.
    pub async fn download(&self, name: &str) -> Result<PathBuf> {
        let url = instance_url(&self.options.url_template, name);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Request failed: {}", url))?
            .error_for_status()
            .with_context(|| format!("Download failed: {}", url))?;

        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read response body: {}", url))?;

        let path = self.target_path(name);
        tokio::fs::write(&path, &bytes)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        debug!("Saved {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }

    /// Download every instance in order, stopping at the first failure.
    pub async fn download_all(&self, names: &[String]) -> Result<Vec<PathBuf>> {
        tokio::fs::create_dir_all(&self.options.output_dir)
            .await
            .with_context(|| {
                format!(
                    "Failed to create output directory: {}",
                    self.options.output_dir.display()
                )
            })?;

        let progress_bar = if self.options.show_progress {
            let pb = ProgressBar::new(names.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        let mut saved = Vec::with_capacity(names.len());
        for name in names {
            if let Some(ref pb) = progress_bar {
                pb.set_message(name.clone());
            }

            saved.push(self.download(name).await?);
            info!("Downloaded {}", name);

            if let Some(ref pb) = progress_bar {
                pb.inc(1);
            }
        }

        if let Some(pb) = progress_bar {
            pb.finish_with_message("Downloads complete");
        }

        Ok(saved)
    }
}
