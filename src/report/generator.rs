//! Summary report generation.
//!
//! This module renders method summaries as CSV, Markdown, or JSON and
//! writes them next to the stats location derived from the input path.

use crate::models::{MethodSummary, Report, ReportMetadata, TerminationTally};
use anyhow::{Context, Result};
use std::path::{Component, Path, PathBuf};
use tracing::info;

/// Column headers of the summary table.
pub const SUMMARY_COLUMNS: [&str; 8] = [
    "Method",
    "Iteration SGM",
    "Iteration Mean",
    "Time SGM",
    "Time Mean",
    "Better",
    "Equal",
    "Worse",
];

/// One summary row as display strings, floats rounded to `precision` places.
fn summary_cells(summary: &MethodSummary, precision: usize) -> [String; 8] {
    [
        summary.method.clone(),
        format!("{:.*}", precision, summary.iteration_sgm),
        format!("{:.*}", precision, summary.iteration_mean),
        format!("{:.*}", precision, summary.time_sgm),
        format!("{:.*}", precision, summary.time_mean),
        summary.comparison.better.to_string(),
        summary.comparison.equal.to_string(),
        summary.comparison.worse.to_string(),
    ]
}

/// Generate the summary table as CSV.
pub fn generate_csv_report(summaries: &[MethodSummary], precision: usize) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(SUMMARY_COLUMNS)?;
    for summary in summaries {
        writer.write_record(summary_cells(summary, precision))?;
    }

    let bytes = writer.into_inner().context("Failed to flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report, precision: usize) -> String {
    let mut output = String::new();

    output.push_str("# Benchmark Summary\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_summary_section(&report.summaries, precision));
    output.push_str(&generate_termination_section(
        &report.terminations,
        &report.metadata.success_status,
    ));

    if !report.excluded.is_empty() {
        output.push_str("## Excluded Methods\n\n");
        for excluded in &report.excluded {
            output.push_str(&format!(
                "- `{}`: missing {}\n",
                excluded.method,
                excluded.missing.join(", ")
            ));
        }
        output.push('\n');
    }

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** `{}`\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Baseline:** `{}`\n", metadata.baseline));
    section.push_str(&format!(
        "- **Successful Runs:** {} of {} (status `{}`)\n",
        metadata.successful_rows, metadata.total_rows, metadata.success_status
    ));
    section.push_str(&format!(
        "- **Shifts:** iterations {}, time {}\n",
        metadata.iteration_shift, metadata.time_shift
    ));
    section.push('\n');

    section
}

/// Generate the statistics table.
fn generate_summary_section(summaries: &[MethodSummary], precision: usize) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str(&format!("| {} |\n", SUMMARY_COLUMNS.join(" | ")));
    section.push_str("|:---|---:|---:|---:|---:|:---:|:---:|:---:|\n");

    for summary in summaries {
        section.push_str(&format!(
            "| {} |\n",
            summary_cells(summary, precision).join(" | ")
        ));
    }
    section.push('\n');

    section
}

/// Generate the termination breakdown.
fn generate_termination_section(tallies: &[TerminationTally], success: &str) -> String {
    if tallies.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Termination Status\n\n");
    section.push_str("| Method | Status | Runs |\n");
    section.push_str("|:---|:---|:---:|\n");

    for tally in tallies {
        for (status, count) in &tally.counts {
            section.push_str(&format!("| {} | {} | {} |\n", tally.method, status, count));
        }
    }
    section.push('\n');

    let excluded: usize = tallies.iter().map(|t| t.unsuccessful(success)).sum();
    if excluded > 0 {
        section.push_str(&format!(
            "*{} run(s) ended with a status other than `{}` and were left out of the statistics.*\n\n",
            excluded, success
        ));
    }

    section
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Map an input table path to its stats location.
///
/// The first path component equal to `tables_dir` is replaced by `stats_dir`,
/// so `output/table/netlib/runs.csv` becomes `output/stats/netlib/runs.csv`.
pub fn derive_output_path(input: &Path, tables_dir: &str, stats_dir: &str) -> Result<PathBuf> {
    let mut replaced = false;
    let mut output = PathBuf::new();

    for component in input.components() {
        match component {
            Component::Normal(name) if !replaced && name == tables_dir => {
                output.push(stats_dir);
                replaced = true;
            }
            other => output.push(other.as_os_str()),
        }
    }

    if !replaced {
        anyhow::bail!(
            "Input path {} has no '{}' directory to map to '{}'; pass --output explicitly",
            input.display(),
            tables_dir,
            stats_dir
        );
    }

    Ok(output)
}

/// Write report content, creating the parent directory if needed.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    info!("Wrote report: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ComparisonCounts;
    use crate::table::schema::ExcludedMethod;
    use chrono::Utc;

    fn create_test_summaries() -> Vec<MethodSummary> {
        vec![
            MethodSummary {
                method: "adaPDLP".to_string(),
                iteration_sgm: 1234.5678,
                iteration_mean: 2000.0,
                time_sgm: 1.23456,
                time_mean: 3.0,
                comparison: ComparisonCounts {
                    better: 0,
                    equal: 12,
                    worse: 0,
                },
            },
            MethodSummary {
                method: "osPDLP".to_string(),
                iteration_sgm: 999.994,
                iteration_mean: 1500.128,
                time_sgm: 0.5,
                time_mean: 2.004,
                comparison: ComparisonCounts {
                    better: 7,
                    equal: 1,
                    worse: 4,
                },
            },
        ]
    }

    fn create_test_report() -> Report {
        let mut tally = TerminationTally::new("adaPDLP");
        tally.record("OPTIMAL");
        tally.record("TIME_LIMIT");

        Report {
            metadata: ReportMetadata {
                source: "output/table/netlib/runs.csv".to_string(),
                generated_at: Utc::now(),
                baseline: "adaPDLP".to_string(),
                success_status: "OPTIMAL".to_string(),
                total_rows: 14,
                successful_rows: 12,
                iteration_shift: 10.0,
                time_shift: 0.0,
            },
            summaries: create_test_summaries(),
            terminations: vec![tally],
            excluded: vec![ExcludedMethod {
                method: "ifosPDLP".to_string(),
                missing: vec!["solve_time_sec_ifosPDLP".to_string()],
            }],
        }
    }

    #[test]
    fn test_generate_csv_report() {
        let csv = generate_csv_report(&create_test_summaries(), 2).unwrap();
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "Method,Iteration SGM,Iteration Mean,Time SGM,Time Mean,Better,Equal,Worse"
        );
        assert_eq!(lines[1], "adaPDLP,1234.57,2000.00,1.23,3.00,0,12,0");
        assert_eq!(lines[2], "osPDLP,999.99,1500.13,0.50,2.00,7,1,4");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_generate_markdown_report() {
        let markdown = generate_markdown_report(&create_test_report(), 2);

        assert!(markdown.contains("# Benchmark Summary"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("12 of 14"));
        assert!(markdown.contains("| osPDLP | 999.99 | 1500.13 | 0.50 | 2.00 | 7 | 1 | 4 |"));
        assert!(markdown.contains("## Termination Status"));
        assert!(markdown.contains("| adaPDLP | TIME_LIMIT | 1 |"));
        assert!(markdown.contains("1 run(s) ended"));
        assert!(markdown.contains("`ifosPDLP`: missing solve_time_sec_ifosPDLP"));
    }

    #[test]
    fn test_generate_json_report() {
        let json = generate_json_report(&create_test_report()).unwrap();

        assert!(json.contains("\"summaries\""));
        assert!(json.contains("\"iteration_sgm\""));
        assert!(json.contains("\"terminations\""));
    }

    #[test]
    fn test_derive_output_path() {
        let output = derive_output_path(
            Path::new("output/table/netlib/xxhyper_merged_time_180.0_tol_0.0001.csv"),
            "table",
            "stats",
        )
        .unwrap();

        assert_eq!(
            output,
            PathBuf::from("output/stats/netlib/xxhyper_merged_time_180.0_tol_0.0001.csv")
        );
    }

    #[test]
    fn test_derive_output_path_replaces_first_match_only() {
        let output =
            derive_output_path(Path::new("/data/table/table/runs.csv"), "table", "stats").unwrap();
        assert_eq!(output, PathBuf::from("/data/stats/table/runs.csv"));
    }

    #[test]
    fn test_derive_output_path_without_tables_dir() {
        assert!(derive_output_path(Path::new("runs/netlib.csv"), "table", "stats").is_err());
    }

    #[test]
    fn test_write_report_creates_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("stats").join("netlib").join("summary.csv");

        write_report("Method\n", &path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Method\n");
    }
}
