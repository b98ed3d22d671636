//! Data models for benchmark summaries.
//!
//! This module contains the result structures produced by the aggregator
//! and consumed by the report generator.

use crate::table::schema::ExcludedMethod;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// How a method's iteration count compares with the baseline on one instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Strictly fewer iterations than the baseline.
    Better,
    /// Same iteration count as the baseline.
    Equal,
    /// Strictly more iterations than the baseline.
    Worse,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Better => write!(f, "Better"),
            Outcome::Equal => write!(f, "Equal"),
            Outcome::Worse => write!(f, "Worse"),
        }
    }
}

/// Better/equal/worse counts of one column against a baseline column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonCounts {
    pub better: usize,
    pub equal: usize,
    pub worse: usize,
}

impl ComparisonCounts {
    /// Record one instance.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Better => self.better += 1,
            Outcome::Equal => self.equal += 1,
            Outcome::Worse => self.worse += 1,
        }
    }

    /// Number of instances compared.
    pub fn total(&self) -> usize {
        self.better + self.equal + self.worse
    }
}

/// Summary statistics of one method over the successful runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodSummary {
    /// Method identifier (column suffix).
    pub method: String,
    /// Shifted geometric mean of iteration counts.
    pub iteration_sgm: f64,
    /// Arithmetic mean of iteration counts.
    pub iteration_mean: f64,
    /// Shifted geometric mean of solve times.
    pub time_sgm: f64,
    /// Arithmetic mean of solve times.
    pub time_mean: f64,
    /// Iteration-count comparison against the baseline method.
    pub comparison: ComparisonCounts,
}

/// Termination strings reported by one method over the unfiltered table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminationTally {
    pub method: String,
    /// Count per termination string.
    pub counts: BTreeMap<String, usize>,
}

impl TerminationTally {
    pub fn new(method: &str) -> Self {
        Self {
            method: method.to_string(),
            counts: BTreeMap::new(),
        }
    }

    pub fn record(&mut self, status: &str) {
        *self.counts.entry(status.to_string()).or_insert(0) += 1;
    }

    /// Runs that did not end with `success`.
    pub fn unsuccessful(&self, success: &str) -> usize {
        self.counts
            .iter()
            .filter(|(status, _)| status.as_str() != success)
            .map(|(_, count)| count)
            .sum()
    }
}

/// Metadata about a summary report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Path of the input run table.
    pub source: String,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Baseline method used for comparisons.
    pub baseline: String,
    /// Termination string counted as success.
    pub success_status: String,
    /// Rows in the input table.
    pub total_rows: usize,
    /// Rows kept after filtering to successful runs.
    pub successful_rows: usize,
    /// Shift applied to iteration counts.
    pub iteration_shift: f64,
    /// Shift applied to solve times.
    pub time_shift: f64,
}

/// The complete summary report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    /// One row per method, in header order.
    pub summaries: Vec<MethodSummary>,
    /// Termination breakdown per method.
    pub terminations: Vec<TerminationTally>,
    /// Methods dropped because of missing columns.
    pub excluded: Vec<ExcludedMethod>,
}
