//! Per-method aggregation and statistics.
//!
//! This module computes shifted geometric means, arithmetic means, and
//! better/equal/worse counts against a baseline over a filtered run table.

use crate::error::{StatsError, StatsResult};
use crate::models::{ComparisonCounts, MethodSummary, Outcome};
use crate::table::{RunTable, ValidatedSchema};
use std::cmp::Ordering;
use tracing::debug;

/// Default shift for iteration counts (keeps zero-iteration runs finite).
pub const DEFAULT_ITERATION_SHIFT: f64 = 10.0;

/// Default shift for solve times.
pub const DEFAULT_TIME_SHIFT: f64 = 0.0;

/// Shifts applied when summarizing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryOptions {
    pub iteration_shift: f64,
    pub time_shift: f64,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            iteration_shift: DEFAULT_ITERATION_SHIFT,
            time_shift: DEFAULT_TIME_SHIFT,
        }
    }
}

/// `exp(mean(ln(v + shift)))` over `values`.
///
/// Every shifted value must be strictly positive and finite.
pub fn shifted_geometric_mean(values: &[f64], shift: f64) -> StatsResult<f64> {
    if values.is_empty() {
        return Err(StatsError::EmptyInput {
            statistic: "shifted geometric mean",
        });
    }

    let mut log_sum = 0.0;
    for &value in values {
        let shifted = value + shift;
        if !(shifted > 0.0 && shifted.is_finite()) {
            return Err(StatsError::NonPositiveShifted { value, shift });
        }
        log_sum += shifted.ln();
    }

    Ok((log_sum / values.len() as f64).exp())
}

/// Plain arithmetic mean; fails on empty input.
pub fn arithmetic_mean(values: &[f64]) -> StatsResult<f64> {
    if values.is_empty() {
        return Err(StatsError::EmptyInput {
            statistic: "arithmetic mean",
        });
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Classify one value against its baseline value (lower is better).
pub fn outcome(value: f64, baseline: f64) -> Outcome {
    match value.partial_cmp(&baseline) {
        Some(Ordering::Less) => Outcome::Better,
        Some(Ordering::Greater) => Outcome::Worse,
        _ => Outcome::Equal,
    }
}

/// Count rows where `method_column` is below, equal to, or above `baseline_column`.
pub fn compare_to_baseline(
    table: &RunTable,
    method_column: &str,
    baseline_column: &str,
) -> StatsResult<ComparisonCounts> {
    let values = table.numeric_column(method_column)?;
    let baseline = table.numeric_column(baseline_column)?;

    let mut counts = ComparisonCounts::default();
    for (value, base) in values.iter().zip(&baseline) {
        counts.record(outcome(*value, *base));
    }

    Ok(counts)
}

/// Summarize every validated method against `baseline`.
///
/// Rows come out in schema order. An empty table is an error: no statistic
/// is defined over zero runs.
pub fn summarize(
    table: &RunTable,
    schema: &ValidatedSchema,
    baseline: &str,
    options: &SummaryOptions,
) -> StatsResult<Vec<MethodSummary>> {
    let baseline_columns = schema
        .method(baseline)
        .ok_or_else(|| StatsError::UnknownBaseline(baseline.to_string()))?;

    if table.is_empty() {
        return Err(StatsError::EmptyInput {
            statistic: "method summary",
        });
    }

    let mut summaries = Vec::with_capacity(schema.methods().len());

    for method in schema.methods() {
        let iterations = table.numeric_column(&method.iterations)?;
        let times = table.numeric_column(&method.solve_time)?;

        let summary = MethodSummary {
            method: method.method.clone(),
            iteration_sgm: shifted_geometric_mean(&iterations, options.iteration_shift)?,
            iteration_mean: arithmetic_mean(&iterations)?,
            time_sgm: shifted_geometric_mean(&times, options.time_shift)?,
            time_mean: arithmetic_mean(&times)?,
            comparison: compare_to_baseline(
                table,
                &method.iterations,
                &baseline_columns.iterations,
            )?,
        };

        debug_assert_eq!(summary.comparison.total(), table.len());
        debug!(
            "{}: iter sgm {:.2}, time sgm {:.2}, vs {} {:?}",
            summary.method, summary.iteration_sgm, summary.time_sgm, baseline, summary.comparison
        );
        summaries.push(summary);
    }

    Ok(summaries)
}
