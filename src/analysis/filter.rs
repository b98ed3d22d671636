//! Filtering run tables down to successful runs.

use crate::error::{StatsError, StatsResult};
use crate::models::TerminationTally;
use crate::table::schema::TERMINATION_PREFIX;
use crate::table::{RunTable, Schema};
use tracing::debug;

/// Default termination string that marks a successful run.
pub const DEFAULT_SUCCESS_STATUS: &str = "OPTIMAL";

/// Keep the rows where every `termination_string_*` column equals `success`.
///
/// All termination columns in the header take part, including those of
/// methods the summary does not cover. A table without any is not a run
/// table, and that is reported as an error rather than an empty result.
pub fn filter_successful(table: &RunTable, success: &str) -> StatsResult<RunTable> {
    let indices = table.columns_with_prefix(TERMINATION_PREFIX);

    if indices.is_empty() {
        return Err(StatsError::NoTerminationColumns {
            prefix: TERMINATION_PREFIX.to_string(),
        });
    }

    let filtered = table.filter_rows(|row| indices.iter().all(|&i| row[i] == success));
    debug!(
        "Kept {} of {} rows with status {}",
        filtered.len(),
        table.len(),
        success
    );

    Ok(filtered)
}

/// Count termination strings per method over the whole table.
pub fn tally_terminations(
    table: &RunTable,
    schema: &Schema,
) -> StatsResult<Vec<TerminationTally>> {
    let mut tallies = Vec::new();

    for method in schema.methods() {
        if !table.has_column(&method.termination) {
            continue;
        }
        let mut tally = TerminationTally::new(&method.method);
        for status in table.text_column(&method.termination)? {
            tally.record(status);
        }
        tallies.push(tally);
    }

    Ok(tallies)
}
