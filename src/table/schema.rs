//! Method column schema.
//!
//! Every method contributes three columns named `<prefix>_<method>`.
//! The schema is declared up front (or discovered once from the header)
//! and validated against the table before any statistic is computed.

use super::RunTable;
use crate::error::{StatsError, StatsResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const TERMINATION_PREFIX: &str = "termination_string";
pub const ITERATION_PREFIX: &str = "iteration_count";
pub const SOLVE_TIME_PREFIX: &str = "solve_time_sec";

const PREFIXES: [&str; 3] = [TERMINATION_PREFIX, ITERATION_PREFIX, SOLVE_TIME_PREFIX];

/// The three columns carrying one method's results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodColumns {
    pub method: String,
    pub termination: String,
    pub iterations: String,
    pub solve_time: String,
}

impl MethodColumns {
    /// Columns following the `<prefix>_<method>` naming convention.
    pub fn conventional(method: &str) -> Self {
        Self {
            method: method.to_string(),
            termination: format!("{}_{}", TERMINATION_PREFIX, method),
            iterations: format!("{}_{}", ITERATION_PREFIX, method),
            solve_time: format!("{}_{}", SOLVE_TIME_PREFIX, method),
        }
    }

    fn columns(&self) -> [&str; 3] {
        [&self.termination, &self.iterations, &self.solve_time]
    }
}

/// A declared mapping from method name to its columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    methods: Vec<MethodColumns>,
}

impl Schema {
    /// Declare a schema from method names using the naming convention.
    pub fn declared<S: AsRef<str>>(methods: &[S]) -> Self {
        let mut schema = Self::default();
        for method in methods {
            schema.push(MethodColumns::conventional(method.as_ref()));
        }
        schema
    }

    /// Derive method names from header suffixes, in order of first appearance.
    pub fn discover(headers: &[String]) -> Self {
        let mut schema = Self::default();
        for header in headers {
            let suffix = PREFIXES.iter().find_map(|prefix| {
                header
                    .strip_prefix(prefix)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .filter(|method| !method.is_empty())
            });
            if let Some(method) = suffix {
                schema.push(MethodColumns::conventional(method));
            }
        }
        debug!(
            "Discovered methods: {:?}",
            schema.methods.iter().map(|m| &m.method).collect::<Vec<_>>()
        );
        schema
    }

    /// Use the configured methods if any, otherwise discover them from the header.
    pub fn configured_or_discovered(methods: &[String], table: &RunTable) -> Self {
        if methods.is_empty() {
            Self::discover(table.headers())
        } else {
            Self::declared(methods)
        }
    }

    /// Add a method, ignoring duplicates.
    pub fn push(&mut self, columns: MethodColumns) {
        if !self.methods.iter().any(|m| m.method == columns.method) {
            self.methods.push(columns);
        }
    }

    pub fn methods(&self) -> &[MethodColumns] {
        &self.methods
    }

    /// Check every method's columns against the table header.
    ///
    /// Methods with missing columns are excluded (or rejected outright when
    /// `strict` is set). Surviving methods are ordered by the position of
    /// their first column in the header.
    pub fn validate(&self, table: &RunTable, strict: bool) -> StatsResult<ValidatedSchema> {
        let mut complete: Vec<(usize, MethodColumns)> = Vec::new();
        let mut excluded = Vec::new();

        for method in &self.methods {
            let missing: Vec<String> = method
                .columns()
                .iter()
                .filter(|col| !table.has_column(col))
                .map(|col| col.to_string())
                .collect();

            if missing.is_empty() {
                let first = method
                    .columns()
                    .iter()
                    .filter_map(|col| table.column_index(col))
                    .min()
                    .unwrap_or(usize::MAX);
                complete.push((first, method.clone()));
            } else if strict {
                return Err(StatsError::SchemaMismatch {
                    method: method.method.clone(),
                    missing,
                });
            } else {
                warn!(
                    "Excluding method '{}': missing column(s) {:?}",
                    method.method, missing
                );
                excluded.push(ExcludedMethod {
                    method: method.method.clone(),
                    missing,
                });
            }
        }

        if complete.is_empty() {
            return Err(StatsError::NoMethods);
        }

        complete.sort_by_key(|(first, _)| *first);

        Ok(ValidatedSchema {
            methods: complete.into_iter().map(|(_, m)| m).collect(),
            excluded,
        })
    }
}

/// A method dropped during validation and the columns it lacked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedMethod {
    pub method: String,
    pub missing: Vec<String>,
}

/// Methods whose columns are all present in a specific table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSchema {
    methods: Vec<MethodColumns>,
    excluded: Vec<ExcludedMethod>,
}

impl ValidatedSchema {
    pub fn methods(&self) -> &[MethodColumns] {
        &self.methods
    }

    pub fn excluded(&self) -> &[ExcludedMethod] {
        &self.excluded
    }

    /// Look up a method by name.
    pub fn method(&self, name: &str) -> Option<&MethodColumns> {
        self.methods.iter().find(|m| m.method == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::tests::small_table;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_conventional_columns() {
        let cols = MethodColumns::conventional("adaPDLP");
        assert_eq!(cols.termination, "termination_string_adaPDLP");
        assert_eq!(cols.iterations, "iteration_count_adaPDLP");
        assert_eq!(cols.solve_time, "solve_time_sec_adaPDLP");
    }

    #[test]
    fn test_discover_keeps_first_appearance_order() {
        let schema = Schema::discover(&headers(&[
            "instance_name",
            "iteration_count_osPDLP",
            "termination_string_adaPDLP",
            "solve_time_sec_osPDLP",
            "iteration_count_adaPDLP",
            "iteration_count_",
        ]));

        let names: Vec<_> = schema.methods().iter().map(|m| m.method.as_str()).collect();
        assert_eq!(names, vec!["osPDLP", "adaPDLP"]);
    }

    #[test]
    fn test_declared_ignores_duplicates() {
        let schema = Schema::declared(&["A", "B", "A"]);
        assert_eq!(schema.methods().len(), 2);
    }

    #[test]
    fn test_validate_orders_by_header_position() {
        let table = small_table();
        let validated = Schema::declared(&["B", "A"]).validate(&table, false).unwrap();

        let names: Vec<_> = validated.methods().iter().map(|m| m.method.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert!(validated.excluded().is_empty());
    }

    #[test]
    fn test_validate_excludes_incomplete_method() {
        let table = small_table();
        let validated = Schema::declared(&["A", "C"]).validate(&table, false).unwrap();

        assert_eq!(validated.methods().len(), 1);
        assert_eq!(validated.excluded()[0].method, "C");
        assert_eq!(validated.excluded()[0].missing.len(), 3);
    }

    #[test]
    fn test_validate_strict_rejects_incomplete_method() {
        let table = small_table();
        let err = Schema::declared(&["A", "C"]).validate(&table, true).unwrap_err();

        match err {
            StatsError::SchemaMismatch { method, missing } => {
                assert_eq!(method, "C");
                assert!(missing.contains(&"iteration_count_C".to_string()));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_validate_with_no_complete_method() {
        let table = small_table();
        assert!(matches!(
            Schema::declared(&["X"]).validate(&table, false),
            Err(StatsError::NoMethods)
        ));
    }
}
