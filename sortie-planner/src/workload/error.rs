/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error types for the workload loader.
//!
//! Two detail enums model the two input failure classes:
//!
//! * [`SchemaIssue`]: a required column is missing or holds the wrong type.
//! * [`ValueIssue`]: the column is present and typed, but its value is not
//!   usable (non-positive duration, unparseable date, duplicate id, ...).
//!
//! Both are carried by [`LoadError`] together with the table and the 1-based
//! row number, so a single message tells the operator exactly which cell to
//! fix.  Running out of capacity is **not** an error and never appears here.

use std::path::PathBuf;

use thiserror::Error;

// ── Table ─────────────────────────────────────────────────────────────────────

/// Which section of the workload document a row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Lots,
    Vehicles,
}

impl Table {
    /// Section key in the YAML document.
    pub fn key(self) -> &'static str {
        match self {
            Table::Lots => "lots",
            Table::Vehicles => "vehicles",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

// ── Detail enums ──────────────────────────────────────────────────────────────

/// Structural problem with a row.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaIssue {
    /// The row is not a key/value mapping.
    NotAMapping,

    /// A required column is absent, null or blank.
    MissingField { field: &'static str },

    /// The column holds a value of the wrong type.
    WrongType {
        field: &'static str,
        expected: &'static str,
        message: String,
    },
}

impl std::fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaIssue::NotAMapping => write!(f, "row is not a mapping of column names to values"),
            SchemaIssue::MissingField { field } => {
                write!(f, "required field '{}' is missing", field)
            }
            SchemaIssue::WrongType {
                field,
                expected,
                message,
            } => write!(f, "field '{}' must be {}: {}", field, expected, message),
        }
    }
}

/// Semantic problem with a well-typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueIssue {
    /// Duration or capacity is zero or negative.
    NonPositive { field: &'static str, value: f64 },

    /// NaN or infinite number.
    NonFinite { field: &'static str, value: f64 },

    /// The suggested date did not match any accepted format.
    UnparseableDate { field: &'static str, raw: String },

    /// The id was already used by an earlier row of the same table.
    DuplicateId { first_row: usize },
}

impl std::fmt::Display for ValueIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueIssue::NonPositive { field, value } => {
                write!(f, "'{}' must be greater than zero, got {}", field, value)
            }
            ValueIssue::NonFinite { field, value } => {
                write!(f, "'{}' must be a finite number, got {}", field, value)
            }
            ValueIssue::UnparseableDate { field, raw } => write!(
                f,
                "'{}' value '{}' is not a date (expected YYYY-MM-DD or YYYY-MM-DD HH:MM[:SS])",
                field, raw
            ),
            ValueIssue::DuplicateId { first_row } => {
                write!(f, "id already used by row {}", first_row)
            }
        }
    }
}

// ── Top-level loader error ────────────────────────────────────────────────────

/// Error returned by [`Workload`](super::Workload) loading.
///
/// Any variant aborts the whole run: no partial schedule is ever produced
/// from a workload that failed to load.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The workload file could not be read.
    #[error("cannot read workload file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid YAML, or its top level is not a mapping.
    #[error("workload document is not valid YAML: {0}")]
    Parse(#[source] serde_yaml::Error),

    /// The document has no `lots` or `vehicles` section.
    #[error("workload document has no '{0}' section")]
    MissingSection(Table),

    /// A row is structurally invalid (input schema error).
    #[error("{table} row {row}: {issue}")]
    Schema {
        table: Table,
        row: usize,
        issue: SchemaIssue,
    },

    /// A row holds an unusable value (input value error).
    #[error("{table} row {row} (id '{id}'): {issue}")]
    Value {
        table: Table,
        row: usize,
        id: String,
        issue: ValueIssue,
    },
}

impl LoadError {
    /// `true` for the schema class: missing sections, non-mapping rows,
    /// missing or mistyped fields.
    pub fn is_schema_error(&self) -> bool {
        matches!(self, LoadError::MissingSection(_) | LoadError::Schema { .. })
    }

    /// `true` for the value class: non-positive, non-finite, bad date,
    /// duplicate id.
    pub fn is_value_error(&self) -> bool {
        matches!(self, LoadError::Value { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_table_row_and_field() {
        let err = LoadError::Schema {
            table: Table::Lots,
            row: 3,
            issue: SchemaIssue::MissingField {
                field: "Fecha_sugerida",
            },
        };
        assert_eq!(
            err.to_string(),
            "lots row 3: required field 'Fecha_sugerida' is missing"
        );
        assert!(err.is_schema_error());
        assert!(!err.is_value_error());
    }

    #[test]
    fn value_error_message_includes_id() {
        let err = LoadError::Value {
            table: Table::Vehicles,
            row: 1,
            id: "HK-1".into(),
            issue: ValueIssue::NonPositive {
                field: "Horas_max_dia",
                value: 0.0,
            },
        };
        let msg = err.to_string();
        assert!(msg.starts_with("vehicles row 1 (id 'HK-1')"), "{msg}");
        assert!(msg.contains("greater than zero"));
        assert!(err.is_value_error());
    }
}
