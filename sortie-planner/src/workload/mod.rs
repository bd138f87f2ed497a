/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Workload loading and validation.
//!
//! This is the only place where raw input is inspected.  Every row is checked
//! once, here, and turned into a typed [`Lot`] or [`Vehicle`]; the scheduler
//! never re-validates.  The first problem found aborts loading with a single
//! [`LoadError`].
//!
//! The expected YAML structure uses the spreadsheet column names:
//! ```yaml
//! lots:
//!   - lote_id: L-001
//!     Latitud: 10.91
//!     Longitud: -74.12
//!     Fecha_sugerida: 2025-03-01
//!     Duracion_estim_min: 35
//!     prioridad: 2          # optional
//! vehicles:
//!   - aeronave_id: HK-4521
//!     Horas_max_dia: 6
//! ```
//!
//! Extra columns are ignored.  Ids may be strings or integers.  Blank and
//! `null` cells count as missing.

pub mod error;

pub use error::{LoadError, SchemaIssue, Table, ValueIssue};

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use tracing::{debug, info};

use crate::lot::{Coordinate, Lot, Vehicle};

// ── Column names ──────────────────────────────────────────────────────────────

const COL_LOT_ID: &str = "lote_id";
const COL_LAT: &str = "Latitud";
const COL_LON: &str = "Longitud";
const COL_DATE: &str = "Fecha_sugerida";
const COL_DURATION: &str = "Duracion_estim_min";
const COL_PRIORITY: &str = "prioridad";
const COL_VEHICLE_ID: &str = "aeronave_id";
const COL_MAX_HOURS: &str = "Horas_max_dia";

/// Date-time layouts accepted for `Fecha_sugerida`, tried in order before the
/// date-only layout.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

// ── Private YAML deserialization types ────────────────────────────────────────

/// Top-level document.  Rows stay as raw [`Value`]s so each cell can be
/// checked individually and reported with its column name.
#[derive(Debug, Deserialize)]
struct WorkloadFile {
    #[serde(default)]
    lots: Option<Vec<Value>>,
    #[serde(default)]
    vehicles: Option<Vec<Value>>,
}

/// Identifier cell: spreadsheets often store ids as plain numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Text(String),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Int(n) => n.to_string(),
            RawId::Text(s) => s.trim().to_string(),
        }
    }
}

// ── Row accessor ──────────────────────────────────────────────────────────────

/// One row of a table with typed, column-aware accessors.
struct Row<'a> {
    table: Table,
    /// 1-based.
    row: usize,
    cells: &'a Mapping,
}

impl<'a> Row<'a> {
    fn new(table: Table, row: usize, value: &'a Value) -> Result<Self, LoadError> {
        match value.as_mapping() {
            Some(cells) => Ok(Self { table, row, cells }),
            None => Err(LoadError::Schema {
                table,
                row,
                issue: SchemaIssue::NotAMapping,
            }),
        }
    }

    fn optional<T: DeserializeOwned>(
        &self,
        field: &'static str,
        expected: &'static str,
    ) -> Result<Option<T>, LoadError> {
        let cell = match self.cells.get(field) {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
            Some(cell) => cell,
        };
        serde_yaml::from_value(cell.clone())
            .map(Some)
            .map_err(|e| LoadError::Schema {
                table: self.table,
                row: self.row,
                issue: SchemaIssue::WrongType {
                    field,
                    expected,
                    message: e.to_string(),
                },
            })
    }

    fn required<T: DeserializeOwned>(
        &self,
        field: &'static str,
        expected: &'static str,
    ) -> Result<T, LoadError> {
        self.optional(field, expected)?
            .ok_or(LoadError::Schema {
                table: self.table,
                row: self.row,
                issue: SchemaIssue::MissingField { field },
            })
    }

    fn id(&self, field: &'static str) -> Result<String, LoadError> {
        let id = self
            .required::<RawId>(field, "a string or integer")?
            .into_string();
        if id.is_empty() {
            return Err(LoadError::Schema {
                table: self.table,
                row: self.row,
                issue: SchemaIssue::MissingField { field },
            });
        }
        Ok(id)
    }

    fn value_error(&self, id: &str, issue: ValueIssue) -> LoadError {
        LoadError::Value {
            table: self.table,
            row: self.row,
            id: id.to_string(),
            issue,
        }
    }

    fn finite(&self, id: &str, field: &'static str, value: f64) -> Result<f64, LoadError> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(self.value_error(id, ValueIssue::NonFinite { field, value }))
        }
    }

    fn positive(&self, id: &str, field: &'static str, value: f64) -> Result<f64, LoadError> {
        let value = self.finite(id, field, value)?;
        if value > 0.0 {
            Ok(value)
        } else {
            Err(self.value_error(id, ValueIssue::NonPositive { field, value }))
        }
    }
}

/// Tracks ids already seen in one table.
#[derive(Default)]
struct IdRegistry {
    first_row: HashMap<String, usize>,
}

impl IdRegistry {
    fn register(&mut self, row: &Row<'_>, id: &str) -> Result<(), LoadError> {
        if let Some(&first_row) = self.first_row.get(id) {
            return Err(row.value_error(id, ValueIssue::DuplicateId { first_row }));
        }
        self.first_row.insert(id.to_string(), row.row);
        Ok(())
    }
}

// ── Date parsing ──────────────────────────────────────────────────────────────

/// Parse a suggested date.  Date-only values map to midnight; RFC 3339 values
/// with an offset keep their local wall-clock time.
pub fn parse_suggested_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

// ── Row parsers ───────────────────────────────────────────────────────────────

fn parse_lot(row: &Row<'_>) -> Result<Lot, LoadError> {
    let id = row.id(COL_LOT_ID)?;
    let lat: f64 = row.required(COL_LAT, "a number")?;
    let lon: f64 = row.required(COL_LON, "a number")?;
    let raw_date: String = row.required(COL_DATE, "a date string")?;
    let duration: f64 = row.required(COL_DURATION, "a number")?;
    let priority: Option<i64> = row.optional(COL_PRIORITY, "an integer")?;

    let lat = row.finite(&id, COL_LAT, lat)?;
    let lon = row.finite(&id, COL_LON, lon)?;
    let duration_minutes = row.positive(&id, COL_DURATION, duration)?;
    let suggested_date = parse_suggested_date(&raw_date).ok_or_else(|| {
        row.value_error(
            &id,
            ValueIssue::UnparseableDate {
                field: COL_DATE,
                raw: raw_date.clone(),
            },
        )
    })?;

    Ok(Lot {
        id,
        location: Coordinate::new(lat, lon),
        suggested_date,
        duration_minutes,
        priority,
    })
}

fn parse_vehicle(row: &Row<'_>) -> Result<Vehicle, LoadError> {
    let id = row.id(COL_VEHICLE_ID)?;
    let hours: f64 = row.required(COL_MAX_HOURS, "a number")?;
    let max_hours_per_day = row.positive(&id, COL_MAX_HOURS, hours)?;
    Ok(Vehicle {
        id,
        max_hours_per_day,
    })
}

fn parse_table<T>(
    table: Table,
    rows: &[Value],
    parse: impl Fn(&Row<'_>) -> Result<T, LoadError>,
    id_of: impl Fn(&T) -> &str,
) -> Result<Vec<T>, LoadError> {
    let mut ids = IdRegistry::default();
    let mut out = Vec::with_capacity(rows.len());
    for (i, value) in rows.iter().enumerate() {
        let row = Row::new(table, i + 1, value)?;
        let item = parse(&row)?;
        ids.register(&row, id_of(&item))?;
        out.push(item);
    }
    Ok(out)
}

// ── Workload ──────────────────────────────────────────────────────────────────

/// A validated planning input.
///
/// Lots keep their document order (it is the stable tie-break); vehicles keep
/// their document order (it decides who picks first).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workload {
    pub lots: Vec<Lot>,
    pub vehicles: Vec<Vehicle>,
}

impl Workload {
    /// Read and validate the workload at `path`.
    ///
    /// # Errors
    /// Returns [`LoadError::Io`] if the file cannot be read; otherwise see
    /// [`from_yaml_str`](Self::from_yaml_str).
    pub fn load_from_file(path: &Path) -> Result<Self, LoadError> {
        info!("Loading workload from: {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Validate an in-memory workload document.
    ///
    /// # Errors
    /// The first schema or value problem found, in document order (all lots
    /// before any vehicle).
    pub fn from_yaml_str(content: &str) -> Result<Self, LoadError> {
        let file: WorkloadFile = serde_yaml::from_str(content).map_err(LoadError::Parse)?;

        let raw_lots = file.lots.ok_or(LoadError::MissingSection(Table::Lots))?;
        let raw_vehicles = file
            .vehicles
            .ok_or(LoadError::MissingSection(Table::Vehicles))?;

        let lots = parse_table(Table::Lots, &raw_lots, parse_lot, |l: &Lot| l.id.as_str())?;
        let vehicles = parse_table(Table::Vehicles, &raw_vehicles, parse_vehicle, |v: &Vehicle| {
            v.id.as_str()
        })?;

        for lot in &lots {
            debug!(
                lot = %lot.id,
                lat = lot.location.lat,
                lon = lot.location.lon,
                date = %lot.suggested_date,
                duration_min = lot.duration_minutes,
                priority = ?lot.priority,
                "lot loaded"
            );
        }
        for vehicle in &vehicles {
            debug!(
                vehicle = %vehicle.id,
                max_hours = vehicle.max_hours_per_day,
                "vehicle loaded"
            );
        }

        info!(
            lots = lots.len(),
            vehicles = vehicles.len(),
            "Workload validated"
        );

        Ok(Self { lots, vehicles })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
