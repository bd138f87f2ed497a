/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Output of a planning run.
//!
//! A [`Schedule`] holds one [`LotRecord`] per input lot, in input order, plus
//! per-vehicle [`VehicleUsage`].  It is built fresh by
//! [`Scheduler::schedule`](crate::scheduler::Scheduler::schedule) and is the
//! only thing the presentation layer needs: the table it renders is
//! [`Schedule::output_rows`].

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::config::TripMode;

// ── Outcome types ─────────────────────────────────────────────────────────────

/// Where and when a lot is flown.
///
/// # Start offset
/// In multi-trip mode `start_offset_minutes` is the time the vehicle had used
/// *before the trip began*.  Every lot of the same trip therefore records the
/// same offset; it is not advanced lot by lot inside the trip.  Single-trip
/// mode records neither a trip number nor an offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub vehicle_id: String,
    /// 1-based trip number (multi-trip mode only).
    pub trip: Option<u32>,
    /// Minutes into the vehicle's day (multi-trip mode only).
    pub start_offset_minutes: Option<f64>,
}

/// Why a lot was left unassigned.
///
/// Being unassigned is a normal outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnassignedReason {
    /// The fleet was empty.
    NoVehicles,

    /// The lot is longer than every vehicle's full daily budget; no fleet
    /// ordering could ever fit it.
    ExceedsDailyBudget,

    /// The lot is longer than the configured per-trip cap, so no trip can
    /// hold it (multi-trip mode with `max_trip_minutes` set).
    ExceedsTripLimit,

    /// The lot fits an empty vehicle, but every vehicle had already spent
    /// too much of its budget when the lot was reached.
    CapacityExhausted,
}

impl std::fmt::Display for UnassignedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnassignedReason::NoVehicles => write!(f, "no vehicles in the fleet"),
            UnassignedReason::ExceedsDailyBudget => {
                write!(f, "duration exceeds every vehicle's daily budget")
            }
            UnassignedReason::ExceedsTripLimit => {
                write!(f, "duration exceeds the per-trip limit")
            }
            UnassignedReason::CapacityExhausted => {
                write!(f, "no vehicle had enough remaining budget")
            }
        }
    }
}

/// Final state of one lot.
#[derive(Debug, Clone, PartialEq)]
pub enum LotOutcome {
    Assigned(Assignment),
    Unassigned(UnassignedReason),
}

/// One row of the output table.
#[derive(Debug, Clone, PartialEq)]
pub struct LotRecord {
    pub lot_id: String,
    pub suggested_date: NaiveDateTime,
    pub duration_minutes: f64,
    pub outcome: LotOutcome,
}

impl LotRecord {
    pub fn assignment(&self) -> Option<&Assignment> {
        match &self.outcome {
            LotOutcome::Assigned(a) => Some(a),
            LotOutcome::Unassigned(_) => None,
        }
    }

    pub fn is_assigned(&self) -> bool {
        matches!(self.outcome, LotOutcome::Assigned(_))
    }
}

/// How much of its day a vehicle spent.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleUsage {
    pub vehicle_id: String,
    pub budget_minutes: f64,
    /// Sum of durations of the lots assigned to this vehicle.
    pub service_minutes: f64,
    /// Turnaround charged between consecutive trips.  A trailing turnaround
    /// after the last trip is not counted.
    pub turnaround_minutes: f64,
    /// Trips flown; always `0` in single-trip mode.
    pub trips: u32,
    pub lots: usize,
}

impl VehicleUsage {
    pub(crate) fn idle(vehicle_id: &str, budget_minutes: f64) -> Self {
        Self {
            vehicle_id: vehicle_id.to_string(),
            budget_minutes,
            service_minutes: 0.0,
            turnaround_minutes: 0.0,
            trips: 0,
            lots: 0,
        }
    }

    /// Service plus in-between turnaround; never exceeds `budget_minutes`.
    pub fn used_minutes(&self) -> f64 {
        self.service_minutes + self.turnaround_minutes
    }

    /// Fraction of the daily budget used, `0.0` for a zero budget.
    pub fn utilization(&self) -> f64 {
        if self.budget_minutes <= 0.0 {
            0.0
        } else {
            self.used_minutes() / self.budget_minutes
        }
    }
}

// ── Wire / table row ──────────────────────────────────────────────────────────

/// Serialisable table row using the column names the presentation layer
/// expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRow<'a> {
    #[serde(rename = "lote_id")]
    pub lot_id: &'a str,
    #[serde(rename = "Asignado")]
    pub assigned: Option<&'a str>,
    #[serde(rename = "Vuelo_nro")]
    pub trip: Option<u32>,
    #[serde(rename = "Tiempo_inicio")]
    pub start_offset_minutes: Option<f64>,
    #[serde(rename = "Fecha_sugerida")]
    pub suggested_date: String,
    #[serde(rename = "Duracion_estim_min")]
    pub duration_minutes: f64,
}

// ── Schedule ──────────────────────────────────────────────────────────────────

/// Result of one planning run.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    mode: TripMode,
    records: Vec<LotRecord>,
    index: HashMap<String, usize>,
    usage: Vec<VehicleUsage>,
}

impl Schedule {
    pub(crate) fn new(mode: TripMode, records: Vec<LotRecord>, usage: Vec<VehicleUsage>) -> Self {
        let index = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.lot_id.clone(), i))
            .collect();
        Self {
            mode,
            records,
            index,
            usage,
        }
    }

    pub fn mode(&self) -> TripMode {
        self.mode
    }

    /// All rows, in the order the lots were supplied.
    pub fn records(&self) -> &[LotRecord] {
        &self.records
    }

    pub fn get(&self, lot_id: &str) -> Option<&LotRecord> {
        self.index.get(lot_id).map(|&i| &self.records[i])
    }

    /// Shortcut for `get(lot_id)` followed by [`LotRecord::assignment`].
    pub fn assignment(&self, lot_id: &str) -> Option<&Assignment> {
        self.get(lot_id).and_then(LotRecord::assignment)
    }

    pub fn vehicle_usage(&self) -> &[VehicleUsage] {
        &self.usage
    }

    pub fn assigned_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_assigned()).count()
    }

    pub fn total_count(&self) -> usize {
        self.records.len()
    }

    /// Number of distinct `(vehicle, trip)` pairs.  Always `0` in single-trip
    /// mode, where no trip numbers are recorded.
    pub fn trip_count(&self) -> usize {
        self.records
            .iter()
            .filter_map(|r| r.assignment())
            .filter_map(|a| a.trip.map(|t| (a.vehicle_id.as_str(), t)))
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Unassigned rows with their reasons.
    pub fn unassigned(&self) -> impl Iterator<Item = (&LotRecord, UnassignedReason)> {
        self.records.iter().filter_map(|r| match r.outcome {
            LotOutcome::Unassigned(reason) => Some((r, reason)),
            LotOutcome::Assigned(_) => None,
        })
    }

    /// Assigned rows grouped by vehicle id, each group in input order.
    ///
    /// `BTreeMap` so callers iterate vehicles deterministically.
    pub fn by_vehicle(&self) -> BTreeMap<&str, Vec<&LotRecord>> {
        let mut map: BTreeMap<&str, Vec<&LotRecord>> = BTreeMap::new();
        for record in &self.records {
            if let Some(a) = record.assignment() {
                map.entry(a.vehicle_id.as_str()).or_default().push(record);
            }
        }
        map
    }

    /// The output table, one row per lot in input order.
    pub fn output_rows(&self) -> Vec<OutputRow<'_>> {
        self.records
            .iter()
            .map(|r| {
                let a = r.assignment();
                OutputRow {
                    lot_id: &r.lot_id,
                    assigned: a.map(|a| a.vehicle_id.as_str()),
                    trip: a.and_then(|a| a.trip),
                    start_offset_minutes: a.and_then(|a| a.start_offset_minutes),
                    suggested_date: r.suggested_date.format("%Y-%m-%d %H:%M:%S").to_string(),
                    duration_minutes: r.duration_minutes,
                }
            })
            .collect()
    }

    /// Serialise [`output_rows`](Self::output_rows) as a YAML sequence.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self.output_rows())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
