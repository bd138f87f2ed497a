/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Post-schedule summary and budget audit.
//!
//! The summary is what an operator reads first: how many lots were placed,
//! how many trips that takes, and why the rest were not.  A run that places
//! nothing is flagged as low-confidence, including a run with no lots at all:
//! it usually means durations or daily budgets were entered in the wrong
//! unit, or that the workload is not the one intended.
//!
//! The audit re-adds each vehicle's service and turnaround minutes and
//! compares them with its budget.  The scheduler never overbooks by
//! construction; the audit is logged after every run so a regression would
//! show up in the logs rather than in the air.

use std::fmt::Write as _;

use tracing::{info, warn};

use crate::config::TripMode;
use crate::schedule::{Schedule, UnassignedReason, VehicleUsage};

/// Slack for floating-point accumulation when comparing minutes.
const BUDGET_EPSILON_MIN: f64 = 1e-6;

// ── Summary ───────────────────────────────────────────────────────────────────

/// Headline numbers of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleSummary {
    pub assigned: usize,
    pub total: usize,
    /// Distinct `(vehicle, trip)` pairs; `None` in single-trip mode.
    pub trips: Option<usize>,
    pub unassigned_no_vehicles: usize,
    pub unassigned_exceeds_budget: usize,
    pub unassigned_trip_limit: usize,
    pub unassigned_capacity: usize,
}

impl ScheduleSummary {
    pub fn from_schedule(schedule: &Schedule) -> Self {
        let mut summary = Self {
            assigned: schedule.assigned_count(),
            total: schedule.total_count(),
            trips: match schedule.mode() {
                TripMode::Single => None,
                TripMode::Multi => Some(schedule.trip_count()),
            },
            unassigned_no_vehicles: 0,
            unassigned_exceeds_budget: 0,
            unassigned_trip_limit: 0,
            unassigned_capacity: 0,
        };
        for (_, reason) in schedule.unassigned() {
            match reason {
                UnassignedReason::NoVehicles => summary.unassigned_no_vehicles += 1,
                UnassignedReason::ExceedsDailyBudget => summary.unassigned_exceeds_budget += 1,
                UnassignedReason::ExceedsTripLimit => summary.unassigned_trip_limit += 1,
                UnassignedReason::CapacityExhausted => summary.unassigned_capacity += 1,
            }
        }
        summary
    }

    /// `true` when no lot was placed, whether or not there were any.
    pub fn is_low_confidence(&self) -> bool {
        self.assigned == 0
    }

    /// `"Lots assigned: 3 / 5"`, with the trip count appended in multi-trip
    /// mode.
    pub fn headline(&self) -> String {
        match self.trips {
            Some(trips) => format!(
                "Lots assigned: {} / {} ({} trips)",
                self.assigned, self.total, trips
            ),
            None => format!("Lots assigned: {} / {}", self.assigned, self.total),
        }
    }

    /// Emit the summary through `tracing`.
    pub fn log(&self) {
        info!(
            assigned = self.assigned,
            total = self.total,
            trips = ?self.trips,
            "{}",
            self.headline()
        );
        if self.total > self.assigned {
            info!(
                no_vehicles = self.unassigned_no_vehicles,
                exceeds_daily_budget = self.unassigned_exceeds_budget,
                exceeds_trip_limit = self.unassigned_trip_limit,
                capacity_exhausted = self.unassigned_capacity,
                "unassigned lots by reason"
            );
        }
        if self.is_low_confidence() {
            warn!(
                total = self.total,
                "No lot was assigned. Check the workload, lot durations (minutes) and vehicle daily budgets (hours)"
            );
        }
    }
}

// ── Budget audit ──────────────────────────────────────────────────────────────

/// Vehicles whose used minutes exceed their daily budget.
///
/// Returns an empty list for every schedule produced by
/// [`Scheduler`](super::Scheduler).
pub fn overbooked_vehicles(schedule: &Schedule) -> Vec<&VehicleUsage> {
    schedule
        .vehicle_usage()
        .iter()
        .filter(|u| u.used_minutes() > u.budget_minutes + BUDGET_EPSILON_MIN)
        .collect()
}

/// Log a warning for every overbooked vehicle.
pub(crate) fn audit_budgets(schedule: &Schedule) {
    for usage in overbooked_vehicles(schedule) {
        warn!(
            vehicle = %usage.vehicle_id,
            used_min = usage.used_minutes(),
            budget_min = usage.budget_minutes,
            "vehicle exceeds its daily budget"
        );
    }
}

// ── Table ─────────────────────────────────────────────────────────────────────

/// Plain-text assignment table, one line per lot in input order.
pub fn render_table(schedule: &Schedule) -> String {
    let mut out = String::new();
    let rows = schedule.output_rows();
    let id_width = rows
        .iter()
        .map(|r| r.lot_id.len())
        .chain(std::iter::once("lote_id".len()))
        .max()
        .unwrap_or(0);
    let vehicle_width = rows
        .iter()
        .filter_map(|r| r.assigned.map(str::len))
        .chain(std::iter::once("Asignado".len()))
        .max()
        .unwrap_or(0);

    let _ = writeln!(
        out,
        "{:<id_width$}  {:<vehicle_width$}  {:>9}  {:>13}  {:<19}  {:>18}",
        "lote_id",
        "Asignado",
        "Vuelo_nro",
        "Tiempo_inicio",
        "Fecha_sugerida",
        "Duracion_estim_min",
    );
    for row in rows {
        let trip = row.trip.map(|t| t.to_string()).unwrap_or_else(|| "-".into());
        let start = row
            .start_offset_minutes
            .map(|m| format!("{m:.1}"))
            .unwrap_or_else(|| "-".into());
        let _ = writeln!(
            out,
            "{:<id_width$}  {:<vehicle_width$}  {:>9}  {:>13}  {:<19}  {:>18.1}",
            row.lot_id,
            row.assigned.unwrap_or("-"),
            trip,
            start,
            row.suggested_date,
            row.duration_minutes,
        );
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
