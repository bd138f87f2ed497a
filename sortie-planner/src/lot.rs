/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Core input records for the sortie planner.
//!
//! Two record types enter a planning run, both produced by the
//! [`workload`](crate::workload) loader after validation:
//!
//! ```text
//! workload.yaml  ──(loader)──►  Lot / Vehicle  ──(Scheduler)──►  Schedule
//!                                ↑ input                          ↑ output
//!                                immutable, borrowed              fresh, keyed by lot id
//! ```
//!
//! # Ownership model
//! The scheduler only ever borrows `&[Lot]` and `&[Vehicle]`.  Assignment
//! results live in a separate [`Schedule`](crate::schedule::Schedule), so the
//! caller's records are never rewritten in place and can be reused for a
//! second run (for example with a different fleet).

use chrono::NaiveDateTime;

// ── Coordinate ────────────────────────────────────────────────────────────────

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Returns `true` when both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

// ── Lot ───────────────────────────────────────────────────────────────────────

/// A located unit of work waiting to be flown.
///
/// All fields are validated by the loader: `id` is unique within the
/// workload, `location` is finite and `duration_minutes` is strictly
/// positive.  The scheduler relies on this and does not re-check.
#[derive(Debug, Clone, PartialEq)]
pub struct Lot {
    /// Stable identifier (`lote_id`).
    pub id: String,

    /// Where the lot is, used only for its distance to the base.
    pub location: Coordinate,

    /// Preferred service order (`Fecha_sugerida`).  Date-only input maps to
    /// midnight.
    pub suggested_date: NaiveDateTime,

    /// Estimated service time in minutes (`Duracion_estim_min`).
    pub duration_minutes: f64,

    /// Optional ordinal (`prioridad`).  Higher values win ties when the
    /// priority tie-break is enabled.
    pub priority: Option<i64>,
}

// ── Vehicle ───────────────────────────────────────────────────────────────────

/// An aircraft with a daily operating budget.
///
/// The order of vehicles in the fleet slice matters: earlier vehicles are
/// processed first and get first pick of the earliest / closest lots.
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    /// Stable identifier (`aeronave_id`).
    pub id: String,

    /// Daily budget in hours (`Horas_max_dia`).
    pub max_hours_per_day: f64,
}

impl Vehicle {
    /// Daily budget converted to minutes, the unit all accounting uses.
    pub fn max_minutes(&self) -> f64 {
        self.max_hours_per_day * 60.0
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
