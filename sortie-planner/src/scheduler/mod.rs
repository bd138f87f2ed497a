/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Lot-to-vehicle scheduler.
//!
//! [`Scheduler`] distributes a set of [`Lot`]s over an ordered fleet of
//! [`Vehicle`]s with a greedy, date- and distance-aware first-fit.  The
//! result is a fresh [`Schedule`]: one record per lot, assigned or not.
//!
//! # Algorithm
//!
//! Vehicles are served in fleet order; each takes what it can from the
//! pending pool before the next one is considered.  The pool is ordered by
//! `(suggested_date asc, base distance asc)`, optionally followed by
//! `priority desc`, and the sort is stable.
//!
//! * **Single-trip**: one first-fit walk per vehicle against its whole
//!   daily budget.  Lots that would overflow are skipped, the walk goes on.
//! * **Multi-trip**: repeated first-fit walks per vehicle, each one a trip
//!   bounded by the budget still left (and by `max_trip_minutes`, if set).
//!   After a non-empty trip the vehicle is charged the trip's service time
//!   plus the turnaround, and the trip number advances.  The vehicle is done
//!   when a walk accepts nothing or its budget is spent.
//!
//! Without a trip cap the first walk already sees the whole remaining day,
//! and any lot it skipped cannot fit the smaller budget of a later walk.  A
//! vehicle then flies exactly one trip.
//!
//! | Topic | Choice |
//! |---|---|
//! | State | Stateless `schedule()`: the pool and usage counters are local |
//! | Input | Borrowed `&[Lot]` / `&[Vehicle]`, never mutated |
//! | Distances | Computed once per run; removal keeps pool order |
//! | Unassigned | Normal outcome with a typed reason, not an error |
//! | Thread safety | `Send + Sync` (only immutable config inside) |
//!
//! # Example
//! ```rust
//! use sortie_planner::config::PlannerConfig;
//! use sortie_planner::scheduler::Scheduler;
//!
//! let scheduler = Scheduler::new(PlannerConfig::default());
//! let schedule = scheduler.schedule(&[], &[]);
//! assert_eq!(schedule.assigned_count(), 0);
//! ```

pub mod distance;
pub mod report;

mod pending;

pub use report::{overbooked_vehicles, render_table, ScheduleSummary};

use tracing::{debug, info};

use crate::config::{PlannerConfig, TripMode};
use crate::lot::{Lot, Vehicle};
use crate::schedule::{Assignment, LotOutcome, LotRecord, Schedule, UnassignedReason, VehicleUsage};

use pending::PendingPool;

// ── Scheduler ─────────────────────────────────────────────────────────────────

/// The sortie scheduler.
///
/// Holds only its configuration.  All per-run state is allocated inside
/// [`schedule`](Self::schedule) and dropped at the end of the call, so one
/// instance can serve any number of runs.
#[derive(Debug, Clone)]
pub struct Scheduler {
    config: PlannerConfig,
}

impl Scheduler {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    // ── Public entry point ────────────────────────────────────────────────────

    /// Assign `lots` to `vehicles` and return the resulting [`Schedule`].
    ///
    /// Inputs must come from the [`workload`](crate::workload) loader (or
    /// satisfy the same rules: unique ids, positive durations and budgets).
    /// Empty inputs are fine: no lots gives an empty schedule, no vehicles
    /// leaves every lot unassigned.
    pub fn schedule(&self, lots: &[Lot], vehicles: &[Vehicle]) -> Schedule {
        info!(
            mode = %self.config.mode,
            lot_count = lots.len(),
            vehicle_count = vehicles.len(),
            base_lat = self.config.base.lat,
            base_lon = self.config.base.lon,
            metric = %self.config.distance_metric,
            "=== Scheduler::schedule() ==="
        );

        let mut pool = PendingPool::new(lots, &self.config);
        let mut outcomes: Vec<Option<Assignment>> = vec![None; lots.len()];
        let mut usage = Vec::with_capacity(vehicles.len());

        for vehicle in vehicles {
            if pool.is_empty() {
                debug!(vehicle = %vehicle.id, "pending pool empty, vehicle idle");
                usage.push(VehicleUsage::idle(&vehicle.id, vehicle.max_minutes()));
                continue;
            }
            let u = match self.config.mode {
                TripMode::Single => Self::fly_single(vehicle, &mut pool, &mut outcomes),
                TripMode::Multi => self.fly_multi(vehicle, &mut pool, &mut outcomes),
            };
            info!(
                vehicle = %u.vehicle_id,
                lots = u.lots,
                trips = u.trips,
                service_min = u.service_minutes,
                budget_min = u.budget_minutes,
                pending = pool.len(),
                "vehicle done"
            );
            usage.push(u);
        }

        let schedule = self.build_schedule(lots, vehicles, outcomes, usage);

        info!(
            assigned = schedule.assigned_count(),
            total = schedule.total_count(),
            trips = schedule.trip_count(),
            "=== Scheduling complete ==="
        );
        report::audit_budgets(&schedule);

        schedule
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Single-trip mode
    // ─────────────────────────────────────────────────────────────────────────

    fn fly_single(
        vehicle: &Vehicle,
        pool: &mut PendingPool<'_>,
        outcomes: &mut [Option<Assignment>],
    ) -> VehicleUsage {
        let budget = vehicle.max_minutes();
        let (accepted, used) = pool.first_fit(budget);

        for &index in &accepted {
            Self::assign(
                outcomes,
                index,
                Assignment {
                    vehicle_id: vehicle.id.clone(),
                    trip: None,
                    start_offset_minutes: None,
                },
            );
            debug!(vehicle = %vehicle.id, lot_index = index, "✓ assigned");
        }
        pool.remove(&accepted);

        VehicleUsage {
            service_minutes: used,
            lots: accepted.len(),
            ..VehicleUsage::idle(&vehicle.id, budget)
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Multi-trip mode
    // ─────────────────────────────────────────────────────────────────────────

    fn fly_multi(
        &self,
        vehicle: &Vehicle,
        pool: &mut PendingPool<'_>,
        outcomes: &mut [Option<Assignment>],
    ) -> VehicleUsage {
        let max_minutes = vehicle.max_minutes();
        let turnaround = self.config.turnaround_minutes;

        let mut usage = VehicleUsage::idle(&vehicle.id, max_minutes);
        let mut time_used = 0.0;
        let mut trip: u32 = 1;

        while !pool.is_empty() && time_used < max_minutes {
            let remaining = max_minutes - time_used;
            let trip_budget = match self.config.max_trip_minutes {
                Some(cap) => remaining.min(cap),
                None => remaining,
            };
            let (accepted, trip_time) = pool.first_fit(trip_budget);

            if accepted.is_empty() {
                debug!(
                    vehicle = %vehicle.id,
                    remaining_min = remaining,
                    trip_budget_min = trip_budget,
                    "no pending lot fits the trip budget"
                );
                break;
            }

            for &index in &accepted {
                Self::assign(
                    outcomes,
                    index,
                    Assignment {
                        vehicle_id: vehicle.id.clone(),
                        trip: Some(trip),
                        start_offset_minutes: Some(time_used),
                    },
                );
                debug!(
                    vehicle = %vehicle.id,
                    trip = trip,
                    lot_index = index,
                    distance = ?pool.distance_of(index),
                    "✓ assigned"
                );
            }
            pool.remove(&accepted);

            debug!(
                vehicle = %vehicle.id,
                trip = trip,
                lots = accepted.len(),
                start_min = time_used,
                trip_min = trip_time,
                "trip closed"
            );

            if usage.trips > 0 {
                usage.turnaround_minutes += turnaround;
            }
            usage.trips += 1;
            usage.lots += accepted.len();
            usage.service_minutes += trip_time;

            time_used += trip_time + turnaround;
            trip += 1;
        }

        usage
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Shared helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Record an assignment.  A lot is assigned at most once per run; it left
    /// the pool when it was first accepted.
    fn assign(outcomes: &mut [Option<Assignment>], index: usize, assignment: Assignment) {
        debug_assert!(
            outcomes[index].is_none(),
            "lot at index {index} assigned twice"
        );
        outcomes[index] = Some(assignment);
    }

    /// Classify a lot the fleet could not take.
    fn unassigned_reason(&self, lot: &Lot, largest_budget: Option<f64>) -> UnassignedReason {
        let trip_cap = match self.config.mode {
            TripMode::Single => None,
            TripMode::Multi => self.config.max_trip_minutes,
        };
        match largest_budget {
            None => UnassignedReason::NoVehicles,
            Some(budget) if lot.duration_minutes > budget => UnassignedReason::ExceedsDailyBudget,
            Some(_) if trip_cap.is_some_and(|cap| lot.duration_minutes > cap) => {
                UnassignedReason::ExceedsTripLimit
            }
            Some(_) => UnassignedReason::CapacityExhausted,
        }
    }

    /// Zip the caller's lots with their outcomes, in input order.
    fn build_schedule(
        &self,
        lots: &[Lot],
        vehicles: &[Vehicle],
        outcomes: Vec<Option<Assignment>>,
        usage: Vec<VehicleUsage>,
    ) -> Schedule {
        let largest_budget = vehicles
            .iter()
            .map(Vehicle::max_minutes)
            .fold(None, |acc: Option<f64>, m| Some(acc.map_or(m, |a| a.max(m))));
        let records = lots
            .iter()
            .zip(outcomes)
            .map(|(lot, outcome)| {
                let outcome = match outcome {
                    Some(a) => LotOutcome::Assigned(a),
                    None => {
                        let reason = self.unassigned_reason(lot, largest_budget);
                        debug!(lot = %lot.id, reason = %reason, "✗ unassigned");
                        LotOutcome::Unassigned(reason)
                    }
                };
                LotRecord {
                    lot_id: lot.id.clone(),
                    suggested_date: lot.suggested_date,
                    duration_minutes: lot.duration_minutes,
                    outcome,
                }
            })
            .collect();
        Schedule::new(self.config.mode, records, usage)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
