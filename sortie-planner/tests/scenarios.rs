/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! End-to-end planning runs through the public API: workload document in,
//! schedule out.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use sortie_planner::config::{PlannerConfig, TripMode};
use sortie_planner::lot::{Coordinate, Lot, Vehicle};
use sortie_planner::schedule::{LotOutcome, Schedule, UnassignedReason};
use sortie_planner::scheduler::{overbooked_vehicles, ScheduleSummary, Scheduler};
use sortie_planner::workload::Workload;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn config(mode: TripMode, turnaround: f64) -> PlannerConfig {
    PlannerConfig {
        base: Coordinate::new(0.0, 0.0),
        turnaround_minutes: turnaround,
        mode,
        ..PlannerConfig::default()
    }
}

fn run(yaml: &str, config: PlannerConfig) -> Schedule {
    let workload = Workload::from_yaml_str(yaml).unwrap();
    Scheduler::new(config).schedule(&workload.lots, &workload.vehicles)
}

fn assigned_to<'s>(s: &'s Schedule, lot: &str) -> Option<&'s str> {
    s.assignment(lot).map(|a| a.vehicle_id.as_str())
}

fn assigned_minutes(s: &Schedule) -> f64 {
    s.records()
        .iter()
        .filter(|r| r.is_assigned())
        .map(|r| r.duration_minutes)
        .sum()
}

/// Small deterministic generator so property runs are reproducible.
struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next() % n
    }
}

fn random_input(seed: u64) -> (Vec<Lot>, Vec<Vehicle>) {
    let mut rng = XorShift(seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1);
    let lot_count = 5 + rng.below(25) as usize;
    let lots = (0..lot_count)
        .map(|i| Lot {
            id: format!("L{i}"),
            location: Coordinate::new(rng.below(100) as f64 / 10.0, rng.below(100) as f64 / 10.0),
            suggested_date: NaiveDate::from_ymd_opt(2025, 3, 1 + rng.below(4) as u32)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            duration_minutes: (5 + rng.below(86)) as f64,
            priority: match rng.below(3) {
                0 => None,
                _ => Some(rng.below(5) as i64),
            },
        })
        .collect();
    let vehicle_count = 1 + rng.below(4) as usize;
    let vehicles = (0..vehicle_count)
        .map(|i| Vehicle {
            id: format!("V{i}"),
            max_hours_per_day: [1.0, 1.5, 2.0, 3.0][rng.below(4) as usize],
        })
        .collect();
    (lots, vehicles)
}

fn all_configs() -> Vec<PlannerConfig> {
    vec![
        config(TripMode::Single, 4.0),
        config(TripMode::Multi, 4.0),
        config(TripMode::Multi, 0.0),
        PlannerConfig {
            max_trip_minutes: Some(45.0),
            ..config(TripMode::Multi, 10.0)
        },
    ]
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

const SCENARIO_A: &str = r#"
lots:
  - { lote_id: L-30, Latitud: 0.1, Longitud: 0.0, Fecha_sugerida: 2025-03-01, Duracion_estim_min: 30 }
  - { lote_id: L-40, Latitud: 0.2, Longitud: 0.0, Fecha_sugerida: 2025-03-01, Duracion_estim_min: 40 }
  - { lote_id: L-20, Latitud: 0.1, Longitud: 0.0, Fecha_sugerida: 2025-03-02, Duracion_estim_min: 20 }
vehicles:
  - { aeronave_id: HK-1, Horas_max_dia: 1 }
"#;

#[test]
fn scenario_a_first_fit_skips_and_continues() {
    for mode in [TripMode::Single, TripMode::Multi] {
        let s = run(SCENARIO_A, config(mode, 4.0));
        assert_eq!(assigned_to(&s, "L-30"), Some("HK-1"), "{mode}");
        assert_eq!(assigned_to(&s, "L-40"), None, "{mode}");
        assert_eq!(assigned_to(&s, "L-20"), Some("HK-1"), "{mode}");
        assert_eq!(assigned_minutes(&s), 50.0);
    }
}

#[test]
fn scenario_b_turnaround_leaves_third_lot_unassigned() {
    let lots: Vec<Lot> = ["a", "b", "c"]
        .into_iter()
        .map(|id| Lot {
            id: id.into(),
            location: Coordinate::new(1.0, 1.0),
            suggested_date: NaiveDate::from_ymd_opt(2025, 3, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            duration_minutes: 30.0,
            priority: None,
        })
        .collect();
    let fleet = [Vehicle {
        id: "V1".into(),
        max_hours_per_day: 70.0 / 60.0,
    }];

    let s = Scheduler::new(config(TripMode::Multi, 4.0)).schedule(&lots, &fleet);

    for id in ["a", "b"] {
        let a = s.assignment(id).unwrap();
        assert_eq!((a.trip, a.start_offset_minutes), (Some(1), Some(0.0)));
    }
    assert_eq!(
        s.get("c").unwrap().outcome,
        LotOutcome::Unassigned(UnassignedReason::CapacityExhausted)
    );
    let summary = ScheduleSummary::from_schedule(&s);
    assert_eq!(summary.headline(), "Lots assigned: 2 / 3 (1 trips)");
}

#[test]
fn scenario_c_empty_lot_set() {
    let yaml = "lots: []\nvehicles:\n  - { aeronave_id: HK-1, Horas_max_dia: 4 }\n";
    for mode in [TripMode::Single, TripMode::Multi] {
        let s = run(yaml, config(mode, 4.0));
        let summary = ScheduleSummary::from_schedule(&s);
        assert_eq!(summary.assigned, 0);
        assert_eq!(summary.total, 0);
        assert_eq!(s.trip_count(), 0);
        // Nothing to place still warns, but it is not an error.
        assert!(summary.is_low_confidence());
    }
}

#[test]
fn scenario_d_oversized_lot_is_unassigned_not_an_error() {
    let yaml = r#"
lots:
  - { lote_id: 1, Latitud: 0.1, Longitud: 0.1, Fecha_sugerida: "2025-03-01 07:00", Duracion_estim_min: 400 }
vehicles:
  - { aeronave_id: HK-1, Horas_max_dia: 2 }
  - { aeronave_id: HK-2, Horas_max_dia: 6 }
"#;
    for mode in [TripMode::Single, TripMode::Multi] {
        let s = run(yaml, config(mode, 4.0));
        assert_eq!(
            s.get("1").unwrap().outcome,
            LotOutcome::Unassigned(UnassignedReason::ExceedsDailyBudget)
        );
        assert!(ScheduleSummary::from_schedule(&s).is_low_confidence());
    }
}

#[test]
fn invalid_workload_aborts_before_scheduling() {
    let yaml = r#"
lots:
  - { lote_id: L-1, Latitud: 0.1, Longitud: 0.1, Fecha_sugerida: 2025-03-01, Duracion_estim_min: 0 }
vehicles:
  - { aeronave_id: HK-1, Horas_max_dia: 2 }
"#;
    let err = Workload::from_yaml_str(yaml).unwrap_err();
    assert!(err.is_value_error());

    let yaml = "lots:\n  - { lote_id: L-1, Latitud: 0.1 }\nvehicles: []\n";
    let err = Workload::from_yaml_str(yaml).unwrap_err();
    assert!(err.is_schema_error());
}

#[test]
fn output_table_round_trips_through_yaml() {
    let s = run(SCENARIO_A, config(TripMode::Multi, 4.0));
    let yaml = s.to_yaml().unwrap();
    let rows: Vec<BTreeMap<String, serde_yaml::Value>> = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["lote_id"].as_str(), Some("L-30"));
    assert_eq!(rows[0]["Vuelo_nro"].as_u64(), Some(1));
    assert!(rows[1]["Asignado"].is_null());
}

// ── Properties ────────────────────────────────────────────────────────────────

#[test]
fn every_lot_is_assigned_at_most_once_and_budgets_hold() {
    for seed in 0..200 {
        let (lots, vehicles) = random_input(seed);
        let budgets: HashMap<&str, f64> = vehicles
            .iter()
            .map(|v| (v.id.as_str(), v.max_minutes()))
            .collect();

        for cfg in all_configs() {
            let s = Scheduler::new(cfg.clone()).schedule(&lots, &vehicles);
            assert_eq!(s.total_count(), lots.len());
            assert!(overbooked_vehicles(&s).is_empty(), "seed {seed} {cfg:?}");

            // Per (vehicle, trip): the trip fits what was left when it started.
            let mut trips: HashMap<(&str, Option<u32>), (f64, f64)> = HashMap::new();
            for record in s.records() {
                if let Some(a) = record.assignment() {
                    let entry = trips
                        .entry((a.vehicle_id.as_str(), a.trip))
                        .or_insert((a.start_offset_minutes.unwrap_or(0.0), 0.0));
                    assert_eq!(Some(entry.0), a.start_offset_minutes.or(Some(0.0)));
                    entry.1 += record.duration_minutes;
                }
            }
            for ((vehicle, _), (offset, minutes)) in trips {
                assert!(offset + minutes <= budgets[vehicle], "seed {seed} {cfg:?}");
                if let Some(cap) = cfg.max_trip_minutes {
                    assert!(minutes <= cap, "seed {seed} {cfg:?}");
                }
            }
        }
    }
}

#[test]
fn runs_are_idempotent() {
    for seed in 0..50 {
        let (lots, vehicles) = random_input(seed);
        for cfg in all_configs() {
            let scheduler = Scheduler::new(cfg);
            assert_eq!(
                scheduler.schedule(&lots, &vehicles),
                scheduler.schedule(&lots, &vehicles)
            );
        }
    }
}

#[test]
fn appending_a_vehicle_never_lowers_the_assigned_count() {
    for seed in 0..200 {
        let (lots, mut vehicles) = random_input(seed);
        for cfg in all_configs() {
            let scheduler = Scheduler::new(cfg);
            let before = scheduler.schedule(&lots, &vehicles).assigned_count();
            vehicles.push(Vehicle {
                id: "extra".into(),
                max_hours_per_day: 1.0,
            });
            let after = scheduler.schedule(&lots, &vehicles).assigned_count();
            vehicles.pop();
            assert!(after >= before, "seed {seed}: {before} -> {after}");
        }
    }
}

#[test]
fn removing_an_unassigned_lot_changes_nothing_else() {
    for seed in 0..200 {
        let (lots, vehicles) = random_input(seed);
        for cfg in all_configs() {
            let scheduler = Scheduler::new(cfg);
            let full = scheduler.schedule(&lots, &vehicles);
            let Some((dropped, _)) = full.unassigned().next() else {
                continue;
            };
            let rest: Vec<Lot> = lots
                .iter()
                .filter(|l| l.id != dropped.lot_id)
                .cloned()
                .collect();
            let reduced = scheduler.schedule(&rest, &vehicles);

            assert!(assigned_minutes(&reduced) <= assigned_minutes(&full));
            for lot in &rest {
                assert_eq!(
                    reduced.assignment(&lot.id),
                    full.assignment(&lot.id),
                    "seed {seed} lot {}",
                    lot.id
                );
            }
        }
    }
}

#[test]
fn removing_a_lot_can_raise_assigned_minutes_under_first_fit() {
    // Greedy first-fit is not monotone in the lot set: dropping the long lot
    // served first frees the day for two shorter ones.
    let yaml_with = r#"
lots:
  - { lote_id: long, Latitud: 0.1, Longitud: 0.0, Fecha_sugerida: 2025-03-01, Duracion_estim_min: 40 }
  - { lote_id: s1, Latitud: 0.2, Longitud: 0.0, Fecha_sugerida: 2025-03-01, Duracion_estim_min: 30 }
  - { lote_id: s2, Latitud: 0.3, Longitud: 0.0, Fecha_sugerida: 2025-03-01, Duracion_estim_min: 30 }
vehicles:
  - { aeronave_id: HK-1, Horas_max_dia: 1 }
"#;
    let yaml_without = yaml_with.replace(
        "  - { lote_id: long, Latitud: 0.1, Longitud: 0.0, Fecha_sugerida: 2025-03-01, Duracion_estim_min: 40 }\n",
        "",
    );
    let with = run(yaml_with, config(TripMode::Single, 0.0));
    let without = run(&yaml_without, config(TripMode::Single, 0.0));
    assert_eq!(assigned_minutes(&with), 40.0);
    assert_eq!(assigned_minutes(&without), 60.0);
}

#[test]
fn inserting_a_vehicle_ahead_can_lower_the_assigned_count() {
    // Fleet order is greedy too: a small vehicle placed first takes a short
    // lot the later vehicles needed to fill their days.
    let lots: Vec<Lot> = [120.0, 30.0, 105.0, 60.0, 30.0, 45.0]
        .into_iter()
        .enumerate()
        .map(|(i, minutes)| Lot {
            id: format!("L{i}"),
            location: Coordinate::new(0.1 * (i + 1) as f64, 0.0),
            suggested_date: NaiveDate::from_ymd_opt(2025, 3, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            duration_minutes: minutes,
            priority: None,
        })
        .collect();
    let vehicle = |id: &str, hours: f64| Vehicle {
        id: id.into(),
        max_hours_per_day: hours,
    };
    let fleet = vec![vehicle("V-135", 2.25), vehicle("V-120", 2.0)];
    let mut with_front = vec![vehicle("V-30", 0.5)];
    with_front.extend(fleet.iter().cloned());

    for mode in [TripMode::Single, TripMode::Multi] {
        let scheduler = Scheduler::new(config(mode, 4.0));
        assert_eq!(scheduler.schedule(&lots, &fleet).assigned_count(), 4, "{mode}");
        assert_eq!(scheduler.schedule(&lots, &with_front).assigned_count(), 3, "{mode}");
    }
}
