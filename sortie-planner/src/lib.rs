/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Sortie planner: greedy lot-to-aircraft scheduling
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── config/         – YAML planner configuration (base, turnaround, mode)
//! ├── lot             – Lot / Vehicle / Coordinate input records
//! ├── workload/       – YAML workload loader and boundary validation
//! ├── scheduler/      – single- and multi-trip first-fit, distances, report
//! └── schedule        – per-lot outcomes and per-vehicle usage
//! ```

pub mod config;
pub mod lot;
pub mod schedule;
pub mod scheduler;
pub mod workload;
