/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Planner configuration loading.
//!
//! Every tunable of the scheduler lives here instead of being hard-coded:
//! the shared base coordinate, the turnaround charged between trips, the trip
//! mode, the priority tie-break and the distance metric.
//!
//! The expected YAML structure is:
//! ```yaml
//! planner:
//!   base:
//!     lat: 10.869
//!     lon: -74.146
//!   turnaround_minutes: 4
//!   max_trip_minutes: 90   # optional per-trip cap (multi-trip mode)
//!   mode: multi            # single | multi
//!   priority_tiebreak: true
//!   distance_metric: planar  # planar | haversine
//! ```
//!
//! Any key may be omitted; missing values fall back to [`PlannerConfig::default`].

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::lot::Coordinate;

// ── Defaults ──────────────────────────────────────────────────────────────────

/// Default operating base (the airstrip every trip starts from and returns to).
pub const DEFAULT_BASE: Coordinate = Coordinate::new(10.869, -74.146);

/// Default turnaround charged after each completed trip, in minutes.
pub const DEFAULT_TURNAROUND_MINUTES: f64 = 4.0;

// ── Enums ─────────────────────────────────────────────────────────────────────

/// How a vehicle's day is split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TripMode {
    /// One pass per vehicle; no trip numbers or start offsets are recorded.
    Single,
    /// Repeated trips per vehicle with a turnaround charged between them.
    #[default]
    Multi,
}

impl std::fmt::Display for TripMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TripMode::Single => write!(f, "single"),
            TripMode::Multi => write!(f, "multi"),
        }
    }
}

/// How base-to-lot distance is measured.  Only the ordering of lots depends
/// on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Euclidean over (lat, lon) treated as planar coordinates.
    #[default]
    Planar,
    /// Great-circle distance in kilometres.
    Haversine,
}

impl std::fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DistanceMetric::Planar => write!(f, "planar"),
            DistanceMetric::Haversine => write!(f, "haversine"),
        }
    }
}

// ── Private YAML deserialization types ────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PlannerConfigFile {
    #[serde(default)]
    planner: Option<PlannerConfigEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PlannerConfigEntry {
    base: Option<BaseEntry>,
    turnaround_minutes: Option<f64>,
    max_trip_minutes: Option<f64>,
    mode: Option<TripMode>,
    priority_tiebreak: Option<bool>,
    distance_metric: Option<DistanceMetric>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BaseEntry {
    lat: f64,
    lon: f64,
}

// ── PlannerConfig ─────────────────────────────────────────────────────────────

/// Scheduler configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Origin and return point of every trip.
    pub base: Coordinate,
    /// Minutes charged after each completed trip (multi-trip mode).
    pub turnaround_minutes: f64,
    /// Upper bound on one trip's service time (multi-trip mode).
    ///
    /// `None` bounds a trip only by what is left of the day.  Since the
    /// first trip then already offers every pending lot the remaining budget
    /// allows, a vehicle never completes more than one trip; set a cap (tank
    /// endurance, for instance) to split the day into several trips.
    pub max_trip_minutes: Option<f64>,
    pub mode: TripMode,
    /// Break `(date, distance)` ties by descending priority.
    pub priority_tiebreak: bool,
    pub distance_metric: DistanceMetric,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE,
            turnaround_minutes: DEFAULT_TURNAROUND_MINUTES,
            max_trip_minutes: None,
            mode: TripMode::default(),
            priority_tiebreak: true,
            distance_metric: DistanceMetric::default(),
        }
    }
}

impl PlannerConfig {
    /// Parses `path` on top of the defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not valid YAML, carries
    /// unknown keys, or holds values that fail [`validate`](Self::validate).
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading planner configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open configuration file: {}", path.display()))?;

        Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid configuration file: {}", path.display()))
    }

    /// Same as [`load_from_file`](Self::load_from_file) for an in-memory
    /// document.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: PlannerConfigFile =
            serde_yaml::from_str(content).context("Failed to parse YAML")?;

        let entry = match file.planner {
            Some(entry) => entry,
            None => {
                warn!("No `planner` section found, using default configuration");
                PlannerConfigEntry::default()
            }
        };

        let defaults = Self::default();
        let config = Self {
            base: entry
                .base
                .map(|b| Coordinate::new(b.lat, b.lon))
                .unwrap_or(defaults.base),
            turnaround_minutes: entry
                .turnaround_minutes
                .unwrap_or(defaults.turnaround_minutes),
            max_trip_minutes: entry.max_trip_minutes.or(defaults.max_trip_minutes),
            mode: entry.mode.unwrap_or(defaults.mode),
            priority_tiebreak: entry.priority_tiebreak.unwrap_or(defaults.priority_tiebreak),
            distance_metric: entry.distance_metric.unwrap_or(defaults.distance_metric),
        };

        config.validate()?;

        debug!(
            base_lat = config.base.lat,
            base_lon = config.base.lon,
            turnaround = config.turnaround_minutes,
            max_trip = ?config.max_trip_minutes,
            mode = %config.mode,
            priority_tiebreak = config.priority_tiebreak,
            metric = %config.distance_metric,
            "planner configuration parsed"
        );

        Ok(config)
    }

    /// Rejects values the scheduler cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !self.base.is_finite() {
            bail!(
                "base coordinate must be finite, got ({}, {})",
                self.base.lat,
                self.base.lon
            );
        }
        if !self.turnaround_minutes.is_finite() || self.turnaround_minutes < 0.0 {
            bail!(
                "turnaround_minutes must be a finite, non-negative number, got {}",
                self.turnaround_minutes
            );
        }
        if let Some(cap) = self.max_trip_minutes {
            if !cap.is_finite() || cap <= 0.0 {
                bail!("max_trip_minutes must be a finite, positive number, got {}", cap);
            }
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
