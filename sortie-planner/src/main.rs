/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};

use sortie_planner::config::{DistanceMetric, PlannerConfig, TripMode};
use sortie_planner::lot::Coordinate;
use sortie_planner::scheduler::{render_table, ScheduleSummary, Scheduler};
use sortie_planner::workload::Workload;

// ── CLI argument definition ───────────────────────────────────────────────────

/// Sortie planner: assigns lots to aircraft within their daily flight hours.
///
/// Example:
///   sortie-planner -w demos/workload.yaml -c demos/planner.yaml \
///                  --mode multi -o schedule.yaml
#[derive(Debug, Parser)]
#[command(
    name = "sortie-planner",
    about = "Greedy lot-to-aircraft sortie planner",
    long_about = None,
)]
struct Cli {
    /// Path to the YAML workload (lots and vehicles).
    #[arg(short = 'w', long = "workload")]
    workload: PathBuf,

    /// Path to the YAML planner configuration file.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Trip mode; overrides the configuration file.
    #[arg(short = 'm', long = "mode", value_enum)]
    mode: Option<TripMode>,

    /// Turnaround charged between trips, in minutes.
    #[arg(short = 't', long = "turnaround")]
    turnaround: Option<f64>,

    /// Upper bound on one trip's service time, in minutes.
    #[arg(long = "max-trip-minutes")]
    max_trip_minutes: Option<f64>,

    /// Base latitude.
    #[arg(long = "base-lat", requires = "base_lon", allow_hyphen_values = true)]
    base_lat: Option<f64>,

    /// Base longitude.
    #[arg(long = "base-lon", requires = "base_lat", allow_hyphen_values = true)]
    base_lon: Option<f64>,

    /// Distance metric used to order lots.
    #[arg(long = "metric", value_enum)]
    metric: Option<DistanceMetric>,

    /// Do not break (date, distance) ties by priority.
    #[arg(long = "no-priority", default_value_t = false)]
    no_priority: bool,

    /// Write the assignment table as YAML to this path.
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,
}

impl Cli {
    /// Configuration file (or defaults) with command-line overrides applied.
    fn planner_config(&self) -> Result<PlannerConfig> {
        let mut config = match &self.config {
            Some(path) => PlannerConfig::load_from_file(path)?,
            None => {
                warn!("No planner configuration file provided, using default settings");
                PlannerConfig::default()
            }
        };

        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(turnaround) = self.turnaround {
            config.turnaround_minutes = turnaround;
        }
        if self.max_trip_minutes.is_some() {
            config.max_trip_minutes = self.max_trip_minutes;
        }
        if let (Some(lat), Some(lon)) = (self.base_lat, self.base_lon) {
            config.base = Coordinate::new(lat, lon);
        }
        if let Some(metric) = self.metric {
            config.distance_metric = metric;
        }
        if self.no_priority {
            config.priority_tiebreak = false;
        }

        config
            .validate()
            .context("Invalid command-line override")?;
        Ok(config)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Sortie planner starting up...");

    let cli = Cli::parse();

    info!(
        workload = %cli.workload.display(),
        config   = ?cli.config,
        mode     = ?cli.mode,
        output   = ?cli.output,
        "Command line"
    );

    if let Err(e) = run(&cli) {
        error!("{:#}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    // ── Load configuration and workload ───────────────────────────────────────
    let config = cli.planner_config()?;
    let workload = Workload::load_from_file(&cli.workload)?;

    // ── Schedule ──────────────────────────────────────────────────────────────
    let scheduler = Scheduler::new(config);
    let schedule = scheduler.schedule(&workload.lots, &workload.vehicles);

    let summary = ScheduleSummary::from_schedule(&schedule);
    summary.log();
    let by_vehicle = schedule.by_vehicle();
    for usage in schedule.vehicle_usage() {
        let lot_ids: Vec<&str> = by_vehicle
            .get(usage.vehicle_id.as_str())
            .map(|records| records.iter().map(|r| r.lot_id.as_str()).collect())
            .unwrap_or_default();
        info!(
            "  [{id}]  trips={trips}  used={used:.1}/{budget:.1} min  ({pct:.0}%)  lots={lots:?}",
            id = usage.vehicle_id,
            trips = usage.trips,
            used = usage.used_minutes(),
            budget = usage.budget_minutes,
            pct = usage.utilization() * 100.0,
            lots = lot_ids,
        );
    }

    println!("{}", summary.headline());
    print!("{}", render_table(&schedule));

    // ── Optional YAML output ──────────────────────────────────────────────────
    if let Some(path) = &cli.output {
        let yaml = schedule
            .to_yaml()
            .context("Failed to serialise the schedule")?;
        std::fs::write(path, yaml)
            .with_context(|| format!("Cannot write schedule to: {}", path.display()))?;
        info!("Schedule written to: {}", path.display());
    }

    Ok(())
}
