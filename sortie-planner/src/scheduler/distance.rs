/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Base-to-lot distance.
//!
//! Distance only decides the order in which lots are offered to a vehicle;
//! it never enters the time accounting.  The default metric treats
//! `(lat, lon)` as planar coordinates, which is accurate enough to rank lots
//! around one airstrip.  The haversine metric is available for fleets whose
//! lots spread over a wider area.

use crate::config::DistanceMetric;
use crate::lot::Coordinate;

/// Earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Euclidean distance in degrees, `(lat, lon)` treated as `(x, y)`.
pub fn planar(from: Coordinate, to: Coordinate) -> f64 {
    (to.lat - from.lat).hypot(to.lon - from.lon)
}

/// Great-circle distance in kilometres.
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lon = (to.lon - from.lon).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Distance under `metric`.  Units differ per metric; only compare values
/// computed with the same one.
pub fn measure(metric: DistanceMetric, from: Coordinate, to: Coordinate) -> f64 {
    match metric {
        DistanceMetric::Planar => planar(from, to),
        DistanceMetric::Haversine => haversine_km(from, to),
    }
}
