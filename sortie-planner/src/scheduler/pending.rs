/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! The pending pool: lots not yet assigned, kept in service order.
//!
//! Base-to-lot distances do not change during a run, so the pool computes
//! them once and sorts once.  Removing accepted lots keeps the remaining
//! order intact, which gives the same sequence a full re-sort would.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::config::PlannerConfig;
use crate::lot::Lot;

use super::distance;

/// A pending lot with its precomputed base distance.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    /// Position of the lot in the caller's slice.
    index: usize,
    distance: f64,
}

/// Ordered set of unassigned lots, borrowed from the caller.
#[derive(Debug)]
pub(crate) struct PendingPool<'a> {
    lots: &'a [Lot],
    order: Vec<Candidate>,
}

impl<'a> PendingPool<'a> {
    /// Build the pool with every lot pending, sorted by
    /// `(suggested_date asc, distance asc[, priority desc])`.
    ///
    /// The sort is stable: fully tied lots keep their input order.
    pub(crate) fn new(lots: &'a [Lot], config: &PlannerConfig) -> Self {
        let mut order: Vec<Candidate> = lots
            .iter()
            .enumerate()
            .map(|(index, lot)| Candidate {
                index,
                distance: distance::measure(config.distance_metric, config.base, lot.location),
            })
            .collect();

        let priority_tiebreak = config.priority_tiebreak;
        order.sort_by(|a, b| {
            let (la, lb) = (&lots[a.index], &lots[b.index]);
            la.suggested_date
                .cmp(&lb.suggested_date)
                .then_with(|| a.distance.total_cmp(&b.distance))
                .then_with(|| {
                    if priority_tiebreak {
                        // Descending; lots without a priority go last.
                        lb.priority.cmp(&la.priority)
                    } else {
                        Ordering::Equal
                    }
                })
        });

        Self { lots, order }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    /// Pending lots in service order, with their slice index.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (usize, &'a Lot)> + '_ {
        let lots = self.lots;
        self.order.iter().map(move |c| (c.index, &lots[c.index]))
    }

    /// Base distance of the lot at `index`, if it is still pending.
    pub(crate) fn distance_of(&self, index: usize) -> Option<f64> {
        self.order
            .iter()
            .find(|c| c.index == index)
            .map(|c| c.distance)
    }

    /// Greedy first-fit walk over the pool.
    ///
    /// Accepts each lot whose duration still fits `budget_minutes`, skipping
    /// (not stopping at) lots that would overflow.  Returns the accepted slice
    /// indices in service order and their total duration.  The pool itself is
    /// not modified.
    pub(crate) fn first_fit(&self, budget_minutes: f64) -> (Vec<usize>, f64) {
        let mut accepted = Vec::new();
        let mut used = 0.0;
        for (index, lot) in self.iter() {
            if used + lot.duration_minutes <= budget_minutes {
                used += lot.duration_minutes;
                accepted.push(index);
            }
        }
        (accepted, used)
    }

    /// Drop the given slice indices from the pool.
    pub(crate) fn remove(&mut self, accepted: &[usize]) {
        if accepted.is_empty() {
            return;
        }
        let gone: HashSet<usize> = accepted.iter().copied().collect();
        self.order.retain(|c| !gone.contains(&c.index));
    }
}
