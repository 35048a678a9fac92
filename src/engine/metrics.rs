//! Run metrics.
//!
//! `Bath::run` is the normal entry point; `Bath::run_with_metrics` returns the
//! same actions together with per-pass timings and counters, which is what the
//! CLI prints in its verbose report.

use std::time::Duration;

use crate::{Action, Forest};

#[derive(Debug, Default, Clone)]
pub struct RunMetrics {
    /// Total elapsed time for [`Bath::run_with_metrics`](crate::Bath::run_with_metrics).
    pub total: Duration,
    pub saturation: SaturationMetrics,
    /// Time spent projecting the final forest to actions.
    pub project: Duration,
}

/// Timings for the merge phase.
#[derive(Debug, Default, Clone)]
pub struct SaturationMetrics {
    pub total: Duration,
    /// One entry per pass, including the final pass that merged nothing.
    pub passes: Vec<PassMetrics>,
    /// False when the pass cap stopped the loop while merges were still happening.
    pub reached_fixpoint: bool,
}

impl SaturationMetrics {
    pub fn merged(&self) -> usize {
        self.passes.iter().map(|p| p.merged).sum()
    }
}

/// Counters for a single pass over the catalog.
#[derive(Debug, Default, Clone)]
pub struct PassMetrics {
    pub duration: Duration,
    /// Successful merges during the pass.
    pub merged: usize,
    pub straws_considered: usize,
    /// Match attempts, i.e. (straw, live bubble) pairs tried.
    pub bubbles_visited: usize,
}

/// Runner output bundled with timing information.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub actions: Vec<Action>,
    /// The forest after saturation.
    pub forest: Forest,
    pub metrics: RunMetrics,
}
