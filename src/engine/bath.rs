//! The runner: apply a catalog of straws to a forest until nothing merges.
//!
//! ```text
//! Bath::new(forest, catalog, options)
//!   └─ run_with_metrics
//!        ├─ saturate
//!        │    pass 1: straw A sweeps post-order, then straw B, ...
//!        │    pass 2: same, over the rewritten forest
//!        │    ...     until a pass merges nothing (or max_passes)
//!        └─ project
//!             pre-order walk, one Action per action bubble
//! ```
//!
//! Sweeps are bottom-up so that inner patterns merge first and an outer
//! straw sees already-merged bubbles on its next visit. Ids swallowed earlier
//! in the same sweep are skipped, and so is any (straw, bubble) pair whose
//! builder already failed during this run: it is reported once.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use super::merge::Merger;
use super::metrics::{PassMetrics, RunMetrics, RunResult, SaturationMetrics};
use super::project::project_forest;
use super::sink::{ErrorSink, Report};
use crate::{Action, BubbleId, Forest, Options};

// --- Report counting ---------------------------------------------------------

/// Forwards to the caller's sink and counts what went through, which is how
/// the runner tells a builder failure from a plain no-match.
struct Tally<'s> {
    inner: &'s dyn ErrorSink,
    sent: AtomicUsize,
}

impl<'s> Tally<'s> {
    fn new(inner: &'s dyn ErrorSink) -> Self {
        Tally { inner, sent: AtomicUsize::new(0) }
    }

    fn sent(&self) -> usize {
        self.sent.load(Ordering::Relaxed)
    }
}

impl ErrorSink for Tally<'_> {
    fn send(&self, report: Report) {
        self.sent.fetch_add(1, Ordering::Relaxed);
        self.inner.send(report);
    }
}

// --- Runner ------------------------------------------------------------------

/// One saturation run over one forest.
///
/// The forest is owned by the run; the catalog and options are shared and
/// never mutated, so any number of baths may run on separate threads with the
/// same catalog.
pub struct Bath<'a> {
    forest: Forest,
    catalog: &'a [&'a dyn Merger],
    options: &'a Options,
    /// (catalog index, bubble) pairs whose builder failed.
    failed: HashSet<(usize, BubbleId)>,
}

impl<'a> Bath<'a> {
    pub fn new(forest: Forest, catalog: &'a [&'a dyn Merger], options: &'a Options) -> Self {
        Bath { forest, catalog, options, failed: HashSet::new() }
    }

    fn sweep(&mut self, index: usize, straw: &dyn Merger, sink: &Tally<'_>, metrics: &mut PassMetrics) {
        let mut merged = 0;
        for id in self.forest.post_order() {
            if !self.forest.contains(id) || self.failed.contains(&(index, id)) {
                continue;
            }
            metrics.bubbles_visited += 1;
            let reported = sink.sent();
            if straw.merge(&mut self.forest, id, sink) {
                merged += 1;
            } else if sink.sent() > reported {
                self.failed.insert((index, id));
            }
        }
        if merged == 0 {
            log::trace!("straw '{}' found nothing", straw.name());
        }
        metrics.merged += merged;
    }

    fn saturate(&mut self, sink: &dyn ErrorSink) -> SaturationMetrics {
        let mut metrics = SaturationMetrics::default();
        let sink = Tally::new(sink);
        let start = Instant::now();

        while metrics.passes.len() < self.options.max_passes {
            let pass_start = Instant::now();
            let mut pass = PassMetrics::default();
            for (index, &straw) in self.catalog.iter().enumerate() {
                pass.straws_considered += 1;
                self.sweep(index, straw, &sink, &mut pass);
            }
            pass.duration = pass_start.elapsed();
            log::debug!("pass {}: {} merges, {} attempts", metrics.passes.len() + 1, pass.merged, pass.bubbles_visited);

            let merged = pass.merged;
            metrics.passes.push(pass);
            if merged == 0 {
                metrics.reached_fixpoint = true;
                break;
            }
        }

        if !metrics.reached_fixpoint {
            log::warn!("stopped after {} passes without reaching a fixpoint", self.options.max_passes);
        }
        metrics.total = start.elapsed();
        metrics
    }

    /// Saturate, project, and return timing details alongside the actions.
    pub fn run_with_metrics(mut self, sink: &dyn ErrorSink) -> RunResult {
        let total_start = Instant::now();
        let saturation = self.saturate(sink);
        let project_start = Instant::now();
        let actions = project_forest(&self.forest);
        let project = project_start.elapsed();
        let total = total_start.elapsed();

        RunResult { actions, forest: self.forest, metrics: RunMetrics { total, saturation, project } }
    }

    /// Convenience wrapper that discards timing details and the final forest.
    pub fn run(self, sink: &dyn ErrorSink) -> Vec<Action> {
        self.run_with_metrics(sink).actions
    }
}
