use crate::engine::{Bath, ErrorSink, LogSink, Merger};
use crate::{Action, Forest};
use once_cell::sync::Lazy;
use std::time::Duration;

static DEFAULT_CATALOG: Lazy<Vec<&'static dyn Merger>> = Lazy::new(crate::straws::catalog);

/// Options that affect a saturation run.
#[derive(Debug, Clone)]
pub struct Options {
    /// Upper bound on catalog passes. A well-formed catalog reaches its
    /// fixpoint long before this; hitting it is logged as a warning.
    pub max_passes: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options { max_passes: 16 }
    }
}

/// Result from [`find_actions`] and [`find_actions_with`].
#[derive(Debug, Clone)]
pub struct FindResult {
    pub actions: Vec<Action>,
    /// Total elapsed time spent merging and projecting.
    pub elapsed: Duration,
}

/// A compact per-pass trace.
#[derive(Debug, Clone)]
pub struct PassSummary {
    pub pass: usize,
    pub duration: Duration,
    pub merged: usize,
    pub attempts: usize,
}

/// Additional details returned by [`find_actions_verbose_with`].
#[derive(Debug, Clone)]
pub struct RunDetails {
    pub total: Duration,
    pub saturation_total: Duration,
    pub passes: Vec<PassSummary>,
    pub reached_fixpoint: bool,
    pub project: Duration,
    /// Names of the straws in the catalog, in application order.
    pub straws: Vec<String>,
    /// The forest after saturation.
    pub forest: Forest,
}

#[derive(Debug, Clone)]
pub struct FindResultVerbose {
    pub actions: Vec<Action>,
    pub elapsed: Duration,
    pub details: RunDetails,
}

/// Recognize actions in `forest` with the default catalog, reporting builder
/// failures through the `log` facade.
///
/// # Example
/// ```
/// use bath::{find_actions, parse_trace};
///
/// let trace = r#"{ "transaction": { "account": { "address": "0:0000000000000000000000000000000000000000000000000000000000000001" } } }"#;
/// let out = find_actions(parse_trace(trace).unwrap());
/// assert!(out.actions.is_empty());
/// ```
pub fn find_actions(forest: Forest) -> FindResult {
    find_actions_with(forest, &DEFAULT_CATALOG, &Options::default(), &LogSink)
}

pub fn find_actions_with(
    forest: Forest,
    catalog: &[&dyn Merger],
    options: &Options,
    sink: &dyn ErrorSink,
) -> FindResult {
    let run = Bath::new(forest, catalog, options).run_with_metrics(sink);
    FindResult { actions: run.actions, elapsed: run.metrics.total }
}

/// Like [`find_actions_with`], but keeps per-pass metrics and the final forest.
///
/// The default path does not clone anything; this one is meant for the CLI's
/// verbose report and for debugging straws.
pub fn find_actions_verbose_with(
    forest: Forest,
    catalog: &[&dyn Merger],
    options: &Options,
    sink: &dyn ErrorSink,
) -> FindResultVerbose {
    let run = Bath::new(forest, catalog, options).run_with_metrics(sink);
    let saturation = &run.metrics.saturation;

    let passes = saturation
        .passes
        .iter()
        .enumerate()
        .map(|(idx, pass)| PassSummary {
            pass: idx + 1,
            duration: pass.duration,
            merged: pass.merged,
            attempts: pass.bubbles_visited,
        })
        .collect();

    let details = RunDetails {
        total: run.metrics.total,
        saturation_total: saturation.total,
        passes,
        reached_fixpoint: saturation.reached_fixpoint,
        project: run.metrics.project,
        straws: catalog.iter().map(|straw| straw.name().to_string()).collect(),
        forest: run.forest,
    };

    FindResultVerbose { actions: run.actions, elapsed: run.metrics.total, details }
}

/// The catalog used by [`find_actions`].
pub fn default_catalog() -> &'static [&'static dyn Merger] {
    &DEFAULT_CATALOG
}
