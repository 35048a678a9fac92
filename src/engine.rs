//! Matching and merging engine.
//!
//! Recognizing actions in a trace is a pipeline over one [`Forest`](crate::Forest):
//!
//! ```text
//! catalog: [&dyn Merger]  (straws, usually Lazy statics)
//!          │
//! forest ──┼─ Bath::saturate                         (bath.rs)
//!          │    for each pass, for each straw:
//!          │      post-order sweep over live bubbles
//!          │        Straw::claim        -> Claims      (matcher.rs)
//!          │        Straw::reduce       -> new bubble  (merge.rs)
//!          │        commit in place, prune swallowed
//!          │    until a pass merges nothing
//!          v
//!     project_forest                                 (project.rs)
//!          │
//!          v
//!     Vec<Action>
//! ```
//!
//! Like any rewrite system this leans on saturation: a merge can create the
//! bubble that lets another straw (or the same one, one level up) match on
//! the next pass.
//!
//! ## Responsibilities by module
//!
//! - `straw.rs`: the pattern type, its `Check`/`Builder` aliases, and `claim`.
//! - `matcher.rs`: greedy matching with per-candidate rollback, producing a
//!   claim-set.
//! - `merge.rs`: the [`Merger`] trait and the all-or-nothing reducer.
//! - `sink.rs`: where builder failures go.
//! - `bath.rs`: the saturation loop.
//! - `project.rs`: recognized bubbles to external actions.
//! - `metrics.rs`: per-pass timings and counters.
//!
//! ## Adding new straws
//!
//! Straws live under `src/straws/**`. A straw producing a new action type
//! needs a [`Payload`](crate::Payload) variant, an [`Actioner`] impl and an
//! entry in `straws::catalog`. Nothing in this module changes.
//!
//! ## Debugging
//!
//! Run with `RUST_LOG=bath=debug` to see every merge and per-pass counters, or
//! `RUST_LOG=bath=trace` to also see straws that found nothing.

#[path = "engine/bath.rs"]
mod bath;
#[path = "engine/matcher.rs"]
mod matcher;
#[path = "engine/merge.rs"]
mod merge;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/project.rs"]
mod project;
#[path = "engine/sink.rs"]
mod sink;
#[path = "engine/straw.rs"]
mod straw;

pub use bath::Bath;
pub use matcher::Claims;
pub use merge::Merger;
pub use metrics::{PassMetrics, RunMetrics, RunResult, SaturationMetrics};
pub use project::{Actioner, project_forest};
pub use sink::{CollectingSink, ErrorSink, Level, LogSink, NoopSink, Report};
pub use straw::{Builder, Check, Straw, with_tx};
