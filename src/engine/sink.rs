//! Error reporting side channel.
//!
//! Builder failures are not errors from the caller's point of view (the merge
//! just reports "no match"), but they usually point at a broken straw or an
//! unexpected trace shape, so they are handed to an [`ErrorSink`] together with
//! the failing bubble's description. Sinks are fire-and-forget.

use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Error,
    Warning,
    Info,
}

/// One report: an operation tag, structured data and a severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub operation: &'static str,
    pub data: BTreeMap<&'static str, String>,
    pub level: Level,
}

impl Report {
    pub fn new(operation: &'static str, level: Level) -> Self {
        Report { operation, data: BTreeMap::new(), level }
    }

    pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.data.insert(key, value.into());
        self
    }
}

pub trait ErrorSink: Send + Sync {
    fn send(&self, report: Report);
}

/// Drops every report.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl ErrorSink for NoopSink {
    fn send(&self, _report: Report) {}
}

/// Forwards reports to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ErrorSink for LogSink {
    fn send(&self, report: Report) {
        let level = match report.level {
            Level::Error => log::Level::Error,
            Level::Warning => log::Level::Warn,
            Level::Info => log::Level::Info,
        };
        log::log!(level, "[{}] {:?}", report.operation, report.data);
    }
}

/// Keeps every report in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    reports: Mutex<Vec<Report>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<Report> {
        self.reports.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clone()
    }

    pub fn len(&self) -> usize {
        self.reports.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ErrorSink for CollectingSink {
    fn send(&self, report: Report) {
        self.reports.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).push(report);
    }
}
