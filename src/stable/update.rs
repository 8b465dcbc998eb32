use std::cmp::Ordering;
use std::sync::{Arc, Mutex};

use serde_json::json;

use super::core::{ReorderMemory, StableOptions, stabilize_with};
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::GridMetrics;
use crate::track::TrackLike;

const LOG_TARGET: &str = "track_grid::stable";

/// Comparator applied to raw items before stabilization.
pub type SortFn<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// What the last [`VisualStableUpdate::update`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Nothing computed yet.
    Idle,
    /// Page size changed (or first run); output is the sorted input.
    Reset,
    /// Positions carried over from the previous ordering.
    Stabilized,
    /// Input was malformed; previous output kept.
    Recovered,
}

/// Stateful wrapper owning one [`ReorderMemory`].
pub struct VisualStableUpdate<T> {
    memory: ReorderMemory<T>,
    options: StableOptions,
    sort: Option<SortFn<T>>,
    logger: Option<Logger>,
    metrics: Option<Arc<Mutex<GridMetrics>>>,
    last_outcome: UpdateOutcome,
}

impl<T> Default for VisualStableUpdate<T> {
    fn default() -> Self {
        Self {
            memory: ReorderMemory::new(),
            options: StableOptions::default(),
            sort: None,
            logger: None,
            metrics: None,
            last_outcome: UpdateOutcome::Idle,
        }
    }
}

impl<T: TrackLike> VisualStableUpdate<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: StableOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_sort(mut self, sort: Option<SortFn<T>>) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_logger(mut self, logger: Option<Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_metrics(mut self, metrics: Option<Arc<Mutex<GridMetrics>>>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Sort `items`, stabilize them against the remembered ordering and return
    /// the new ordering. Malformed input keeps the previous ordering.
    pub fn update(&mut self, items: &[T], max_items_on_page: usize) -> &[T] {
        let mut sorted = items.to_vec();
        if let Some(sort) = self.sort.as_ref() {
            sorted.sort_by(|a, b| sort(a, b));
        }

        let reset = self.memory.is_layout_change(max_items_on_page);
        match stabilize_with(&self.memory, &sorted, max_items_on_page, self.options) {
            Ok(ordered) => {
                self.memory.remember(max_items_on_page, ordered);
                if reset {
                    self.last_outcome = UpdateOutcome::Reset;
                    self.record_metric(GridMetrics::record_stability_reset);
                    self.log(
                        LogLevel::Debug,
                        "stability_reset",
                        [
                            json_kv("max_items_on_page", json!(max_items_on_page)),
                            json_kv("items", json!(sorted.len())),
                        ],
                    );
                } else {
                    self.last_outcome = UpdateOutcome::Stabilized;
                }
            }
            Err(err) => {
                self.last_outcome = UpdateOutcome::Recovered;
                self.record_metric(GridMetrics::record_stabilization_failure);
                self.log(
                    LogLevel::Warn,
                    "stabilization_failed",
                    [
                        json_kv("error", json!(err.to_string())),
                        json_kv("max_items_on_page", json!(max_items_on_page)),
                        json_kv("kept_items", json!(self.memory.last_ordered().len())),
                    ],
                );
            }
        }

        self.memory.last_ordered()
    }

    /// The most recent ordering.
    pub fn current(&self) -> &[T] {
        self.memory.last_ordered()
    }

    pub fn memory(&self) -> &ReorderMemory<T> {
        &self.memory
    }

    pub fn last_outcome(&self) -> UpdateOutcome {
        self.last_outcome
    }

    fn log<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.logger.as_ref() {
            let _ = logger.log_event(event_with_fields(level, LOG_TARGET, message, fields));
        }
    }

    fn record_metric(&self, record: fn(&mut GridMetrics)) {
        if let Some(metrics) = self.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                record(&mut guard);
            }
        }
    }
}
