use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct GridMetrics {
    recomputations: u64,
    layout_changes: u64,
    stability_resets: u64,
    stabilization_failures: u64,
    page_changes: u64,
}

impl GridMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_recomputation(&mut self) {
        self.recomputations = self.recomputations.saturating_add(1);
    }

    pub fn record_layout_change(&mut self) {
        self.layout_changes = self.layout_changes.saturating_add(1);
    }

    pub fn record_stability_reset(&mut self) {
        self.stability_resets = self.stability_resets.saturating_add(1);
    }

    pub fn record_stabilization_failure(&mut self) {
        self.stabilization_failures = self.stabilization_failures.saturating_add(1);
    }

    pub fn record_page_change(&mut self) {
        self.page_changes = self.page_changes.saturating_add(1);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            recomputations: self.recomputations,
            layout_changes: self.layout_changes,
            stability_resets: self.stability_resets,
            stabilization_failures: self.stabilization_failures,
            page_changes: self.page_changes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub recomputations: u64,
    pub layout_changes: u64,
    pub stability_resets: u64,
    pub stabilization_failures: u64,
    pub page_changes: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "grid_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("recomputations".to_string(), json!(self.recomputations));
        map.insert("layout_changes".to_string(), json!(self.layout_changes));
        map.insert("stability_resets".to_string(), json!(self.stability_resets));
        map.insert(
            "stabilization_failures".to_string(),
            json!(self.stabilization_failures),
        );
        map.insert("page_changes".to_string(), json!(self.page_changes));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_counters() {
        let mut metrics = GridMetrics::new();
        metrics.record_recomputation();
        metrics.record_recomputation();
        metrics.record_stability_reset();
        metrics.record_stabilization_failure();

        let snapshot = metrics.snapshot(Duration::from_millis(1500));
        assert_eq!(snapshot.uptime_ms, 1500);
        assert_eq!(snapshot.recomputations, 2);
        assert_eq!(snapshot.stability_resets, 1);
        assert_eq!(snapshot.stabilization_failures, 1);
        assert_eq!(snapshot.layout_changes, 0);

        let event = snapshot.to_log_event("track_grid::grid.metrics");
        assert_eq!(event.message, "grid_metrics");
        assert_eq!(event.fields["recomputations"], json!(2));
    }
}
