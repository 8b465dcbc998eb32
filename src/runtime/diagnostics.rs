use serde_json::json;

use crate::layout::GridLayout;
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::track::TrackLike;

use super::{GridObserver, PageView};

/// Logs layout and page changes for observability/debugging.
pub struct LifecycleLoggerObserver {
    logger: Logger,
    level: LogLevel,
    log_tiles: bool,
}

impl LifecycleLoggerObserver {
    pub fn new(logger: Logger) -> Self {
        Self {
            logger,
            level: LogLevel::Debug,
            log_tiles: false,
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Include the slot keys of every visible tile in page events.
    pub fn log_tiles(mut self, enabled: bool) -> Self {
        self.log_tiles = enabled;
        self
    }

    fn emit(&self, message: &str, fields: impl IntoIterator<Item = (String, serde_json::Value)>) {
        let event = event_with_fields(self.level, "track_grid::grid.lifecycle", message, fields);
        let _ = self.logger.log_event(event);
    }
}

impl<T: TrackLike> GridObserver<T> for LifecycleLoggerObserver {
    fn name(&self) -> &str {
        "diagnostics.lifecycle_logger"
    }

    fn on_layout(&mut self, layout: &GridLayout) {
        self.emit(
            "layout_applied",
            [
                json_kv("layout", json!(layout.name)),
                json_kv("columns", json!(layout.columns)),
                json_kv("rows", json!(layout.rows)),
            ],
        );
    }

    fn on_page(&mut self, page: &PageView<'_, T>) {
        let mut fields = vec![
            json_kv("page", json!(page.state.current_page)),
            json_kv("pages", json!(page.state.total_page_count)),
            json_kv("tiles", json!(page.tiles.len())),
        ];
        if self.log_tiles {
            let keys: Vec<String> = page.tiles.iter().map(|t| t.key().to_string()).collect();
            fields.push(json_kv("keys", json!(keys)));
        }
        self.emit("page_changed", fields);
    }
}
