use std::sync::{Arc, Mutex};
use std::time::Instant;

use serde_json::json;

use crate::layout::catalog::validate_catalog;
use crate::layout::{GridLayout, LayoutDefinition, default_layouts, select_layout};
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::pagination::{PageState, Pagination, PaginationOptions};
use crate::registry::PageRegistry;
use crate::stable::{SortFn, StableOptions};
use crate::track::TrackLike;
use crate::{GridMetrics, Result, Size};

pub mod diagnostics;
pub mod observers;

const LOG_TARGET: &str = "track_grid::grid";

/// Configuration knobs for a [`TrackGrid`].
pub struct GridConfig<T> {
    /// Layouts the selector chooses from.
    pub catalog: Vec<LayoutDefinition>,
    /// Page shown first.
    pub initial_page: usize,
    /// Optional comparator producing the "true" order before stabilization.
    pub sort: Option<SortFn<T>>,
    pub stable: StableOptions,
    /// Optional structured logger used by the grid and its stabilizer.
    pub logger: Option<Logger>,
    /// Metrics accumulator shared with the stabilizer.
    pub metrics: Option<Arc<Mutex<GridMetrics>>>,
    /// Target field used when emitting metrics snapshots.
    pub metrics_target: String,
}

impl<T> Default for GridConfig<T> {
    fn default() -> Self {
        Self {
            catalog: default_layouts(),
            initial_page: 1,
            sort: None,
            stable: StableOptions::default(),
            logger: None,
            metrics: None,
            metrics_target: "track_grid::grid.metrics".to_string(),
        }
    }
}

impl<T> Clone for GridConfig<T> {
    fn clone(&self) -> Self {
        Self {
            catalog: self.catalog.clone(),
            initial_page: self.initial_page,
            sort: self.sort.clone(),
            stable: self.stable,
            logger: self.logger.clone(),
            metrics: self.metrics.clone(),
            metrics_target: self.metrics_target.clone(),
        }
    }
}

impl<T> GridConfig<T> {
    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(GridMetrics::new())));
        }
    }

    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<GridMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

/// Input changes fed to the grid by the surrounding application.
#[derive(Debug, Clone)]
pub enum GridEvent<T> {
    TracksChanged(Vec<T>),
    Resize(Size),
    NextPage,
    PrevPage,
    SetPage(usize),
    CatalogChanged(Vec<LayoutDefinition>),
}

impl<T> GridEvent<T> {
    fn describe(&self) -> &'static str {
        match self {
            GridEvent::TracksChanged(_) => "tracks_changed",
            GridEvent::Resize(_) => "resize",
            GridEvent::NextPage => "next_page",
            GridEvent::PrevPage => "prev_page",
            GridEvent::SetPage(_) => "set_page",
            GridEvent::CatalogChanged(_) => "catalog_changed",
        }
    }
}

/// What observers see of the visible page.
pub struct PageView<'a, T> {
    pub layout: &'a GridLayout,
    pub state: PageState,
    pub tiles: &'a [T],
}

/// Behaviour injection point: rendering code subscribes here.
pub trait GridObserver<T> {
    fn name(&self) -> &str {
        "grid_observer"
    }

    /// Columns or rows changed.
    fn on_layout(&mut self, _layout: &GridLayout) {}

    /// Tiles on the visible page or the navigation state changed.
    fn on_page(&mut self, _page: &PageView<'_, T>) {}
}

/// Recompute-on-input-change adapter tying selector, stabilizer and paginator together.
///
/// Every event runs to completion before the next: the layout is selected for
/// the total tile count, its `max_tiles` becomes the page size, and observers
/// hear only about layouts or pages that actually changed.
pub struct TrackGrid<T> {
    config: GridConfig<T>,
    size: Size,
    tracks: Vec<T>,
    layout: GridLayout,
    layout_dirty: bool,
    pagination: Pagination<T>,
    // Initial page waiting for the first non-empty track list.
    pending_page: Option<usize>,
    registry: PageRegistry,
    observers: Vec<Box<dyn GridObserver<T>>>,
    started: Instant,
}

impl<T: TrackLike> TrackGrid<T> {
    pub fn new(config: GridConfig<T>, size: Size) -> Result<Self> {
        validate_catalog(&config.catalog)?;
        let layout = select_layout(&config.catalog, 1, size)?;
        let initial_page = config.initial_page;
        let pagination = Pagination::new(
            PaginationOptions {
                items_per_page: layout.max_tiles,
                initial_page,
                sort: config.sort.clone(),
                stable: config.stable,
                logger: config.logger.clone(),
                metrics: config.metrics_handle(),
            },
            &[],
        );

        let mut grid = Self {
            config,
            size,
            tracks: Vec::new(),
            layout,
            layout_dirty: true,
            pending_page: (initial_page > 1).then_some(initial_page),
            pagination,
            registry: PageRegistry::new(),
            observers: Vec::new(),
            started: Instant::now(),
        };
        grid.publish();
        grid.log(
            LogLevel::Info,
            "grid_started",
            [
                json_kv("layout", json!(grid.layout.name)),
                json_kv("width", json!(size.width)),
                json_kv("height", json!(size.height)),
            ],
        );
        Ok(grid)
    }

    pub fn config(&self) -> &GridConfig<T> {
        &self.config
    }

    /// Register an observer; it immediately receives the current layout and page.
    pub fn register_observer<O>(&mut self, observer: O)
    where
        O: GridObserver<T> + 'static,
    {
        let mut observer = Box::new(observer);
        observer.on_layout(&self.layout);
        observer.on_page(&PageView {
            layout: &self.layout,
            state: self.pagination.page_state(),
            tiles: self.pagination.tracks_on_page(),
        });
        self.log(
            LogLevel::Debug,
            "observer_registered",
            [json_kv("observer", json!(observer.name()))],
        );
        self.observers.push(observer);
    }

    pub fn dispatch(&mut self, event: GridEvent<T>) -> Result<()> {
        let kind = event.describe();
        match event {
            GridEvent::TracksChanged(tracks) => {
                self.tracks = tracks;
                self.recompute()?;
            }
            GridEvent::Resize(size) => {
                self.size = size;
                self.recompute()?;
            }
            GridEvent::NextPage => self.pagination.next_page(),
            GridEvent::PrevPage => self.pagination.prev_page(),
            GridEvent::SetPage(page) => self.pagination.set_page(page),
            GridEvent::CatalogChanged(catalog) => {
                validate_catalog(&catalog)?;
                self.config.catalog = catalog;
                self.recompute()?;
            }
        }

        self.publish();
        self.log(
            LogLevel::Debug,
            "event_dispatched",
            [
                json_kv("event", json!(kind)),
                json_kv("page", json!(self.pagination.current_page())),
            ],
        );
        Ok(())
    }

    pub fn run_scripted<I>(&mut self, events: I) -> Result<()>
    where
        I: IntoIterator<Item = GridEvent<T>>,
    {
        for event in events {
            self.dispatch(event)?;
        }
        self.emit_metrics();
        Ok(())
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn page_state(&self) -> PageState {
        self.pagination.page_state()
    }

    pub fn tracks_on_page(&self) -> &[T] {
        self.pagination.tracks_on_page()
    }

    pub fn pagination(&self) -> &Pagination<T> {
        &self.pagination
    }

    /// Log a metrics snapshot if both a logger and metrics are configured.
    pub fn emit_metrics(&self) {
        if let (Some(logger), Some(metrics)) =
            (self.config.logger.as_ref(), self.config.metrics.as_ref())
        {
            if let Ok(guard) = metrics.lock() {
                let snapshot = guard.snapshot(self.started.elapsed());
                let _ = logger.log_event(snapshot.to_log_event(&self.config.metrics_target));
            }
        }
    }

    fn recompute(&mut self) -> Result<()> {
        // An empty grid is laid out like a single tile.
        let tile_count = self.tracks.len().max(1);
        let layout = select_layout(&self.config.catalog, tile_count, self.size)?;
        self.record_metric(GridMetrics::record_recomputation);

        if !layout.same_shape(&self.layout) {
            self.layout_dirty = true;
            self.record_metric(GridMetrics::record_layout_change);
            self.log(
                LogLevel::Info,
                "layout_changed",
                [
                    json_kv("from", json!(self.layout.name)),
                    json_kv("to", json!(layout.name)),
                    json_kv("tiles", json!(self.tracks.len())),
                ],
            );
        }
        // Same shape may still carry a different tile range.
        self.layout = layout;

        self.pagination.update(&self.tracks, self.layout.max_tiles);
        if !self.tracks.is_empty() {
            if let Some(page) = self.pending_page.take() {
                self.pagination.set_page(page);
            }
        }
        Ok(())
    }

    fn publish(&mut self) {
        if std::mem::take(&mut self.layout_dirty) {
            for observer in self.observers.iter_mut() {
                observer.on_layout(&self.layout);
            }
        }

        let state = self.pagination.page_state();
        if self
            .registry
            .sync_page(self.pagination.tracks_on_page(), &state)
        {
            self.record_metric(GridMetrics::record_page_change);
        }

        if self.registry.take_dirty() {
            let view = PageView {
                layout: &self.layout,
                state,
                tiles: self.pagination.tracks_on_page(),
            };
            for observer in self.observers.iter_mut() {
                observer.on_page(&view);
            }
        }
    }

    fn log<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            let _ = logger.log_event(event_with_fields(level, LOG_TARGET, message, fields));
        }
    }

    fn record_metric(&self, record: fn(&mut GridMetrics)) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                record(&mut guard);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GridError;
    use crate::logging::MemorySink;
    use crate::track::{TrackReference, TrackSource};

    fn tracks(n: usize) -> Vec<TrackReference> {
        (0..n)
            .map(|i| TrackReference::published(format!("p{i}"), TrackSource::Camera, format!("TR_{i}")))
            .collect()
    }

    #[derive(Clone, Default)]
    struct Recorder {
        layouts: Arc<Mutex<Vec<String>>>,
        pages: Arc<Mutex<Vec<(usize, usize)>>>,
    }

    impl GridObserver<TrackReference> for Recorder {
        fn on_layout(&mut self, layout: &GridLayout) {
            self.layouts.lock().unwrap().push(layout.name.clone());
        }

        fn on_page(&mut self, page: &PageView<'_, TrackReference>) {
            self.pages
                .lock()
                .unwrap()
                .push((page.state.current_page, page.tiles.len()));
        }
    }

    #[test]
    fn empty_grid_starts_single_tile() {
        let grid = TrackGrid::<TrackReference>::new(GridConfig::default(), Size::new(800.0, 600.0))
            .unwrap();
        assert_eq!(grid.layout().name, "1x1");
        assert!(grid.tracks_on_page().is_empty());
        assert_eq!(grid.page_state().total_page_count, 1);
    }

    #[test]
    fn empty_catalog_fails_construction() {
        let config = GridConfig::<TrackReference> {
            catalog: Vec::new(),
            ..GridConfig::default()
        };
        let err = TrackGrid::new(config, Size::zero()).err().unwrap();
        assert!(matches!(err, GridError::InvalidConfiguration(_)));
    }

    #[test]
    fn page_size_follows_layout_capacity() {
        let mut grid = TrackGrid::new(GridConfig::default(), Size::new(1280.0, 720.0)).unwrap();
        grid.dispatch(GridEvent::TracksChanged(tracks(7))).unwrap();
        assert_eq!(grid.layout().name, "3x3");
        assert_eq!(grid.page_state().items_per_page, 9);
        assert_eq!(grid.tracks_on_page().len(), 7);
    }

    #[test]
    fn narrow_container_paginates() {
        let mut grid = TrackGrid::new(GridConfig::default(), Size::new(400.0, 800.0)).unwrap();
        grid.dispatch(GridEvent::TracksChanged(tracks(4))).unwrap();
        assert_eq!(grid.layout().name, "1x2");
        assert_eq!(grid.page_state().total_page_count, 2);

        grid.dispatch(GridEvent::NextPage).unwrap();
        let on_page: Vec<_> = grid
            .tracks_on_page()
            .iter()
            .map(|t| t.participant_identity.as_str())
            .collect();
        assert_eq!(on_page, vec!["p2", "p3"]);
    }

    #[test]
    fn initial_page_applies_once_tracks_arrive() {
        let config = GridConfig {
            initial_page: 2,
            ..GridConfig::default()
        };
        let mut grid = TrackGrid::new(config, Size::new(400.0, 800.0)).unwrap();
        assert_eq!(grid.page_state().current_page, 1);

        grid.dispatch(GridEvent::TracksChanged(tracks(4))).unwrap();
        assert_eq!(grid.page_state().current_page, 2);

        grid.dispatch(GridEvent::PrevPage).unwrap();
        grid.dispatch(GridEvent::TracksChanged(tracks(5))).unwrap();
        assert_eq!(grid.page_state().current_page, 1);
    }

    #[test]
    fn observers_hear_only_changes() {
        let recorder = Recorder::default();
        let mut grid = TrackGrid::new(GridConfig::default(), Size::new(1280.0, 720.0)).unwrap();
        grid.register_observer(recorder.clone());

        grid.dispatch(GridEvent::TracksChanged(tracks(2))).unwrap();
        grid.dispatch(GridEvent::TracksChanged(tracks(2))).unwrap();
        grid.dispatch(GridEvent::Resize(Size::new(1300.0, 700.0))).unwrap();

        assert_eq!(*recorder.layouts.lock().unwrap(), vec!["1x1", "2x1"]);
        assert_eq!(*recorder.pages.lock().unwrap(), vec![(1, 0), (1, 2)]);
    }

    #[derive(Clone, Default)]
    struct SidRecorder {
        pages: Arc<Mutex<Vec<Vec<Option<String>>>>>,
    }

    impl GridObserver<TrackReference> for SidRecorder {
        fn on_page(&mut self, page: &PageView<'_, TrackReference>) {
            let sids = page.tiles.iter().map(|t| t.track_sid.clone()).collect();
            self.pages.lock().unwrap().push(sids);
        }
    }

    #[test]
    fn republished_track_reaches_observers() {
        let recorder = SidRecorder::default();
        let mut grid = TrackGrid::new(GridConfig::default(), Size::new(1280.0, 720.0)).unwrap();
        grid.register_observer(recorder.clone());

        let republish = |sid: &str| {
            GridEvent::TracksChanged(vec![TrackReference::published("a", TrackSource::Camera, sid)])
        };
        grid.dispatch(republish("TR_old")).unwrap();
        grid.dispatch(republish("TR_new")).unwrap();

        let pages = recorder.pages.lock().unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[2], vec![Some("TR_new".to_string())]);
        assert_eq!(grid.tracks_on_page()[0].track_sid.as_deref(), Some("TR_new"));
    }

    #[test]
    fn same_shape_swap_is_not_a_layout_change() {
        let catalog = vec![
            LayoutDefinition::new(1, 1, 1, 1),
            LayoutDefinition::new(2, 2, 2, 2),
            LayoutDefinition::new(2, 2, 3, 4),
        ];
        let mut config = GridConfig {
            catalog,
            ..GridConfig::default()
        };
        config.enable_metrics();
        let metrics = config.metrics_handle().unwrap();
        let recorder = Recorder::default();
        let mut grid = TrackGrid::new(config, Size::new(800.0, 800.0)).unwrap();
        grid.register_observer(recorder.clone());

        grid.dispatch(GridEvent::TracksChanged(tracks(2))).unwrap();
        grid.dispatch(GridEvent::TracksChanged(tracks(3))).unwrap();

        assert_eq!(grid.layout().min_tiles, 3);
        assert_eq!(*recorder.layouts.lock().unwrap(), vec!["1x1", "2x2"]);
        let snapshot = metrics.lock().unwrap().snapshot(Default::default());
        assert_eq!(snapshot.layout_changes, 1);
    }

    #[test]
    fn empty_catalog_change_is_rejected_and_previous_kept() {
        let mut grid = TrackGrid::new(GridConfig::default(), Size::new(1280.0, 720.0)).unwrap();
        grid.dispatch(GridEvent::TracksChanged(tracks(3))).unwrap();
        let err = grid
            .dispatch(GridEvent::CatalogChanged(Vec::new()))
            .unwrap_err();
        assert!(matches!(err, GridError::InvalidConfiguration(_)));
        assert_eq!(grid.config().catalog, default_layouts());
        assert_eq!(grid.layout().name, "2x2");
    }

    #[test]
    fn metrics_and_logs_follow_dispatch() {
        let sink = MemorySink::new();
        let mut config = GridConfig::default();
        config.logger = Some(Logger::new(sink.clone()));
        config.enable_metrics();
        let metrics = config.metrics_handle().unwrap();

        let mut grid = TrackGrid::new(config, Size::new(1280.0, 720.0)).unwrap();
        grid.run_scripted([
            GridEvent::TracksChanged(tracks(1)),
            GridEvent::TracksChanged(tracks(5)),
        ])
        .unwrap();

        let snapshot = metrics.lock().unwrap().snapshot(Default::default());
        assert_eq!(snapshot.recomputations, 2);
        assert_eq!(snapshot.layout_changes, 1);

        let messages = sink.messages();
        assert!(messages.iter().any(|m| m == "layout_changed"));
        assert_eq!(messages.last().map(String::as_str), Some("grid_metrics"));
    }
}
