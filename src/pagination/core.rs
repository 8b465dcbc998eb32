use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::logging::Logger;
use crate::metrics::GridMetrics;
use crate::stable::{SortFn, StableOptions, VisualStableUpdate};
use crate::track::TrackLike;

/// Configuration knobs for a paginator.
pub struct PaginationOptions<T> {
    /// Tiles per page; clamped to at least 1.
    pub items_per_page: usize,
    /// Page shown first; clamped to `[1, total_page_count]`.
    pub initial_page: usize,
    /// Optional comparator applied before stabilization.
    pub sort: Option<SortFn<T>>,
    pub stable: StableOptions,
    pub logger: Option<Logger>,
    pub metrics: Option<Arc<Mutex<GridMetrics>>>,
}

impl<T> Default for PaginationOptions<T> {
    fn default() -> Self {
        Self {
            items_per_page: 1,
            initial_page: 1,
            sort: None,
            stable: StableOptions::default(),
            logger: None,
            metrics: None,
        }
    }
}

impl<T> Clone for PaginationOptions<T> {
    fn clone(&self) -> Self {
        Self {
            items_per_page: self.items_per_page,
            initial_page: self.initial_page,
            sort: self.sort.clone(),
            stable: self.stable,
            logger: self.logger.clone(),
            metrics: self.metrics.clone(),
        }
    }
}

/// Snapshot of the navigation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageState {
    pub current_page: usize,
    pub total_page_count: usize,
    pub items_per_page: usize,
    pub total_items: usize,
    pub first_item_index: usize,
    pub last_item_index: usize,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

pub struct Pagination<T> {
    items_per_page: usize,
    current_page: usize,
    source: Vec<T>,
    stable: VisualStableUpdate<T>,
}

impl<T: TrackLike> Pagination<T> {
    pub fn new(options: PaginationOptions<T>, items: &[T]) -> Self {
        let stable = VisualStableUpdate::new()
            .with_options(options.stable)
            .with_sort(options.sort)
            .with_logger(options.logger)
            .with_metrics(options.metrics);
        let mut pagination = Self {
            items_per_page: options.items_per_page.max(1),
            current_page: options.initial_page.max(1),
            source: items.to_vec(),
            stable,
        };
        pagination.recompute();
        pagination
    }

    /// Shorthand for [`Pagination::new`] with default options.
    pub fn configure(items_per_page: usize, items: &[T], initial_page: Option<usize>) -> Self {
        Self::new(
            PaginationOptions {
                items_per_page,
                initial_page: initial_page.unwrap_or(1),
                ..PaginationOptions::default()
            },
            items,
        )
    }

    /// Replace the raw item list and recompute the stabilized order.
    pub fn update_items(&mut self, items: &[T]) {
        self.source = items.to_vec();
        self.recompute();
    }

    /// Replace items and page size together with a single recomputation.
    pub fn update(&mut self, items: &[T], items_per_page: usize) {
        self.source = items.to_vec();
        self.items_per_page = items_per_page.max(1);
        self.recompute();
    }

    pub fn set_items_per_page(&mut self, items_per_page: usize) {
        let items_per_page = items_per_page.max(1);
        if items_per_page == self.items_per_page {
            return;
        }
        self.items_per_page = items_per_page;
        self.recompute();
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_items(&self) -> usize {
        self.stable.current().len()
    }

    pub fn total_page_count(&self) -> usize {
        self.total_items().div_ceil(self.items_per_page).max(1)
    }

    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_page_count()
    }

    pub fn has_prev_page(&self) -> bool {
        self.current_page > 1
    }

    pub fn next_page(&mut self) {
        if self.has_next_page() {
            self.current_page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        if self.has_prev_page() {
            self.current_page -= 1;
        }
    }

    pub fn set_page(&mut self, page: usize) {
        self.current_page = page.clamp(1, self.total_page_count());
    }

    /// Exclusive end of the current page window.
    pub fn last_item_index(&self) -> usize {
        self.current_page
            .saturating_mul(self.items_per_page)
            .min(self.total_items())
    }

    /// Inclusive start of the current page window.
    pub fn first_item_index(&self) -> usize {
        (self.current_page - 1)
            .saturating_mul(self.items_per_page)
            .min(self.last_item_index())
    }

    pub fn tracks_on_page(&self) -> &[T] {
        &self.stable.current()[self.first_item_index()..self.last_item_index()]
    }

    /// Every item in stabilized order, across all pages.
    pub fn stabilized(&self) -> &[T] {
        self.stable.current()
    }

    pub fn stabilizer(&self) -> &VisualStableUpdate<T> {
        &self.stable
    }

    pub fn page_state(&self) -> PageState {
        PageState {
            current_page: self.current_page,
            total_page_count: self.total_page_count(),
            items_per_page: self.items_per_page,
            total_items: self.total_items(),
            first_item_index: self.first_item_index(),
            last_item_index: self.last_item_index(),
            has_next_page: self.has_next_page(),
            has_prev_page: self.has_prev_page(),
        }
    }

    fn recompute(&mut self) {
        self.stable.update(&self.source, self.items_per_page);
        self.current_page = self.current_page.clamp(1, self.total_page_count());
    }
}
