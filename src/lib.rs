//! Framework-independent core of a video-conference tile grid.
//!
//! Three pieces cooperate: [`select_layout`] picks a grid shape for the tile
//! count and container, [`VisualStableUpdate`] keeps tiles in the slots they
//! already occupy while the true ordering shifts, and [`Pagination`] windows
//! the stabilized list into pages. [`TrackGrid`] wires them together behind an
//! event/observer surface so a UI layer only forwards inputs and renders.

pub mod error;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod pagination;
pub mod registry;
pub mod runtime;
pub mod stable;
pub mod track;

pub use error::{GridError, ListRole, Result, StabilizationError};
pub use geometry::Size;
pub use layout::{
    COL_COUNT_PROPERTY, GridLayout, LayoutDefinition, ROW_COUNT_PROPERTY, StyleTarget,
    apply_layout_style, default_layouts, load_catalog, parse_catalog, select_layout,
};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink,
};
pub use metrics::{GridMetrics, MetricSnapshot};
pub use pagination::{PageState, Pagination, PaginationOptions};
pub use registry::{PageRegistry, fingerprint_page};
pub use runtime::diagnostics::LifecycleLoggerObserver;
pub use runtime::observers::StyleObserver;
pub use runtime::{GridConfig, GridEvent, GridObserver, PageView, TrackGrid};
pub use stable::{
    ReorderMemory, SortFn, StableOptions, UpdateOutcome, VisualStableUpdate, stabilize,
    stabilize_with,
};
pub use track::{
    ParticipantActivity, TrackKey, TrackLike, TrackReference, TrackSource,
    compare_track_references, sort_track_references,
};
