//! Visually stable reordering.
//!
//! `stabilize` is the pure algorithm over an explicit [`ReorderMemory`];
//! [`VisualStableUpdate`] owns one memory and recovers from malformed input.

mod core;
mod update;

pub use core::{ReorderMemory, StableOptions, stabilize, stabilize_with};
pub use update::{SortFn, UpdateOutcome, VisualStableUpdate};
