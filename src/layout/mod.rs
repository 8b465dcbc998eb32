//! Layout module orchestrator.
//!
//! Downstream code imports layout types from here while the selection logic
//! lives in the private `core` module.

pub mod catalog;
mod core;
pub mod style;

pub use catalog::{default_layouts, load_catalog, parse_catalog};
pub use core::{GridLayout, LayoutDefinition, select_layout};
pub use style::{COL_COUNT_PROPERTY, ROW_COUNT_PROPERTY, StyleTarget, apply_layout_style};
