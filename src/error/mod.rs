//! Error module orchestrator.
//!
//! Both error families live in `types`; callers import them from here or from
//! the crate root.

mod types;

pub use types::{GridError, ListRole, Result, StabilizationError};
