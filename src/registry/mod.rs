//! Registry orchestrator: change detection for the visible page.

mod core;

pub use core::{PageRegistry, fingerprint_page};
