//! Track module orchestrator.
//!
//! The data model lives in the private `core` module; `sort` provides the
//! default "true ordering" applied before stabilization.

mod core;
pub mod sort;

pub use core::{ParticipantActivity, TrackKey, TrackLike, TrackReference, TrackSource};
pub use sort::{compare_track_references, sort_track_references};
