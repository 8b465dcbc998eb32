//! Pagination orchestrator.
//!
//! [`Pagination`] windows the visually stabilized list into pages; the
//! stabilizer sees `items_per_page` as its page size, so resizing the page is
//! a layout change.

mod core;

pub use core::{PageState, Pagination, PaginationOptions};
