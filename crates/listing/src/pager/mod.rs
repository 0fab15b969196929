//! Page window computation.
//!
//! This module provides:
//! - compute: Bounded, centered window of page buttons
//! - PageRequest: Offset resolution from the `pg` query parameter
//! - Types: PageWindow, PageButton, PagerConfig

mod request;
pub mod types;
mod window;

pub use request::PageRequest;
pub use types::{PageButton, PageWindow, PagerConfig};
pub use window::compute;
