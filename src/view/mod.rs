//! View Module
//!
//! Read-only, time-ordered projections of the store.

mod projector;

pub use projector::{format_timestamp, project, ViewItem, Window, TIMESTAMP_FORMAT};

/// Default size of the windowed view
pub const DEFAULT_VIEW_WINDOW: usize = 15;
