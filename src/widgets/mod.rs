//! UI widgets for the TUI application
//!
//! The debounced query box and the dashboard search built on top of it.

pub mod dashboard_search;
pub mod debounced_input;

pub use dashboard_search::{DashboardSearch, DashboardSearchOptions, SearchAction};
pub use debounced_input::{DebouncedInput, DebouncedInputAction, DebouncedInputConfig};
