//! Utility functions and helpers
//!
//! Paths and the logging stack.

pub mod app_paths;
pub mod dual_logging;
pub mod logging;

pub use app_paths::AppPaths;
pub use logging::{init_tracing, LogEntry, LogRingBuffer, LoggingHandle};
