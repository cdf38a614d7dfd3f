//! Core search behavior
//!
//! Merging categorized results, keyboard navigation over them, request
//! sequencing for stale responses, and selection dispatch. Nothing in here
//! knows about terminals or HTTP.

pub mod navigator;
pub mod request_sequencer;
pub mod result_merger;
pub mod selection_dispatcher;

pub use navigator::{KeyboardNavigator, NavigationKey, NavigationOutcome, NavigatorState};
pub use request_sequencer::{RequestId, RequestSequencer};
pub use result_merger::{MergedResults, ResultMerger, Section};
pub use selection_dispatcher::{ResultSelectionDispatcher, SelectionCallback, SelectionTarget};
