//! Data model for dashboard search results
//!
//! Categories, result items and the buckets the search collaborator
//! returns them in.

pub mod category;
pub mod result_item;

pub use category::Category;
pub use result_item::{ResultBucket, ResultItem};
