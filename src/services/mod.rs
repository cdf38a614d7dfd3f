pub mod memory_search;
pub mod search_executor;

pub use memory_search::MemorySearchClient;
pub use search_executor::{SearchExecutor, SearchRequest, SearchResponse};
