use crate::data::category::Category;
use serde::{Deserialize, Serialize};

/// A single search hit as received from the search collaborator.
///
/// Items are never mutated after they arrive; a new search replaces the whole set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultItem {
    /// Unique within its bucket
    pub id: String,
    pub display_name: String,
    pub display_info: String,
    pub category: Category,
}

impl ResultItem {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        display_info: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            display_info: display_info.into(),
            category,
        }
    }
}

/// One category's worth of results, in the order the collaborator returned them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultBucket {
    pub category: Category,
    pub items: Vec<ResultItem>,
}

impl ResultBucket {
    pub fn new(category: Category, items: Vec<ResultItem>) -> Self {
        Self { category, items }
    }

    pub fn empty(category: Category) -> Self {
        Self {
            category,
            items: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
