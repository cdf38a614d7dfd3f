//! ResultMerger - flattens categorized buckets into one navigable list
//!
//! Bucket order is fixed by configuration, never by result count or
//! relevance. Each merged item keeps a stable global index, and every
//! non-empty category records the global offset it starts at so the
//! navigator and the renderer can agree on "which section is row N in".

use crate::data::{Category, ResultBucket, ResultItem};

/// A contiguous run of one category inside the merged list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub category: Category,
    /// Global index of the first item of this category
    pub offset: usize,
    pub count: usize,
}

impl Section {
    pub fn contains(&self, index: usize) -> bool {
        index >= self.offset && index < self.offset + self.count
    }
}

/// The flattened, globally indexed result list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedResults {
    items: Vec<ResultItem>,
    sections: Vec<Section>,
}

impl MergedResults {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ResultItem> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[ResultItem] {
        &self.items
    }

    /// Non-empty sections in display order
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Starting global index of a category, if it contributed any items
    pub fn offset_of(&self, category: Category) -> Option<usize> {
        self.section_for(category).map(|s| s.offset)
    }

    pub fn count_for(&self, category: Category) -> usize {
        self.section_for(category).map(|s| s.count).unwrap_or(0)
    }

    pub fn category_at(&self, index: usize) -> Option<Category> {
        self.sections
            .iter()
            .find(|s| s.contains(index))
            .map(|s| s.category)
    }

    fn section_for(&self, category: Category) -> Option<&Section> {
        self.sections.iter().find(|s| s.category == category)
    }
}

/// Merges buckets in a configured category order
#[derive(Debug, Clone)]
pub struct ResultMerger {
    order: Vec<Category>,
}

impl Default for ResultMerger {
    fn default() -> Self {
        Self::new(Category::ALL.to_vec())
    }
}

impl ResultMerger {
    /// Duplicate entries in `order` are ignored after their first occurrence
    pub fn new(order: Vec<Category>) -> Self {
        let mut deduped = Vec::with_capacity(order.len());
        for category in order {
            if !deduped.contains(&category) {
                deduped.push(category);
            }
        }
        Self { order: deduped }
    }

    pub fn order(&self) -> &[Category] {
        &self.order
    }

    /// Pure function of its input: the same buckets always merge to the same list.
    ///
    /// Categories missing from the configured order are appended afterwards in
    /// the order they first appear; several buckets of one category are
    /// concatenated in arrival order.
    pub fn merge(&self, buckets: &[ResultBucket]) -> MergedResults {
        let mut effective_order = self.order.clone();
        for bucket in buckets {
            if !effective_order.contains(&bucket.category) {
                effective_order.push(bucket.category);
            }
        }

        let total = buckets.iter().map(ResultBucket::len).sum();
        let mut items = Vec::with_capacity(total);
        let mut sections = Vec::new();

        for category in effective_order {
            let offset = items.len();
            items.extend(
                buckets
                    .iter()
                    .filter(|b| b.category == category)
                    .flat_map(|b| b.items.iter().cloned()),
            );

            let count = items.len() - offset;
            if count > 0 {
                sections.push(Section {
                    category,
                    offset,
                    count,
                });
            }
        }

        MergedResults { items, sections }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient(id: &str) -> ResultItem {
        ResultItem::new(id, format!("Patient {}", id), "", Category::Patient)
    }

    fn appointment(id: &str) -> ResultItem {
        ResultItem::new(id, format!("Appointment {}", id), "", Category::Appointment)
    }

    #[test]
    fn test_merge_in_configured_order() {
        let merger = ResultMerger::default();
        let merged = merger.merge(&[
            ResultBucket::new(Category::Appointment, vec![appointment("c")]),
            ResultBucket::new(Category::Patient, vec![patient("a"), patient("b")]),
        ]);

        let ids: Vec<&str> = merged.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(merged.offset_of(Category::Patient), Some(0));
        assert_eq!(merged.offset_of(Category::Appointment), Some(2));
    }

    #[test]
    fn test_reversed_order_configuration() {
        let merger = ResultMerger::new(vec![Category::Appointment, Category::Patient]);
        let merged = merger.merge(&[
            ResultBucket::new(Category::Patient, vec![patient("a")]),
            ResultBucket::new(Category::Appointment, vec![appointment("c")]),
        ]);

        assert_eq!(merged.get(0).unwrap().id, "c");
        assert_eq!(merged.category_at(1), Some(Category::Patient));
    }

    #[test]
    fn test_unlisted_category_is_appended() {
        let merger = ResultMerger::new(vec![Category::Appointment]);
        let merged = merger.merge(&[
            ResultBucket::new(Category::Patient, vec![patient("a")]),
            ResultBucket::new(Category::Appointment, vec![appointment("c")]),
        ]);

        assert_eq!(merged.offset_of(Category::Appointment), Some(0));
        assert_eq!(merged.offset_of(Category::Patient), Some(1));
    }

    #[test]
    fn test_category_at_out_of_range() {
        let merged = ResultMerger::default().merge(&[ResultBucket::new(
            Category::Patient,
            vec![patient("a")],
        )]);
        assert_eq!(merged.category_at(0), Some(Category::Patient));
        assert_eq!(merged.category_at(1), None);
        assert_eq!(merged.count_for(Category::Appointment), 0);
    }
}
