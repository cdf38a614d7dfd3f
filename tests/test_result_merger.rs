use dashboard_search::core::ResultMerger;
use dashboard_search::data::{Category, ResultBucket, ResultItem};

fn patient(id: &str) -> ResultItem {
    ResultItem::new(id, format!("Patient {}", id), "", Category::Patient)
}

fn appointment(id: &str) -> ResultItem {
    ResultItem::new(id, format!("Appointment {}", id), "", Category::Appointment)
}

fn ids(merger: &ResultMerger, buckets: &[ResultBucket]) -> Vec<String> {
    merger
        .merge(buckets)
        .items()
        .iter()
        .map(|item| item.id.clone())
        .collect()
}

#[test]
fn test_patients_then_appointments() {
    let merger = ResultMerger::default();
    let buckets = vec![
        ResultBucket::new(Category::Patient, vec![patient("A"), patient("B")]),
        ResultBucket::new(Category::Appointment, vec![appointment("C")]),
    ];

    let merged = merger.merge(&buckets);
    assert_eq!(ids(&merger, &buckets), vec!["A", "B", "C"]);
    assert_eq!(merged.offset_of(Category::Patient), Some(0));
    assert_eq!(merged.offset_of(Category::Appointment), Some(2));
    assert_eq!(merged.len(), 3);
}

#[test]
fn test_empty_bucket_contributes_nothing() {
    let merger = ResultMerger::default();
    let buckets = vec![
        ResultBucket::empty(Category::Patient),
        ResultBucket::new(Category::Appointment, vec![appointment("C")]),
    ];

    let merged = merger.merge(&buckets);
    assert_eq!(ids(&merger, &buckets), vec!["C"]);
    assert_eq!(merged.offset_of(Category::Appointment), Some(0));
    assert_eq!(merged.offset_of(Category::Patient), None);
    assert_eq!(merged.sections().len(), 1, "no header for an empty bucket");
}

#[test]
fn test_configured_order_wins_over_arrival_order() {
    let merger = ResultMerger::new(vec![Category::Appointment, Category::Patient]);
    let buckets = vec![
        ResultBucket::new(Category::Patient, vec![patient("A")]),
        ResultBucket::new(Category::Appointment, vec![appointment("C"), appointment("D")]),
    ];

    assert_eq!(ids(&merger, &buckets), vec!["C", "D", "A"]);
    let merged = merger.merge(&buckets);
    assert_eq!(merged.category_at(1), Some(Category::Appointment));
    assert_eq!(merged.category_at(2), Some(Category::Patient));
    assert_eq!(merged.category_at(3), None);
}

#[test]
fn test_merge_is_pure() {
    let merger = ResultMerger::default();
    let buckets = vec![
        ResultBucket::new(Category::Appointment, vec![appointment("C")]),
        ResultBucket::new(Category::Patient, vec![patient("A"), patient("B")]),
    ];

    assert_eq!(merger.merge(&buckets), merger.merge(&buckets));
}

#[test]
fn test_counts_match_sections() {
    let merger = ResultMerger::default();
    let buckets = vec![
        ResultBucket::new(Category::Patient, vec![patient("A"), patient("B")]),
        ResultBucket::new(Category::Appointment, vec![appointment("C")]),
    ];

    let merged = merger.merge(&buckets);
    let total: usize = merged.sections().iter().map(|s| s.count).sum();
    assert_eq!(total, merged.len());
    assert_eq!(merged.count_for(Category::Patient), 2);
    assert_eq!(merged.count_for(Category::Appointment), 1);
}
