use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dashboard_search::core::ResultMerger;
use dashboard_search::data::{Category, ResultBucket, ResultItem};
use dashboard_search::services::MemorySearchClient;

fn create_buckets(per_category: usize) -> Vec<ResultBucket> {
    Category::ALL
        .iter()
        .map(|&category| {
            let items = (0..per_category)
                .map(|i| {
                    ResultItem::new(
                        format!("{}-{}", category, i),
                        format!("{} {}", category.label(), i),
                        "info",
                        category,
                    )
                })
                .collect();
            ResultBucket::new(category, items)
        })
        .collect()
}

fn benchmark_merge(c: &mut Criterion) {
    let merger = ResultMerger::default();
    let mut group = c.benchmark_group("merge");

    for size in [8, 100, 1_000] {
        let buckets = create_buckets(size);
        group.bench_function(format!("{}_per_category", size), |b| {
            b.iter(|| merger.merge(black_box(&buckets)));
        });
    }

    group.finish();
}

fn benchmark_demo_search(c: &mut Criterion) {
    let client = MemorySearchClient::demo();
    let merger = ResultMerger::default();

    c.bench_function("demo_search_and_merge", |b| {
        b.iter(|| {
            let buckets = client.search_now(black_box("an"), 8);
            merger.merge(&buckets)
        });
    });
}

criterion_group!(benches, benchmark_merge, benchmark_demo_search);
criterion_main!(benches);
