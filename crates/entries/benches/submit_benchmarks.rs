use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use incometrack_core::{IdentitySource, UserId};
use incometrack_entries::{
    Amount, Category, EntryCollection, EntryDraft, EntryForm, EntrySynchronizer, FinancialEntry,
    InMemoryDocumentStore,
};
use tokio::runtime::Runtime;

struct SignedIn(UserId);

impl IdentitySource for SignedIn {
    fn active_user(&self) -> Option<UserId> {
        Some(self.0.clone())
    }
}

fn seeded_entries(n: usize) -> Vec<FinancialEntry> {
    (0..n)
        .map(|i| {
            FinancialEntry::record(
                Amount::new(format!("{i}.50")),
                Category::Taxable,
                chrono::Utc::now(),
            )
        })
        .collect()
}

/// Cost of one submission (local append + full-document write) as the
/// collection grows. Full replacement makes each write O(n).
fn bench_submit(c: &mut Criterion) {
    let runtime = Runtime::new().expect("failed to build runtime");
    let mut group = c.benchmark_group("submit_entry");

    for size in [0usize, 100, 1_000] {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let identity = Arc::new(SignedIn("uid-bench".parse().expect("valid user id")));
            let store = Arc::new(InMemoryDocumentStore::new());
            let sync = EntrySynchronizer::new(identity, store);

            b.iter(|| {
                sync.load(seeded_entries(size));
                runtime.block_on(async {
                    let mut form =
                        EntryForm::with_draft(EntryDraft::new("100.00", Some(Category::Taxable)));
                    let submission = sync.submit_entry(&mut form).expect("submission accepted");
                    black_box(submission.write.wait().await).expect("write succeeded");
                });
            });
        });
    }

    group.finish();
}

fn bench_total(c: &mut Criterion) {
    let entries = EntryCollection::from(seeded_entries(10_000));
    c.bench_function("collection_total_10k", |b| b.iter(|| black_box(entries.total())));
}

criterion_group!(benches, bench_submit, bench_total);
criterion_main!(benches);
