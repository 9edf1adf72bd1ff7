//! Resource container benchmarks
//!
//! Measures the bookkeeping around each response: fencing, applying a page,
//! and local patches on a loaded list.
//!
//! Run with: `cargo bench -p depot-state`

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
#![allow(dead_code)] // Row labels only give rows a realistic size

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use depot_api::{ApiError, PageResult};
use depot_state::{Entity, ResourceState};

#[derive(Debug, Clone)]
struct Row {
    id: u64,
    label: String,
}

impl Entity for Row {
    type Id = u64;
    const KIND: &'static str = "bench_rows";

    fn id(&self) -> u64 {
        self.id
    }
}

fn page(start: u64, size: u64) -> PageResult<Row> {
    PageResult {
        items: (start..start + size)
            .map(|id| Row {
                id,
                label: format!("row {id}"),
            })
            .collect(),
        total_items: 10_000,
        total_pages: 100,
        current_page: 0,
    }
}

fn loaded(size: u64) -> ResourceState<Row> {
    let mut state = ResourceState::new();
    let token = state.begin_page_fetch(u32::try_from(size).unwrap());
    state.complete(token, Ok(page(0, size)));
    state
}

fn benchmark_complete(c: &mut Criterion) {
    let mut group = c.benchmark_group("complete");
    group.throughput(Throughput::Elements(1));

    for size in [10_u64, 100] {
        group.bench_function(format!("accepted_page_{size}"), |b| {
            b.iter_batched(
                || {
                    let mut state = ResourceState::<Row>::new();
                    let token = state.begin_fetch();
                    (state, token, page(0, size))
                },
                |(mut state, token, rows)| black_box(state.complete(token, Ok(rows))),
                BatchSize::SmallInput,
            );
        });
    }

    group.bench_function("stale_discarded", |b| {
        b.iter_batched(
            || {
                let mut state = ResourceState::<Row>::new();
                let stale = state.begin_fetch();
                state.begin_fetch();
                (state, stale)
            },
            |(mut state, stale)| {
                black_box(state.complete(stale, Err(ApiError::Transport("late".to_string()))))
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn benchmark_patches(c: &mut Criterion) {
    let mut group = c.benchmark_group("patch");
    group.throughput(Throughput::Elements(1));

    group.bench_function("replace_last_of_100", |b| {
        b.iter_batched(
            || loaded(100),
            |mut state| {
                black_box(state.replace(Row {
                    id: 99,
                    label: "renamed".to_string(),
                }))
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("remove_first_of_100", |b| {
        b.iter_batched(
            || loaded(100),
            |mut state| black_box(state.remove(0)),
            BatchSize::SmallInput,
        );
    });

    group.bench_function("prepend_to_100", |b| {
        b.iter_batched(
            || loaded(100),
            |mut state| {
                state.prepend(Row {
                    id: 1_000,
                    label: "new".to_string(),
                });
                black_box(state.items().len())
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, benchmark_complete, benchmark_patches);
criterion_main!(benches);
