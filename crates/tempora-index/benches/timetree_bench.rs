// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hint::black_box;
use tempora_index::prelude::*;

const HORIZON: i64 = 86_400_000; // one day of milliseconds

fn gen_spans(n: usize, rng: &mut impl Rng) -> Vec<TimeSpan> {
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        let start = rng.random_range(0..HORIZON);
        let width = rng.random_range(1..=600_000i64);
        let end = (start + width).min(HORIZON);
        out.push(TimeSpan::from_millis(start, end.max(start + 1)).expect("ordered bounds"));
    }
    out
}

fn gen_queries(n: usize, rng: &mut impl Rng) -> Vec<TimeSpan> {
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        let start = rng.random_range(0..HORIZON);
        let width = rng.random_range(1..=3_600_000i64);
        let end = (start + width).min(HORIZON);
        out.push(TimeSpan::from_millis(start, end.max(start + 1)).expect("ordered bounds"));
    }
    out
}

fn bench_tree_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("timetree_insert");
    for &n in &[1_000usize, 10_000] {
        let mut rng = ChaCha8Rng::seed_from_u64(0xC0FFEE);
        let spans = gen_spans(n, &mut rng);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("insert_all/{n}"), |b| {
            b.iter_batched(
                BinaryTimeTree::<TimeSpan>::new,
                |mut tree| {
                    tree.insert_all(spans.iter().copied());
                    black_box(tree.size());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_tree_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("timetree_queries");
    let mut rng = ChaCha8Rng::seed_from_u64(0xDECAF);
    let spans = gen_spans(10_000, &mut rng);
    let queries = gen_queries(1_000, &mut rng);

    let mut tree = BinaryTimeTree::new();
    tree.insert_all(spans.iter().copied());

    group.throughput(Throughput::Elements(queries.len() as u64));
    group.bench_function("count_in_range", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for query in &queries {
                hits += tree.count_in_range(query);
            }
            black_box(hits)
        })
    });
    group.bench_function("counts_in_ranges", |b| {
        b.iter(|| black_box(tree.counts_in_ranges(&queries)))
    });

    let extent = TimeSpan::from_millis(0, HORIZON).expect("ordered bounds");
    group.bench_function("counts_in_bins/96", |b| {
        b.iter(|| black_box(tree.counts_in_bins(&extent, 96).expect("bounded extent")))
    });
    group.finish();
}

fn bench_set_algebra(c: &mut Criterion) {
    let mut group = c.benchmark_group("timespan_set");
    let mut rng = ChaCha8Rng::seed_from_u64(0xBEEF);
    let a: TimeSpanSet = gen_spans(5_000, &mut rng).into_iter().collect();
    let b: TimeSpanSet = gen_spans(5_000, &mut rng).into_iter().collect();

    group.bench_function("union", |b_| b_.iter(|| black_box(a.union(&b))));
    group.bench_function("intersection", |b_| {
        b_.iter(|| black_box(a.intersection(&b)))
    });
    group.bench_function("build_from_raw", |b_| {
        let raw = gen_spans(5_000, &mut ChaCha8Rng::seed_from_u64(0xFACADE));
        b_.iter_batched(
            || raw.clone(),
            |mut spans| {
                TimeSpanSet::merge_overlaps(&mut spans);
                black_box(spans.len());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_tree_insert,
    bench_tree_queries,
    bench_set_algebra
);
criterion_main!(benches);
