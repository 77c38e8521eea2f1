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

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::{fs::File, io::BufWriter, time::Instant};
use tempora_index::prelude::*;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_span_events(FmtSpan::CLOSE)
        .init();
}

#[derive(Debug, Clone, Serialize)]
struct InstanceInfo {
    idx: usize,
    seed: u64,
    item_count: usize,
    query_count: usize,
    horizon_ms: i64,
}

#[derive(Debug, Clone, Serialize)]
struct RunResult {
    instance: InstanceInfo,
    insert_elapsed_ms: u128,
    query_elapsed_ms: u128,
    total_range_hits: usize,
    histogram_bins: usize,
    histogram_max: usize,
    histogram_min: usize,
    histogram_total: usize,
    coverage_blocks: usize,
    overlap_blocks: usize,
    coverage_extent_iso: String,
}

#[derive(Debug, Clone, Serialize)]
struct BenchmarkReport {
    description: String,
    instances: Vec<RunResult>,
}

fn interpolate_u(val0: usize, val1: usize, step: usize, steps: usize) -> usize {
    if steps <= 1 {
        return val1;
    }
    let num = (val1 as isize - val0 as isize) * step as isize;
    (val0 as isize + num / (steps as isize - 1)).max(0) as usize
}

fn gen_spans(n: usize, horizon: i64, rng: &mut impl Rng) -> Vec<TimeSpan> {
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        let start = rng.random_range(0..horizon);
        let width = rng.random_range(1..=(horizon / 100).max(1));
        let end = (start + width).min(horizon).max(start + 1);
        out.push(TimeSpan::from_millis(start, end).expect("ordered bounds"));
    }
    out
}

fn main() {
    enable_tracing();

    let n_instances = 8usize;
    let min_items = 1_000usize;
    let max_items = 100_000usize;
    let horizon_ms: i64 = 30 * 86_400_000; // thirty days
    let query_count = 500usize;

    let mut results: Vec<RunResult> = Vec::with_capacity(n_instances);

    for i in 0..n_instances {
        let item_count = interpolate_u(min_items, max_items, i, n_instances);
        let seed: u64 = 42 + i as u64;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let spans = gen_spans(item_count, horizon_ms, &mut rng);
        let queries = gen_spans(query_count, horizon_ms, &mut rng);

        // Index the spans.
        let t0 = Instant::now();
        let mut tree = BinaryTimeTree::new();
        tree.insert_all(spans.iter().copied());
        let insert_elapsed = t0.elapsed();
        assert_eq!(tree.size(), item_count);

        // Range, batch and histogram queries.
        let t1 = Instant::now();
        let per_range = tree.counts_in_ranges(&queries);
        let extent = TimeSpan::from_millis(0, horizon_ms).expect("ordered bounds");
        let histogram = tree
            .counts_in_bins(&extent, 720)
            .expect("bounded extent and non-zero bins");
        let query_elapsed = t1.elapsed();
        let total_range_hits: usize = per_range.iter().sum();

        // Derived coverage algebra: everything covered by the first half
        // of the items, intersected with the coverage of the second half.
        let midpoint = spans.len() / 2;
        let first: TimeSpanSet = spans[..midpoint].iter().copied().collect();
        let second: TimeSpanSet = spans[midpoint..].iter().copied().collect();
        let coverage = first.union(&second);
        let overlap = first.intersection(&second);
        let coverage_extent_iso = coverage
            .extent()
            .to_iso8601()
            .expect("extent within calendar range");

        info!(
            idx = i,
            items = item_count,
            blocks = coverage.len(),
            histogram_max = histogram.max_bin_count(),
            "instance complete"
        );

        results.push(RunResult {
            instance: InstanceInfo {
                idx: i,
                seed,
                item_count,
                query_count,
                horizon_ms,
            },
            insert_elapsed_ms: insert_elapsed.as_millis(),
            query_elapsed_ms: query_elapsed.as_millis(),
            total_range_hits,
            histogram_bins: histogram.bins(),
            histogram_max: histogram.max_bin_count(),
            histogram_min: histogram.min_bin_count(),
            histogram_total: histogram.total_count(),
            coverage_blocks: coverage.len(),
            overlap_blocks: overlap.len(),
            coverage_extent_iso,
        });
    }

    let report = BenchmarkReport {
        description:
            "Temporal index benchmark: 8 instances from small to big; tree insert/query timings and span-set algebra sizes."
                .into(),
        instances: results,
    };

    let file = File::create("bench_results.json").expect("create bench_results.json");
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &report).expect("write json report");

    println!();
    println!("=================================================================");
    println!("======================== Benchmark Done =========================");
    println!("=================================================================");
    println!();
    println!("Wrote: bench_results.json");
}
