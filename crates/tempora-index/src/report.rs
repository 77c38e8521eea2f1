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

//! Aggregate result of a histogram query.

use std::fmt::Display;

/// Per-bin counts from [`counts_in_bins`], plus their aggregates.
///
/// Bins are a coverage histogram, not a partition: an item overlapping
/// several bins is counted once per bin touched, so `total_count` may
/// exceed the number of indexed items.
///
/// [`counts_in_bins`]: crate::tree::BinaryTimeTree::counts_in_bins
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CountReport {
    bin_counts: Vec<usize>,
    max_bin_count: usize,
    min_bin_count: usize,
    total_count: usize,
}

impl CountReport {
    /// Builds a report from raw per-bin counts; an empty bin list yields
    /// all-zero aggregates.
    pub fn from_bins(bin_counts: Vec<usize>) -> Self {
        let max_bin_count = bin_counts.iter().copied().max().unwrap_or(0);
        let min_bin_count = bin_counts.iter().copied().min().unwrap_or(0);
        let total_count = bin_counts.iter().sum();
        Self {
            bin_counts,
            max_bin_count,
            min_bin_count,
            total_count,
        }
    }

    /// The count of the fullest bin.
    #[inline]
    pub fn max_bin_count(&self) -> usize {
        self.max_bin_count
    }

    /// The count of the emptiest bin.
    #[inline]
    pub fn min_bin_count(&self) -> usize {
        self.min_bin_count
    }

    /// The sum across bins; exceeds the item count when items span
    /// multiple bins.
    #[inline]
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// The per-bin counts, in bin order.
    #[inline]
    pub fn bin_counts(&self) -> &[usize] {
        &self.bin_counts
    }

    #[inline]
    pub fn bins(&self) -> usize {
        self.bin_counts.len()
    }
}

impl Display for CountReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CountReport(bins={}, max={}, min={}, total={})",
            self.bin_counts.len(),
            self.max_bin_count,
            self.min_bin_count,
            self.total_count
        )
    }
}
