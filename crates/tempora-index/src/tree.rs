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

//! BinaryTimeTree: a recursive index over the time axis.
//!
//! The tree partitions its covering range by binary halving. Each node
//! either stores its assigned items directly (leaf, or items straddling
//! both halves) or delegates to two children covering disjoint halves of
//! its range. Subdivision triggers once a node's direct value count
//! exceeds the configured threshold and the node's range is still wide
//! enough to split.
//!
//! Only the counting contracts and `size()` are contractual; the tree's
//! shape is an implementation detail. Queries on an empty tree return
//! zero, never fail.

use crate::report::CountReport;
use tempora_core::err::{SpanError, SubdivisionError, UnboundedSpanError};
use tempora_core::provider::TimeSpanProvider;
use tempora_core::span::TimeSpan;
use tempora_core::time::{TimeDelta, TimePoint};
use tracing::{debug, trace};

/// Tuning for [`BinaryTimeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeConfig {
    split_threshold: usize,
}

impl TreeConfig {
    /// `split_threshold` is the number of direct values a node may hold
    /// before it attempts to subdivide.
    #[inline]
    pub fn new(split_threshold: usize) -> Self {
        Self {
            split_threshold: split_threshold.max(1),
        }
    }

    #[inline]
    pub fn split_threshold(&self) -> usize {
        self.split_threshold
    }
}

impl Default for TreeConfig {
    #[inline]
    fn default() -> Self {
        Self::new(16)
    }
}

/// `true` when the closed hulls of the two spans meet; unlike
/// [`TimeSpan::overlaps`] this counts exact boundary touches. Used for
/// histogram bins, where boundary double counting is intentional, and as
/// the conservative subtree-pruning test.
fn closed_meets(a: &TimeSpan, b: &TimeSpan) -> bool {
    let a_starts_in_time = match (a.start(), b.end()) {
        (Some(start), Some(end)) => start <= end,
        _ => true,
    };
    let b_starts_in_time = match (b.start(), a.end()) {
        (Some(start), Some(end)) => start <= end,
        _ => true,
    };
    a_starts_in_time && b_starts_in_time
}

#[inline]
fn item_matches(span: &TimeSpan, query: &TimeSpan, count_touching: bool) -> bool {
    if count_touching {
        closed_meets(span, query)
    } else {
        span.overlaps(query)
    }
}

#[inline]
fn node_span(start: TimePoint, end: TimePoint) -> TimeSpan {
    TimeSpan::bounded(start, end).expect("node ranges are ordered")
}

#[inline]
fn node_bounds(range: &TimeSpan) -> (TimePoint, TimePoint) {
    match (range.start(), range.end()) {
        (Some(start), Some(end)) => (start, end),
        _ => unreachable!("node ranges are bounded"),
    }
}

/// One node of the tree: a bounded responsibility range, the values
/// assigned directly at this node, and optionally two children covering
/// disjoint halves of the range. Ownership is strictly hierarchical;
/// nodes never escape the tree.
#[derive(Debug, Clone)]
struct BTreeNode<T> {
    range: TimeSpan,
    values: Vec<T>,
    children: Option<Box<[BTreeNode<T>; 2]>>,
}

impl<T: TimeSpanProvider> BTreeNode<T> {
    fn new(range: TimeSpan) -> Self {
        Self {
            range,
            values: Vec::new(),
            children: None,
        }
    }

    fn insert(&mut self, item: T, split_threshold: usize) {
        if let Some(children) = self.children.as_mut() {
            let span = item.time_span();
            for child in children.iter_mut() {
                if child.range.contains(&span) {
                    return child.insert(item, split_threshold);
                }
            }
            // Straddles the halving boundary; stays at this node.
            self.values.push(item);
            return;
        }
        self.values.push(item);
        if self.values.len() > split_threshold {
            self.try_split(split_threshold);
        }
    }

    /// Halves the node's range and sinks every value that fits entirely
    /// inside one half. A range narrower than two milliseconds cannot be
    /// usefully split and stays a leaf.
    fn try_split(&mut self, split_threshold: usize) {
        let (Some(start), Some(end)) = (self.range.start(), self.range.end()) else {
            return;
        };
        if end.millis() - start.millis() < 2 {
            return;
        }
        let mid = start.midpoint_with(end);
        let mut left = BTreeNode::new(node_span(start, mid));
        let mut right = BTreeNode::new(node_span(mid, end));

        let values = std::mem::take(&mut self.values);
        let mut straddlers = Vec::new();
        for item in values {
            let span = item.time_span();
            if left.range.contains(&span) {
                left.insert(item, split_threshold);
            } else if right.range.contains(&span) {
                right.insert(item, split_threshold);
            } else {
                straddlers.push(item);
            }
        }
        trace!(
            range = %self.range,
            kept = straddlers.len(),
            left = left.size(),
            right = right.size(),
            "subdivided time-tree node"
        );
        self.values = straddlers;
        self.children = Some(Box::new([left, right]));
    }

    fn size(&self) -> usize {
        let mut total = self.values.len();
        if let Some(children) = self.children.as_ref() {
            for child in children.iter() {
                total += child.size();
            }
        }
        total
    }

    fn count(&self, query: &TimeSpan, count_touching: bool) -> usize {
        let mut total = self
            .values
            .iter()
            .filter(|item| item_matches(&item.time_span(), query, count_touching))
            .count();
        if let Some(children) = self.children.as_ref() {
            for child in children.iter() {
                // Closed-hull pruning is conservative: a child is skipped
                // only when nothing inside its range can match.
                if closed_meets(&child.range, query) {
                    total += child.count(query, count_touching);
                }
            }
        }
        total
    }
}

/// A spatial index over the time axis for items exposing a
/// [`TimeSpanProvider`] capability.
///
/// Answers range membership counts, fixed-width histogram counts and
/// batched per-range counts in better than linear time for large item
/// collections. Single-writer: callers needing read-during-write must
/// synchronize externally or rebuild before publishing. Bulk loads should
/// prefer [`insert_all`](Self::insert_all) to amortize subdivision.
#[derive(Debug, Clone)]
pub struct BinaryTimeTree<T> {
    config: TreeConfig,
    root: Option<BTreeNode<T>>,
    /// Items whose span has an unbounded side; they cannot be
    /// partitioned and are scanned on every query.
    unpartitioned: Vec<T>,
}

impl<T: TimeSpanProvider> BinaryTimeTree<T> {
    #[inline]
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    #[inline]
    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            config,
            root: None,
            unpartitioned: Vec::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> TreeConfig {
        self.config
    }

    /// Indexes one item by its span.
    pub fn insert(&mut self, item: T) {
        let span = item.time_span();
        let (Some(start), Some(end)) = (span.start(), span.end()) else {
            self.unpartitioned.push(item);
            return;
        };
        let threshold = self.config.split_threshold;
        if self.root.is_none() {
            // Give an instantaneous first item a range with width so the
            // root can later subdivide.
            let range = if start == end {
                node_span(start, end.saturating_add(TimeDelta::new(1)))
            } else {
                node_span(start, end)
            };
            self.root = Some(BTreeNode::new(range));
        } else if self.root.as_ref().is_some_and(|root| root.children.is_none()) {
            // A leaf root can simply widen its range to hull newcomers;
            // there is no structure to preserve yet.
            if let Some(root) = self.root.as_mut() {
                if !root.range.contains(&span) {
                    let (rs, re) = node_bounds(&root.range);
                    root.range = node_span(rs.min(start), re.max(end));
                }
            }
        } else {
            while !self.root_covers(&span) {
                self.grow_root_toward(start, end);
            }
        }
        if let Some(root) = self.root.as_mut() {
            root.insert(item, threshold);
        }
    }

    fn root_covers(&self, span: &TimeSpan) -> bool {
        self.root
            .as_ref()
            .is_some_and(|root| root.range.contains(span))
    }

    /// Re-roots the tree one level up, pairing the old root with a fresh
    /// sibling so the covering range at least doubles toward the item.
    /// Geometric growth keeps the chain of ancestors logarithmic even
    /// under sorted insertion.
    fn grow_root_toward(&mut self, start: TimePoint, end: TimePoint) {
        let Some(old_root) = self.root.take() else {
            return;
        };
        let (rs, re) = node_bounds(&old_root.range);
        let width = TimeDelta::new((re.millis() - rs.millis()).max(1));
        let (range, sibling_range, old_first) = if end > re {
            let new_end = re.saturating_add(width).max(end);
            (node_span(rs, new_end), node_span(re, new_end), true)
        } else {
            let new_start = rs.saturating_sub(width).min(start);
            (node_span(new_start, re), node_span(new_start, rs), false)
        };
        trace!(range = %range, "re-rooting time tree");
        let sibling = BTreeNode::new(sibling_range);
        let children = if old_first {
            [old_root, sibling]
        } else {
            [sibling, old_root]
        };
        let mut root = BTreeNode::new(range);
        root.children = Some(Box::new(children));
        self.root = Some(root);
    }

    /// Indexes a batch of items.
    pub fn insert_all<I: IntoIterator<Item = T>>(&mut self, items: I) {
        for item in items {
            self.insert(item);
        }
    }

    /// The total number of indexed items, recomputed from the tree so it
    /// can never go stale.
    pub fn size(&self) -> usize {
        let indexed = self.root.as_ref().map_or(0, BTreeNode::size);
        indexed + self.unpartitioned.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Resets the tree to empty, dropping every node.
    pub fn clear(&mut self) {
        debug!(size = self.size(), "clearing time tree");
        self.root = None;
        self.unpartitioned.clear();
    }

    /// The number of indexed items whose span overlaps `query`, under
    /// strict half-open semantics (touching does not count).
    ///
    /// An empty or never-populated tree returns 0.
    pub fn count_in_range(&self, query: &TimeSpan) -> usize {
        self.count_matching(query, false)
    }

    /// One overlap count per supplied range, index-aligned with the
    /// input; empty input yields an empty result.
    pub fn counts_in_ranges(&self, queries: &[TimeSpan]) -> Vec<usize> {
        queries
            .iter()
            .map(|query| self.count_in_range(query))
            .collect()
    }

    /// Partitions `extent` into `bins` fixed-width bins (the last absorbs
    /// the rounding remainder) and counts, for each bin, the items whose
    /// closed hull meets the bin's closed hull.
    ///
    /// An item overlapping several bins is counted once per bin touched,
    /// and an item ending exactly on a bin boundary counts in both
    /// neighbors: this is a coverage histogram, not a partition of the
    /// item count.
    ///
    /// Fails on an unbounded extent or `bins == 0`.
    pub fn counts_in_bins(&self, extent: &TimeSpan, bins: usize) -> Result<CountReport, SpanError> {
        if bins == 0 {
            return Err(SubdivisionError::new(0).into());
        }
        let bin_spans = if bins == 1 {
            if !extent.is_bounded() {
                return Err(UnboundedSpanError::new("counts_in_bins").into());
            }
            vec![*extent]
        } else {
            extent.subdivide(bins)?
        };
        let counts = bin_spans
            .iter()
            .map(|bin| self.count_matching(bin, true))
            .collect();
        Ok(CountReport::from_bins(counts))
    }

    fn count_matching(&self, query: &TimeSpan, count_touching: bool) -> usize {
        let mut total = self
            .unpartitioned
            .iter()
            .filter(|item| item_matches(&item.time_span(), query, count_touching))
            .count();
        if let Some(root) = self.root.as_ref() {
            total += root.count(query, count_touching);
        }
        total
    }
}

impl<T: TimeSpanProvider> Default for BinaryTimeTree<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeSpanProvider> Extend<T> for BinaryTimeTree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.insert_all(iter);
    }
}

impl<T: TimeSpanProvider> FromIterator<T> for BinaryTimeTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.insert_all(iter);
        tree
    }
}
