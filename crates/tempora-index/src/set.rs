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

//! TimeSpanSet: canonical disjoint coverage over the millisecond timeline.
//!
//! Invariants (always held):
//!    - spans are bounded and non-empty
//!    - spans are sorted by start
//!    - spans are mutually disjoint and never touching; two spans with
//!      `a.end == b.start` are always merged into one
//!
//! Complexity:
//!    - contains_point, contains: `O(log n)`
//!    - add, remove: `O(log n + k)` plus the vector shift
//!    - union/intersection: `O(n + m)`

use crate::err::ImmutableListError;
use chrono::{DateTime, Utc};
use std::fmt;
use std::ops::Deref;
use tempora_core::extent::ExtentAccumulator;
use tempora_core::span::TimeSpan;
use tempora_core::time::TimePoint;

/// A mutable set of time coverage held as the minimal canonical list of
/// disjoint, non-touching bounded spans.
///
/// The canonical form is the set's central invariant and is enforced in
/// one place: the merge-on-insert and split-on-remove helpers. Unbounded
/// and timeless spans are outside the storage domain of this
/// representation; feeding one to [`add`](Self::add) or
/// [`remove`](Self::remove) is a no-op returning `false`.
///
/// Intended for single-writer use; clone or snapshot with
/// [`to_list`](Self::to_list) before publishing to concurrent readers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TimeSpanSet {
    spans: Vec<TimeSpan>,
}

/// An immutable canonical snapshot of time coverage.
///
/// Where the reference behavior hands out read-only views that reject
/// every mutating call at runtime, this type simply has no mutating API;
/// the snapshot cannot be altered after construction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TimeSpanList {
    spans: Vec<TimeSpan>,
}

/// Builds a bounded span from bounds the canonical-form code has already
/// ordered.
#[inline]
fn span_of(start: TimePoint, end: TimePoint) -> TimeSpan {
    TimeSpan::bounded(start, end).expect("canonical-form bounds are ordered")
}

/// The bounds of a stored span; every stored span is bounded.
#[inline]
fn bounds(span: &TimeSpan) -> (TimePoint, TimePoint) {
    match (span.start(), span.end()) {
        (Some(start), Some(end)) => (start, end),
        _ => unreachable!("canonical sets store bounded spans only"),
    }
}

/// The bounds of a span the set can store: bounded with positive width.
#[inline]
fn storable(span: &TimeSpan) -> Option<(TimePoint, TimePoint)> {
    match (span.start(), span.end()) {
        (Some(start), Some(end)) if start < end => Some((start, end)),
        _ => None,
    }
}

/// Point membership over a canonical slice, `O(log n)`.
fn slice_contains_point(spans: &[TimeSpan], at: TimePoint) -> bool {
    // First span ending after the point is the only candidate.
    let candidate = spans.partition_point(|span| bounds(span).1 <= at);
    candidate < spans.len() && bounds(&spans[candidate]).0 <= at
}

/// Full-span membership over a canonical slice.
///
/// A bounded probe must lie inside a single block (the canonical form has
/// no touching blocks to chain across); an instantaneous probe degrades
/// to point membership; an unbounded probe can never be covered.
fn slice_contains(spans: &[TimeSpan], probe: &TimeSpan) -> bool {
    if probe.is_instantaneous() {
        return match probe.start() {
            Some(at) => slice_contains_point(spans, at),
            None => false,
        };
    }
    let Some((ps, pe)) = storable(probe) else {
        return false;
    };
    let after = spans.partition_point(|span| bounds(span).0 <= ps);
    if after == 0 {
        return false;
    }
    let (_, be) = bounds(&spans[after - 1]);
    pe <= be
}

fn slice_extent(spans: &[TimeSpan]) -> TimeSpan {
    let mut acc = ExtentAccumulator::new();
    for span in spans {
        acc.add(span);
    }
    acc.extent()
}

impl TimeSpanSet {
    #[inline]
    pub fn new() -> Self {
        Self { spans: Vec::new() }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            spans: Vec::with_capacity(capacity),
        }
    }

    /// Builds a set from arbitrary spans, normalizing them into canonical
    /// form; unbounded and empty spans are dropped.
    #[inline]
    pub fn from_spans(mut spans: Vec<TimeSpan>) -> Self {
        Self::merge_overlaps(&mut spans);
        Self { spans }
    }

    /// The number of disjoint blocks.
    #[inline]
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// The canonical blocks, sorted and disjoint.
    #[inline]
    pub fn as_slice(&self) -> &[TimeSpan] {
        &self.spans
    }

    #[inline]
    pub fn clear(&mut self) {
        self.spans.clear();
    }

    /// Inserts coverage, merging with every existing block the span forms
    /// a contiguous range with; a span bridging two blocks collapses them
    /// into one.
    ///
    /// Returns whether the set's content changed: adding coverage that is
    /// already fully present returns `false`, as does adding an
    /// unbounded, timeless or zero-width span.
    pub fn add(&mut self, span: TimeSpan) -> bool {
        let Some((start, end)) = storable(&span) else {
            return false;
        };
        if slice_contains(&self.spans, &span) {
            return false;
        }

        let mut insertion = self.spans.partition_point(|iv| bounds(iv).0 < start);
        let mut merged_start = start;
        let mut merged_end = end;

        // Merge with the block to the left when it overlaps or touches.
        if insertion > 0 && bounds(&self.spans[insertion - 1]).1 >= merged_start {
            insertion -= 1;
            let (bs, be) = bounds(&self.spans[insertion]);
            merged_start = bs.min(merged_start);
            merged_end = be.max(merged_end);
        }

        // Swallow every following block the merged extent reaches.
        let mut scan = insertion;
        while scan < self.spans.len() && bounds(&self.spans[scan]).0 <= merged_end {
            merged_end = merged_end.max(bounds(&self.spans[scan]).1);
            scan += 1;
        }

        let merged = span_of(merged_start, merged_end);
        if insertion == self.spans.len() {
            self.spans.push(merged);
        } else if scan == insertion {
            self.spans.insert(insertion, merged);
        } else {
            self.spans[insertion] = merged;
            if scan > insertion + 1 {
                self.spans.drain(insertion + 1..scan);
            }
        }
        debug_assert!(self.invariants_held());
        true
    }

    /// Removes coverage: truncates blocks the span overlaps at an edge,
    /// splits a block in two when the span lies strictly inside it, and
    /// deletes fully covered blocks.
    ///
    /// Returns whether anything changed. Unbounded, timeless and
    /// zero-width spans are rejected with `false`, mirroring
    /// [`add`](Self::add).
    pub fn remove(&mut self, span: TimeSpan) -> bool {
        let Some((start, end)) = storable(&span) else {
            return false;
        };

        let first = self.spans.partition_point(|iv| bounds(iv).1 <= start);
        let mut replacement: Vec<TimeSpan> = Vec::new();
        let mut last = first;
        while last < self.spans.len() && bounds(&self.spans[last]).0 < end {
            let (bs, be) = bounds(&self.spans[last]);
            if bs < start {
                replacement.push(span_of(bs, start));
            }
            if end < be {
                replacement.push(span_of(end, be));
            }
            last += 1;
        }
        if last == first {
            return false;
        }
        self.spans.splice(first..last, replacement);
        debug_assert!(self.invariants_held());
        true
    }

    /// The canonical set covering the union of both operands' covered
    /// points, merging across operand boundaries wherever spans touch or
    /// overlap.
    pub fn union(&self, other: &TimeSpanSet) -> TimeSpanSet {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }

        let mut merged: Vec<TimeSpan> = Vec::with_capacity(self.len() + other.len());
        let (mut i, mut j) = (0usize, 0usize);
        while i < self.spans.len() && j < other.spans.len() {
            let next = if bounds(&self.spans[i]).0 <= bounds(&other.spans[j]).0 {
                let span = self.spans[i];
                i += 1;
                span
            } else {
                let span = other.spans[j];
                j += 1;
                span
            };
            Self::append_coalescing(&mut merged, next);
        }
        for span in &self.spans[i..] {
            Self::append_coalescing(&mut merged, *span);
        }
        for span in &other.spans[j..] {
            Self::append_coalescing(&mut merged, *span);
        }
        let result = TimeSpanSet { spans: merged };
        debug_assert!(result.invariants_held());
        result
    }

    /// The canonical set covering exactly the shared coverage; empty when
    /// the operands are disjoint.
    pub fn intersection(&self, other: &TimeSpanSet) -> TimeSpanSet {
        let mut out: Vec<TimeSpan> = Vec::with_capacity(self.len().min(other.len()));
        let (mut i, mut j) = (0usize, 0usize);
        while i < self.spans.len() && j < other.spans.len() {
            let (as_, ae) = bounds(&self.spans[i]);
            let (bs, be) = bounds(&other.spans[j]);
            let start = as_.max(bs);
            let end = ae.min(be);
            if start < end {
                out.push(span_of(start, end));
            }
            if ae < be {
                i += 1;
            } else {
                j += 1;
            }
        }
        let result = TimeSpanSet { spans: out };
        debug_assert!(result.invariants_held());
        result
    }

    /// Intersection against a single probe span, which may be unbounded
    /// on either side (an unbounded side imposes no cut there).
    pub fn intersection_span(&self, probe: &TimeSpan) -> TimeSpanSet {
        let lo = probe.start();
        let hi = probe.end();
        let first = match lo {
            Some(lo) => self.spans.partition_point(|iv| bounds(iv).1 <= lo),
            None => 0,
        };
        let mut out: Vec<TimeSpan> = Vec::new();
        for span in &self.spans[first..] {
            let (bs, be) = bounds(span);
            if let Some(hi) = hi {
                if bs >= hi {
                    break;
                }
            }
            let start = match lo {
                Some(lo) => bs.max(lo),
                None => bs,
            };
            let end = match hi {
                Some(hi) => be.min(hi),
                None => be,
            };
            if start < end {
                out.push(span_of(start, end));
            }
        }
        let result = TimeSpanSet { spans: out };
        debug_assert!(result.invariants_held());
        result
    }

    /// `true` if the instant lies inside the covered points.
    #[inline]
    pub fn contains_point(&self, at: TimePoint) -> bool {
        slice_contains_point(&self.spans, at)
    }

    /// Point membership by raw epoch milliseconds.
    #[inline]
    pub fn contains_ms(&self, millis: i64) -> bool {
        self.contains_point(TimePoint::new(millis))
    }

    /// Point membership by calendar timestamp.
    #[inline]
    pub fn contains_date(&self, at: DateTime<Utc>) -> bool {
        self.contains_point(TimePoint::from_datetime(at))
    }

    /// Full-span membership; an unbounded probe is never contained.
    #[inline]
    pub fn contains(&self, probe: &TimeSpan) -> bool {
        slice_contains(&self.spans, probe)
    }

    /// `true` only when every probe is fully contained.
    pub fn contains_all<'a, I>(&self, probes: I) -> bool
    where
        I: IntoIterator<Item = &'a TimeSpan>,
    {
        probes.into_iter().all(|probe| self.contains(probe))
    }

    /// Generalized membership hook.
    ///
    /// When the probe is unbounded on both sides the predicate is not
    /// evaluated and `default_for_unbounded` is returned verbatim.
    pub fn test_with<F>(&self, probe: &TimeSpan, default_for_unbounded: bool, predicate: F) -> bool
    where
        F: FnOnce(&TimeSpanSet, &TimeSpan) -> bool,
    {
        if probe.is_timeless() {
            return default_for_unbounded;
        }
        predicate(self, probe)
    }

    /// The bounding span of all blocks; [`TimeSpan::ZERO`] when empty.
    #[inline]
    pub fn extent(&self) -> TimeSpan {
        slice_extent(&self.spans)
    }

    /// An immutable snapshot of the current coverage.
    #[inline]
    pub fn to_list(&self) -> TimeSpanList {
        TimeSpanList {
            spans: self.spans.clone(),
        }
    }

    /// Collapses an arbitrary, possibly unsorted and overlapping list of
    /// spans into canonical form in place: sorted by start, disjoint,
    /// touching spans merged. Unbounded, timeless and zero-width spans
    /// are dropped (they are outside the storage domain).
    pub fn merge_overlaps(spans: &mut Vec<TimeSpan>) {
        spans.retain(|span| storable(span).is_some());
        if spans.len() < 2 {
            return;
        }
        spans.sort_unstable_by_key(|span| bounds(span).0);

        let mut write = 0;
        for read in 1..spans.len() {
            let (ws, we) = bounds(&spans[write]);
            let (rs, re) = bounds(&spans[read]);
            if we >= rs {
                spans[write] = span_of(ws, we.max(re));
            } else {
                write += 1;
                spans[write] = spans[read];
            }
        }
        spans.truncate(write + 1);
    }

    /// Appends a span whose start is at or after the tail's start,
    /// merging with the tail when they overlap or touch.
    fn append_coalescing(spans: &mut Vec<TimeSpan>, next: TimeSpan) {
        if let Some(last) = spans.last_mut() {
            let (ls, le) = bounds(last);
            let (ns, ne) = bounds(&next);
            if le >= ns {
                *last = span_of(ls, le.max(ne));
                return;
            }
        }
        spans.push(next);
    }

    #[cfg(debug_assertions)]
    fn invariants_held(&self) -> bool {
        self.spans.iter().all(|span| storable(span).is_some())
            && self
                .spans
                .windows(2)
                .all(|w| bounds(&w[0]).1 < bounds(&w[1]).0)
    }

    #[cfg(not(debug_assertions))]
    fn invariants_held(&self) -> bool {
        true
    }
}

impl Deref for TimeSpanSet {
    type Target = [TimeSpan];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.spans
    }
}

impl<'a> IntoIterator for &'a TimeSpanSet {
    type Item = &'a TimeSpan;
    type IntoIter = core::slice::Iter<'a, TimeSpan>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.spans.iter()
    }
}

impl From<Vec<TimeSpan>> for TimeSpanSet {
    #[inline]
    fn from(spans: Vec<TimeSpan>) -> Self {
        Self::from_spans(spans)
    }
}

impl FromIterator<TimeSpan> for TimeSpanSet {
    #[inline]
    fn from_iter<I: IntoIterator<Item = TimeSpan>>(iter: I) -> Self {
        Self::from_spans(iter.into_iter().collect())
    }
}

impl fmt::Display for TimeSpanSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, span) in self.spans.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{span}")?;
        }
        write!(f, "}}")
    }
}

impl TimeSpanList {
    /// The empty snapshot.
    #[inline]
    pub fn empty() -> Self {
        Self { spans: Vec::new() }
    }

    /// A snapshot holding exactly one span.
    #[inline]
    pub fn singleton(span: TimeSpan) -> Self {
        Self { spans: vec![span] }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&TimeSpan> {
        self.spans.get(index)
    }

    #[inline]
    pub fn as_slice(&self) -> &[TimeSpan] {
        &self.spans
    }

    #[inline]
    pub fn contains_point(&self, at: TimePoint) -> bool {
        slice_contains_point(&self.spans, at)
    }

    #[inline]
    pub fn contains(&self, probe: &TimeSpan) -> bool {
        slice_contains(&self.spans, probe)
    }

    /// The bounding span of the snapshot; [`TimeSpan::ZERO`] when empty.
    #[inline]
    pub fn extent(&self) -> TimeSpan {
        slice_extent(&self.spans)
    }

    /// Documents the read-only nature of the snapshot for callers porting
    /// from mutable-collection APIs: every mutation is unsupported.
    #[inline]
    pub fn reject_mutation(&self) -> ImmutableListError {
        ImmutableListError::new()
    }
}

impl Deref for TimeSpanList {
    type Target = [TimeSpan];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.spans
    }
}

impl<'a> IntoIterator for &'a TimeSpanList {
    type Item = &'a TimeSpan;
    type IntoIter = core::slice::Iter<'a, TimeSpan>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.spans.iter()
    }
}

impl From<&TimeSpanSet> for TimeSpanList {
    #[inline]
    fn from(set: &TimeSpanSet) -> Self {
        set.to_list()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sp(a: i64, b: i64) -> TimeSpan {
        TimeSpan::from_millis(a, b).unwrap()
    }

    /// Builds a set from instant points, each covering `[p, p + 1)`;
    /// adjacent points merge into one block.
    fn from_points(points: &[i64]) -> TimeSpanSet {
        let mut set = TimeSpanSet::new();
        for &p in points {
            set.add(sp(p, p + 1));
        }
        set
    }

    fn assert_canonical(set: &TimeSpanSet) {
        for w in set.as_slice().windows(2) {
            let (_, e0) = (w[0].start().unwrap(), w[0].end().unwrap());
            let (s1, _) = (w[1].start().unwrap(), w[1].end().unwrap());
            assert!(
                e0 < s1,
                "blocks {} and {} overlap or touch",
                w[0],
                w[1]
            );
            assert!(!w[0].forms_contiguous_range(&w[1]));
        }
    }

    #[test]
    fn new_set_is_empty() {
        let set = TimeSpanSet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert_eq!(set.extent(), TimeSpan::ZERO);
    }

    #[test]
    fn add_merges_touching_blocks() {
        let mut set = TimeSpanSet::new();
        assert!(set.add(sp(5, 7)));
        assert!(set.add(sp(1, 3)));
        assert!(set.add(sp(3, 5)));
        assert_eq!(set.as_slice(), &[sp(1, 7)]);
        assert_canonical(&set);
    }

    #[test]
    fn add_bridging_span_collapses_two_blocks() {
        let mut set = TimeSpanSet::new();
        set.add(sp(1, 3));
        set.add(sp(8, 10));
        assert_eq!(set.len(), 2);
        assert!(set.add(sp(2, 9)));
        assert_eq!(set.as_slice(), &[sp(1, 10)]);
        assert_canonical(&set);
    }

    #[test]
    fn covered_add_is_a_no_op() {
        let mut set = TimeSpanSet::new();
        set.add(sp(0, 10));
        assert!(!set.add(sp(2, 8)));
        assert!(!set.add(sp(0, 10)));
        assert_eq!(set.as_slice(), &[sp(0, 10)]);
    }

    #[test]
    fn add_rejects_unbounded_and_empty_spans() {
        let mut set = TimeSpanSet::new();
        assert!(!set.add(TimeSpan::TIMELESS));
        assert!(!set.add(TimeSpan::unbounded_start(TimePoint::new(5))));
        assert!(!set.add(TimeSpan::unbounded_end(TimePoint::new(5))));
        assert!(!set.add(sp(3, 3)));
        assert!(set.is_empty());
    }

    #[test]
    fn remove_truncates_at_edges() {
        let mut set = TimeSpanSet::new();
        set.add(sp(0, 10));
        assert!(set.remove(sp(0, 3)));
        assert_eq!(set.as_slice(), &[sp(3, 10)]);
        assert!(set.remove(sp(8, 12)));
        assert_eq!(set.as_slice(), &[sp(3, 8)]);
        assert_canonical(&set);
    }

    #[test]
    fn remove_interior_splits_a_block() {
        let mut set = TimeSpanSet::new();
        set.add(sp(0, 10));
        assert!(set.remove(sp(4, 6)));
        assert_eq!(set.as_slice(), &[sp(0, 4), sp(6, 10)]);
        assert_canonical(&set);
    }

    #[test]
    fn remove_deletes_fully_covered_blocks() {
        let mut set = TimeSpanSet::new();
        set.add(sp(1, 3));
        set.add(sp(5, 7));
        set.add(sp(9, 11));
        assert!(set.remove(sp(0, 8)));
        assert_eq!(set.as_slice(), &[sp(9, 11)]);
    }

    #[test]
    fn remove_outside_coverage_changes_nothing() {
        let mut set = TimeSpanSet::new();
        set.add(sp(5, 10));
        assert!(!set.remove(sp(0, 5)));
        assert!(!set.remove(sp(10, 15)));
        assert!(!set.remove(TimeSpan::TIMELESS));
        assert_eq!(set.as_slice(), &[sp(5, 10)]);
    }

    #[test]
    fn canonical_form_survives_mixed_mutation() {
        let mut set = TimeSpanSet::new();
        let ops: [(bool, i64, i64); 9] = [
            (true, 0, 4),
            (true, 10, 14),
            (true, 4, 6),
            (false, 2, 3),
            (true, 3, 10),
            (false, 0, 1),
            (true, 20, 24),
            (false, 22, 23),
            (true, 1, 2),
        ];
        for (is_add, a, b) in ops {
            if is_add {
                set.add(sp(a, b));
            } else {
                set.remove(sp(a, b));
            }
            assert_canonical(&set);
        }
    }

    #[test]
    fn points_merge_by_adjacency() {
        let set = from_points(&[1, 2, 5, 6, 8, 9, 11, 12, 13, 14, 15, 55, 56, 57]);
        assert_eq!(
            set.as_slice(),
            &[sp(1, 3), sp(5, 7), sp(8, 10), sp(11, 16), sp(55, 58)]
        );
    }

    #[test]
    fn union_merges_across_operands() {
        let a = TimeSpanSet::from_spans(vec![
            sp(1, 3),
            sp(5, 7),
            sp(8, 10),
            sp(11, 16),
            sp(55, 58),
        ]);
        let b = TimeSpanSet::from_spans(vec![
            sp(1, 3),
            sp(5, 6),
            sp(15, 17),
            sp(50, 53),
            sp(57, 58),
        ]);
        let u = a.union(&b);
        assert_eq!(u.len(), 6);
        assert_eq!(
            u.as_slice(),
            &[sp(1, 3), sp(5, 7), sp(8, 10), sp(11, 17), sp(50, 53), sp(55, 58)]
        );
        assert_canonical(&u);
        // Union is symmetric.
        assert_eq!(b.union(&a), u);
    }

    #[test]
    fn union_with_empty_is_identity() {
        let a = TimeSpanSet::from_spans(vec![sp(1, 3)]);
        let empty = TimeSpanSet::new();
        assert_eq!(a.union(&empty), a);
        assert_eq!(empty.union(&a), a);
    }

    #[test]
    fn intersection_with_probe_span() {
        let a = TimeSpanSet::from_spans(vec![
            sp(1, 3),
            sp(5, 7),
            sp(8, 10),
            sp(11, 16),
            sp(55, 58),
        ]);
        let cut = a.intersection_span(&sp(7, 16));
        assert_eq!(cut.len(), 2);
        assert_eq!(cut.as_slice(), &[sp(8, 10), sp(11, 16)]);
        assert_canonical(&cut);
    }

    #[test]
    fn intersection_of_sets() {
        let a = TimeSpanSet::from_spans(vec![sp(1, 5), sp(7, 10)]);
        let b = TimeSpanSet::from_spans(vec![sp(3, 8)]);
        assert_eq!(a.intersection(&b).as_slice(), &[sp(3, 5), sp(7, 8)]);

        let touching = TimeSpanSet::from_spans(vec![sp(5, 7)]);
        let c = TimeSpanSet::from_spans(vec![sp(3, 5), sp(7, 9)]);
        assert!(touching.intersection(&c).is_empty());
    }

    #[test]
    fn intersection_span_with_unbounded_probe() {
        let a = TimeSpanSet::from_spans(vec![sp(1, 3), sp(5, 7)]);
        assert_eq!(a.intersection_span(&TimeSpan::TIMELESS), a);
        assert_eq!(
            a.intersection_span(&TimeSpan::unbounded_start(TimePoint::new(6)))
                .as_slice(),
            &[sp(1, 3), sp(5, 6)]
        );
        assert_eq!(
            a.intersection_span(&TimeSpan::unbounded_end(TimePoint::new(2)))
                .as_slice(),
            &[sp(2, 3), sp(5, 7)]
        );
    }

    #[test]
    fn point_and_span_membership() {
        let set = TimeSpanSet::from_spans(vec![sp(1, 3), sp(5, 6), sp(8, 10)]);
        assert!(set.contains_point(TimePoint::new(1)));
        assert!(set.contains_ms(9));
        assert!(!set.contains_ms(3)); // exclusive end
        assert!(!set.contains_ms(7));
        assert!(set.contains(&sp(8, 10)));
        assert!(set.contains(&sp(1, 2)));
        assert!(!set.contains(&sp(2, 5)));
        assert!(!set.contains(&TimeSpan::unbounded_end(TimePoint::new(8))));
        assert!(!set.contains(&TimeSpan::TIMELESS));
    }

    #[test]
    fn contains_all_requires_every_probe() {
        let set = TimeSpanSet::from_spans(vec![sp(0, 10), sp(20, 30)]);
        let inside = [sp(1, 4), sp(22, 28)];
        let straddling = [sp(1, 4), sp(8, 22)];
        assert!(set.contains_all(inside.iter()));
        assert!(!set.contains_all(straddling.iter()));
        let none: [TimeSpan; 0] = [];
        assert!(set.contains_all(none.iter()));
    }

    #[test]
    fn test_with_short_circuits_on_timeless_probe() {
        let set = TimeSpanSet::from_spans(vec![sp(0, 10)]);
        // The predicate must not be evaluated for a timeless probe.
        assert!(set.test_with(&TimeSpan::TIMELESS, true, |_, _| panic!("evaluated")));
        assert!(!set.test_with(&TimeSpan::TIMELESS, false, |_, _| panic!("evaluated")));
        assert!(set.test_with(&sp(2, 4), false, |s, probe| s.contains(probe)));
    }

    #[test]
    fn extent_bounds_all_blocks() {
        let set = TimeSpanSet::from_spans(vec![sp(5, 7), sp(1, 3), sp(20, 22)]);
        assert_eq!(set.extent(), sp(1, 22));
    }

    #[test]
    fn merge_overlaps_normalizes_raw_input() {
        let mut raw = vec![
            sp(5, 7),
            sp(1, 2),
            sp(2, 3),
            sp(7, 8),
            sp(9, 11),
            sp(10, 12),
            sp(4, 4),
            TimeSpan::TIMELESS,
        ];
        TimeSpanSet::merge_overlaps(&mut raw);
        assert_eq!(raw, vec![sp(1, 3), sp(5, 8), sp(9, 12)]);
        // Idempotent.
        TimeSpanSet::merge_overlaps(&mut raw);
        assert_eq!(raw, vec![sp(1, 3), sp(5, 8), sp(9, 12)]);
    }

    #[test]
    fn list_snapshots_are_independent_of_the_set() {
        let mut set = TimeSpanSet::from_spans(vec![sp(1, 3), sp(5, 7)]);
        let snapshot = set.to_list();
        set.add(sp(10, 12));
        set.remove(sp(1, 3));
        assert_eq!(snapshot.as_slice(), &[sp(1, 3), sp(5, 7)]);
        assert!(snapshot.contains(&sp(1, 3)));
        assert_eq!(snapshot.extent(), sp(1, 7));
    }

    #[test]
    fn list_constructors() {
        assert!(TimeSpanList::empty().is_empty());
        let single = TimeSpanList::singleton(sp(4, 9));
        assert_eq!(single.len(), 1);
        assert_eq!(single.get(0), Some(&sp(4, 9)));
        assert_eq!(single.get(1), None);
        assert_eq!(single.extent(), sp(4, 9));
        assert_eq!(
            format!("{}", single.reject_mutation()),
            "Mutation of an immutable time-span list is not supported"
        );
    }

    #[test]
    fn display_lists_blocks() {
        let set = TimeSpanSet::from_spans(vec![sp(1, 3), sp(5, 7)]);
        assert_eq!(format!("{set}"), "{[1, 3), [5, 7)}");
    }
}
