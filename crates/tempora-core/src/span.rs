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

//! # Time Spans
//!
//! [`TimeSpan`] is the immutable half-open interval `[start, end)` on the
//! millisecond timeline. A span comes in exactly four shapes, held in a
//! closed sum type so every branch over the shape is compiler-checked:
//!
//! - *Bounded*: both endpoints finite, `start <= end`.
//! - *Unbounded start*: extends to negative infinity, finite end.
//! - *Unbounded end*: finite start, extends to positive infinity.
//! - *Timeless*: unbounded on both sides; matches any time and acts as the
//!   identity for "no constraint".
//!
//! A bounded span with `start == end` is *instantaneous*: it carries a
//! position but covers no time.
//!
//! Boundary semantics are strict half-open: `[100, 200)` neither overlaps
//! `[50, 100)` nor `[200, 250)`, but the two touching pairs each form a
//! contiguous range and may be unioned. An instantaneous span overlaps any
//! span containing its point.

use crate::err::{
    BackwardsSpanError, DisjointUnionError, NegativeDurationError, SpanError, SubdivisionError,
    TimeOverflowError, UnboundedSpanError,
};
use crate::time::{TimeDelta, TimePoint};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::fmt;

/// The four shapes a span can take. Kept private so the `start <= end`
/// invariant of the bounded shape cannot be broken from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Shape {
    Timeless,
    UnboundedStart { end: TimePoint },
    UnboundedEnd { start: TimePoint },
    Bounded { start: TimePoint, end: TimePoint },
}

/// An immutable half-open interval `[start, end)` on the millisecond
/// timeline.
///
/// Equality is structural and the total order compares starts, then ends,
/// with [`TimeSpan::TIMELESS`] as the least element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeSpan {
    shape: Shape,
}

/// Total, mutually exclusive classification of a span pair, for callers
/// needing richer information than the boolean queries.
///
/// Returned by [`TimeSpan::relation_to`]; read as `self <relation> other`
/// (e.g. `Superset` means `self` strictly contains `other`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanRelation {
    Equal,
    Superset,
    Subset,
    Before,
    After,
    BordersBefore,
    BordersAfter,
    OverlapsFrontEdge,
    OverlapsBackEdge,
}

/// Compares two start bounds; `None` is negative infinity.
#[inline]
fn cmp_starts(a: Option<TimePoint>, b: Option<TimePoint>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => x.cmp(&y),
    }
}

/// Compares two end bounds; `None` is positive infinity.
#[inline]
fn cmp_ends(a: Option<TimePoint>, b: Option<TimePoint>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => x.cmp(&y),
    }
}

impl TimeSpan {
    /// The span covering all of time; the identity for "no constraint".
    pub const TIMELESS: TimeSpan = TimeSpan {
        shape: Shape::Timeless,
    };

    /// The zero-width span at the epoch.
    pub const ZERO: TimeSpan = TimeSpan {
        shape: Shape::Bounded {
            start: TimePoint::new(0),
            end: TimePoint::new(0),
        },
    };

    /// Creates a bounded span `[start, end)`.
    ///
    /// Fails with [`BackwardsSpanError`] if `start > end`; the bounds are
    /// never silently swapped.
    #[inline]
    pub fn bounded(start: TimePoint, end: TimePoint) -> Result<Self, SpanError> {
        if start > end {
            return Err(BackwardsSpanError::new(start, end).into());
        }
        Ok(Self::bounded_unchecked(start, end))
    }

    /// Convenience form of [`bounded`](Self::bounded) taking raw
    /// epoch-millisecond values.
    #[inline]
    pub fn from_millis(start: i64, end: i64) -> Result<Self, SpanError> {
        Self::bounded(TimePoint::new(start), TimePoint::new(end))
    }

    /// The zero-width span at `at`.
    #[inline]
    pub fn instant(at: TimePoint) -> Self {
        Self::bounded_unchecked(at, at)
    }

    /// A span from negative infinity up to (excluding) `end`.
    #[inline]
    pub fn unbounded_start(end: TimePoint) -> Self {
        TimeSpan {
            shape: Shape::UnboundedStart { end },
        }
    }

    /// A span from `start` to positive infinity.
    #[inline]
    pub fn unbounded_end(start: TimePoint) -> Self {
        TimeSpan {
            shape: Shape::UnboundedEnd { start },
        }
    }

    /// A bounded span `[start, start + duration)`.
    ///
    /// Fails on a negative duration and on millisecond overflow; overflow
    /// is never wrapped or clamped.
    #[inline]
    pub fn from_start_duration(start: TimePoint, duration: TimeDelta) -> Result<Self, SpanError> {
        if duration.is_negative() {
            return Err(NegativeDurationError::new(duration).into());
        }
        let end = start
            .checked_add(duration)
            .ok_or_else(|| TimeOverflowError::new("from_start_duration"))?;
        Ok(Self::bounded_unchecked(start, end))
    }

    /// A bounded span `[end - duration, end)`.
    #[inline]
    pub fn from_duration_end(duration: TimeDelta, end: TimePoint) -> Result<Self, SpanError> {
        if duration.is_negative() {
            return Err(NegativeDurationError::new(duration).into());
        }
        let start = end
            .checked_sub(duration)
            .ok_or_else(|| TimeOverflowError::new("from_duration_end"))?;
        Ok(Self::bounded_unchecked(start, end))
    }

    /// A bounded span between two calendar timestamps.
    #[inline]
    pub fn from_dates(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, SpanError> {
        Self::bounded(TimePoint::from_datetime(start), TimePoint::from_datetime(end))
    }

    #[inline]
    fn bounded_unchecked(start: TimePoint, end: TimePoint) -> Self {
        debug_assert!(start <= end);
        TimeSpan {
            shape: Shape::Bounded { start, end },
        }
    }

    /// Rebuilds a span from optional bounds; `None` means unbounded on
    /// that side. Callers guarantee ordered bounds.
    #[inline]
    pub(crate) fn from_bounds(start: Option<TimePoint>, end: Option<TimePoint>) -> Self {
        match (start, end) {
            (None, None) => Self::TIMELESS,
            (None, Some(end)) => Self::unbounded_start(end),
            (Some(start), None) => Self::unbounded_end(start),
            (Some(start), Some(end)) => Self::bounded_unchecked(start, end),
        }
    }

    /// The start instant, `None` when the start is unbounded.
    #[inline]
    pub fn start(&self) -> Option<TimePoint> {
        match self.shape {
            Shape::Timeless | Shape::UnboundedStart { .. } => None,
            Shape::UnboundedEnd { start } | Shape::Bounded { start, .. } => Some(start),
        }
    }

    /// The end instant, `None` when the end is unbounded.
    #[inline]
    pub fn end(&self) -> Option<TimePoint> {
        match self.shape {
            Shape::Timeless | Shape::UnboundedEnd { .. } => None,
            Shape::UnboundedStart { end } | Shape::Bounded { end, .. } => Some(end),
        }
    }

    #[inline]
    pub fn is_timeless(&self) -> bool {
        matches!(self.shape, Shape::Timeless)
    }

    /// `true` when both endpoints are finite.
    #[inline]
    pub fn is_bounded(&self) -> bool {
        matches!(self.shape, Shape::Bounded { .. })
    }

    /// `true` when the span is zero-width (`start == end`, both finite).
    #[inline]
    pub fn is_instantaneous(&self) -> bool {
        matches!(self.shape, Shape::Bounded { start, end } if start == end)
    }

    /// `true` when the start side is unbounded (including timeless).
    #[inline]
    pub fn is_unbounded_start(&self) -> bool {
        self.start().is_none()
    }

    /// `true` when the end side is unbounded (including timeless).
    #[inline]
    pub fn is_unbounded_end(&self) -> bool {
        self.end().is_none()
    }

    /// `true` if the instant lies within `[start, end)`.
    #[inline]
    pub fn contains_point(&self, at: TimePoint) -> bool {
        let after_start = match self.start() {
            Some(start) => at >= start,
            None => true,
        };
        let before_end = match self.end() {
            Some(end) => at < end,
            None => true,
        };
        after_start && before_end
    }

    /// `true` iff `other` lies fully inside `[start, end)`:
    /// `other.start >= self.start && other.end <= self.end`.
    ///
    /// [`TIMELESS`](Self::TIMELESS) contains everything; nothing but
    /// `TIMELESS` contains `TIMELESS`.
    #[inline]
    pub fn contains(&self, other: &TimeSpan) -> bool {
        cmp_starts(other.start(), self.start()) != Ordering::Less
            && cmp_ends(other.end(), self.end()) != Ordering::Greater
    }

    /// `true` iff the half-open interiors intersect.
    ///
    /// Pure boundary touching does not count; an instantaneous span
    /// overlaps any span containing its point, and two instantaneous
    /// spans overlap only when equal.
    pub fn overlaps(&self, other: &TimeSpan) -> bool {
        match (self.is_instantaneous(), other.is_instantaneous()) {
            (true, true) => self == other,
            (true, false) => match self.start() {
                Some(at) => other.contains_point(at),
                None => false,
            },
            (false, true) => match other.start() {
                Some(at) => self.contains_point(at),
                None => false,
            },
            (false, false) => {
                let latest_start = match cmp_starts(self.start(), other.start()) {
                    Ordering::Less => other.start(),
                    _ => self.start(),
                };
                let earliest_end = match cmp_ends(self.end(), other.end()) {
                    Ordering::Greater => other.end(),
                    _ => self.end(),
                };
                match (latest_start, earliest_end) {
                    (Some(s), Some(e)) => s < e,
                    _ => true,
                }
            }
        }
    }

    /// `true` iff the spans overlap or touch at exactly one boundary.
    ///
    /// Strictly weaker than [`overlaps`](Self::overlaps); this is the
    /// predicate that licenses merging in [`union`](Self::union) and the
    /// canonical span sets.
    #[inline]
    pub fn forms_contiguous_range(&self, other: &TimeSpan) -> bool {
        if self.overlaps(other) {
            return true;
        }
        let touches_after = match (self.end(), other.start()) {
            (Some(e), Some(s)) => e == s,
            _ => false,
        };
        let touches_before = match (other.end(), self.start()) {
            (Some(e), Some(s)) => e == s,
            _ => false,
        };
        touches_after || touches_before
    }

    /// Classifies the pair into the nine-way [`SpanRelation`].
    pub fn relation_to(&self, other: &TimeSpan) -> SpanRelation {
        if self == other {
            return SpanRelation::Equal;
        }
        if self.contains(other) {
            return SpanRelation::Superset;
        }
        if other.contains(self) {
            return SpanRelation::Subset;
        }
        if let (Some(end), Some(start)) = (self.end(), other.start()) {
            if end == start {
                return SpanRelation::BordersBefore;
            }
            if end < start {
                return SpanRelation::Before;
            }
        }
        if let (Some(end), Some(start)) = (other.end(), self.start()) {
            if end == start {
                return SpanRelation::BordersAfter;
            }
            if end < start {
                return SpanRelation::After;
            }
        }
        // Only partial overlaps remain, and their starts differ strictly.
        if cmp_starts(self.start(), other.start()) == Ordering::Less {
            SpanRelation::OverlapsFrontEdge
        } else {
            SpanRelation::OverlapsBackEdge
        }
    }

    /// The minimal bounding span of two contiguous spans.
    ///
    /// Fails with [`DisjointUnionError`] if the spans neither overlap nor
    /// touch; the union of disjoint spans is ambiguous and is rejected
    /// rather than approximated.
    pub fn union(&self, other: &TimeSpan) -> Result<TimeSpan, DisjointUnionError> {
        if !self.forms_contiguous_range(other) {
            return Err(DisjointUnionError::new(*self, *other));
        }
        let start = match cmp_starts(self.start(), other.start()) {
            Ordering::Greater => other.start(),
            _ => self.start(),
        };
        let end = match cmp_ends(self.end(), other.end()) {
            Ordering::Less => other.end(),
            _ => self.end(),
        };
        Ok(Self::from_bounds(start, end))
    }

    /// The overlapping sub-span, or `None` when the spans share no
    /// coverage (touching spans are disjoint).
    ///
    /// When one span contains the other, the contained operand is returned
    /// as-is rather than reassembled.
    pub fn intersection(&self, other: &TimeSpan) -> Option<TimeSpan> {
        if self.contains(other) {
            return Some(*other);
        }
        if other.contains(self) {
            return Some(*self);
        }
        if !self.overlaps(other) {
            return None;
        }
        // Partial overlap: both the later start and the earlier end are
        // finite here, otherwise one span would contain the other.
        let start = match cmp_starts(self.start(), other.start()) {
            Ordering::Less => other.start(),
            _ => self.start(),
        };
        let end = match cmp_ends(self.end(), other.end()) {
            Ordering::Greater => other.end(),
            _ => self.end(),
        };
        Some(Self::from_bounds(start, end))
    }

    /// Removes the coverage of `other` from `self`, yielding zero, one or
    /// two spans: an interior subtraction splits into two pieces, a fully
    /// covering subtrahend yields nothing, and a disjoint or zero-width
    /// subtrahend leaves `self` untouched.
    pub fn subtract(&self, other: &TimeSpan) -> Vec<TimeSpan> {
        if other.is_instantaneous() || !self.overlaps(other) {
            return vec![*self];
        }
        let mut pieces = Vec::with_capacity(2);
        if cmp_starts(self.start(), other.start()) == Ordering::Less {
            // other.start is finite: nothing sorts below an unbounded start.
            pieces.push(Self::from_bounds(self.start(), other.start()));
        }
        if cmp_ends(other.end(), self.end()) == Ordering::Less {
            pieces.push(Self::from_bounds(other.end(), self.end()));
        }
        pieces
    }

    /// Removes the coverage of every span in `others` from `self`.
    pub fn subtract_all<'a, I>(&self, others: I) -> Vec<TimeSpan>
    where
        I: IntoIterator<Item = &'a TimeSpan>,
    {
        let mut pieces = vec![*self];
        for other in others {
            pieces = pieces
                .iter()
                .flat_map(|piece| piece.subtract(other))
                .collect();
            if pieces.is_empty() {
                break;
            }
        }
        pieces
    }

    /// The width of the span.
    ///
    /// Fails on any unbounded span (the duration is meaningless) and on
    /// millisecond overflow.
    pub fn duration(&self) -> Result<TimeDelta, SpanError> {
        match self.shape {
            Shape::Bounded { start, end } => end
                .checked_delta_since(start)
                .ok_or_else(|| TimeOverflowError::new("duration").into()),
            _ => Err(UnboundedSpanError::new("duration").into()),
        }
    }

    /// The width of the span in raw milliseconds.
    #[inline]
    pub fn duration_ms(&self) -> Result<i64, SpanError> {
        self.duration().map(TimeDelta::millis)
    }

    /// The instant halfway between the endpoints; bounded spans only.
    pub fn midpoint(&self) -> Result<TimePoint, SpanError> {
        match self.shape {
            Shape::Bounded { start, end } => Ok(start.midpoint_with(end)),
            _ => Err(UnboundedSpanError::new("midpoint").into()),
        }
    }

    /// The start as a calendar timestamp; fails on an unbounded start and
    /// on instants outside the calendar range.
    pub fn start_date(&self) -> Result<DateTime<Utc>, SpanError> {
        let start = self
            .start()
            .ok_or_else(|| UnboundedSpanError::new("start_date"))?;
        start
            .to_datetime()
            .ok_or_else(|| TimeOverflowError::new("start_date").into())
    }

    /// The end as a calendar timestamp; fails on an unbounded end and on
    /// instants outside the calendar range.
    pub fn end_date(&self) -> Result<DateTime<Utc>, SpanError> {
        let end = self
            .end()
            .ok_or_else(|| UnboundedSpanError::new("end_date"))?;
        end.to_datetime()
            .ok_or_else(|| TimeOverflowError::new("end_date").into())
    }

    /// Linear interpolation between `self` and `other`, endpoint by
    /// endpoint; `fraction` 0 yields `self`, 1 yields `other`.
    ///
    /// Both spans must be fully bounded; partial interpolation of
    /// unbounded spans is rejected rather than guessed.
    pub fn interpolate(&self, other: &TimeSpan, fraction: f64) -> Result<TimeSpan, SpanError> {
        let (Shape::Bounded { start: s0, end: e0 }, Shape::Bounded { start: s1, end: e1 }) =
            (self.shape, other.shape)
        else {
            return Err(UnboundedSpanError::new("interpolate").into());
        };
        let start = lerp_millis(s0.millis(), s1.millis(), fraction)?;
        let end = lerp_millis(e0.millis(), e1.millis(), fraction)?;
        Self::bounded(TimePoint::new(start), TimePoint::new(end))
    }

    /// Projects an instant into the closed range `[start, end]`,
    /// saturating at the boundary.
    pub fn clamp_point(&self, at: TimePoint) -> TimePoint {
        if let Some(start) = self.start() {
            if at < start {
                return start;
            }
        }
        if let Some(end) = self.end() {
            if at > end {
                return end;
            }
        }
        at
    }

    /// Projects a span into `[start, end]`, saturating each endpoint at
    /// the boundary; a disjoint operand collapses to an instantaneous
    /// span at the nearer boundary.
    pub fn clamp(&self, other: &TimeSpan) -> TimeSpan {
        let start = match other.start() {
            Some(at) => Some(self.clamp_point(at)),
            None => self.start(),
        };
        let end = match other.end() {
            Some(at) => Some(self.clamp_point(at)),
            None => self.end(),
        };
        Self::from_bounds(start, end)
    }

    /// Splits a bounded span into `pieces` contiguous sub-spans covering
    /// it exactly: equal-width except possibly the last, which absorbs
    /// the rounding remainder.
    ///
    /// Fails on `pieces < 2` and on unbounded spans.
    pub fn subdivide(&self, pieces: usize) -> Result<Vec<TimeSpan>, SpanError> {
        if pieces < 2 {
            return Err(SubdivisionError::new(pieces).into());
        }
        let Shape::Bounded { start, end } = self.shape else {
            return Err(UnboundedSpanError::new("subdivide").into());
        };
        let total = end
            .checked_delta_since(start)
            .ok_or_else(|| TimeOverflowError::new("subdivide"))?
            .millis();
        let width = total / pieces as i64;
        let mut out = Vec::with_capacity(pieces);
        for i in 0..pieces {
            let piece_start = TimePoint::new(start.millis() + width * i as i64);
            let piece_end = if i + 1 == pieces {
                end
            } else {
                TimePoint::new(start.millis() + width * (i as i64 + 1))
            };
            out.push(Self::bounded_unchecked(piece_start, piece_end));
        }
        Ok(out)
    }
}

/// Endpoint interpolation in f64 space, checked back into the millisecond
/// range.
fn lerp_millis(a: i64, b: i64, fraction: f64) -> Result<i64, SpanError> {
    let value = a as f64 + (b as f64 - a as f64) * fraction;
    if !value.is_finite() || value < i64::MIN as f64 || value > i64::MAX as f64 {
        return Err(TimeOverflowError::new("interpolate").into());
    }
    Ok(value.round() as i64)
}

impl Ord for TimeSpan {
    /// Total order: `TIMELESS` sorts before everything else; remaining
    /// spans compare by start (unbounded first), then end (unbounded
    /// last). For bounded spans `cmp` is `Equal` iff `==`.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_timeless(), other.is_timeless()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => cmp_starts(self.start(), other.start())
                .then_with(|| cmp_ends(self.end(), other.end())),
        }
    }
}

impl PartialOrd for TimeSpan {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.start() {
            Some(start) => write!(f, "[{}, ", start.millis())?,
            None => write!(f, "[-inf, ")?,
        }
        match self.end() {
            Some(end) => write!(f, "{})", end.millis()),
            None => write!(f, "+inf)"),
        }
    }
}
