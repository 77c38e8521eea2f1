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

//! Error types for span construction and span arithmetic.
//!
//! All failures here are hard, synchronous failures surfaced to the caller;
//! nothing is retried, coerced, or silently approximated.

use crate::span::TimeSpan;
use crate::time::{TimeDelta, TimePoint};
use std::fmt::Display;

/// A bounded span was requested with `start > end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BackwardsSpanError {
    start: TimePoint,
    end: TimePoint,
}

impl BackwardsSpanError {
    #[inline]
    pub fn new(start: TimePoint, end: TimePoint) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn start(&self) -> TimePoint {
        self.start
    }

    #[inline]
    pub fn end(&self) -> TimePoint {
        self.end
    }
}

impl Display for BackwardsSpanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Span start {} is after its end {}",
            self.start, self.end
        )
    }
}

impl std::error::Error for BackwardsSpanError {}

/// A duration-based factory was handed a negative duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NegativeDurationError {
    duration: TimeDelta,
}

impl NegativeDurationError {
    #[inline]
    pub fn new(duration: TimeDelta) -> Self {
        Self { duration }
    }

    #[inline]
    pub fn duration(&self) -> TimeDelta {
        self.duration
    }
}

impl Display for NegativeDurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Negative duration {} for span factory", self.duration)
    }
}

impl std::error::Error for NegativeDurationError {}

/// Millisecond arithmetic left the representable i64 range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeOverflowError {
    op: &'static str,
}

impl TimeOverflowError {
    #[inline]
    pub fn new(op: &'static str) -> Self {
        Self { op }
    }

    #[inline]
    pub fn op(&self) -> &'static str {
        self.op
    }
}

impl Display for TimeOverflowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Millisecond overflow in {}", self.op)
    }
}

impl std::error::Error for TimeOverflowError {}

/// A finite result was requested from a span with an unbounded side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnboundedSpanError {
    op: &'static str,
}

impl UnboundedSpanError {
    #[inline]
    pub fn new(op: &'static str) -> Self {
        Self { op }
    }

    #[inline]
    pub fn op(&self) -> &'static str {
        self.op
    }
}

impl Display for UnboundedSpanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Operation {} is unsupported on an unbounded span", self.op)
    }
}

impl std::error::Error for UnboundedSpanError {}

/// Union of two spans that neither overlap nor touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisjointUnionError {
    a: TimeSpan,
    b: TimeSpan,
}

impl DisjointUnionError {
    #[inline]
    pub fn new(a: TimeSpan, b: TimeSpan) -> Self {
        Self { a, b }
    }

    #[inline]
    pub fn left(&self) -> TimeSpan {
        self.a
    }

    #[inline]
    pub fn right(&self) -> TimeSpan {
        self.b
    }
}

impl Display for DisjointUnionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cannot union disjoint spans {} and {}; they neither overlap nor touch",
            self.a, self.b
        )
    }
}

impl std::error::Error for DisjointUnionError {}

/// A subdivision into fewer than two pieces was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubdivisionError {
    pieces: usize,
}

impl SubdivisionError {
    #[inline]
    pub fn new(pieces: usize) -> Self {
        Self { pieces }
    }

    #[inline]
    pub fn pieces(&self) -> usize {
        self.pieces
    }
}

impl Display for SubdivisionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cannot subdivide a span into {} pieces; at least 2 are required",
            self.pieces
        )
    }
}

impl std::error::Error for SubdivisionError {}

/// ISO-8601 interval text that does not parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Iso8601ParseError {
    input: String,
    reason: &'static str,
}

impl Iso8601ParseError {
    #[inline]
    pub fn new(input: impl Into<String>, reason: &'static str) -> Self {
        Self {
            input: input.into(),
            reason,
        }
    }

    #[inline]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[inline]
    pub fn reason(&self) -> &'static str {
        self.reason
    }
}

impl Display for Iso8601ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Malformed ISO-8601 interval text {:?}: {}",
            self.input, self.reason
        )
    }
}

impl std::error::Error for Iso8601ParseError {}

/// Aggregate error for the span factories and span arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanError {
    Backwards(BackwardsSpanError),
    NegativeDuration(NegativeDurationError),
    Overflow(TimeOverflowError),
    Unbounded(UnboundedSpanError),
    Subdivision(SubdivisionError),
}

impl Display for SpanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpanError::Backwards(e) => write!(f, "{e}"),
            SpanError::NegativeDuration(e) => write!(f, "{e}"),
            SpanError::Overflow(e) => write!(f, "{e}"),
            SpanError::Unbounded(e) => write!(f, "{e}"),
            SpanError::Subdivision(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SpanError {}

impl From<BackwardsSpanError> for SpanError {
    #[inline]
    fn from(e: BackwardsSpanError) -> Self {
        SpanError::Backwards(e)
    }
}

impl From<NegativeDurationError> for SpanError {
    #[inline]
    fn from(e: NegativeDurationError) -> Self {
        SpanError::NegativeDuration(e)
    }
}

impl From<TimeOverflowError> for SpanError {
    #[inline]
    fn from(e: TimeOverflowError) -> Self {
        SpanError::Overflow(e)
    }
}

impl From<UnboundedSpanError> for SpanError {
    #[inline]
    fn from(e: UnboundedSpanError) -> Self {
        SpanError::Unbounded(e)
    }
}

impl From<SubdivisionError> for SpanError {
    #[inline]
    fn from(e: SubdivisionError) -> Self {
        SpanError::Subdivision(e)
    }
}
