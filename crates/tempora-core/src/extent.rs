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

//! Streaming computation of the bounding span of many spans.

use crate::span::TimeSpan;
use crate::time::TimePoint;

/// A monotone fold over spans yielding their extent: the smallest span
/// that bounds every span added so far.
///
/// The running start tracks the minimum seen start and degrades to
/// unbounded the first time an unbounded-start span is folded in, staying
/// unbounded thereafter; the end side mirrors this. Spans are never
/// "un-added".
///
/// This is the cheap alternative to building a full index when only the
/// bounding span of a collection is needed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtentAccumulator {
    min_start: Option<TimePoint>,
    max_end: Option<TimePoint>,
    unbounded_start: bool,
    unbounded_end: bool,
    seen: bool,
}

impl ExtentAccumulator {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one more span into the running extent.
    pub fn add(&mut self, span: &TimeSpan) {
        self.seen = true;
        match span.start() {
            Some(start) => {
                self.min_start = Some(match self.min_start {
                    Some(current) => current.min(start),
                    None => start,
                });
            }
            None => self.unbounded_start = true,
        }
        match span.end() {
            Some(end) => {
                self.max_end = Some(match self.max_end {
                    Some(current) => current.max(end),
                    None => end,
                });
            }
            None => self.unbounded_end = true,
        }
    }

    /// `true` if nothing has been folded in yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !self.seen
    }

    /// Synthesizes the current extent.
    ///
    /// An accumulator that has seen nothing yields [`TimeSpan::ZERO`];
    /// once both sides have seen an unbounded input the extent is
    /// [`TimeSpan::TIMELESS`].
    pub fn extent(&self) -> TimeSpan {
        if !self.seen {
            return TimeSpan::ZERO;
        }
        let start = if self.unbounded_start {
            None
        } else {
            self.min_start
        };
        let end = if self.unbounded_end {
            None
        } else {
            self.max_end
        };
        TimeSpan::from_bounds(start, end)
    }
}

impl Extend<TimeSpan> for ExtentAccumulator {
    fn extend<I: IntoIterator<Item = TimeSpan>>(&mut self, iter: I) {
        for span in iter {
            self.add(&span);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sp(a: i64, b: i64) -> TimeSpan {
        TimeSpan::from_millis(a, b).unwrap()
    }

    #[test]
    fn empty_accumulator_yields_zero() {
        let acc = ExtentAccumulator::new();
        assert!(acc.is_empty());
        assert_eq!(acc.extent(), TimeSpan::ZERO);
    }

    #[test]
    fn tracks_min_start_and_max_end() {
        let mut acc = ExtentAccumulator::new();
        acc.add(&sp(50, 100));
        acc.add(&sp(60, 70));
        acc.add(&sp(49, 50));
        assert_eq!(acc.extent(), sp(49, 100));
    }

    #[test]
    fn unbounded_inputs_are_sticky() {
        let mut acc = ExtentAccumulator::new();
        acc.add(&sp(50, 100));
        acc.add(&TimeSpan::unbounded_start(TimePoint::new(60)));
        assert_eq!(
            acc.extent(),
            TimeSpan::unbounded_start(TimePoint::new(100))
        );
        // A later bounded span cannot win the start side back.
        acc.add(&sp(0, 10));
        assert_eq!(
            acc.extent(),
            TimeSpan::unbounded_start(TimePoint::new(100))
        );
        acc.add(&TimeSpan::unbounded_end(TimePoint::new(0)));
        assert!(acc.extent().is_timeless());
    }

    #[test]
    fn single_instant_has_zero_width_extent() {
        let mut acc = ExtentAccumulator::new();
        acc.add(&TimeSpan::instant(TimePoint::new(7)));
        assert_eq!(acc.extent(), sp(7, 7));
    }

    #[test]
    fn extend_folds_an_iterator() {
        let mut acc = ExtentAccumulator::new();
        acc.extend([sp(10, 20), sp(0, 5), sp(18, 25)]);
        assert_eq!(acc.extent(), sp(0, 25));
    }
}
