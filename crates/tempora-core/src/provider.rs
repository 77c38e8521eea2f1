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

//! The capability an entity exposes so it can be time-indexed.

use crate::span::TimeSpan;
use std::rc::Rc;
use std::sync::Arc;

/// Exposes the [`TimeSpan`] associated with a caller-owned entity.
///
/// An index holds only this capability, never the entity's other data;
/// implement it on whatever handle type (reference, `Rc`, id wrapper)
/// the caller wants the index to retain.
pub trait TimeSpanProvider {
    fn time_span(&self) -> TimeSpan;
}

impl TimeSpanProvider for TimeSpan {
    #[inline]
    fn time_span(&self) -> TimeSpan {
        *self
    }
}

impl<T: TimeSpanProvider + ?Sized> TimeSpanProvider for &T {
    #[inline]
    fn time_span(&self) -> TimeSpan {
        (**self).time_span()
    }
}

impl<T: TimeSpanProvider + ?Sized> TimeSpanProvider for Box<T> {
    #[inline]
    fn time_span(&self) -> TimeSpan {
        (**self).time_span()
    }
}

impl<T: TimeSpanProvider + ?Sized> TimeSpanProvider for Rc<T> {
    #[inline]
    fn time_span(&self) -> TimeSpan {
        (**self).time_span()
    }
}

impl<T: TimeSpanProvider + ?Sized> TimeSpanProvider for Arc<T> {
    #[inline]
    fn time_span(&self) -> TimeSpan {
        (**self).time_span()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::TimePoint;

    struct Layer {
        name: &'static str,
        coverage: TimeSpan,
    }

    impl TimeSpanProvider for Layer {
        fn time_span(&self) -> TimeSpan {
            self.coverage
        }
    }

    #[test]
    fn handles_forward_to_the_entity() {
        let layer = Layer {
            name: "imagery",
            coverage: TimeSpan::from_millis(0, 100).unwrap(),
        };
        assert_eq!(layer.name, "imagery");
        assert_eq!((&layer).time_span(), layer.coverage);
        assert_eq!(Rc::new(&layer).time_span(), layer.coverage);
        assert_eq!(
            Box::new(TimeSpan::instant(TimePoint::new(5))).time_span(),
            TimeSpan::instant(TimePoint::new(5))
        );
    }
}
