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

//! # Temporal Index Structures
//!
//! Two complementary views over many time spans:
//!
//! - [`set::TimeSpanSet`] / [`set::TimeSpanList`]: coverage as a canonical
//!   list of disjoint, non-touching spans with set algebra.
//! - [`tree::BinaryTimeTree`]: a recursive index over provider items for
//!   sub-linear range and histogram counting.
//!
//! Both are single-writer structures; see the crate-level notes on each
//! type for snapshotting guidance.

pub mod err;
pub mod report;
pub mod set;
pub mod tree;

pub mod prelude {
    pub use crate::report::CountReport;
    pub use crate::set::{TimeSpanList, TimeSpanSet};
    pub use crate::tree::{BinaryTimeTree, TreeConfig};
    pub use tempora_core::extent::ExtentAccumulator;
    pub use tempora_core::provider::TimeSpanProvider;
    pub use tempora_core::span::{SpanRelation, TimeSpan};
    pub use tempora_core::time::{TimeDelta, TimePoint};
}
