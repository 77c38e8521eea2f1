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

//! # Millisecond Timeline Primitives
//!
//! The timeline is the signed 64-bit millisecond axis anchored at the Unix
//! epoch. Two newtypes keep the arithmetic honest:
//!
//! - [`TimePoint`]: a specific instant on the timeline.
//! - [`TimeDelta`]: a duration, the difference between two instants.
//!
//! The distinct newtypes enforce correctness at compile time: two
//! `TimePoint`s cannot be added, a `TimePoint` minus a `TimePoint` yields a
//! `TimeDelta`, and so on. Operator impls use checked arithmetic and panic
//! with a descriptive message on overflow; the `checked_*` and
//! `saturating_*` methods are the non-panicking alternatives.

use chrono::{DateTime, Utc};
use num_traits::{CheckedAdd, CheckedSub, SaturatingAdd, SaturatingSub, Zero};
use std::fmt::Display;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// An instant on the millisecond timeline.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimePoint(i64);

/// A signed duration in milliseconds.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeDelta(i64);

impl TimePoint {
    /// The earliest representable instant.
    pub const MIN: TimePoint = TimePoint(i64::MIN);

    /// The latest representable instant.
    pub const MAX: TimePoint = TimePoint(i64::MAX);

    #[inline]
    pub const fn new(millis: i64) -> Self {
        TimePoint(millis)
    }

    /// The Unix epoch, `1970-01-01T00:00:00Z`.
    #[inline]
    pub const fn epoch() -> Self {
        TimePoint(0)
    }

    /// Milliseconds since the Unix epoch.
    #[inline]
    pub const fn millis(self) -> i64 {
        self.0
    }

    #[inline]
    pub fn checked_add(self, delta: TimeDelta) -> Option<Self> {
        self.0.checked_add(delta.0).map(TimePoint)
    }

    #[inline]
    pub fn checked_sub(self, delta: TimeDelta) -> Option<Self> {
        self.0.checked_sub(delta.0).map(TimePoint)
    }

    #[inline]
    pub fn saturating_add(self, delta: TimeDelta) -> Self {
        TimePoint(self.0.saturating_add(delta.0))
    }

    #[inline]
    pub fn saturating_sub(self, delta: TimeDelta) -> Self {
        TimePoint(self.0.saturating_sub(delta.0))
    }

    /// Signed distance from `origin` to `self`, `None` on overflow.
    #[inline]
    pub fn checked_delta_since(self, origin: TimePoint) -> Option<TimeDelta> {
        self.0.checked_sub(origin.0).map(TimeDelta)
    }

    /// The instant halfway between `self` and `other`, rounded toward
    /// negative infinity. Never overflows.
    #[inline]
    pub fn midpoint_with(self, other: TimePoint) -> TimePoint {
        let sum = self.0 as i128 + other.0 as i128;
        TimePoint(sum.div_euclid(2) as i64)
    }

    /// Converts the instant into a calendar timestamp.
    ///
    /// Returns `None` for instants outside chrono's representable range.
    #[inline]
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(self.0)
    }

    #[inline]
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        TimePoint(dt.timestamp_millis())
    }
}

impl TimeDelta {
    pub const MAX: TimeDelta = TimeDelta(i64::MAX);

    #[inline]
    pub const fn new(millis: i64) -> Self {
        TimeDelta(millis)
    }

    #[inline]
    pub const fn millis(self) -> i64 {
        self.0
    }

    #[inline]
    pub fn abs(self) -> Self {
        TimeDelta(self.0.abs())
    }

    #[inline]
    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub fn checked_add(self, rhs: TimeDelta) -> Option<Self> {
        self.0.checked_add(rhs.0).map(TimeDelta)
    }

    #[inline]
    pub fn checked_sub(self, rhs: TimeDelta) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(TimeDelta)
    }

    #[inline]
    pub fn saturating_add(self, rhs: TimeDelta) -> Self {
        TimeDelta(self.0.saturating_add(rhs.0))
    }

    #[inline]
    pub fn saturating_sub(self, rhs: TimeDelta) -> Self {
        TimeDelta(self.0.saturating_sub(rhs.0))
    }

    #[inline]
    pub fn checked_mul(self, rhs: i64) -> Option<Self> {
        self.0.checked_mul(rhs).map(TimeDelta)
    }

    #[inline]
    pub fn checked_div(self, rhs: i64) -> Option<Self> {
        self.0.checked_div(rhs).map(TimeDelta)
    }
}

impl Display for TimePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TimePoint({})", self.0)
    }
}

impl Display for TimeDelta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TimeDelta({})", self.0)
    }
}

impl From<i64> for TimePoint {
    #[inline]
    fn from(v: i64) -> Self {
        TimePoint(v)
    }
}

impl From<i64> for TimeDelta {
    #[inline]
    fn from(v: i64) -> Self {
        TimeDelta(v)
    }
}

impl Add<TimeDelta> for TimePoint {
    type Output = TimePoint;

    #[inline]
    fn add(self, rhs: TimeDelta) -> Self::Output {
        TimePoint(
            self.0
                .checked_add(rhs.0)
                .expect("overflow in TimePoint + TimeDelta"),
        )
    }
}

impl Add<TimePoint> for TimeDelta {
    type Output = TimePoint;

    #[inline]
    fn add(self, rhs: TimePoint) -> Self::Output {
        TimePoint(
            rhs.0
                .checked_add(self.0)
                .expect("overflow in TimeDelta + TimePoint"),
        )
    }
}

impl AddAssign<TimeDelta> for TimePoint {
    fn add_assign(&mut self, rhs: TimeDelta) {
        self.0 = self
            .0
            .checked_add(rhs.0)
            .expect("overflow in TimePoint += TimeDelta");
    }
}

impl Sub<TimeDelta> for TimePoint {
    type Output = TimePoint;

    fn sub(self, rhs: TimeDelta) -> Self::Output {
        TimePoint(
            self.0
                .checked_sub(rhs.0)
                .expect("underflow in TimePoint - TimeDelta"),
        )
    }
}

impl SubAssign<TimeDelta> for TimePoint {
    fn sub_assign(&mut self, rhs: TimeDelta) {
        self.0 = self
            .0
            .checked_sub(rhs.0)
            .expect("underflow in TimePoint -= TimeDelta");
    }
}

impl Sub<TimePoint> for TimePoint {
    type Output = TimeDelta;

    fn sub(self, rhs: TimePoint) -> Self::Output {
        TimeDelta(
            self.0
                .checked_sub(rhs.0)
                .expect("underflow in TimePoint - TimePoint"),
        )
    }
}

impl Add for TimeDelta {
    type Output = TimeDelta;

    fn add(self, rhs: Self) -> Self::Output {
        TimeDelta(
            self.0
                .checked_add(rhs.0)
                .expect("overflow in TimeDelta + TimeDelta"),
        )
    }
}

impl Sub for TimeDelta {
    type Output = TimeDelta;

    fn sub(self, rhs: Self) -> Self::Output {
        TimeDelta(
            self.0
                .checked_sub(rhs.0)
                .expect("underflow in TimeDelta - TimeDelta"),
        )
    }
}

impl AddAssign for TimeDelta {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self
            .0
            .checked_add(rhs.0)
            .expect("overflow in TimeDelta += TimeDelta");
    }
}

impl SubAssign for TimeDelta {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 = self
            .0
            .checked_sub(rhs.0)
            .expect("underflow in TimeDelta -= TimeDelta");
    }
}

impl Neg for TimeDelta {
    type Output = TimeDelta;

    fn neg(self) -> Self::Output {
        TimeDelta(self.0.checked_neg().expect("underflow in -TimeDelta"))
    }
}

impl Mul<i64> for TimeDelta {
    type Output = TimeDelta;

    fn mul(self, rhs: i64) -> Self::Output {
        TimeDelta(
            self.0
                .checked_mul(rhs)
                .expect("overflow in TimeDelta * scalar"),
        )
    }
}

impl MulAssign<i64> for TimeDelta {
    fn mul_assign(&mut self, rhs: i64) {
        self.0 = self
            .0
            .checked_mul(rhs)
            .expect("overflow in TimeDelta *= scalar");
    }
}

impl Div<i64> for TimeDelta {
    type Output = TimeDelta;

    fn div(self, rhs: i64) -> Self::Output {
        TimeDelta(
            self.0
                .checked_div(rhs)
                .expect("div-by-zero or overflow in TimeDelta / scalar"),
        )
    }
}

impl DivAssign<i64> for TimeDelta {
    fn div_assign(&mut self, rhs: i64) {
        self.0 = self
            .0
            .checked_div(rhs)
            .expect("div-by-zero or overflow in TimeDelta /= scalar");
    }
}

impl Zero for TimeDelta {
    #[inline]
    fn zero() -> Self {
        TimeDelta(0)
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl CheckedAdd for TimeDelta {
    fn checked_add(&self, rhs: &Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(TimeDelta)
    }
}

impl CheckedSub for TimeDelta {
    fn checked_sub(&self, rhs: &Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(TimeDelta)
    }
}

impl SaturatingAdd for TimeDelta {
    fn saturating_add(&self, rhs: &Self) -> Self {
        TimeDelta(self.0.saturating_add(rhs.0))
    }
}

impl SaturatingSub for TimeDelta {
    fn saturating_sub(&self, rhs: &Self) -> Self {
        TimeDelta(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for TimeDelta {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a TimeDelta> for TimeDelta {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, x| acc + *x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_time_point_creation() {
        let tp = TimePoint::new(42);
        assert_eq!(tp.millis(), 42);
        assert_eq!(TimePoint::epoch().millis(), 0);
    }

    #[test]
    fn test_time_point_display() {
        assert_eq!(format!("{}", TimePoint::new(42)), "TimePoint(42)");
        assert_eq!(format!("{}", TimeDelta::new(-10)), "TimeDelta(-10)");
    }

    #[test]
    fn test_timepoint_add_sub_timedelta() {
        let tp = TimePoint::new(10);
        assert_eq!(tp + TimeDelta::new(5), TimePoint::new(15));
        assert_eq!(tp - TimeDelta::new(5), TimePoint::new(5));
        assert_eq!(TimeDelta::new(5) + tp, TimePoint::new(15));
    }

    #[test]
    fn test_timepoint_sub_timepoint() {
        assert_eq!(
            TimePoint::new(20) - TimePoint::new(10),
            TimeDelta::new(10)
        );
        assert_eq!(
            TimePoint::new(10) - TimePoint::new(20),
            TimeDelta::new(-10)
        );
    }

    #[test]
    fn test_timedelta_arithmetic() {
        let d = TimeDelta::new(10);
        assert_eq!(d + TimeDelta::new(5), TimeDelta::new(15));
        assert_eq!(d - TimeDelta::new(5), TimeDelta::new(5));
        assert_eq!(d * 3, TimeDelta::new(30));
        assert_eq!(d / 2, TimeDelta::new(5));
        assert_eq!(-d, TimeDelta::new(-10));
        assert_eq!(TimeDelta::new(-7).abs(), TimeDelta::new(7));
    }

    #[test]
    fn test_timedelta_predicates() {
        assert!(TimeDelta::new(-1).is_negative());
        assert!(TimeDelta::new(1).is_positive());
        assert!(TimeDelta::zero().is_zero());
    }

    #[test]
    fn test_checked_add_overflow() {
        let tp = TimePoint::new(i64::MAX);
        assert_eq!(tp.checked_add(TimeDelta::new(1)), None);
        assert_eq!(tp.checked_add(TimeDelta::new(0)), Some(tp));
    }

    #[test]
    fn test_checked_sub_underflow() {
        let tp = TimePoint::new(i64::MIN);
        assert_eq!(tp.checked_sub(TimeDelta::new(1)), None);
    }

    #[test]
    fn test_saturating_ops() {
        let tp = TimePoint::new(i64::MAX - 1);
        assert_eq!(tp.saturating_add(TimeDelta::new(5)), TimePoint::MAX);
        let tp = TimePoint::new(i64::MIN + 1);
        assert_eq!(tp.saturating_sub(TimeDelta::new(5)), TimePoint::MIN);
    }

    #[test]
    fn test_checked_delta_since() {
        let a = TimePoint::new(100);
        let b = TimePoint::new(40);
        assert_eq!(a.checked_delta_since(b), Some(TimeDelta::new(60)));
        assert_eq!(TimePoint::MAX.checked_delta_since(TimePoint::MIN), None);
    }

    #[test]
    fn test_midpoint_with_never_overflows() {
        let a = TimePoint::new(i64::MAX - 2);
        let b = TimePoint::new(i64::MAX);
        assert_eq!(a.midpoint_with(b), TimePoint::new(i64::MAX - 1));
        assert_eq!(
            TimePoint::new(2).midpoint_with(TimePoint::new(6)),
            TimePoint::new(4)
        );
        assert_eq!(
            TimePoint::new(-3).midpoint_with(TimePoint::new(0)),
            TimePoint::new(-2)
        );
    }

    #[test]
    #[should_panic(expected = "overflow in TimePoint + TimeDelta")]
    fn test_timepoint_add_panic_on_overflow() {
        let _ = TimePoint::new(i64::MAX) + TimeDelta::new(1);
    }

    #[test]
    #[should_panic(expected = "underflow in TimeDelta - TimeDelta")]
    fn test_timedelta_sub_panic_on_underflow() {
        let _ = TimeDelta::new(i64::MIN) - TimeDelta::new(1);
    }

    #[test]
    fn test_timedelta_sum() {
        let total: TimeDelta = [TimeDelta::new(1), TimeDelta::new(2), TimeDelta::new(3)]
            .iter()
            .sum();
        assert_eq!(total, TimeDelta::new(6));
    }

    #[test]
    fn test_datetime_round_trip() {
        let dt = Utc.with_ymd_and_hms(2020, 6, 1, 12, 30, 0).unwrap();
        let tp = TimePoint::from_datetime(dt);
        assert_eq!(tp.to_datetime(), Some(dt));
    }
}
