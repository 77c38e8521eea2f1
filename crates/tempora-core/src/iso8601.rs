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

//! ISO-8601 interval text for [`TimeSpan`].
//!
//! The wire shapes, all in UTC with millisecond precision printed only
//! when non-zero:
//!
//! - `2020-01-01T00:00:00Z/2020-06-01T12:30:00.250Z`: bounded span
//! - `2020-01-01T00:00:00Z`: instantaneous span
//! - `UNBOUNDED/2020-01-01T00:00:00Z`: unbounded start (and mirrored)
//! - `TIMELESS`, `ZERO`: the two degenerate sentinels
//!
//! [`TimeSpan::from_iso8601`] is the exact inverse of
//! [`TimeSpan::to_iso8601`] and fails with a parse error, carrying the
//! offending text, on any other shape.

use crate::err::{Iso8601ParseError, SpanError, TimeOverflowError};
use crate::span::TimeSpan;
use crate::time::TimePoint;
use chrono::{DateTime, SecondsFormat, Utc};

const UNBOUNDED_TOKEN: &str = "UNBOUNDED";
const TIMELESS_TOKEN: &str = "TIMELESS";
const ZERO_TOKEN: &str = "ZERO";

impl TimeSpan {
    /// Renders the span as ISO-8601 interval text.
    ///
    /// Fails only when a finite endpoint lies outside the representable
    /// calendar range; nothing is clamped.
    pub fn to_iso8601(&self) -> Result<String, SpanError> {
        if self.is_timeless() {
            return Ok(TIMELESS_TOKEN.to_owned());
        }
        if *self == TimeSpan::ZERO {
            return Ok(ZERO_TOKEN.to_owned());
        }
        if self.is_instantaneous() {
            if let Some(at) = self.start() {
                return format_instant(at);
            }
        }
        let start = match self.start() {
            Some(at) => format_instant(at)?,
            None => UNBOUNDED_TOKEN.to_owned(),
        };
        let end = match self.end() {
            Some(at) => format_instant(at)?,
            None => UNBOUNDED_TOKEN.to_owned(),
        };
        Ok(format!("{start}/{end}"))
    }

    /// Parses ISO-8601 interval text produced by
    /// [`to_iso8601`](Self::to_iso8601).
    ///
    /// A bare instant parses to the instantaneous span; everything else
    /// must be one of the documented shapes.
    pub fn from_iso8601(text: &str) -> Result<TimeSpan, Iso8601ParseError> {
        match text {
            TIMELESS_TOKEN => return Ok(TimeSpan::TIMELESS),
            ZERO_TOKEN => return Ok(TimeSpan::ZERO),
            _ => {}
        }
        let Some((left, right)) = text.split_once('/') else {
            let at = parse_instant(text, text)?;
            return Ok(TimeSpan::instant(at));
        };
        let start = parse_endpoint(left, text)?;
        let end = parse_endpoint(right, text)?;
        match (start, end) {
            (None, None) => Err(Iso8601ParseError::new(
                text,
                "unbounded on both sides; expected TIMELESS",
            )),
            (None, Some(end)) => Ok(TimeSpan::unbounded_start(end)),
            (Some(start), None) => Ok(TimeSpan::unbounded_end(start)),
            (Some(start), Some(end)) => TimeSpan::bounded(start, end)
                .map_err(|_| Iso8601ParseError::new(text, "interval start is after its end")),
        }
    }
}

fn format_instant(at: TimePoint) -> Result<String, SpanError> {
    let dt = at
        .to_datetime()
        .ok_or_else(|| TimeOverflowError::new("to_iso8601"))?;
    Ok(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

fn parse_endpoint(part: &str, whole: &str) -> Result<Option<TimePoint>, Iso8601ParseError> {
    if part == UNBOUNDED_TOKEN {
        return Ok(None);
    }
    parse_instant(part, whole).map(Some)
}

fn parse_instant(part: &str, whole: &str) -> Result<TimePoint, Iso8601ParseError> {
    let dt = DateTime::parse_from_rfc3339(part)
        .map_err(|_| Iso8601ParseError::new(whole, "invalid ISO-8601 instant"))?;
    Ok(TimePoint::from_datetime(dt.with_timezone(&Utc)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sp(a: i64, b: i64) -> TimeSpan {
        TimeSpan::from_millis(a, b).unwrap()
    }

    #[test]
    fn emits_bounded_interval_text() {
        let s = sp(0, 86_400_000);
        assert_eq!(
            s.to_iso8601().unwrap(),
            "1970-01-01T00:00:00Z/1970-01-02T00:00:00Z"
        );
    }

    #[test]
    fn emits_millis_only_when_non_zero() {
        let s = sp(250, 1_250);
        assert_eq!(
            s.to_iso8601().unwrap(),
            "1970-01-01T00:00:00.250Z/1970-01-01T00:00:01.250Z"
        );
    }

    #[test]
    fn emits_sentinels_and_instants() {
        assert_eq!(TimeSpan::TIMELESS.to_iso8601().unwrap(), "TIMELESS");
        assert_eq!(TimeSpan::ZERO.to_iso8601().unwrap(), "ZERO");
        assert_eq!(
            TimeSpan::instant(TimePoint::new(1_000)).to_iso8601().unwrap(),
            "1970-01-01T00:00:01Z"
        );
        assert_eq!(
            TimeSpan::unbounded_start(TimePoint::new(0)).to_iso8601().unwrap(),
            "UNBOUNDED/1970-01-01T00:00:00Z"
        );
        assert_eq!(
            TimeSpan::unbounded_end(TimePoint::new(0)).to_iso8601().unwrap(),
            "1970-01-01T00:00:00Z/UNBOUNDED"
        );
    }

    #[test]
    fn round_trips_every_shape() {
        let cases = [
            sp(0, 1),
            sp(-1_500, 2_500),
            sp(1_577_836_800_000, 1_609_459_200_000),
            TimeSpan::instant(TimePoint::new(123)),
            TimeSpan::ZERO,
            TimeSpan::TIMELESS,
            TimeSpan::unbounded_start(TimePoint::new(42)),
            TimeSpan::unbounded_end(TimePoint::new(-42)),
        ];
        for span in &cases {
            let text = span.to_iso8601().unwrap();
            let parsed = TimeSpan::from_iso8601(&text).unwrap();
            assert_eq!(parsed, *span, "round trip failed for {text}");
        }
    }

    #[test]
    fn bare_instant_parses_to_instantaneous_span() {
        let parsed = TimeSpan::from_iso8601("1970-01-01T00:00:01Z").unwrap();
        assert_eq!(parsed, TimeSpan::instant(TimePoint::new(1_000)));
    }

    #[test]
    fn parse_errors_carry_the_offending_text() {
        let err = TimeSpan::from_iso8601("not a span").unwrap_err();
        assert_eq!(err.input(), "not a span");

        let err = TimeSpan::from_iso8601("UNBOUNDED/UNBOUNDED").unwrap_err();
        assert_eq!(err.input(), "UNBOUNDED/UNBOUNDED");

        let err =
            TimeSpan::from_iso8601("1970-01-02T00:00:00Z/1970-01-01T00:00:00Z").unwrap_err();
        assert_eq!(err.reason(), "interval start is after its end");
    }

    #[test]
    fn rejects_malformed_interval_shapes() {
        assert!(TimeSpan::from_iso8601("").is_err());
        assert!(TimeSpan::from_iso8601("timeless").is_err());
        assert!(TimeSpan::from_iso8601("1970-01-01T00:00:00Z/").is_err());
        assert!(TimeSpan::from_iso8601("/1970-01-01T00:00:00Z").is_err());
        assert!(
            TimeSpan::from_iso8601("1970-01-01T00:00:00Z/1970-01-02T00:00:00Z/extra").is_err()
        );
    }

    #[test]
    fn far_out_instants_fail_to_render() {
        let s = TimeSpan::instant(TimePoint::MAX);
        assert!(matches!(s.to_iso8601().unwrap_err(), SpanError::Overflow(_)));
    }
}
