use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};

/// Time duration with sub-millisecond precision (stored as fractional seconds).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Duration {
    /// Duration in seconds.
    seconds: f64,
}

impl Duration {
    /// Create a duration from seconds. Negative and non-finite inputs clamp
    /// to zero.
    pub fn from_seconds(s: f64) -> Self {
        Self {
            seconds: if s.is_finite() { s.max(0.0) } else { 0.0 },
        }
    }

    /// Create a duration from milliseconds.
    pub fn from_millis(ms: f64) -> Self {
        Self::from_seconds(ms / 1000.0)
    }

    /// Create a zero duration.
    pub fn zero() -> Self {
        Self { seconds: 0.0 }
    }

    /// Get duration as seconds.
    pub fn as_seconds(&self) -> f64 {
        self.seconds
    }

    pub fn is_zero(&self) -> bool {
        self.seconds <= 0.0
    }

    /// Number of whole frames nearest to this duration at `fps`.
    pub fn frame_count(&self, fps: f64) -> u64 {
        (self.seconds * fps).round() as u64
    }

    /// Number of audio samples (per channel) nearest to this duration.
    pub fn sample_count(&self, sample_rate: u32) -> usize {
        (self.seconds * sample_rate as f64).round() as usize
    }
}

impl Default for Duration {
    fn default() -> Self {
        Duration::zero()
    }
}

impl Add for Duration {
    type Output = Duration;
    fn add(self, rhs: Duration) -> Duration {
        Duration::from_seconds(self.seconds + rhs.seconds)
    }
}

impl Sub for Duration {
    type Output = Duration;
    fn sub(self, rhs: Duration) -> Duration {
        Duration::from_seconds(self.seconds - rhs.seconds)
    }
}

impl Sum for Duration {
    fn sum<I: Iterator<Item = Duration>>(iter: I) -> Self {
        iter.fold(Duration::zero(), |acc, d| acc + d)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.seconds < 1.0 {
            write!(f, "{:.0}ms", self.seconds * 1000.0)
        } else {
            write!(f, "{:.2}s", self.seconds)
        }
    }
}

/// The half-open range of output frames a clip occupies on the timeline.
///
/// Boundaries are rounded on the cumulative timeline rather than per clip, so
/// rounding error never accumulates: the frame total of a whole timeline is
/// always `round(total_seconds * fps)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSpan {
    pub start: u64,
    pub end: u64,
}

impl FrameSpan {
    /// Span for a clip starting at `offset` and lasting `duration`.
    pub fn at(offset: Duration, duration: Duration, fps: f64) -> Self {
        let start = offset.frame_count(fps);
        let end = (offset + duration).frame_count(fps);
        Self { start, end }
    }

    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_from_seconds() {
        let d = Duration::from_seconds(2.5);
        assert!((d.as_seconds() - 2.5).abs() < 1e-9);
        assert!(Duration::from_seconds(-1.0).is_zero());
        assert!(Duration::from_seconds(f64::NAN).is_zero());
        assert!(Duration::from_seconds(f64::INFINITY).is_zero());
        assert!(Duration::from_seconds(4.0 / 0.0).is_zero());
    }

    #[test]
    fn test_duration_frame_and_sample_counts() {
        let d = Duration::from_seconds(1.0);
        assert_eq!(d.frame_count(30.0), 30);
        assert_eq!(d.sample_count(44_100), 44_100);
        assert_eq!(Duration::from_seconds(0.51).frame_count(2.0), 1);
    }

    #[test]
    fn test_duration_sum() {
        let total: Duration = [4.0, 6.0, 3.0]
            .into_iter()
            .map(Duration::from_seconds)
            .sum();
        assert!((total.as_seconds() - 13.0).abs() < 1e-9);
    }

    #[test]
    fn test_duration_display() {
        assert_eq!(format!("{}", Duration::from_seconds(2.5)), "2.50s");
        assert_eq!(format!("{}", Duration::from_millis(500.0)), "500ms");
    }

    #[test]
    fn test_frame_spans_do_not_drift() {
        let fps = 30.0;
        let durations = [1.017, 2.049, 0.983, 1.5];
        let mut offset = Duration::zero();
        let mut total_frames = 0;
        for d in durations {
            let d = Duration::from_seconds(d);
            let span = FrameSpan::at(offset, d, fps);
            assert_eq!(span.start, total_frames);
            let exact = d.as_seconds() * fps;
            assert!((span.len() as f64 - exact).abs() <= 1.0);
            total_frames += span.len();
            offset = offset + d;
        }
        assert_eq!(total_frames, offset.frame_count(fps));
    }
}
