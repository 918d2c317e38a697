//! Time modes and the clock used to stamp member keys.

use std::time::Duration;

use auto_impl::auto_impl;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// 2020-01-01T00:00:00Z as a unix timestamp.
const DEFAULT_START_UNIX_SECS: i64 = 1_577_836_800;

/// Default epoch against which elapsed time is measured.
pub fn default_start_time() -> DateTime<Utc> {
    DateTime::from_timestamp(DEFAULT_START_UNIX_SECS, 0).unwrap_or_default()
}

/// Precision of the elapsed time packed into member keys.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum TimeMode {
    /// Finest resolution. Note that this counts nanoseconds, not microseconds.
    Microsecond,
    #[default]
    Millisecond,
    Second,
}

impl TimeMode {
    /// Convert an instant into this mode's unit since the unix epoch.
    ///
    /// Instants outside the range representable in nanoseconds (roughly the
    /// years 1677 to 2262) convert to 0 in [`TimeMode::Microsecond`].
    pub fn timestamp(self, at: DateTime<Utc>) -> i64 {
        match self {
            Self::Microsecond => at.timestamp_nanos_opt().unwrap_or(0),
            Self::Millisecond => at
                .timestamp_nanos_opt()
                .map(|nanos| nanos / 1_000_000)
                .unwrap_or_else(|| at.timestamp_millis()),
            Self::Second => at.timestamp(),
        }
    }

    /// Units elapsed between `start` and `now`, wrapping if `now < start`.
    pub fn elapsed(self, start: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
        (self.timestamp(now) as u64).wrapping_sub(self.timestamp(start) as u64)
    }

    /// How long until the 32-bit elapsed field wraps around.
    pub const fn wrap_period(self) -> Duration {
        const UNITS: u64 = 1 << 32;
        match self {
            Self::Microsecond => Duration::from_nanos(UNITS),
            Self::Millisecond => Duration::from_millis(UNITS),
            Self::Second => Duration::from_secs(UNITS),
        }
    }
}

/// Source of the current instant.
#[auto_impl(&, Box, Arc)]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug)]
pub struct ManualClock {
    now: parking_lot::Mutex<DateTime<Utc>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: parking_lot::Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock() = now;
    }

    pub fn advance(&self, by: chrono::TimeDelta) {
        let mut now = self.now.lock();
        *now += by;
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn test_default_start_time() {
        assert_eq!(
            default_start_time().to_rfc3339(),
            "2020-01-01T00:00:00+00:00"
        );
    }

    #[test]
    fn test_elapsed_per_mode() {
        let start = default_start_time();
        let now = start + TimeDelta::milliseconds(1_500);

        assert_eq!(TimeMode::Microsecond.elapsed(start, now), 1_500_000_000);
        assert_eq!(TimeMode::Millisecond.elapsed(start, now), 1_500);
        assert_eq!(TimeMode::Second.elapsed(start, now), 1);
    }

    #[test]
    fn test_elapsed_wraps_before_start() {
        let start = default_start_time();
        let now = start - TimeDelta::seconds(1);
        assert_eq!(TimeMode::Second.elapsed(start, now), u64::MAX);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("second".parse::<TimeMode>().unwrap(), TimeMode::Second);
        assert_eq!("MilliSecond".parse::<TimeMode>().unwrap(), TimeMode::Millisecond);
        assert_eq!(TimeMode::Microsecond.to_string(), "microsecond");
        assert!("hour".parse::<TimeMode>().is_err());
    }

    #[test]
    fn test_wrap_period() {
        assert_eq!(TimeMode::Second.wrap_period(), Duration::from_secs(4_294_967_296));
        assert!(TimeMode::Millisecond.wrap_period() > Duration::from_secs(49 * 24 * 3600));
        assert!(TimeMode::Microsecond.wrap_period() < Duration::from_secs(5));
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(default_start_time());
        clock.advance(TimeDelta::seconds(10));
        assert_eq!(clock.now(), default_start_time() + TimeDelta::seconds(10));
    }
}
