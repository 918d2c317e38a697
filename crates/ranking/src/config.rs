//! Ranking configuration and construction options.

use std::time::Duration;

use chrono::{DateTime, Utc};
use podium_lock::AcquirePolicy;
use podium_primitives::{TimeMode, default_start_time};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_LEASE, DEFAULT_RANKING_NAME};

/// Identity and behaviour of one ranking. Immutable once the ranking is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Namespace for every key the ranking owns.
    pub name: String,
    /// Precision of the recency half of member keys.
    pub mode: TimeMode,
    /// Epoch that elapsed time is measured from.
    pub start_time: DateTime<Utc>,
    /// Lease held on a uid's lock while its score is updated.
    pub lease: Duration,
    /// How long to wait for a contended uid lock.
    pub acquire: AcquirePolicy,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_RANKING_NAME.to_owned(),
            mode: TimeMode::default(),
            start_time: default_start_time(),
            lease: DEFAULT_LEASE,
            acquire: AcquirePolicy::default(),
        }
    }
}

impl RankingConfig {
    /// Defaults with `options` applied in order.
    pub fn from_options(options: impl IntoIterator<Item = RankingOption>) -> Self {
        options
            .into_iter()
            .fold(Self::default(), |config, option| option.apply(config))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_mode(mut self, mode: TimeMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = start_time;
        self
    }

    pub fn with_lease(mut self, lease: Duration) -> Self {
        self.lease = lease;
        self
    }

    pub fn with_acquire_policy(mut self, acquire: AcquirePolicy) -> Self {
        self.acquire = acquire;
        self
    }
}

/// A single override applied on top of [`RankingConfig::default`].
///
/// Later options win over earlier ones touching the same field.
#[derive(Debug, Clone, PartialEq)]
pub enum RankingOption {
    Name(String),
    TimeMode(TimeMode),
    StartTime(DateTime<Utc>),
    Lease(Duration),
    AcquirePolicy(AcquirePolicy),
}

impl RankingOption {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Apply this option to `config`.
    pub fn apply(self, config: RankingConfig) -> RankingConfig {
        match self {
            Self::Name(name) => config.with_name(name),
            Self::TimeMode(mode) => config.with_mode(mode),
            Self::StartTime(start_time) => config.with_start_time(start_time),
            Self::Lease(lease) => config.with_lease(lease),
            Self::AcquirePolicy(policy) => config.with_acquire_policy(policy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn test_defaults() {
        let config = RankingConfig::from_options([]);
        assert_eq!(config.name, "myRanking");
        assert_eq!(config.mode, TimeMode::Millisecond);
        assert_eq!(config.start_time, default_start_time());
        assert_eq!(config.lease, Duration::from_secs(1));
    }

    #[test]
    fn test_options_override_defaults() {
        let start = default_start_time() + TimeDelta::days(3);
        let config = RankingConfig::from_options([
            RankingOption::name("TestRanking"),
            RankingOption::TimeMode(TimeMode::Microsecond),
            RankingOption::StartTime(start),
        ]);
        assert_eq!(config.name, "TestRanking");
        assert_eq!(config.mode, TimeMode::Microsecond);
        assert_eq!(config.start_time, start);
        assert_eq!(config.acquire, AcquirePolicy::default());
    }

    #[test]
    fn test_later_option_wins() {
        let config = RankingConfig::from_options([
            RankingOption::name("first"),
            RankingOption::name("second"),
        ]);
        assert_eq!(config.name, "second");
    }
}
