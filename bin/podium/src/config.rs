//! Figment-based configuration loading.
//!
//! Configuration priority (highest wins):
//! 1. CLI arguments (applied after Figment load)
//! 2. Config file (TOML)
//! 3. Environment variables (`PODIUM_` prefix, `__` between nested keys)
//! 4. Defaults

use std::{path::Path, time::Duration};

use chrono::NaiveDate;
use eyre::{Result, WrapErr};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use podium_ranking::{Period, RankingConfig, TimeMode};
use serde::{Deserialize, Serialize};

use crate::cli::{RankingArgs, RedisArgs};

/// Redis server used when nothing else is configured.
pub(crate) const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Redis connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct RedisConfig {
    pub(crate) url: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_REDIS_URL.to_owned(),
        }
    }
}

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct PodiumConfig {
    pub(crate) redis: RedisConfig,

    /// The ranking to operate on. With a period set, `ranking.name` is the base name.
    pub(crate) ranking: RankingConfig,

    /// Calendar period the board is scoped to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) period: Option<Period>,
}

impl PodiumConfig {
    /// Load configuration from defaults, environment, and config file.
    /// CLI overrides should be applied separately after loading.
    pub(crate) fn load(config_path: Option<&Path>) -> Result<Self> {
        Self::figment(config_path)
            .extract()
            .wrap_err("Failed to load configuration")
    }

    fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Env::prefixed("PODIUM_").split("__"));

        if let Some(path) = config_path.filter(|path| path.exists()) {
            figment = figment.merge(Toml::file(path));
        }
        figment
    }

    /// Apply command-line overrides.
    pub(crate) fn apply_args(&mut self, redis: &RedisArgs, ranking: &RankingArgs) {
        if let Some(url) = &redis.url {
            self.redis.url.clone_from(url);
        }
        if let Some(name) = &ranking.name {
            self.ranking.name.clone_from(name);
        }
        if let Some(mode) = ranking.mode {
            self.ranking.mode = mode;
        }
        if let Some(start_time) = ranking.start_time {
            self.ranking.start_time = start_time;
        }
        if let Some(period) = ranking.period {
            self.period = Some(period);
        }
        if let Some(lease_ms) = ranking.lease_ms {
            self.ranking.lease = Duration::from_millis(lease_ms);
        }
    }

    /// Configuration of the board to open on `today`.
    ///
    /// Without a period this is `ranking` as loaded. With one, the name and
    /// epoch come from the period containing `today`, or the one before it
    /// when `previous` is set; an explicitly configured coarser mode is kept.
    pub(crate) fn ranking_config(
        &self,
        today: NaiveDate,
        previous: bool,
    ) -> Result<RankingConfig> {
        let Some(period) = self.period else {
            if previous {
                eyre::bail!("--previous requires a ranking period");
            }
            return Ok(self.ranking.clone());
        };

        let date = if previous { period.previous(today) } else { today };
        let options = period.options(&self.ranking.name, date);
        let mut config = options
            .into_iter()
            .fold(self.ranking.clone(), |config, option| option.apply(config));
        config.mode = coarser(self.ranking.mode, config.mode);
        Ok(config)
    }
}

/// The mode of the two whose elapsed field wraps later.
fn coarser(a: TimeMode, b: TimeMode) -> TimeMode {
    if a.wrap_period() >= b.wrap_period() { a } else { b }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = PodiumConfig::default();
        assert_eq!(config.redis.url, DEFAULT_REDIS_URL);
        assert_eq!(config.ranking.name, "myRanking");
        assert_eq!(config.period, None);
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("podium.toml");

        fs::write(
            &config_path,
            r#"
period = "daily"

[redis]
url = "redis://cache:6380/2"

[ranking]
name = "arena"
mode = "second"
start_time = "2024-01-01T00:00:00Z"

[ranking.acquire]
max_attempts = 5
"#,
        )
        .unwrap();

        let config = PodiumConfig::load(Some(&config_path)).unwrap();
        assert_eq!(config.redis.url, "redis://cache:6380/2");
        assert_eq!(config.ranking.name, "arena");
        assert_eq!(config.ranking.mode, TimeMode::Second);
        assert_eq!(config.ranking.acquire.max_attempts, Some(5));
        // Unset fields keep their defaults.
        assert_eq!(config.ranking.lease, Duration::from_secs(1));
        assert_eq!(config.period, Some(Period::Daily));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = PodiumConfig::load(Some(&config_path)).unwrap();
        assert_eq!(config, PodiumConfig::default());
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = PodiumConfig::default();
        config.apply_args(
            &RedisArgs {
                url: Some("redis://other:6379".into()),
            },
            &RankingArgs {
                name: Some("cli".into()),
                mode: Some(TimeMode::Microsecond),
                lease_ms: Some(250),
                ..Default::default()
            },
        );

        assert_eq!(config.redis.url, "redis://other:6379");
        assert_eq!(config.ranking.name, "cli");
        assert_eq!(config.ranking.mode, TimeMode::Microsecond);
        assert_eq!(config.ranking.lease, Duration::from_millis(250));
    }

    #[test]
    fn test_period_board() {
        let mut config = PodiumConfig::default();
        config.ranking.name = "monthly".into();
        config.period = Some(Period::Monthly);
        let today = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();

        let current = config.ranking_config(today, false).unwrap();
        assert_eq!(current.name, "monthly_2024_1");
        assert_eq!(current.start_time, Period::Monthly.start_time(today));
        assert_eq!(current.mode, TimeMode::Millisecond);

        let previous = config.ranking_config(today, true).unwrap();
        assert_eq!(previous.name, "monthly_2023_12");
    }

    #[test]
    fn test_period_keeps_coarser_mode() {
        let mut config = PodiumConfig::default();
        config.ranking.mode = TimeMode::Second;
        config.period = Some(Period::Daily);
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        assert_eq!(config.ranking_config(today, false).unwrap().mode, TimeMode::Second);
    }

    #[test]
    fn test_previous_without_period() {
        let config = PodiumConfig::default();
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert!(config.ranking_config(today, true).is_err());
        assert_eq!(config.ranking_config(today, false).unwrap(), config.ranking);
    }
}
