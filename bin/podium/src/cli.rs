//! Command-line arguments.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use podium_ranking::{Period, TimeMode, Uid};

/// Podium - live leaderboards over Redis
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub(crate) struct Cli {
    /// Logging configuration.
    #[command(flatten)]
    pub(crate) logs: LogArgs,

    /// TOML configuration file. Ignored if it does not exist.
    #[arg(long, short, global = true, value_name = "FILE", env = "PODIUM_CONFIG")]
    pub(crate) config: Option<PathBuf>,

    #[command(flatten)]
    pub(crate) redis: RedisArgs,

    #[command(flatten)]
    pub(crate) ranking: RankingArgs,

    #[command(subcommand)]
    pub(crate) command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Add to a participant's score and print the new total.
    Add {
        uid: Uid,
        #[arg(allow_negative_numbers = true)]
        delta: f64,
    },
    /// Print the board between two inclusive zero-based ranks.
    List {
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        start: i64,
        #[arg(long, default_value_t = 9, allow_negative_numbers = true)]
        end: i64,
    },
    /// Print a participant's rank and score.
    Rank { uid: Uid },
    /// Take a participant off the board.
    Remove { uid: Uid },
    /// Delete the whole board.
    RemoveAll {
        /// Clear the previous period's board instead (requires a period).
        #[arg(long)]
        previous: bool,
    },
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Args)]
#[command(next_help_heading = "Logging")]
pub(crate) struct LogArgs {
    /// Silence all output.
    #[arg(short, long, global = true)]
    pub(crate) quiet: bool,

    /// Verbose mode (-v, -vv, -vvv, etc.).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub(crate) verbosity: u8,

    /// Log filter directive (e.g., "podium_ranking=debug").
    #[arg(long = "log.filter", global = true, value_name = "DIRECTIVE")]
    pub(crate) filter: Option<String>,

    /// Use JSON format for log output.
    #[arg(long = "log.json", global = true)]
    pub(crate) json: bool,
}

/// Redis connection overrides.
#[derive(Debug, Clone, Default, Args)]
#[command(next_help_heading = "Redis")]
pub(crate) struct RedisArgs {
    /// Redis server URL.
    #[arg(long = "redis.url", global = true, value_name = "URL")]
    pub(crate) url: Option<String>,
}

/// Ranking overrides.
#[derive(Debug, Clone, Default, Args)]
#[command(next_help_heading = "Ranking")]
pub(crate) struct RankingArgs {
    /// Ranking name (the base name when a period is set).
    #[arg(long = "ranking.name", global = true, value_name = "NAME")]
    pub(crate) name: Option<String>,

    /// Recency precision: microsecond, millisecond or second.
    #[arg(long = "ranking.mode", global = true, value_name = "MODE")]
    pub(crate) mode: Option<TimeMode>,

    /// Epoch for recency, RFC 3339.
    #[arg(long = "ranking.start-time", global = true, value_name = "TIME")]
    pub(crate) start_time: Option<DateTime<Utc>>,

    /// Calendar period: daily, monthly or yearly.
    #[arg(long = "ranking.period", global = true, value_name = "PERIOD")]
    pub(crate) period: Option<Period>,

    /// Lease on a participant's lock during an update, in milliseconds.
    #[arg(long = "ranking.lease-ms", global = true, value_name = "MS")]
    pub(crate) lease_ms: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add_with_negative_delta() {
        let cli = Cli::try_parse_from(["podium", "add", "7", "-2.5"]).unwrap();
        match cli.command {
            Command::Add { uid, delta } => {
                assert_eq!(uid, Uid::new(7));
                assert_eq!(delta, -2.5);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "podium",
            "list",
            "--end",
            "-1",
            "--ranking.name",
            "weekly",
            "--ranking.mode",
            "second",
            "--ranking.period",
            "monthly",
            "--redis.url",
            "redis://cache:6379",
            "-vv",
        ])
        .unwrap();

        assert!(matches!(cli.command, Command::List { start: 0, end: -1 }));
        assert_eq!(cli.ranking.name.as_deref(), Some("weekly"));
        assert_eq!(cli.ranking.mode, Some(TimeMode::Second));
        assert_eq!(cli.ranking.period, Some(Period::Monthly));
        assert_eq!(cli.redis.url.as_deref(), Some("redis://cache:6379"));
        assert_eq!(cli.logs.verbosity, 2);
    }

    #[test]
    fn test_rejects_uid_beyond_32_bits() {
        assert!(Cli::try_parse_from(["podium", "rank", "4294967296"]).is_err());
        assert!(Cli::try_parse_from(["podium", "rank", "4294967295"]).is_ok());
    }
}
