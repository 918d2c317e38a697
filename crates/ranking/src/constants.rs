//! Defaults and key-layout constants.

use std::time::Duration;

/// Ranking name used when no name option is given.
pub const DEFAULT_RANKING_NAME: &str = "myRanking";

/// Prefix of every key a ranking owns.
pub const KEY_PREFIX: &str = "esrank";

/// Suffix of the sorted set holding score entries.
pub const RANKING_SET_SUFFIX: &str = "ranking";

/// Infix of identity pointer keys.
pub const POINTER_INFIX: &str = "uid";

/// Infix of per-uid lock keys.
pub const LOCK_INFIX: &str = "lock";

/// Lease taken on a uid's lock for one score update.
pub const DEFAULT_LEASE: Duration = Duration::from_secs(1);
