//! Live leaderboards over a shared sorted-set store.
//!
//! A [`Ranking`] keeps `(uid, cumulative score)` pairs in one sorted set plus
//! one pointer key per uid naming that uid's current [`MemberKey`]. Score
//! updates are read-modify-write cycles, so each one runs under a lease lock
//! scoped to `(ranking, uid)`; queries and removals go straight to the store.
//!
//! ```ignore
//! let ranking = Ranking::new(store, lock, [RankingOption::name("weekly")]);
//! ranking.add_score(Uid::new(7), 10.0).await?;
//! let top = ranking.list(0, 9).await?;
//! let me = ranking.standing(Uid::new(7)).await?;
//! ```
//!
//! Layout of the keyspace for a ranking named `<name>`:
//!
//! | key | type | content |
//! |---|---|---|
//! | `esrank_<name>_ranking` | sorted set | member key → cumulative score |
//! | `esrank_<name>_uid_<uid>` | string | current member key of `<uid>` |
//! | `esrank_<name>_lock_<uid>` | lock | lease held while `<uid>` is updated |
//!
//! [`MemberKey`]: podium_primitives::MemberKey

pub mod config;
pub mod constants;
pub mod keys;
pub mod period;

mod error;
mod metrics;
mod query;
mod ranking;
mod removal;
mod update;

pub use config::{RankingConfig, RankingOption};
pub use error::{RankingError, RankingResult};
pub use keys::Namespace;
pub use period::Period;
pub use query::{RankedEntry, Standing};
pub use ranking::Ranking;

pub use podium_lock::{AcquirePolicy, DistributedLock, LockError, MemoryLock};
pub use podium_primitives::{Clock, MemberKey, SystemClock, TimeMode, Uid};
pub use podium_store::{MemoryRankStore, RankStore, StoreError};
