//! Sorted-set store capability consumed by rankings.
//!
//! [`RankStore`] names what the ranking protocol needs from its backing store
//! (ordered-set upserts, descending range and rank queries, plain string keys,
//! existence checks and pattern enumeration) without tying callers to any
//! particular command set. Each method is a single atomic operation on the
//! backend; sequencing several of them safely is the caller's job.

mod memory;
mod pattern;

use async_trait::async_trait;
use podium_primitives::KeyParseError;
use thiserror::Error;

pub use memory::MemoryRankStore;
pub use pattern::KeyPattern;

/// Error returned by store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be reached or dropped the connection.
    #[error("connection error: {0}")]
    Connection(String),
    /// The backend rejected or failed a command.
    #[error("command error: {0}")]
    Command(String),
    /// A stored member is not a valid member key.
    #[error(transparent)]
    Parse(#[from] KeyParseError),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A `(member, score)` pair read back from a sorted set.
pub type ScoredMember = (String, f64);

/// Capabilities of a shared sorted-set store.
///
/// Sorted sets order members by ascending score, then by member bytes.
/// "Reverse" operations walk that order backwards. Range indexes are
/// zero-based and inclusive, with negative values counting from the end.
#[async_trait]
pub trait RankStore: Send + Sync {
    /// Insert `member` with `score`, replacing any previous score.
    async fn upsert_entry(&self, set: &str, member: &str, score: f64) -> StoreResult<()>;

    /// Score of `member`, if present.
    async fn entry_score(&self, set: &str, member: &str) -> StoreResult<Option<f64>>;

    /// Remove `member`. Returns whether it was present.
    async fn remove_entry(&self, set: &str, member: &str) -> StoreResult<bool>;

    /// Members in descending order between two inclusive indexes.
    async fn rev_range(&self, set: &str, start: i64, stop: i64)
    -> StoreResult<Vec<ScoredMember>>;

    /// Zero-based descending rank of `member`, if present.
    async fn rev_rank(&self, set: &str, member: &str) -> StoreResult<Option<u64>>;

    /// Number of members in `set`.
    async fn cardinality(&self, set: &str) -> StoreResult<u64>;

    /// Read a string key.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write a string key without expiry.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Delete keys of any type. Returns how many existed.
    async fn delete(&self, keys: &[String]) -> StoreResult<u64>;

    /// Whether `key` exists.
    async fn exists(&self, key: &str) -> StoreResult<bool>;

    /// Keys matching a glob `pattern` (`*`, `?`, `[...]`, `\` escapes).
    async fn keys(&self, pattern: &str) -> StoreResult<Vec<String>>;
}
