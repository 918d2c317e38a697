//! Ranking errors.

use podium_lock::LockError;
use podium_primitives::KeyParseError;
use podium_store::StoreError;

/// Error type for ranking operations.
#[derive(Debug, thiserror::Error)]
pub enum RankingError {
    /// The backing store failed; the operation was abandoned at that step.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The uid lock could not be taken or released.
    #[error(transparent)]
    Lock(#[from] LockError),
}

impl From<KeyParseError> for RankingError {
    fn from(err: KeyParseError) -> Self {
        Self::Store(StoreError::Parse(err))
    }
}

impl RankingError {
    /// Whether the uid lock was contended past the acquire policy.
    pub fn is_lock_contention(&self) -> bool {
        matches!(self, Self::Lock(err) if err.is_contention())
    }
}

/// Result type for ranking operations.
pub type RankingResult<T> = Result<T, RankingError>;
