//! Lease-based distributed lock capability.
//!
//! A [`DistributedLock`] backend only answers single, non-blocking questions
//! ("grant this lease to this token?", "release if still mine?"). Waiting is
//! the caller's business and is always bounded by an [`AcquirePolicy`]: see
//! [`acquire`].

mod memory;
mod policy;

use std::{fmt, time::Duration};

use async_trait::async_trait;
use thiserror::Error;

pub use memory::MemoryLock;
pub use policy::{AcquirePolicy, HeldLock, acquire};

/// Lock acquisition and backend errors.
#[derive(Debug, Error)]
pub enum LockError {
    /// The lock backend failed.
    #[error("lock backend error: {0}")]
    Backend(String),
    /// The deadline passed before the lease was granted.
    #[error("lock {key} not acquired before deadline after {attempts} attempts")]
    Timeout {
        /// Lock key.
        key: String,
        /// Attempts made.
        attempts: u32,
    },
    /// The policy's attempt budget ran out.
    #[error("lock {key} not acquired after {attempts} attempts")]
    Exhausted {
        /// Lock key.
        key: String,
        /// Attempts made.
        attempts: u32,
    },
}

impl LockError {
    /// Whether the lock was simply never granted, as opposed to a backend failure.
    pub const fn is_contention(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Exhausted { .. })
    }
}

/// Result type for lock operations.
pub type LockResult<T> = Result<T, LockError>;

/// Random value identifying one holder of a lease.
///
/// Releases compare against it so a holder whose lease already expired can
/// never release a rival's lease.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct LockToken(String);

impl LockToken {
    /// Fresh random token.
    pub fn random() -> Self {
        let bytes: [u8; 16] = rand::random();
        Self(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for LockToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LockToken").field(&self.0).finish()
    }
}

impl fmt::Display for LockToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lease-based mutual exclusion shared between processes.
#[async_trait]
pub trait DistributedLock: Send + Sync {
    /// Grant `key` to `token` for `lease` if nobody holds it. Never waits.
    async fn try_acquire(&self, key: &str, token: &LockToken, lease: Duration)
    -> LockResult<bool>;

    /// Release `key` if it is still held by `token`. Returns whether it was.
    async fn release(&self, key: &str, token: &LockToken) -> LockResult<bool>;
}
