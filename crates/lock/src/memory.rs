//! In-process lease lock.

use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;

use crate::{DistributedLock, LockResult, LockToken};

#[derive(Debug)]
struct Lease {
    token: LockToken,
    /// `None` for a lease too long to represent, which never expires.
    expires_at: Option<Instant>,
}

impl Lease {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|expires_at| now < expires_at)
    }
}

/// Lease lock for tests and single-process deployments.
///
/// Leases expire on the tokio clock, so paused-time tests can step past them.
#[derive(Debug, Default)]
pub struct MemoryLock {
    leases: Mutex<HashMap<String, Lease>>,
}

impl MemoryLock {
    /// Create a lock with no leases.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` is currently leased.
    pub fn is_held(&self, key: &str) -> bool {
        self.leases
            .lock()
            .get(key)
            .is_some_and(|lease| lease.is_live(Instant::now()))
    }
}

#[async_trait]
impl DistributedLock for MemoryLock {
    async fn try_acquire(
        &self,
        key: &str,
        token: &LockToken,
        lease: Duration,
    ) -> LockResult<bool> {
        let now = Instant::now();
        let mut leases = self.leases.lock();
        if leases.get(key).is_some_and(|held| held.is_live(now)) {
            return Ok(false);
        }
        leases.insert(
            key.to_owned(),
            Lease {
                token: token.clone(),
                expires_at: now.checked_add(lease),
            },
        );
        Ok(true)
    }

    async fn release(&self, key: &str, token: &LockToken) -> LockResult<bool> {
        let now = Instant::now();
        let mut leases = self.leases.lock();
        let Some(held) = leases.get(key) else {
            return Ok(false);
        };
        if !held.is_live(now) {
            leases.remove(key);
            return Ok(false);
        }
        if held.token != *token {
            return Ok(false);
        }
        leases.remove(key);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_exclusive_until_released() {
        let lock = MemoryLock::new();
        let a = LockToken::random();
        let b = LockToken::random();
        let lease = Duration::from_secs(1);

        assert!(lock.try_acquire("k", &a, lease).await.unwrap());
        assert!(!lock.try_acquire("k", &b, lease).await.unwrap());
        assert!(!lock.try_acquire("k", &a, lease).await.unwrap());
        assert!(lock.try_acquire("other", &b, lease).await.unwrap());

        assert!(!lock.release("k", &b).await.unwrap());
        assert!(lock.is_held("k"));
        assert!(lock.release("k", &a).await.unwrap());
        assert!(!lock.is_held("k"));
        assert!(lock.try_acquire("k", &b, lease).await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_lease_expiry() {
        let lock = MemoryLock::new();
        let a = LockToken::random();
        let b = LockToken::random();

        assert!(lock.try_acquire("k", &a, Duration::from_secs(1)).await.unwrap());
        tokio::time::advance(Duration::from_millis(1_001)).await;

        assert!(!lock.is_held("k"));
        assert!(!lock.release("k", &a).await.unwrap());
        assert!(lock.try_acquire("k", &b, Duration::from_secs(1)).await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unrepresentable_lease_never_expires() {
        let lock = MemoryLock::new();
        let a = LockToken::random();
        let b = LockToken::random();

        assert!(lock.try_acquire("k", &a, Duration::MAX).await.unwrap());
        tokio::time::advance(Duration::from_secs(86_400)).await;
        assert!(!lock.try_acquire("k", &b, Duration::from_secs(1)).await.unwrap());
        assert!(lock.release("k", &a).await.unwrap());
    }
}
