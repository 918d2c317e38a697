//! Bounded lock acquisition.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use crate::{DistributedLock, LockError, LockResult, LockToken};

/// How long and how often to retry a contended lock.
///
/// Acquisition stops at whichever limit is hit first. With both limits unset
/// it retries until granted, which is only sensible when every holder's lease
/// is short.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquirePolicy {
    /// Maximum number of attempts. `None` = unlimited.
    pub max_attempts: Option<u32>,
    /// Base pause between attempts. Each pause adds up to the same again as jitter.
    pub retry_delay: Duration,
    /// Overall time budget. `None` = no deadline from the policy.
    pub timeout: Option<Duration>,
}

impl Default for AcquirePolicy {
    fn default() -> Self {
        Self {
            max_attempts: Some(64),
            retry_delay: Duration::from_millis(25),
            timeout: Some(Duration::from_secs(8)),
        }
    }
}

impl AcquirePolicy {
    /// Retry until granted.
    pub fn unbounded() -> Self {
        Self {
            max_attempts: None,
            timeout: None,
            ..Default::default()
        }
    }

    fn next_delay(&self) -> Duration {
        let base = u64::try_from(self.retry_delay.as_micros()).unwrap_or(u64::MAX);
        if base == 0 {
            return Duration::ZERO;
        }
        Duration::from_micros(base.saturating_add(rand::rng().random_range(0..=base)))
    }
}

/// A granted lease. Release it with [`HeldLock::release`].
#[derive(Debug)]
#[must_use = "a held lock should be released"]
pub struct HeldLock {
    key: String,
    token: LockToken,
    attempts: u32,
}

impl HeldLock {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn token(&self) -> &LockToken {
        &self.token
    }

    /// Attempts it took to get the lease. Anything above one means contention.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Give the lease back. Returns `false` if it had already expired, in
    /// which case another holder may have overlapped the critical section.
    pub async fn release<L: DistributedLock + ?Sized>(self, lock: &L) -> LockResult<bool> {
        let released = lock.release(&self.key, &self.token).await?;
        if !released {
            warn!(
                key = %self.key,
                "lease expired before release, critical section overran it"
            );
        }
        Ok(released)
    }
}

/// Acquire `key` for `lease`, retrying per `policy`.
///
/// `deadline` tightens the policy's own timeout for this call. Dropping the
/// returned future abandons acquisition; a lease granted on the very last
/// poll is then left to expire on its own.
///
/// Backend errors abort immediately rather than counting as a failed attempt.
pub async fn acquire<L: DistributedLock + ?Sized>(
    lock: &L,
    key: &str,
    lease: Duration,
    policy: &AcquirePolicy,
    deadline: Option<Instant>,
) -> LockResult<HeldLock> {
    let token = LockToken::random();
    // A timeout past the clock's range is no deadline at all.
    let policy_deadline = policy
        .timeout
        .and_then(|timeout| Instant::now().checked_add(timeout));
    let deadline = match (policy_deadline, deadline) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };

    let mut attempts = 0u32;
    loop {
        attempts = attempts.saturating_add(1);
        if lock.try_acquire(key, &token, lease).await? {
            trace!(key, attempts, "lock acquired");
            return Ok(HeldLock {
                key: key.to_owned(),
                token,
                attempts,
            });
        }

        if policy.max_attempts.is_some_and(|max| attempts >= max) {
            debug!(key, attempts, "lock attempts exhausted");
            return Err(LockError::Exhausted {
                key: key.to_owned(),
                attempts,
            });
        }

        let mut delay = policy.next_delay();
        if let Some(deadline) = deadline {
            let now = Instant::now();
            if now >= deadline {
                debug!(key, attempts, "lock deadline reached");
                return Err(LockError::Timeout {
                    key: key.to_owned(),
                    attempts,
                });
            }
            delay = delay.min(deadline - now);
        }
        trace!(key, attempts, ?delay, "lock contended, retrying");
        tokio::time::sleep(delay).await;
    }
}
