use std::time::Duration;

use async_trait::async_trait;
use podium_lock::{DistributedLock, LockError, LockResult, LockToken};
use redis::{Script, aio::ConnectionManager};
use tracing::trace;

/// Deletes the lock key only while it still holds the caller's token.
const RELEASE_SCRIPT: &str = r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("DEL", KEYS[1])
else
    return 0
end
"#;

/// [`DistributedLock`] over Redis string keys with a millisecond expiry.
///
/// A lease is `SET key token NX PX lease`; release runs a compare-and-delete
/// script so an expired holder cannot free a rival's lease.
#[derive(Clone)]
pub struct RedisLock {
    conn: ConnectionManager,
    release: Script,
}

impl RedisLock {
    pub fn new(conn: ConnectionManager) -> Self {
        Self {
            conn,
            release: Script::new(RELEASE_SCRIPT),
        }
    }
}

impl std::fmt::Debug for RedisLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisLock").finish_non_exhaustive()
    }
}

fn backend_error(err: redis::RedisError) -> LockError {
    LockError::Backend(err.to_string())
}

/// Lease in whole milliseconds; Redis rejects `PX 0`.
fn lease_millis(lease: Duration) -> u64 {
    u64::try_from(lease.as_millis()).unwrap_or(u64::MAX).max(1)
}

#[async_trait]
impl DistributedLock for RedisLock {
    async fn try_acquire(
        &self,
        key: &str,
        token: &LockToken,
        lease: Duration,
    ) -> LockResult<bool> {
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(token.as_str())
            .arg("NX")
            .arg("PX")
            .arg(lease_millis(lease))
            .query_async(&mut self.conn.clone())
            .await
            .map_err(backend_error)?;
        trace!(key, granted = reply.is_some(), "lease requested");
        Ok(reply.is_some())
    }

    async fn release(&self, key: &str, token: &LockToken) -> LockResult<bool> {
        let deleted: i64 = self
            .release
            .key(key)
            .arg(token.as_str())
            .invoke_async(&mut self.conn.clone())
            .await
            .map_err(backend_error)?;
        Ok(deleted == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lease_millis() {
        assert_eq!(lease_millis(Duration::from_secs(1)), 1000);
        assert_eq!(lease_millis(Duration::from_micros(10)), 1);
        assert_eq!(lease_millis(Duration::ZERO), 1);
    }
}
