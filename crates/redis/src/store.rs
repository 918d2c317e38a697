use async_trait::async_trait;
use podium_store::{RankStore, ScoredMember, StoreResult};
use redis::{AsyncCommands, aio::ConnectionManager};

use crate::store_error;

/// [`RankStore`] over Redis sorted sets and string keys.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    /// Connect to `url` and wrap the connection.
    pub async fn connect(url: &str) -> StoreResult<Self> {
        crate::connect(url).await.map(Self::new)
    }

    fn conn(&self) -> ConnectionManager {
        self.conn.clone()
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl RankStore for RedisStore {
    async fn upsert_entry(&self, set: &str, member: &str, score: f64) -> StoreResult<()> {
        let _: i64 = self
            .conn()
            .zadd(set, member, score)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn entry_score(&self, set: &str, member: &str) -> StoreResult<Option<f64>> {
        self.conn().zscore(set, member).await.map_err(store_error)
    }

    async fn remove_entry(&self, set: &str, member: &str) -> StoreResult<bool> {
        let removed: u64 = self.conn().zrem(set, member).await.map_err(store_error)?;
        Ok(removed > 0)
    }

    async fn rev_range(
        &self,
        set: &str,
        start: i64,
        stop: i64,
    ) -> StoreResult<Vec<ScoredMember>> {
        redis::cmd("ZREVRANGE")
            .arg(set)
            .arg(start)
            .arg(stop)
            .arg("WITHSCORES")
            .query_async(&mut self.conn())
            .await
            .map_err(store_error)
    }

    async fn rev_rank(&self, set: &str, member: &str) -> StoreResult<Option<u64>> {
        self.conn().zrevrank(set, member).await.map_err(store_error)
    }

    async fn cardinality(&self, set: &str) -> StoreResult<u64> {
        self.conn().zcard(set).await.map_err(store_error)
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.conn().get(key).await.map_err(store_error)
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.conn().set(key, value).await.map_err(store_error)
    }

    async fn delete(&self, keys: &[String]) -> StoreResult<u64> {
        // DEL with no keys is a syntax error.
        if keys.is_empty() {
            return Ok(0);
        }
        self.conn().del(keys).await.map_err(store_error)
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        self.conn().exists(key).await.map_err(store_error)
    }

    async fn keys(&self, pattern: &str) -> StoreResult<Vec<String>> {
        self.conn().keys(pattern).await.map_err(store_error)
    }
}
