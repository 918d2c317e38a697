//! The ranking handle.

use std::{fmt, sync::Arc};

use podium_lock::DistributedLock;
use podium_primitives::{Clock, MemberKey, SystemClock, Uid};
use podium_store::RankStore;

use crate::{
    config::{RankingConfig, RankingOption},
    error::RankingResult,
    keys::Namespace,
    metrics::RankingMetrics,
};

/// A named leaderboard bound to a store and a lock service.
///
/// Cheap to clone; clones share the store, lock and clock. Operations are
/// split across [`add_score`](Self::add_score) (locked), the queries
/// ([`list`](Self::list), [`standing`](Self::standing)) and removal
/// ([`remove`](Self::remove), [`remove_all`](Self::remove_all)).
pub struct Ranking<S: ?Sized, L: ?Sized> {
    pub(crate) store: Arc<S>,
    pub(crate) lock: Arc<L>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) config: Arc<RankingConfig>,
    pub(crate) keys: Arc<Namespace>,
    pub(crate) metrics: RankingMetrics,
}

impl<S, L> Ranking<S, L>
where
    S: RankStore + ?Sized,
    L: DistributedLock + ?Sized,
{
    /// Build a ranking from defaults overridden by `options`, in order.
    pub fn new(
        store: Arc<S>,
        lock: Arc<L>,
        options: impl IntoIterator<Item = RankingOption>,
    ) -> Self {
        Self::with_config(store, lock, RankingConfig::from_options(options))
    }

    /// Build a ranking from a complete configuration.
    pub fn with_config(store: Arc<S>, lock: Arc<L>, config: RankingConfig) -> Self {
        Self {
            keys: Arc::new(Namespace::new(&config.name)),
            metrics: RankingMetrics::new(&config.name),
            config: Arc::new(config),
            clock: Arc::new(SystemClock),
            store,
            lock,
        }
    }

    /// Replace the wall clock used to stamp member keys.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn namespace(&self) -> &Namespace {
        &self.keys
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Member key for `uid` stamped with the current time.
    pub(crate) fn fresh_key(&self, uid: Uid) -> MemberKey {
        let elapsed = self
            .config
            .mode
            .elapsed(self.config.start_time, self.clock.now());
        MemberKey::encode(uid, elapsed)
    }

    /// Current member key of `uid`, read from its identity pointer.
    pub(crate) async fn pointer(&self, uid: Uid) -> RankingResult<Option<MemberKey>> {
        let raw = self.store.get(&self.keys.pointer_key(uid)).await?;
        Ok(raw.as_deref().map(MemberKey::parse).transpose()?)
    }
}

impl<S: ?Sized, L: ?Sized> Clone for Ranking<S, L> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            lock: Arc::clone(&self.lock),
            clock: Arc::clone(&self.clock),
            config: Arc::clone(&self.config),
            keys: Arc::clone(&self.keys),
            metrics: self.metrics.clone(),
        }
    }
}

impl<S: ?Sized, L: ?Sized> fmt::Debug for Ranking<S, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ranking")
            .field("config", &self.config)
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}
