//! Locked score accumulation.

use std::time::Instant as StdInstant;

use podium_lock::{DistributedLock, acquire};
use podium_primitives::Uid;
use podium_store::RankStore;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

use crate::{Ranking, error::RankingResult};

impl<S, L> Ranking<S, L>
where
    S: RankStore + ?Sized,
    L: DistributedLock + ?Sized,
{
    /// Add `delta` to `uid`'s cumulative score and return the new total.
    ///
    /// The uid's lock is held across the whole read-modify-write and released
    /// whether or not the update succeeds. The steps are not transactional: a
    /// failure part way through leaves whatever writes already landed.
    ///
    /// A failed release does not fail a committed update; it is logged and
    /// counted, and the lease expires on its own.
    pub async fn add_score(&self, uid: Uid, delta: f64) -> RankingResult<f64> {
        self.add_score_until(uid, delta, None).await
    }

    /// [`add_score`](Self::add_score) that gives up waiting for the uid lock
    /// at `deadline`, in addition to the configured acquire policy.
    #[instrument(skip(self), fields(ranking = %self.config.name))]
    pub async fn add_score_until(
        &self,
        uid: Uid,
        delta: f64,
        deadline: Option<Instant>,
    ) -> RankingResult<f64> {
        let started = StdInstant::now();
        let lock_key = self.keys.lock_key(uid);

        let held = match acquire(
            &*self.lock,
            &lock_key,
            self.config.lease,
            &self.config.acquire,
            deadline,
        )
        .await
        {
            Ok(held) => held,
            Err(err) => {
                warn!(%uid, %err, "could not lock uid for score update");
                self.metrics.record_failure();
                return Err(err.into());
            }
        };
        if held.attempts() > 1 {
            self.metrics.record_contention();
        }

        let outcome = self.accumulate(uid, delta).await;

        match held.release(&*self.lock).await {
            Ok(true) => {}
            // The lease ran out mid-update, so another writer may have overlapped.
            Ok(false) => self.metrics.record_contention(),
            Err(err) => {
                self.metrics.record_release_failure();
                warn!(%uid, %err, "failed to release uid lock, lease will expire");
            }
        }

        match &outcome {
            Ok(score) => {
                self.metrics.record_update(started.elapsed());
                debug!(%uid, score, "score updated");
            }
            Err(err) => {
                self.metrics.record_failure();
                warn!(%uid, %err, "score update failed");
            }
        }
        outcome
    }

    /// The read-modify-write cycle. Caller holds the uid lock.
    async fn accumulate(&self, uid: Uid, delta: f64) -> RankingResult<f64> {
        let set = self.keys.ranking_set();

        let old_key = self.pointer(uid).await?;
        let old_score = match old_key {
            // A pointer whose entry is gone (removed concurrently or a torn
            // earlier update) restarts from zero.
            Some(key) => self
                .store
                .entry_score(set, &key.to_string())
                .await?
                .unwrap_or_default(),
            None => 0.0,
        };

        let score = delta + old_score;
        let new_key = self.fresh_key(uid);
        let member = new_key.to_string();

        self.store.upsert_entry(set, &member, score).await?;
        self.store
            .set(&self.keys.pointer_key(uid), &member)
            .await?;

        if let Some(old_key) = old_key.filter(|old| *old != new_key) {
            self.store.remove_entry(set, &old_key.to_string()).await?;
        }

        debug!(%uid, ?old_key, %new_key, old_score, score, "entry replaced");
        Ok(score)
    }
}
