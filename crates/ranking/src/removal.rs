//! Removing participants and whole boards.

use podium_lock::DistributedLock;
use podium_primitives::Uid;
use podium_store::RankStore;
use tracing::{debug, instrument};

use crate::{Ranking, error::RankingResult};

impl<S, L> Ranking<S, L>
where
    S: RankStore + ?Sized,
    L: DistributedLock + ?Sized,
{
    /// Take `uid` off the board. Returns `false` if it was never ranked.
    #[instrument(skip(self), fields(ranking = %self.config.name))]
    pub async fn remove(&self, uid: Uid) -> RankingResult<bool> {
        let Some(key) = self.pointer(uid).await? else {
            return Ok(false);
        };

        self.store.delete(&[self.keys.pointer_key(uid)]).await?;
        self.store
            .remove_entry(self.keys.ranking_set(), &key.to_string())
            .await?;

        self.metrics.record_removals(1);
        debug!(%uid, %key, "participant removed");
        Ok(true)
    }

    /// Delete the board and every identity pointer. Returns how many
    /// pointers were deleted; nothing happens if the board does not exist.
    ///
    /// Best effort: the set is deleted before pointers are enumerated, so a
    /// concurrent [`add_score`](Self::add_score) can recreate an entry (or
    /// have its fresh pointer swept) in between.
    #[instrument(skip(self), fields(ranking = %self.config.name))]
    pub async fn remove_all(&self) -> RankingResult<u64> {
        let set = self.keys.ranking_set();
        if !self.store.exists(set).await? {
            debug!("board does not exist");
            return Ok(0);
        }
        self.store.delete(&[set.to_owned()]).await?;

        let pointers: Vec<String> = self
            .store
            .keys(self.keys.pointer_pattern())
            .await?
            .into_iter()
            .filter(|key| self.keys.parse_pointer_key(key).is_some())
            .collect();
        let removed = if pointers.is_empty() {
            0
        } else {
            self.store.delete(&pointers).await?
        };

        self.metrics.record_removals(removed);
        debug!(removed, "board removed");
        Ok(removed)
    }
}
