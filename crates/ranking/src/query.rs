//! Leaderboard reads. None of these take the uid lock.

use podium_lock::DistributedLock;
use podium_primitives::{MemberKey, Uid};
use podium_store::RankStore;
use serde::{Deserialize, Serialize};

use crate::{Ranking, error::RankingResult};

/// One row of a leaderboard listing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub uid: Uid,
    pub score: f64,
}

/// A participant's position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    /// Zero-based; 0 is the top of the board.
    pub rank: u64,
    pub score: f64,
}

impl<S, L> Ranking<S, L>
where
    S: RankStore + ?Sized,
    L: DistributedLock + ?Sized,
{
    /// Entries between two inclusive zero-based ranks, best first.
    ///
    /// Equal scores are listed in the order they were reached. Negative
    /// indexes count from the bottom (`-1` is the last entry).
    pub async fn list(&self, start: i64, end: i64) -> RankingResult<Vec<RankedEntry>> {
        let rows = self
            .store
            .rev_range(self.keys.ranking_set(), start, end)
            .await?;

        let mut entries = Vec::with_capacity(rows.len());
        for (member, score) in rows {
            entries.push(RankedEntry {
                uid: MemberKey::parse(&member)?.uid(),
                score,
            });
        }
        Ok(entries)
    }

    /// Rank and score of `uid`, or `None` if it is not on the board.
    pub async fn standing(&self, uid: Uid) -> RankingResult<Option<Standing>> {
        let Some(key) = self.pointer(uid).await? else {
            return Ok(None);
        };
        let set = self.keys.ranking_set();
        let member = key.to_string();

        let Some(rank) = self.store.rev_rank(set, &member).await? else {
            return Ok(None);
        };
        let Some(score) = self.store.entry_score(set, &member).await? else {
            return Ok(None);
        };
        Ok(Some(Standing { rank, score }))
    }

    /// Rank and score of `uid`, with `(0, 0.0)` for a uid that is not ranked.
    ///
    /// That is indistinguishable from a top-ranked zero score; use
    /// [`standing`](Self::standing) when the difference matters.
    pub async fn get_ranking(&self, uid: Uid) -> RankingResult<(u64, f64)> {
        Ok(self
            .standing(uid)
            .await?
            .map_or((0, 0.0), |standing| (standing.rank, standing.score)))
    }

    /// Cumulative score of `uid`, if ranked.
    pub async fn score(&self, uid: Uid) -> RankingResult<Option<f64>> {
        let Some(key) = self.pointer(uid).await? else {
            return Ok(None);
        };
        Ok(self
            .store
            .entry_score(self.keys.ranking_set(), &key.to_string())
            .await?)
    }

    /// Number of participants on the board.
    pub async fn len(&self) -> RankingResult<u64> {
        Ok(self.store.cardinality(self.keys.ranking_set()).await?)
    }

    pub async fn is_empty(&self) -> RankingResult<bool> {
        Ok(self.len().await? == 0)
    }
}
