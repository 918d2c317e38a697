//! In-memory store (does not persist across restarts).

use std::{
    cmp::Ordering,
    collections::{BTreeSet, HashMap},
};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::{RankStore, ScoredMember, StoreError, StoreResult, pattern::KeyPattern};

const WRONG_TYPE: &str = "WRONGTYPE operation against a key holding the wrong kind of value";

/// Total order over scores so they can key a `BTreeSet`.
#[derive(Clone, Copy, Debug)]
struct Score(f64);

impl PartialEq for Score {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Score {}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Debug, Default)]
struct SortedSet {
    scores: HashMap<String, f64>,
    /// Ascending by score, then by member bytes.
    order: BTreeSet<(Score, String)>,
}

impl SortedSet {
    fn upsert(&mut self, member: &str, score: f64) {
        if let Some(old) = self.scores.insert(member.to_owned(), score) {
            self.order.remove(&(Score(old), member.to_owned()));
        }
        self.order.insert((Score(score), member.to_owned()));
    }

    fn remove(&mut self, member: &str) -> bool {
        match self.scores.remove(member) {
            Some(old) => {
                self.order.remove(&(Score(old), member.to_owned()));
                true
            }
            None => false,
        }
    }

    fn len(&self) -> usize {
        self.scores.len()
    }
}

#[derive(Debug)]
enum Entry {
    Value(String),
    Set(SortedSet),
}

/// Resolve inclusive, possibly negative range indexes against `len`.
fn resolve_range(start: i64, stop: i64, len: usize) -> Option<(usize, usize)> {
    let len = len as i64;
    let start = if start < 0 { (start + len).max(0) } else { start };
    let stop = if stop < 0 { stop + len } else { stop.min(len - 1) };
    if len == 0 || start > stop || start >= len {
        return None;
    }
    Some((start as usize, stop as usize))
}

/// In-memory store for tests and single-process use.
///
/// Keys and sorted sets share one keyspace, an emptied sorted set disappears,
/// and type mismatches are command errors.
#[derive(Debug, Default)]
pub struct MemoryRankStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryRankStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys of any type.
    pub fn key_count(&self) -> usize {
        self.entries.read().len()
    }
}

#[async_trait]
impl RankStore for MemoryRankStore {
    async fn upsert_entry(&self, set: &str, member: &str, score: f64) -> StoreResult<()> {
        if score.is_nan() {
            return Err(StoreError::Command("score is not a number".into()));
        }
        let mut entries = self.entries.write();
        match entries
            .entry(set.to_owned())
            .or_insert_with(|| Entry::Set(SortedSet::default()))
        {
            Entry::Set(sorted) => {
                sorted.upsert(member, score);
                Ok(())
            }
            Entry::Value(_) => Err(StoreError::Command(WRONG_TYPE.into())),
        }
    }

    async fn entry_score(&self, set: &str, member: &str) -> StoreResult<Option<f64>> {
        match self.entries.read().get(set) {
            None => Ok(None),
            Some(Entry::Set(sorted)) => Ok(sorted.scores.get(member).copied()),
            Some(Entry::Value(_)) => Err(StoreError::Command(WRONG_TYPE.into())),
        }
    }

    async fn remove_entry(&self, set: &str, member: &str) -> StoreResult<bool> {
        let mut entries = self.entries.write();
        let (removed, emptied) = match entries.get_mut(set) {
            None => return Ok(false),
            Some(Entry::Set(sorted)) => (sorted.remove(member), sorted.len() == 0),
            Some(Entry::Value(_)) => return Err(StoreError::Command(WRONG_TYPE.into())),
        };
        if emptied {
            entries.remove(set);
        }
        Ok(removed)
    }

    async fn rev_range(
        &self,
        set: &str,
        start: i64,
        stop: i64,
    ) -> StoreResult<Vec<ScoredMember>> {
        let entries = self.entries.read();
        let sorted = match entries.get(set) {
            None => return Ok(Vec::new()),
            Some(Entry::Set(sorted)) => sorted,
            Some(Entry::Value(_)) => return Err(StoreError::Command(WRONG_TYPE.into())),
        };
        let Some((start, stop)) = resolve_range(start, stop, sorted.len()) else {
            return Ok(Vec::new());
        };
        Ok(sorted
            .order
            .iter()
            .rev()
            .skip(start)
            .take(stop - start + 1)
            .map(|(score, member)| (member.clone(), score.0))
            .collect())
    }

    async fn rev_rank(&self, set: &str, member: &str) -> StoreResult<Option<u64>> {
        let entries = self.entries.read();
        let sorted = match entries.get(set) {
            None => return Ok(None),
            Some(Entry::Set(sorted)) => sorted,
            Some(Entry::Value(_)) => return Err(StoreError::Command(WRONG_TYPE.into())),
        };
        let Some(&score) = sorted.scores.get(member) else {
            return Ok(None);
        };
        let target = (Score(score), member.to_owned());
        // Members strictly after the target in ascending order rank above it.
        let above = sorted.order.range(target..).skip(1).count();
        Ok(Some(above as u64))
    }

    async fn cardinality(&self, set: &str) -> StoreResult<u64> {
        match self.entries.read().get(set) {
            None => Ok(0),
            Some(Entry::Set(sorted)) => Ok(sorted.len() as u64),
            Some(Entry::Value(_)) => Err(StoreError::Command(WRONG_TYPE.into())),
        }
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        match self.entries.read().get(key) {
            None => Ok(None),
            Some(Entry::Value(value)) => Ok(Some(value.clone())),
            Some(Entry::Set(_)) => Err(StoreError::Command(WRONG_TYPE.into())),
        }
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entries
            .write()
            .insert(key.to_owned(), Entry::Value(value.to_owned()));
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> StoreResult<u64> {
        let mut entries = self.entries.write();
        Ok(keys
            .iter()
            .filter(|key| entries.remove(key.as_str()).is_some())
            .count() as u64)
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.entries.read().contains_key(key))
    }

    async fn keys(&self, pattern: &str) -> StoreResult<Vec<String>> {
        let pattern = KeyPattern::new(pattern)?;
        let mut keys: Vec<String> = self
            .entries
            .read()
            .keys()
            .filter(|key| pattern.matches(key))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SET: &str = "board";

    async fn seeded() -> MemoryRankStore {
        let store = MemoryRankStore::new();
        for (member, score) in [("a", 10.0), ("b", 30.0), ("c", 20.0), ("d", 20.0)] {
            store.upsert_entry(SET, member, score).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_rev_range_orders_by_score_then_member_descending() {
        let store = seeded().await;

        let all = store.rev_range(SET, 0, -1).await.unwrap();
        let members: Vec<_> = all.iter().map(|(m, _)| m.as_str()).collect();
        assert_eq!(members, ["b", "d", "c", "a"]);
        assert_eq!(all[0].1, 30.0);
    }

    #[tokio::test]
    async fn test_rev_range_index_handling() {
        let store = seeded().await;

        assert_eq!(store.rev_range(SET, 1, 2).await.unwrap().len(), 2);
        assert_eq!(store.rev_range(SET, 0, 100).await.unwrap().len(), 4);
        assert_eq!(store.rev_range(SET, -2, -1).await.unwrap()[0].0, "c");
        assert!(store.rev_range(SET, 3, 1).await.unwrap().is_empty());
        assert!(store.rev_range(SET, 4, 10).await.unwrap().is_empty());
        assert!(store.rev_range("missing", 0, -1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rev_rank() {
        let store = seeded().await;

        assert_eq!(store.rev_rank(SET, "b").await.unwrap(), Some(0));
        assert_eq!(store.rev_rank(SET, "d").await.unwrap(), Some(1));
        assert_eq!(store.rev_rank(SET, "c").await.unwrap(), Some(2));
        assert_eq!(store.rev_rank(SET, "a").await.unwrap(), Some(3));
        assert_eq!(store.rev_rank(SET, "zz").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_upsert_replaces_score() {
        let store = seeded().await;

        store.upsert_entry(SET, "a", 99.0).await.unwrap();
        assert_eq!(store.entry_score(SET, "a").await.unwrap(), Some(99.0));
        assert_eq!(store.cardinality(SET).await.unwrap(), 4);
        assert_eq!(store.rev_rank(SET, "a").await.unwrap(), Some(0));
    }

    #[tokio::test]
    async fn test_emptied_set_is_removed() {
        let store = MemoryRankStore::new();
        store.upsert_entry(SET, "a", 1.0).await.unwrap();
        assert!(store.exists(SET).await.unwrap());

        assert!(store.remove_entry(SET, "a").await.unwrap());
        assert!(!store.remove_entry(SET, "a").await.unwrap());
        assert!(!store.exists(SET).await.unwrap());
    }

    #[tokio::test]
    async fn test_string_keys_and_patterns() {
        let store = MemoryRankStore::new();
        store.set("p_uid_1", "11").await.unwrap();
        store.set("p_uid_2", "22").await.unwrap();
        store.upsert_entry("p_ranking", "11", 1.0).await.unwrap();

        assert_eq!(store.get("p_uid_1").await.unwrap().as_deref(), Some("11"));
        assert_eq!(store.get("p_uid_3").await.unwrap(), None);
        assert_eq!(
            store.keys("p_uid_*").await.unwrap(),
            vec!["p_uid_1".to_owned(), "p_uid_2".to_owned()]
        );

        let deleted = store
            .delete(&["p_uid_1".to_owned(), "p_uid_9".to_owned()])
            .await
            .unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(store.key_count(), 2);
    }

    #[tokio::test]
    async fn test_keys_with_escaped_pattern() {
        let store = MemoryRankStore::new();
        store.set("esrank_a*b_uid_1", "1").await.unwrap();
        store.set("esrank_aXb_uid_1", "1").await.unwrap();

        assert_eq!(
            store.keys("esrank_a\\*b_uid_*").await.unwrap(),
            vec!["esrank_a*b_uid_1".to_owned()]
        );
        assert!(matches!(
            store.keys("esrank_[a").await,
            Err(StoreError::Command(_))
        ));
    }

    #[tokio::test]
    async fn test_wrong_type() {
        let store = MemoryRankStore::new();
        store.set("plain", "x").await.unwrap();
        store.upsert_entry(SET, "a", 1.0).await.unwrap();

        assert!(matches!(
            store.upsert_entry("plain", "a", 1.0).await,
            Err(StoreError::Command(_))
        ));
        assert!(matches!(store.get(SET).await, Err(StoreError::Command(_))));
    }

    #[tokio::test]
    async fn test_nan_score_rejected() {
        let store = MemoryRankStore::new();
        assert!(store.upsert_entry(SET, "a", f64::NAN).await.is_err());
        assert!(!store.exists(SET).await.unwrap());
    }
}
