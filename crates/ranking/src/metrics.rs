//! Ranking metrics

use std::time::Duration;

use ::metrics::{Counter, Histogram};

/// Per-ranking metrics, labelled with the ranking name.
#[derive(Clone, Debug)]
pub(crate) struct RankingMetrics {
    /// Completed score updates
    score_updates_total: Counter,
    /// Score updates abandoned on a store or lock error
    score_update_failures_total: Counter,
    /// Score updates that had to wait for another holder of the uid lock
    lock_contended_total: Counter,
    /// Lock releases that failed after an update; the lease expires instead
    lock_release_failures_total: Counter,
    /// Participants removed, one by one or in bulk
    removals_total: Counter,
    /// Time from lock request to release for completed updates
    update_duration_seconds: Histogram,
}

impl RankingMetrics {
    pub(crate) fn new(ranking: &str) -> Self {
        let label = ranking.to_owned();
        Self {
            score_updates_total: ::metrics::counter!(
                "ranking.score_updates_total",
                "ranking" => label.clone()
            ),
            score_update_failures_total: ::metrics::counter!(
                "ranking.score_update_failures_total",
                "ranking" => label.clone()
            ),
            lock_contended_total: ::metrics::counter!(
                "ranking.lock_contended_total",
                "ranking" => label.clone()
            ),
            lock_release_failures_total: ::metrics::counter!(
                "ranking.lock_release_failures_total",
                "ranking" => label.clone()
            ),
            removals_total: ::metrics::counter!(
                "ranking.removals_total",
                "ranking" => label.clone()
            ),
            update_duration_seconds: ::metrics::histogram!(
                "ranking.update_duration_seconds",
                "ranking" => label
            ),
        }
    }

    pub(crate) fn record_update(&self, took: Duration) {
        self.score_updates_total.increment(1);
        self.update_duration_seconds.record(took.as_secs_f64());
    }

    pub(crate) fn record_failure(&self) {
        self.score_update_failures_total.increment(1);
    }

    pub(crate) fn record_contention(&self) {
        self.lock_contended_total.increment(1);
    }

    pub(crate) fn record_release_failure(&self) {
        self.lock_release_failures_total.increment(1);
    }

    pub(crate) fn record_removals(&self, count: u64) {
        self.removals_total.increment(count);
    }
}
