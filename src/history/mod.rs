//! Run history aggregation
//!
//! Tallies cluster assignments into timestamped snapshots and keeps an
//! append-only, session-scoped sequence of them, from which a per-cluster
//! trend can be derived once at least two runs have completed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while recording snapshots
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("cluster label {label} is out of range for {n_clusters} clusters")]
    LabelOutOfRange { label: usize, n_clusters: usize },
}

/// Comment count per cluster index, captured at one point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSnapshot {
    counts: Vec<usize>,
}

impl ClusterSnapshot {
    /// Snapshot with every cluster at zero
    pub fn zeroed(n_clusters: usize) -> Self {
        Self {
            counts: vec![0; n_clusters],
        }
    }

    /// Tally a label sequence into per-cluster counts
    ///
    /// Clusters with no occurrences are present with count 0; the counts
    /// always sum to `labels.len()`. Labels outside `[0, n_clusters)` are
    /// rejected.
    pub fn from_labels(labels: &[usize], n_clusters: usize) -> Result<Self, HistoryError> {
        let mut counts = vec![0usize; n_clusters];
        for &label in labels {
            if label >= n_clusters {
                return Err(HistoryError::LabelOutOfRange { label, n_clusters });
            }
            counts[label] += 1;
        }
        Ok(Self { counts })
    }

    /// Count per cluster index
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Count for one cluster, if the index is in range
    pub fn count_for(&self, cluster: usize) -> Option<usize> {
        self.counts.get(cluster).copied()
    }

    /// Total number of tallied comments
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Number of clusters the snapshot covers
    pub fn n_clusters(&self) -> usize {
        self.counts.len()
    }
}

/// One recorded run: when it happened and how the comments distributed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunHistoryEntry {
    pub recorded_at: DateTime<Utc>,
    pub snapshot: ClusterSnapshot,
}

/// Per-cluster count series over the recorded runs
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeries {
    /// Timestamp per recorded run, in record order
    pub timestamps: Vec<DateTime<Utc>>,
    /// One count series per cluster index, parallel to `timestamps`
    pub series: Vec<Vec<usize>>,
}

/// Append-only sequence of run snapshots, scoped to one session
///
/// Owned by the caller driving the analysis session and passed by
/// reference into each run; it dies with the session.
#[derive(Debug, Clone)]
pub struct RunHistory {
    n_clusters: usize,
    entries: Vec<RunHistoryEntry>,
}

impl RunHistory {
    /// Create an empty history for the given cluster count
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            entries: Vec::new(),
        }
    }

    /// Tally the labels of one run and append a timestamped snapshot
    ///
    /// Returns the full updated entry sequence. Earlier entries are never
    /// mutated or reordered.
    pub fn record_snapshot(
        &mut self,
        labels: &[usize],
        now: DateTime<Utc>,
    ) -> Result<&[RunHistoryEntry], HistoryError> {
        let snapshot = ClusterSnapshot::from_labels(labels, self.n_clusters)?;
        self.entries.push(RunHistoryEntry {
            recorded_at: now,
            snapshot,
        });
        Ok(&self.entries)
    }

    /// Recorded entries in append order
    pub fn entries(&self) -> &[RunHistoryEntry] {
        &self.entries
    }

    /// Number of recorded runs
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no run has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cluster count the history was created for
    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    /// Per-cluster trend over the recorded runs
    ///
    /// A trend needs at least two entries; returns `None` before that.
    pub fn trend_series(&self) -> Option<TrendSeries> {
        if self.entries.len() < 2 {
            return None;
        }

        let timestamps = self.entries.iter().map(|e| e.recorded_at).collect();
        let series = (0..self.n_clusters)
            .map(|cluster| {
                self.entries
                    .iter()
                    .map(|e| e.snapshot.count_for(cluster).unwrap_or(0))
                    .collect()
            })
            .collect();

        Some(TrendSeries { timestamps, series })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_snapshot_counts_sum_to_label_count() {
        let labels = [0, 1, 1, 4, 2, 1, 0];
        let snapshot = ClusterSnapshot::from_labels(&labels, 5).unwrap();

        assert_eq!(snapshot.counts(), &[2, 3, 1, 0, 1]);
        assert_eq!(snapshot.total(), labels.len());
    }

    #[test]
    fn test_snapshot_has_zero_counts_for_unused_clusters() {
        let snapshot = ClusterSnapshot::from_labels(&[2, 2, 2], 5).unwrap();

        assert_eq!(snapshot.n_clusters(), 5);
        assert_eq!(snapshot.count_for(0), Some(0));
        assert_eq!(snapshot.count_for(2), Some(3));
        assert_eq!(snapshot.count_for(4), Some(0));
    }

    #[test]
    fn test_out_of_range_label_is_rejected() {
        let result = ClusterSnapshot::from_labels(&[0, 5], 5);
        assert!(matches!(
            result,
            Err(HistoryError::LabelOutOfRange {
                label: 5,
                n_clusters: 5
            })
        ));
    }

    #[test]
    fn test_history_grows_by_one_per_run() {
        let mut history = RunHistory::new(5);
        assert!(history.is_empty());

        history.record_snapshot(&[0, 1, 2], ts(0)).unwrap();
        assert_eq!(history.len(), 1);

        let entries = history.record_snapshot(&[3, 3], ts(10)).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_earlier_entries_are_never_mutated() {
        let mut history = RunHistory::new(3);
        history.record_snapshot(&[0, 0, 1], ts(0)).unwrap();
        let first = history.entries()[0].clone();

        history.record_snapshot(&[2, 2, 2], ts(5)).unwrap();
        assert_eq!(history.entries()[0], first);
        assert!(history.entries()[0].recorded_at < history.entries()[1].recorded_at);
    }

    #[test]
    fn test_trend_needs_two_entries() {
        let mut history = RunHistory::new(5);
        assert!(history.trend_series().is_none());

        history.record_snapshot(&[0, 1, 1], ts(0)).unwrap();
        assert!(history.trend_series().is_none());

        history.record_snapshot(&[1, 1, 4], ts(30)).unwrap();
        let trend = history.trend_series().unwrap();

        assert_eq!(trend.timestamps, vec![ts(0), ts(30)]);
        assert_eq!(trend.series.len(), 5);
        assert_eq!(trend.series[1], vec![2, 2]);
        assert_eq!(trend.series[4], vec![0, 1]);
    }
}
