//! Timestamp-keyed lookups for panels that follow the replay position.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use crate::clock::SharedTimestamp;

/// Values keyed by day-millisecond timestamp.
#[derive(Debug, Clone)]
pub struct KeyedSeries<V> {
    entries: BTreeMap<i64, V>,
}

impl<V> Default for KeyedSeries<V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<V> KeyedSeries<V> {
    /// Create an empty series.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any value at the same timestamp.
    pub fn insert(&mut self, timestamp: i64, value: V) {
        self.entries.insert(timestamp, value);
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value stored exactly at `timestamp`.
    pub fn get_exact(&self, timestamp: i64) -> Option<&V> {
        self.entries.get(&timestamp)
    }

    /// Entry whose key is closest to `timestamp`.
    ///
    /// On equal distance the smaller key wins.
    pub fn nearest(&self, timestamp: i64) -> Option<(i64, &V)> {
        let below = self
            .entries
            .range((Bound::Unbounded, Bound::Included(timestamp)))
            .next_back();
        let above = self
            .entries
            .range((Bound::Excluded(timestamp), Bound::Unbounded))
            .next();
        match (below, above) {
            (Some((lo, lo_value)), Some((hi, hi_value))) => {
                if timestamp.abs_diff(*hi) < timestamp.abs_diff(*lo) {
                    Some((*hi, hi_value))
                } else {
                    Some((*lo, lo_value))
                }
            }
            (Some((key, value)), None) | (None, Some((key, value))) => Some((*key, value)),
            (None, None) => None,
        }
    }

    /// Exact match, falling back to the nearest key.
    pub fn lookup(&self, timestamp: i64) -> Option<&V> {
        self.get_exact(timestamp)
            .or_else(|| self.nearest(timestamp).map(|(_, value)| value))
    }

    /// Iterate entries in timestamp order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &V)> {
        self.entries.iter().map(|(key, value)| (*key, value))
    }
}

impl<V> FromIterator<(i64, V)> for KeyedSeries<V> {
    fn from_iter<I: IntoIterator<Item = (i64, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// A keyed series read at the shared replay position.
#[derive(Debug, Clone)]
pub struct TimestampLookup<V> {
    series: Arc<KeyedSeries<V>>,
    position: SharedTimestamp,
}

impl<V> TimestampLookup<V> {
    /// Bind a series to the shared position.
    pub fn new(series: impl Into<Arc<KeyedSeries<V>>>, position: SharedTimestamp) -> Self {
        Self {
            series: series.into(),
            position,
        }
    }

    /// Resolve the value for the current position.
    ///
    /// Returns `None` only when the series is empty.
    pub fn resolve(&self) -> Option<&V> {
        self.series.lookup(self.position.current())
    }

    /// Access the underlying series.
    pub fn series(&self) -> &KeyedSeries<V> {
        &self.series
    }

    /// Timestamp the lookup will read next.
    pub fn position(&self) -> i64 {
        self.position.current()
    }
}
