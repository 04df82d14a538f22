//! Recorded time series and rolling windows.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::geom::Point;

/// One recorded sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Milliseconds since start of day.
    pub timestamp: i64,
    /// Recorded value.
    pub value: f64,
}

impl Sample {
    /// Create a sample.
    pub fn new(timestamp: i64, value: f64) -> Self {
        Self { timestamp, value }
    }

    /// View the sample as a chart point.
    pub fn point(&self) -> Point {
        Point::new(self.timestamp as f64, self.value)
    }
}

/// Immutable series of samples ordered by timestamp.
///
/// Clones share the underlying storage.
#[derive(Debug, Clone, Default)]
pub struct TimeSeries {
    name: Arc<str>,
    samples: Arc<[Sample]>,
}

impl TimeSeries {
    /// Build a series, sorting samples by timestamp.
    ///
    /// Sorting is stable so samples that share a timestamp keep their order.
    pub fn new(name: impl Into<Arc<str>>, mut samples: Vec<Sample>) -> Self {
        samples.sort_by_key(|sample| sample.timestamp);
        Self {
            name: name.into(),
            samples: samples.into(),
        }
    }

    /// Create an empty series.
    pub fn empty(name: impl Into<Arc<str>>) -> Self {
        Self::new(name, Vec::new())
    }

    /// Access the series name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Access all samples.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Access a sample by index.
    pub fn get(&self, index: usize) -> Option<Sample> {
        self.samples.get(index).copied()
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if there are no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Fixed-capacity FIFO buffer of the most recent items.
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> RollingWindow<T> {
    /// Create a window holding at most `capacity` items.
    ///
    /// A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an item, evicting the oldest one when full.
    ///
    /// Returns the evicted item.
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.items.len() >= self.capacity {
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(item);
        evicted
    }

    /// Remove all items.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Maximum number of items.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of items held.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the window is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Most recent item.
    pub fn latest(&self) -> Option<&T> {
        self.items.back()
    }

    /// Iterate from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.items.iter()
    }
}

impl<T: Clone> RollingWindow<T> {
    /// Copy the items out, oldest first.
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

impl<T> Extend<T> for RollingWindow<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn series_sorts_by_timestamp() {
        let series = TimeSeries::new(
            "UL SINR",
            vec![Sample::new(30, 3.0), Sample::new(10, 1.0), Sample::new(20, 2.0)],
        );
        let stamps: Vec<i64> = series.samples().iter().map(|s| s.timestamp).collect();
        assert_eq!(stamps, [10, 20, 30]);
        assert_eq!(series.name(), "UL SINR");
    }

    #[test]
    fn window_evicts_oldest() {
        let mut window = RollingWindow::new(3);
        assert_eq!(window.push(1), None);
        window.push(2);
        window.push(3);
        assert_eq!(window.push(4), Some(1));
        assert_eq!(window.to_vec(), [2, 3, 4]);
        assert_eq!(window.latest(), Some(&4));
        window.clear();
        assert!(window.is_empty());
    }

    proptest! {
        #[test]
        fn window_keeps_last_items(capacity in 1_usize..32, items in proptest::collection::vec(any::<i32>(), 0..128)) {
            let mut window = RollingWindow::new(capacity);
            for item in &items {
                window.push(*item);
                prop_assert!(window.len() <= capacity);
            }
            let start = items.len().saturating_sub(capacity);
            prop_assert_eq!(window.to_vec(), items[start..].to_vec());
        }
    }
}
