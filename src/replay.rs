//! Windowed replay of a recorded series.
//!
//! A [`ReplayEngine`] walks a cursor through a [`TimeSeries`], one sample per
//! tick, keeping the most recent samples in a [`RollingWindow`]. When the
//! cursor reaches the end the engine goes idle; it never wraps around.

use tracing::trace;

use crate::clock::SharedTimestamp;
use crate::series::{RollingWindow, Sample, TimeSeries};

/// Whether the engine emits on tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayState {
    /// Ticks emit samples.
    Running,
    /// Ticks are ignored; the cursor is kept.
    Paused,
}

/// Cursor-driven replay of one series into a bounded window.
#[derive(Debug, Clone)]
pub struct ReplayEngine {
    series: TimeSeries,
    window: RollingWindow<Sample>,
    cursor: usize,
    state: ReplayState,
    publisher: Option<SharedTimestamp>,
}

impl ReplayEngine {
    /// Create an engine with an empty window and the cursor at zero.
    pub fn new(series: TimeSeries, capacity: usize) -> Self {
        Self {
            series,
            window: RollingWindow::new(capacity),
            cursor: 0,
            state: ReplayState::Running,
            publisher: None,
        }
    }

    /// Prime the window with the first `count` samples.
    ///
    /// The cursor starts right after the primed samples. The count is capped
    /// by the window capacity and the series length.
    pub fn with_prefill(mut self, count: usize) -> Self {
        self.prime(count);
        self
    }

    /// Publish every emitted timestamp to `publisher`.
    ///
    /// A primed window publishes its latest timestamp right away.
    pub fn with_publisher(mut self, publisher: SharedTimestamp) -> Self {
        if let Some(latest) = self.window.latest() {
            publisher.publish(latest.timestamp);
        }
        self.publisher = Some(publisher);
        self
    }

    fn prime(&mut self, count: usize) {
        let count = count.min(self.window.capacity()).min(self.series.len());
        self.window.clear();
        self.window
            .extend(self.series.samples()[..count].iter().copied());
        self.cursor = count;
    }

    /// Advance by one sample.
    ///
    /// Returns the emitted sample, or `None` when paused or exhausted.
    pub fn tick(&mut self) -> Option<Sample> {
        if self.state == ReplayState::Paused {
            return None;
        }
        let sample = self.series.get(self.cursor)?;
        self.window.push(sample);
        if let Some(publisher) = &self.publisher {
            publisher.publish(sample.timestamp);
        }
        self.cursor += 1;
        trace!(series = self.series.name(), cursor = self.cursor, "replay tick");
        Some(sample)
    }

    /// Suspend emission, keeping the cursor.
    pub fn pause(&mut self) {
        self.state = ReplayState::Paused;
    }

    /// Resume emission.
    pub fn resume(&mut self) {
        self.state = ReplayState::Running;
    }

    /// Flip between running and paused.
    pub fn toggle(&mut self) {
        self.state = match self.state {
            ReplayState::Running => ReplayState::Paused,
            ReplayState::Paused => ReplayState::Running,
        };
    }

    /// Rewind to the start and clear the window.
    ///
    /// The prefill only applies at construction; after a reset the window
    /// grows again from the first sample.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.window.clear();
    }

    /// Index of the next sample to emit.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Current running state.
    pub fn state(&self) -> ReplayState {
        self.state
    }

    /// Check whether every sample has been emitted.
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.series.len()
    }

    /// Access the replayed series.
    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    /// Access the rolling window.
    pub fn window(&self) -> &RollingWindow<Sample> {
        &self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(len: i64) -> TimeSeries {
        TimeSeries::new(
            "test",
            (0..len).map(|i| Sample::new(i * 10, i as f64)).collect(),
        )
    }

    #[test]
    fn emits_in_order_then_idles() {
        let mut engine = ReplayEngine::new(series(3), 2);
        let emitted: Vec<i64> = std::iter::from_fn(|| engine.tick())
            .map(|s| s.timestamp)
            .collect();
        assert_eq!(emitted, [0, 10, 20]);
        assert!(engine.is_exhausted());
        assert_eq!(engine.tick(), None);
        assert_eq!(engine.cursor(), 3);
        let window: Vec<i64> = engine.window().iter().map(|s| s.timestamp).collect();
        assert_eq!(window, [10, 20]);
    }

    #[test]
    fn cursor_is_monotonic_until_reset() {
        let mut engine = ReplayEngine::new(series(5), 3);
        let mut last = engine.cursor();
        for _ in 0..8 {
            engine.tick();
            assert!(engine.cursor() >= last);
            last = engine.cursor();
        }
        engine.reset();
        assert_eq!(engine.cursor(), 0);
        assert!(engine.window().is_empty());
    }

    #[test]
    fn pause_keeps_cursor() {
        let mut engine = ReplayEngine::new(series(5), 3);
        engine.tick();
        engine.pause();
        assert_eq!(engine.tick(), None);
        assert_eq!(engine.cursor(), 1);
        engine.resume();
        assert_eq!(engine.tick().map(|s| s.timestamp), Some(10));
        engine.toggle();
        assert_eq!(engine.state(), ReplayState::Paused);
    }

    #[test]
    fn prefill_primes_window() {
        let mut engine = ReplayEngine::new(series(30), 21).with_prefill(21);
        assert_eq!(engine.window().len(), 21);
        assert_eq!(engine.cursor(), 21);
        assert_eq!(engine.tick().map(|s| s.timestamp), Some(210));
        assert_eq!(engine.window().len(), 21);

        engine.reset();
        assert_eq!(engine.cursor(), 0);
        assert!(engine.window().is_empty());
    }

    #[test]
    fn prefill_is_capped_by_series() {
        let engine = ReplayEngine::new(series(2), 21).with_prefill(21);
        assert_eq!(engine.cursor(), 2);
        assert!(engine.is_exhausted());
    }

    #[test]
    fn publishes_emitted_timestamps() {
        let shared = SharedTimestamp::new();
        let mut engine = ReplayEngine::new(series(3), 2).with_publisher(shared.clone());
        engine.tick();
        engine.tick();
        assert_eq!(shared.current(), 10);

        let primed = SharedTimestamp::new();
        let _engine = ReplayEngine::new(series(30), 21)
            .with_prefill(21)
            .with_publisher(primed.clone());
        assert_eq!(primed.current(), 200);
    }

    #[test]
    fn empty_series_never_emits() {
        let mut engine = ReplayEngine::new(TimeSeries::empty("none"), 4).with_prefill(2);
        assert_eq!(engine.tick(), None);
        assert!(engine.window().is_empty());
    }
}
