//! Shared replay position.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Most recently emitted timestamp, shared between panels.
///
/// One replay engine publishes; any number of lookup panels read. Readers may
/// see the value from before or after the writer's tick in the same round.
#[derive(Debug, Clone, Default)]
pub struct SharedTimestamp {
    value: Arc<AtomicI64>,
}

impl SharedTimestamp {
    /// Create a cell starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a new timestamp.
    pub fn publish(&self, timestamp: i64) {
        self.value.store(timestamp, Ordering::Release);
    }

    /// Read the latest timestamp.
    pub fn current(&self) -> i64 {
        self.value.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_observe_publishes() {
        let writer = SharedTimestamp::new();
        let reader = writer.clone();
        assert_eq!(reader.current(), 0);
        writer.publish(36_000_500);
        assert_eq!(reader.current(), 36_000_500);
    }
}
