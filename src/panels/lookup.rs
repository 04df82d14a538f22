//! Panels that show the value recorded at the shared replay position.

use std::time::Duration;

use tracing::debug;

use crate::clock::SharedTimestamp;
use crate::config::SliderConfig;
use crate::datasource::{Dataset, SchedulingPolicy, classify};
use crate::error::Result;
use crate::lookup::TimestampLookup;
use crate::panels::{NO_DATA, NOT_AVAILABLE, Panel, keys};
use crate::render::RenderUpdate;
use crate::view::Range;

/// Resource blocks assigned to the slice, shown on a read-only slider.
pub struct RbsSliderPanel {
    lookup: TimestampLookup<f64>,
    range: Range,
    interval: Duration,
}

impl RbsSliderPanel {
    /// Follow `clock` through the dataset's assigned resource blocks.
    pub fn new(
        dataset: &Dataset,
        clock: SharedTimestamp,
        slider: &SliderConfig,
        interval: Duration,
    ) -> Self {
        Self {
            lookup: TimestampLookup::new(dataset.rbs_assigned().clone(), clock),
            range: Range::new(slider.min, slider.max),
            interval,
        }
    }

    /// Slider bounds.
    pub fn range(&self) -> Range {
        self.range
    }
}

impl Panel for RbsSliderPanel {
    fn id(&self) -> &str {
        keys::RBS_ASSIGNED
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    fn tick(&mut self) -> Result<Vec<RenderUpdate>> {
        let value = self.lookup.resolve().copied().unwrap_or(0.0);
        debug!(position = self.lookup.position(), value, "rbs assigned");
        Ok(vec![RenderUpdate::scalar(keys::RBS_ASSIGNED, value)])
    }
}

/// Class label of the xApp log line nearest to the replay position.
pub struct ClassifierPanel {
    lookup: TimestampLookup<String>,
    interval: Duration,
}

impl ClassifierPanel {
    /// Follow `clock` through the dataset's log classes.
    pub fn new(dataset: &Dataset, clock: SharedTimestamp, interval: Duration) -> Self {
        Self {
            lookup: TimestampLookup::new(dataset.log_classes().clone(), clock),
            interval,
        }
    }
}

impl Panel for ClassifierPanel {
    fn id(&self) -> &str {
        keys::CLASSIFIER
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    fn tick(&mut self) -> Result<Vec<RenderUpdate>> {
        let Some(output) = self.lookup.resolve() else {
            debug!(position = self.lookup.position(), "no classifier output");
            return Ok(vec![
                RenderUpdate::text(keys::CLASSIFIER, NO_DATA),
                RenderUpdate::text(keys::CLASSIFIER_RAW, NO_DATA),
            ]);
        };
        let label = classify(output)?;
        Ok(vec![
            RenderUpdate::text(keys::CLASSIFIER, label),
            RenderUpdate::text(keys::CLASSIFIER_RAW, output.as_str()),
        ])
    }
}

/// Name of the scheduling policy active at the replay position.
pub struct SchedulingPanel {
    lookup: TimestampLookup<i64>,
    interval: Duration,
}

impl SchedulingPanel {
    /// Follow `clock` through the dataset's scheduling policy codes.
    pub fn new(dataset: &Dataset, clock: SharedTimestamp, interval: Duration) -> Self {
        Self {
            lookup: TimestampLookup::new(dataset.scheduling_policy().clone(), clock),
            interval,
        }
    }
}

impl Panel for SchedulingPanel {
    fn id(&self) -> &str {
        keys::SCHEDULING
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    fn tick(&mut self) -> Result<Vec<RenderUpdate>> {
        debug!(position = self.lookup.position(), "scheduling policy lookup");
        let text = match self.lookup.resolve() {
            Some(code) => SchedulingPolicy::from_code(*code)?.name(),
            None => NOT_AVAILABLE,
        };
        Ok(vec![RenderUpdate::text(keys::SCHEDULING, text)])
    }
}
