use std::time::Duration;

use tracing::debug;

use crate::axis::{AxisFormatter, stride_ticks};
use crate::clock::SharedTimestamp;
use crate::config::KpiConfig;
use crate::datasource::Dataset;
use crate::error::Result;
use crate::panels::{Control, NO_DATA, Panel, keys};
use crate::render::RenderUpdate;
use crate::replay::ReplayEngine;

struct KpiChart {
    key: String,
    engine: ReplayEngine,
}

/// Grid of KPI line charts replayed in lockstep.
///
/// Each chart starts with a full window and appends one sample per tick. The
/// first chart with data publishes the shared timestamp that lookup panels
/// follow.
pub struct KpiGrid {
    charts: Vec<KpiChart>,
    window: usize,
    tick_stride: usize,
    interval: Duration,
    pending: Vec<RenderUpdate>,
}

impl KpiGrid {
    /// Build one chart per KPI series of `dataset`.
    pub fn new(dataset: &Dataset, config: &KpiConfig, clock: SharedTimestamp) -> Self {
        let mut publisher = Some(clock);
        let charts: Vec<KpiChart> = dataset
            .graphs()
            .iter()
            .map(|series| {
                let mut engine =
                    ReplayEngine::new(series.clone(), config.window).with_prefill(config.window);
                if !series.is_empty()
                    && let Some(clock) = publisher.take()
                {
                    engine = engine.with_publisher(clock);
                }
                KpiChart {
                    key: keys::kpi_series(series.name()),
                    engine,
                }
            })
            .collect();

        let mut grid = Self {
            charts,
            window: config.window,
            tick_stride: config.tick_stride,
            interval: config.interval(),
            pending: Vec::new(),
        };
        grid.pending = grid.primed_updates();
        grid
    }

    fn primed_updates(&self) -> Vec<RenderUpdate> {
        let mut updates = Vec::new();
        for chart in &self.charts {
            updates.extend(chart.engine.window().iter().map(|sample| {
                RenderUpdate::AppendPoint {
                    series: chart.key.clone(),
                    point: sample.point(),
                    rollover: self.window,
                }
            }));
            updates.push(self.ticks(chart));
        }
        updates
    }

    fn ticks(&self, chart: &KpiChart) -> RenderUpdate {
        let xs: Vec<f64> = chart
            .engine
            .window()
            .iter()
            .map(|sample| sample.timestamp as f64)
            .collect();
        RenderUpdate::SetTicks {
            target: chart.key.clone(),
            ticks: stride_ticks(&xs, self.tick_stride, &AxisFormatter::TimeOfDay),
        }
    }
}

impl Panel for KpiGrid {
    fn id(&self) -> &str {
        keys::KPI
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    fn tick(&mut self) -> Result<Vec<RenderUpdate>> {
        // The primed window is the whole first frame; replay starts on the next tick.
        let primed = !self.pending.is_empty();
        let mut updates = std::mem::take(&mut self.pending);
        for chart in &mut self.charts {
            if chart.engine.series().is_empty() {
                updates.push(RenderUpdate::text(chart.key.clone(), NO_DATA));
                continue;
            }
            if primed {
                continue;
            }
            if let Some(sample) = chart.engine.tick() {
                updates.push(RenderUpdate::AppendPoint {
                    series: chart.key.clone(),
                    point: sample.point(),
                    rollover: self.window,
                });
            }
        }
        if primed {
            return Ok(updates);
        }
        let ticks: Vec<RenderUpdate> = self
            .charts
            .iter()
            .filter(|chart| !chart.engine.window().is_empty())
            .map(|chart| self.ticks(chart))
            .collect();
        updates.extend(ticks);
        Ok(updates)
    }

    fn control(&mut self, control: Control) -> Vec<RenderUpdate> {
        for chart in &mut self.charts {
            match control {
                Control::Pause => chart.engine.pause(),
                Control::Resume => chart.engine.resume(),
                Control::Toggle => chart.engine.toggle(),
                Control::Reset => {}
            }
        }
        if control == Control::Reset {
            debug!("kpi replay does not rewind");
        }
        Vec::new()
    }
}
