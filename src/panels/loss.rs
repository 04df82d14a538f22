use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::LossConfig;
use crate::error::Result;
use crate::panels::{Control, Panel, keys};
use crate::render::RenderUpdate;
use crate::replay::ReplayEngine;
use crate::series::{Sample, TimeSeries};

const NOISE_STD_DEV: f64 = 0.05;

/// Synthetic training loss for epochs `1..=epochs`.
///
/// Exponential decay `2 e^(-epoch/30) + 0.1` plus seeded Gaussian noise,
/// clipped at zero.
pub fn loss_curve(epochs: usize, seed: u64) -> TimeSeries {
    let mut rng = StdRng::seed_from_u64(seed);
    let samples = (1..=epochs as i64)
        .map(|epoch| {
            let base = 2.0 * (-(epoch as f64) / 30.0).exp() + 0.1;
            let loss = (base + NOISE_STD_DEV * standard_normal(&mut rng)).max(0.0);
            Sample::new(epoch, loss)
        })
        .collect();
    TimeSeries::new("Loss", samples)
}

// Box-Muller transform.
fn standard_normal(rng: &mut impl Rng) -> f64 {
    let u1: f64 = 1.0 - rng.r#gen::<f64>();
    let u2: f64 = rng.r#gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}

/// Loss-vs-epoch chart, one epoch per tick, with pause and reset.
pub struct LossPanel {
    engine: ReplayEngine,
    rollover: usize,
    interval: Duration,
    pending: Vec<RenderUpdate>,
}

impl LossPanel {
    /// Generate the curve and prime the first points.
    pub fn new(config: &LossConfig) -> Self {
        let rollover = config.epochs.max(1);
        let engine = ReplayEngine::new(loss_curve(config.epochs, config.seed), rollover)
            .with_prefill(config.prefill);
        let pending = engine
            .window()
            .iter()
            .map(|sample| append(*sample, rollover))
            .collect();
        Self {
            engine,
            rollover,
            interval: config.interval(),
            pending,
        }
    }

    /// Access the replay engine.
    pub fn engine(&self) -> &ReplayEngine {
        &self.engine
    }
}

fn append(sample: Sample, rollover: usize) -> RenderUpdate {
    RenderUpdate::AppendPoint {
        series: keys::LOSS.to_string(),
        point: sample.point(),
        rollover,
    }
}

impl Panel for LossPanel {
    fn id(&self) -> &str {
        keys::LOSS
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    fn tick(&mut self) -> Result<Vec<RenderUpdate>> {
        let mut updates = std::mem::take(&mut self.pending);
        if let Some(sample) = self.engine.tick() {
            updates.push(append(sample, self.rollover));
        }
        Ok(updates)
    }

    fn control(&mut self, control: Control) -> Vec<RenderUpdate> {
        match control {
            Control::Pause => self.engine.pause(),
            Control::Resume => self.engine.resume(),
            Control::Toggle => self.engine.toggle(),
            Control::Reset => {
                self.engine.reset();
                self.pending.clear();
                return vec![RenderUpdate::ClearSeries {
                    series: keys::LOSS.to_string(),
                }];
            }
        }
        Vec::new()
    }
}
