//! Dashboard configuration loaded from YAML.
//!
//! Every field has a default, so an empty file (or no file at all) gives the
//! standard dashboard.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::rays::RayTiming;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Root of the JSON document store.
    pub data_dir: PathBuf,
    /// KPI chart grid.
    pub kpi: KpiConfig,
    /// Lookup panels (slider, classifier, policy, toggle).
    pub lookup: LookupConfig,
    /// Resource block slider range.
    pub slider: SliderConfig,
    /// Loss-vs-epoch chart.
    pub loss: LossConfig,
    /// Ray animation.
    pub rays: RayTiming,
    /// Optional ray scene file; the demo scene is used when unset.
    pub scene: Option<PathBuf>,
    /// Constellation pairs.
    pub constellation: ConstellationConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/store"),
            kpi: KpiConfig::default(),
            lookup: LookupConfig::default(),
            slider: SliderConfig::default(),
            loss: LossConfig::default(),
            rays: RayTiming::default(),
            scene: None,
            constellation: ConstellationConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Load a configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&text)?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Parse configuration text; blank text gives the defaults.
    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }
}

/// KPI chart grid settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KpiConfig {
    /// Points kept per chart.
    pub window: usize,
    /// Tick period in milliseconds.
    pub interval_ms: u64,
    /// Label every n-th point on the x axis.
    pub tick_stride: usize,
}

impl Default for KpiConfig {
    fn default() -> Self {
        Self {
            window: 21,
            interval_ms: 500,
            tick_stride: 5,
        }
    }
}

impl KpiConfig {
    /// Tick period.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Settings shared by the panels that read the shared timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Tick period in milliseconds.
    pub interval_ms: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self { interval_ms: 500 }
    }
}

impl LookupConfig {
    /// Tick period.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Slider bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderConfig {
    /// Lowest value.
    pub min: f64,
    /// Highest value.
    pub max: f64,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self { min: 0.0, max: 50.0 }
    }
}

/// Loss-vs-epoch chart settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LossConfig {
    /// Number of generated epochs.
    pub epochs: usize,
    /// Points shown before the first tick.
    pub prefill: usize,
    /// Tick period in milliseconds.
    pub interval_ms: u64,
    /// Seed of the noise generator.
    pub seed: u64,
}

impl Default for LossConfig {
    fn default() -> Self {
        Self {
            epochs: 100,
            prefill: 5,
            interval_ms: 1000,
            seed: 42,
        }
    }
}

impl LossConfig {
    /// Tick period.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Constellation pair settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstellationConfig {
    /// Directory of `*.json` pair files; synthetic pairs are used when unset
    /// or empty.
    pub dir: Option<PathBuf>,
    /// Tick period in milliseconds.
    pub interval_ms: u64,
}

impl Default for ConstellationConfig {
    fn default() -> Self {
        Self {
            dir: None,
            interval_ms: 1000,
        }
    }
}

impl ConstellationConfig {
    /// Tick period.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_gives_defaults() {
        let config = DashboardConfig::from_yaml("").unwrap();
        assert_eq!(config.kpi.window, 21);
        assert_eq!(config.kpi.tick_stride, 5);
        assert_eq!(config.loss.seed, 42);
        assert_eq!(config.rays.interval_ms, 50);
        assert_eq!(config.data_dir, PathBuf::from("data/store"));
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let config = DashboardConfig::from_yaml(
            "data_dir: /tmp/store\nkpi:\n  window: 30\nrays:\n  transmissions: 2\n",
        )
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/store"));
        assert_eq!(config.kpi.window, 30);
        assert_eq!(config.kpi.interval_ms, 500);
        assert_eq!(config.rays.transmissions, 2);
        assert_eq!(config.rays.grow_speed, 0.6);
    }

    #[test]
    fn invalid_yaml_is_config_error() {
        assert!(matches!(
            DashboardConfig::from_yaml("kpi: [1, 2"),
            Err(crate::error::Error::Config(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("dashboard.yaml");
        std::fs::write(&path, "loss:\n  epochs: 10\n").unwrap();
        let config = DashboardConfig::from_file(&path).unwrap();
        assert_eq!(config.loss.epochs, 10);
        assert_eq!(config.loss.prefill, 5);
    }
}
