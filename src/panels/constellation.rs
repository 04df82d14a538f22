//! Ratio and demapper constellation scatter pairs.
//!
//! Pairs are read from `*.json` files, each either
//! `{"ratio": [[re, im], ...], "demapper": [[re, im], ...]}` or
//! `{"x": [...], "y": [...]}` (ratio only). Without usable files two synthetic
//! sine/cosine traces are shown instead.

use std::f64::consts::TAU;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::geom::Point;
use crate::panels::{Panel, keys};
use crate::render::RenderUpdate;

/// Axis limit shared by both scatter plots.
pub const CONSTELLATION_LIMIT: f64 = 1.3;

/// Points of one ratio/demapper pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstellationPair {
    /// Left plot.
    pub ratio: Vec<Point>,
    /// Right plot; may be empty.
    pub demapper: Vec<Point>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PairFile {
    Complex {
        ratio: Vec<Point>,
        #[serde(default)]
        demapper: Vec<Point>,
    },
    Coordinates {
        x: Vec<f64>,
        y: Vec<f64>,
    },
}

impl TryFrom<PairFile> for ConstellationPair {
    type Error = Error;

    fn try_from(file: PairFile) -> Result<Self> {
        match file {
            PairFile::Complex { ratio, demapper } => Ok(Self { ratio, demapper }),
            PairFile::Coordinates { x, y } if x.len() == y.len() => Ok(Self {
                ratio: x.into_iter().zip(y).map(Point::from).collect(),
                demapper: Vec::new(),
            }),
            PairFile::Coordinates { x, y } => Err(Error::InvalidValue {
                metric: "constellation".to_string(),
                reason: format!("{} x values but {} y values", x.len(), y.len()),
            }),
        }
    }
}

fn read_pair(path: &Path) -> Result<ConstellationPair> {
    let text = std::fs::read_to_string(path)?;
    let file: PairFile = serde_json::from_str(&text)?;
    file.try_into()
}

/// Load every pair file of `dir` in name order, skipping unreadable ones.
///
/// Falls back to [`synthetic_pairs`] when nothing usable is found.
pub fn load_pairs(dir: Option<&Path>) -> Vec<ConstellationPair> {
    let mut pairs = Vec::new();
    if let Some(dir) = dir {
        match std::fs::read_dir(dir) {
            Ok(entries) => {
                let mut paths: Vec<_> = entries
                    .filter_map(|entry| entry.ok().map(|entry| entry.path()))
                    .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
                    .collect();
                paths.sort();
                for path in paths {
                    match read_pair(&path) {
                        Ok(pair) => pairs.push(pair),
                        Err(err) => {
                            warn!(path = %path.display(), error = %err, "skipping pair file")
                        }
                    }
                }
            }
            Err(err) => warn!(dir = %dir.display(), error = %err, "pair directory unreadable"),
        }
    }
    if pairs.is_empty() {
        debug!("using synthetic constellation pairs");
        return synthetic_pairs();
    }
    pairs
}

/// Sine and cosine traces over the plot range, ratio side only.
pub fn synthetic_pairs() -> Vec<ConstellationPair> {
    const SAMPLES: usize = 128;
    let t: Vec<f64> = (0..SAMPLES)
        .map(|i| -CONSTELLATION_LIMIT + 2.0 * CONSTELLATION_LIMIT * i as f64 / (SAMPLES - 1) as f64)
        .collect();
    let trace = |f: fn(f64) -> f64| ConstellationPair {
        ratio: t.iter().map(|&t| Point::new(t, 0.5 * f(TAU * t))).collect(),
        demapper: Vec::new(),
    };
    vec![trace(f64::sin), trace(f64::cos)]
}

/// Cycles through constellation pairs, one per tick.
pub struct ConstellationPanel {
    pairs: Vec<ConstellationPair>,
    index: usize,
    interval: Duration,
}

impl ConstellationPanel {
    /// Cycle through `pairs`.
    pub fn new(pairs: Vec<ConstellationPair>, interval: Duration) -> Self {
        Self {
            pairs,
            index: 0,
            interval,
        }
    }
}

impl Panel for ConstellationPanel {
    fn id(&self) -> &str {
        keys::CONSTELLATION
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    fn tick(&mut self) -> Result<Vec<RenderUpdate>> {
        if self.pairs.is_empty() {
            return Ok(Vec::new());
        }
        let pair = &self.pairs[self.index % self.pairs.len()];
        self.index = self.index.wrapping_add(1);
        Ok(vec![
            RenderUpdate::ReplacePoints {
                target: keys::RATIO.to_string(),
                points: pair.ratio.clone(),
            },
            RenderUpdate::ReplacePoints {
                target: keys::DEMAPPER.to_string(),
                points: pair.demapper.clone(),
            },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    #[test]
    fn synthetic_fallback_without_dir() {
        let pairs = load_pairs(None);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].ratio.len(), 128);
        assert!((pairs[0].ratio[0].x + 1.3).abs() < 1e-12);
        assert!((pairs[0].ratio[127].x - 1.3).abs() < 1e-12);
        assert!(pairs[1].demapper.is_empty());
    }

    #[test]
    fn loads_both_file_shapes_and_skips_bad_ones() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("a.json"),
            r#"{"ratio": [[0.1, 0.2], [0.3, -0.4]], "demapper": [[1.0, 0.0]]}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("b.json"), r#"{"x": [0.5, 0.6], "y": [0.7, 0.8]}"#).unwrap();
        std::fs::write(dir.path().join("c.json"), r#"{"x": [0.5], "y": []}"#).unwrap();
        std::fs::write(dir.path().join("d.json"), "not json").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let pairs = load_pairs(Some(dir.path()));
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].demapper, vec![Point::new(1.0, 0.0)]);
        assert_eq!(pairs[1].ratio[1], Point::new(0.6, 0.8));
    }

    #[test]
    fn empty_dir_falls_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(load_pairs(Some(dir.path())), synthetic_pairs());
    }

    #[test]
    fn panel_cycles_pairs() {
        let mut panel = ConstellationPanel::new(synthetic_pairs(), Duration::from_secs(1));
        let mut board = Board::new();
        board.apply_all(panel.tick().unwrap());
        let first = board.points("constellation/ratio").to_vec();
        board.apply_all(panel.tick().unwrap());
        assert_ne!(board.points("constellation/ratio"), first.as_slice());
        board.apply_all(panel.tick().unwrap());
        assert_eq!(board.points("constellation/ratio"), first.as_slice());
    }
}
