//! Render-side model of the dashboard.
//!
//! The [`Board`] is the only place panel output lands. It applies
//! [`RenderUpdate`]s in order and keeps what the widgets need to draw: capped
//! chart buffers with their ticks, texts, scalars, and replaceable layers.

use std::collections::BTreeMap;

use crate::axis::Tick;
use crate::geom::Point;
use crate::rays::RayLine;
use crate::render::RenderUpdate;
use crate::series::RollingWindow;

/// Points and ticks of one chart series.
#[derive(Debug, Clone)]
pub struct Chart {
    points: RollingWindow<Point>,
    ticks: Vec<Tick>,
}

impl Chart {
    fn new(rollover: usize) -> Self {
        Self {
            points: RollingWindow::new(rollover),
            ticks: Vec::new(),
        }
    }

    fn push(&mut self, point: Point, rollover: usize) {
        if self.points.capacity() != rollover.max(1) {
            let mut resized = RollingWindow::new(rollover);
            resized.extend(self.points.iter().copied());
            self.points = resized;
        }
        self.points.push(point);
    }

    /// Points in arrival order.
    pub fn points(&self) -> Vec<Point> {
        self.points.to_vec()
    }

    /// Number of points held.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check whether the chart has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Most recent point.
    pub fn latest(&self) -> Option<Point> {
        self.points.latest().copied()
    }

    /// Current x-axis ticks.
    pub fn ticks(&self) -> &[Tick] {
        &self.ticks
    }
}

/// State of every widget, keyed by target.
#[derive(Debug, Clone, Default)]
pub struct Board {
    charts: BTreeMap<String, Chart>,
    scalars: BTreeMap<String, f64>,
    texts: BTreeMap<String, String>,
    lines: BTreeMap<String, Vec<RayLine>>,
    points: BTreeMap<String, Vec<Point>>,
    generation: u64,
}

impl Board {
    /// Create an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one update.
    pub fn apply(&mut self, update: RenderUpdate) {
        self.generation = self.generation.wrapping_add(1);
        match update {
            RenderUpdate::AppendPoint {
                series,
                point,
                rollover,
            } => self
                .charts
                .entry(series)
                .or_insert_with(|| Chart::new(rollover))
                .push(point, rollover),
            RenderUpdate::ClearSeries { series } => {
                if let Some(chart) = self.charts.get_mut(&series) {
                    chart.points.clear();
                    chart.ticks.clear();
                }
            }
            RenderUpdate::SetScalar { target, value } => {
                self.scalars.insert(target, value);
            }
            RenderUpdate::SetText { target, text } => {
                self.texts.insert(target, text);
            }
            RenderUpdate::ReplaceLines { target, lines } => {
                self.lines.insert(target, lines);
            }
            RenderUpdate::ReplacePoints { target, points } => {
                self.points.insert(target, points);
            }
            RenderUpdate::SetTicks { target, ticks } => {
                self.charts
                    .entry(target)
                    .or_insert_with(|| Chart::new(1))
                    .ticks = ticks;
            }
        }
    }

    /// Apply updates in order.
    pub fn apply_all(&mut self, updates: impl IntoIterator<Item = RenderUpdate>) {
        for update in updates {
            self.apply(update);
        }
    }

    /// Chart series by key.
    pub fn chart(&self, series: &str) -> Option<&Chart> {
        self.charts.get(series)
    }

    /// Scalar widget value.
    pub fn scalar(&self, target: &str) -> Option<f64> {
        self.scalars.get(target).copied()
    }

    /// Text widget value.
    pub fn text(&self, target: &str) -> Option<&str> {
        self.texts.get(target).map(String::as_str)
    }

    /// Polyline layer.
    pub fn lines(&self, target: &str) -> &[RayLine] {
        self.lines.get(target).map(Vec::as_slice).unwrap_or_default()
    }

    /// Point layer.
    pub fn points(&self, target: &str) -> &[Point] {
        self.points.get(target).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of updates applied so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// One line per widget, for logs.
    pub fn summary(&self) -> Vec<String> {
        let charts = self.charts.iter().map(|(key, chart)| {
            let latest = chart
                .latest()
                .map(|p| format!("{:.3}", p.y))
                .unwrap_or_else(|| "-".to_string());
            format!("{key}: {} points, latest {latest}", chart.len())
        });
        let scalars = self
            .scalars
            .iter()
            .map(|(key, value)| format!("{key}: {value}"));
        let texts = self.texts.iter().map(|(key, text)| format!("{key}: {text}"));
        let layers = self
            .lines
            .iter()
            .map(|(key, lines)| format!("{key}: {} lines", lines.len()))
            .chain(
                self.points
                    .iter()
                    .map(|(key, points)| format!("{key}: {} points", points.len())),
            );
        charts.chain(scalars).chain(texts).chain(layers).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn append(series: &str, x: f64, rollover: usize) -> RenderUpdate {
        RenderUpdate::AppendPoint {
            series: series.to_string(),
            point: Point::new(x, x * 2.0),
            rollover,
        }
    }

    #[test]
    fn chart_rolls_over() {
        let mut board = Board::new();
        board.apply_all((0..5).map(|i| append("kpi/UL MCS", i as f64, 3)));
        let chart = board.chart("kpi/UL MCS").unwrap();
        let xs: Vec<f64> = chart.points().iter().map(|p| p.x).collect();
        assert_eq!(xs, [2.0, 3.0, 4.0]);
        assert_eq!(board.generation(), 5);
    }

    #[test]
    fn rollover_change_keeps_latest_points() {
        let mut board = Board::new();
        board.apply_all((0..4).map(|i| append("loss", i as f64, 10)));
        board.apply(append("loss", 4.0, 2));
        let xs: Vec<f64> = board.chart("loss").unwrap().points().iter().map(|p| p.x).collect();
        assert_eq!(xs, [3.0, 4.0]);
    }

    #[test]
    fn clear_series_empties_chart() {
        let mut board = Board::new();
        board.apply(append("loss", 1.0, 10));
        board.apply(RenderUpdate::SetTicks {
            target: "loss".to_string(),
            ticks: vec![Tick {
                value: 1.0,
                label: "1".to_string(),
            }],
        });
        board.apply(RenderUpdate::ClearSeries {
            series: "loss".to_string(),
        });
        let chart = board.chart("loss").unwrap();
        assert!(chart.is_empty());
        assert!(chart.ticks().is_empty());
    }

    #[test]
    fn widgets_keep_last_value() {
        let mut board = Board::new();
        board.apply(RenderUpdate::text("classifier", "No data"));
        board.apply(RenderUpdate::text("classifier", "jammer"));
        board.apply(RenderUpdate::scalar("slider", 12.0));
        board.apply(RenderUpdate::ReplacePoints {
            target: "rays/particles".to_string(),
            points: vec![Point::new(0.5, 0.5)],
        });
        assert_eq!(board.text("classifier"), Some("jammer"));
        assert_eq!(board.scalar("slider"), Some(12.0));
        assert_eq!(board.points("rays/particles").len(), 1);
        assert!(board.lines("rays/lines").is_empty());
        assert!(board.text("missing").is_none());
        assert_eq!(board.summary().len(), 3);
    }
}
