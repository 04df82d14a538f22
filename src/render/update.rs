use crate::axis::Tick;
use crate::geom::Point;
use crate::rays::RayLine;

/// One change a panel asks the render side to make.
///
/// Targets are plain string keys such as `kpi/UL SINR`; the render side keeps
/// whatever state a target needs on first use.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderUpdate {
    /// Append a point to a chart series, keeping at most `rollover` points.
    AppendPoint {
        /// Chart series key.
        series: String,
        /// New point.
        point: Point,
        /// Maximum number of points kept.
        rollover: usize,
    },
    /// Drop every point of a chart series.
    ClearSeries {
        /// Chart series key.
        series: String,
    },
    /// Set a numeric widget value.
    SetScalar {
        /// Widget key.
        target: String,
        /// New value.
        value: f64,
    },
    /// Set a text widget value.
    SetText {
        /// Widget key.
        target: String,
        /// New text.
        text: String,
    },
    /// Replace a layer of polylines.
    ReplaceLines {
        /// Layer key.
        target: String,
        /// New polylines.
        lines: Vec<RayLine>,
    },
    /// Replace a layer of points.
    ReplacePoints {
        /// Layer key.
        target: String,
        /// New points.
        points: Vec<Point>,
    },
    /// Replace the x-axis ticks of a chart.
    SetTicks {
        /// Chart series key.
        target: String,
        /// New ticks.
        ticks: Vec<Tick>,
    },
}

impl RenderUpdate {
    /// Text update for `target`.
    pub fn text(target: impl Into<String>, text: impl Into<String>) -> Self {
        Self::SetText {
            target: target.into(),
            text: text.into(),
        }
    }

    /// Scalar update for `target`.
    pub fn scalar(target: impl Into<String>, value: f64) -> Self {
        Self::SetScalar {
            target: target.into(),
            value,
        }
    }
}
