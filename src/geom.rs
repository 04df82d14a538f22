//! Geometric primitives and polyline helpers.
//!
//! [`Point`] is used both for chart data (timestamp, value) and for the
//! normalized 0..1 scene coordinates of the ray animation. Screen-space types
//! are used by the drawing code.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Length used in place of zero-length segments.
const DEGENERATE_SEGMENT: f64 = 1e-9;

/// A point in data or scene space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X value.
    pub x: f64,
    /// Y value.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Linear interpolation towards `other`.
    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point::new(
            self.x + t * (other.x - self.x),
            self.y + t * (other.y - self.y),
        )
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl Serialize for Point {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.x, self.y).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Point {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (x, y) = <(f64, f64)>::deserialize(deserializer)?;
        Ok(Point::new(x, y))
    }
}

/// Segment lengths of a polyline and their sum.
pub fn polyline_lengths(points: &[Point]) -> (Vec<f64>, f64) {
    let lengths: Vec<f64> = points
        .windows(2)
        .map(|pair| pair[0].distance(pair[1]))
        .collect();
    let total = lengths.iter().sum();
    (lengths, total)
}

/// Point at arc-length fraction `t` along a polyline.
///
/// Returns `None` for an empty polyline.
pub fn point_along_polyline(points: &[Point], t: f64) -> Option<Point> {
    let first = *points.first()?;
    let last = *points.last()?;
    if t <= 0.0 {
        return Some(first);
    }
    if t >= 1.0 {
        return Some(last);
    }
    let (lengths, total) = polyline_lengths(points);
    let target = t * total;
    let mut acc = 0.0;
    for (index, length) in lengths.iter().enumerate() {
        if acc + length >= target {
            let frac = (target - acc) / effective_length(*length);
            return Some(points[index].lerp(points[index + 1], frac));
        }
        acc += length;
    }
    Some(last)
}

/// Prefix of a polyline cut at arc-length fraction `frac`.
///
/// The final point is interpolated inside the segment that contains the cut.
/// Fractions at or below zero give the first point alone, fractions at or
/// above one give the full path.
pub fn partial_polyline(points: &[Point], frac: f64) -> Vec<Point> {
    let Some(first) = points.first().copied() else {
        return Vec::new();
    };
    if frac <= 0.0 {
        return vec![first];
    }
    if frac >= 1.0 {
        return points.to_vec();
    }
    let (lengths, total) = polyline_lengths(points);
    let target = frac * total;
    let mut acc = 0.0;
    let mut out = vec![first];
    for (index, length) in lengths.iter().enumerate() {
        if acc + length < target - 1e-12 {
            out.push(points[index + 1]);
        } else {
            if *length <= 1e-12 {
                out.push(points[index + 1]);
            } else {
                let seg_frac = (target - acc) / length;
                out.push(points[index].lerp(points[index + 1], seg_frac));
            }
            break;
        }
        acc += length;
    }
    out
}

fn effective_length(length: f64) -> f64 {
    if length == 0.0 {
        DEGENERATE_SEGMENT
    } else {
        length
    }
}

/// A point in screen space (pixel coordinates).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    /// X value in screen pixels.
    pub x: f32,
    /// Y value in screen pixels.
    pub y: f32,
}

impl ScreenPoint {
    /// Create a new screen point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A rectangle in screen space (pixel coordinates).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    /// Top-left corner.
    pub min: ScreenPoint,
    /// Bottom-right corner.
    pub max: ScreenPoint,
}

impl ScreenRect {
    /// Create a new screen rectangle from corners.
    pub fn new(min: ScreenPoint, max: ScreenPoint) -> Self {
        Self { min, max }
    }

    /// Rectangle width in pixels.
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Rectangle height in pixels.
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Check whether the rectangle has positive area.
    pub fn is_valid(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }

    /// Shrink every edge by `amount` pixels.
    pub fn inset(&self, amount: f32) -> Self {
        Self::new(
            ScreenPoint::new(self.min.x + amount, self.min.y + amount),
            ScreenPoint::new(self.max.x - amount, self.max.y - amount),
        )
    }

    /// Check whether a point lies inside the rectangle, edges included.
    pub fn contains(&self, point: ScreenPoint) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Split off a band of `height` pixels from the top.
    pub fn split_top(&self, height: f32) -> (Self, Self) {
        let cut = (self.min.y + height).min(self.max.y);
        (
            Self::new(self.min, ScreenPoint::new(self.max.x, cut)),
            Self::new(ScreenPoint::new(self.min.x, cut), self.max),
        )
    }

    /// Cells of a row-major grid with `columns` columns holding `count` cells.
    pub fn grid(&self, columns: usize, count: usize) -> Vec<Self> {
        if columns == 0 || count == 0 {
            return Vec::new();
        }
        let rows = count.div_ceil(columns);
        let cell_w = self.width() / columns as f32;
        let cell_h = self.height() / rows as f32;
        (0..count)
            .map(|index| {
                let x = self.min.x + (index % columns) as f32 * cell_w;
                let y = self.min.y + (index / columns) as f32 * cell_h;
                Self::new(
                    ScreenPoint::new(x, y),
                    ScreenPoint::new(x + cell_w, y + cell_h),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn line() -> Vec<Point> {
        vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]
    }

    #[test]
    fn partial_polyline_cuts_at_fraction() {
        let path = partial_polyline(&line(), 0.5);
        assert_eq!(path, vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0)]);
        assert_eq!(partial_polyline(&line(), 0.0), vec![Point::new(0.0, 0.0)]);
        assert_eq!(partial_polyline(&line(), 1.0), line());
    }

    #[test]
    fn partial_polyline_spans_segments() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
        ];
        let path = partial_polyline(&points, 0.75);
        assert_eq!(path.len(), 3);
        let end = path[2];
        assert!((end.x - 1.0).abs() < 1e-12);
        assert!((end.y - 0.5).abs() < 1e-12);
    }

    #[test]
    fn point_along_clamps_and_interpolates() {
        let points = line();
        assert_eq!(point_along_polyline(&points, -1.0), Some(points[0]));
        assert_eq!(point_along_polyline(&points, 2.0), Some(points[1]));
        assert_eq!(point_along_polyline(&points, 0.25), Some(Point::new(2.5, 0.0)));
        assert_eq!(point_along_polyline(&[], 0.5), None);
    }

    #[test]
    fn degenerate_segments_do_not_divide_by_zero() {
        let points = vec![
            Point::new(1.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 1.0),
        ];
        let point = point_along_polyline(&points, 0.5).unwrap();
        assert!(point.x.is_finite() && point.y.is_finite());
        let path = partial_polyline(&points, 0.5);
        assert!(path.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }

    #[test]
    fn lengths_sum_segments() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(3.0, 4.0),
            Point::new(3.0, 0.0),
        ];
        let (lengths, total) = polyline_lengths(&points);
        assert_eq!(lengths, vec![5.0, 4.0]);
        assert_eq!(total, 9.0);
    }

    #[test]
    fn grid_splits_row_major() {
        let rect = ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(300.0, 200.0));
        let cells = rect.grid(3, 6);
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[4].min, ScreenPoint::new(100.0, 100.0));
        assert_eq!(cells[4].max, ScreenPoint::new(200.0, 200.0));
        assert!(rect.grid(0, 3).is_empty());
    }

    #[test]
    fn split_top_keeps_area() {
        let rect = ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(10.0, 10.0));
        let (top, rest) = rect.split_top(4.0);
        assert_eq!(top.height() + rest.height(), 10.0);
        assert!(rest.contains(ScreenPoint::new(5.0, 4.0)));
        assert!(!top.contains(ScreenPoint::new(5.0, 6.0)));
    }

    proptest! {
        #[test]
        fn partial_path_ends_on_point_along(frac in 0.01_f64..0.99) {
            let points = vec![
                Point::new(0.0, 0.0),
                Point::new(0.4, 0.3),
                Point::new(0.9, 0.9),
            ];
            let path = partial_polyline(&points, frac);
            let end = *path.last().unwrap();
            let expected = point_along_polyline(&points, frac).unwrap();
            prop_assert!((end.x - expected.x).abs() < 1e-9);
            prop_assert!((end.y - expected.y).abs() < 1e-9);
        }
    }
}
