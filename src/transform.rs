//! Coordinate transforms between data and screen space.

use crate::geom::{Point, ScreenPoint, ScreenRect};
use crate::view::{Range, Viewport};

const MIN_SPAN: f64 = 1e-12;

/// Linear transform from data coordinates into screen coordinates.
///
/// Screen Y grows downwards, data Y upwards.
#[derive(Debug, Clone)]
pub(crate) struct Transform {
    screen: ScreenRect,
    x_axis: Range,
    y_axis: Range,
}

impl Transform {
    /// Create a transform for the given viewport and screen rectangle.
    pub(crate) fn new(viewport: Viewport, screen: ScreenRect) -> Option<Self> {
        if !screen.is_valid() || !viewport.x.is_finite() || !viewport.y.is_finite() {
            return None;
        }
        Some(Self {
            screen,
            x_axis: viewport.x.with_min_span(MIN_SPAN),
            y_axis: viewport.y.with_min_span(MIN_SPAN),
        })
    }

    /// Transform for normalized 0..1 scene coordinates.
    pub(crate) fn unit(screen: ScreenRect) -> Option<Self> {
        Self::new(
            Viewport::new(Range::new(0.0, 1.0), Range::new(0.0, 1.0)),
            screen,
        )
    }

    /// Map a data point into screen space.
    pub(crate) fn data_to_screen(&self, point: Point) -> Option<ScreenPoint> {
        if !point.x.is_finite() || !point.y.is_finite() {
            return None;
        }
        let x_norm = (point.x - self.x_axis.min) / self.x_axis.span();
        let y_norm = (point.y - self.y_axis.min) / self.y_axis.span();
        let sx = self.screen.min.x as f64 + x_norm * self.screen.width() as f64;
        let sy = self.screen.max.y as f64 - y_norm * self.screen.height() as f64;
        Some(ScreenPoint::new(sx as f32, sy as f32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> ScreenRect {
        ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(100.0, 100.0))
    }

    #[test]
    fn linear_maps_into_screen() {
        let viewport = Viewport::new(Range::new(0.0, 10.0), Range::new(0.0, 10.0));
        let transform = Transform::new(viewport, screen()).expect("valid transform");
        assert_eq!(
            transform.data_to_screen(Point::new(5.0, 7.5)),
            Some(ScreenPoint::new(50.0, 25.0))
        );
    }

    #[test]
    fn unit_transform_flips_y() {
        let transform = Transform::unit(screen()).unwrap();
        assert_eq!(
            transform.data_to_screen(Point::new(0.0, 0.0)),
            Some(ScreenPoint::new(0.0, 100.0))
        );
        assert_eq!(
            transform.data_to_screen(Point::new(1.0, 1.0)),
            Some(ScreenPoint::new(100.0, 0.0))
        );
        assert!(transform.data_to_screen(Point::new(f64::NAN, 0.0)).is_none());
    }

    #[test]
    fn rejects_empty_screen() {
        let flat = ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(0.0, 10.0));
        assert!(Transform::unit(flat).is_none());
    }
}
