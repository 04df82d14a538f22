//! Data ranges for chart axes.

use crate::geom::Point;

/// Numeric range with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
}

impl Range {
    /// Create a new range, swapping bounds if needed.
    pub fn new(mut min: f64, mut max: f64) -> Self {
        if min > max {
            std::mem::swap(&mut min, &mut max);
        }
        Self { min, max }
    }

    /// Smallest range covering every finite value, if any.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut range: Option<Self> = None;
        for value in values.into_iter().filter(|v| v.is_finite()) {
            match &mut range {
                Some(range) => range.expand_to_include(value),
                None => range = Some(Self::new(value, value)),
            }
        }
        range
    }

    /// Span of the range.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Check whether both bounds are finite.
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Check whether the range has positive span and finite bounds.
    pub fn is_valid(&self) -> bool {
        self.is_finite() && self.span() > 0.0
    }

    /// Expand the range to include a value.
    pub fn expand_to_include(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    /// Clamp a value into the range.
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }

    /// Position of `value` inside the range as a 0..1 fraction, clamped.
    pub fn fraction(&self, value: f64) -> f64 {
        if !self.is_valid() {
            return 0.0;
        }
        ((value - self.min) / self.span()).clamp(0.0, 1.0)
    }

    /// Add padding around the range.
    pub fn padded(&self, frac: f64, min_padding: f64) -> Self {
        let span = self.span().abs();
        let padding = (span * frac).max(min_padding);
        Self {
            min: self.min - padding,
            max: self.max + padding,
        }
    }

    /// Ensure the range has at least the given span.
    pub fn with_min_span(&self, min_span: f64) -> Self {
        let span = self.span();
        if span >= min_span {
            return *self;
        }
        let center = (self.min + self.max) * 0.5;
        let half = min_span * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }
}

/// Visible data ranges on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// X axis range.
    pub x: Range,
    /// Y axis range.
    pub y: Range,
}

impl Viewport {
    /// Create a viewport from X and Y ranges.
    pub fn new(x: Range, y: Range) -> Self {
        Self { x, y }
    }

    /// Viewport covering all points, with the Y axis padded.
    ///
    /// Flat data gets a unit span so it still draws.
    pub fn fit(points: &[Point]) -> Option<Self> {
        let x = Range::from_values(points.iter().map(|p| p.x))?;
        let y = Range::from_values(points.iter().map(|p| p.y))?;
        Some(Self {
            x: x.with_min_span(1.0),
            y: y.with_min_span(1.0).padded(0.05, 0.0),
        })
    }

    /// Check whether both axes are valid.
    pub fn is_valid(&self) -> bool {
        self.x.is_valid() && self.y.is_valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_with_min_span_expands() {
        let range = Range::new(2.0, 2.0);
        let expanded = range.with_min_span(1.0);
        assert!(expanded.span() >= 1.0);
        assert!((expanded.min + expanded.max) * 0.5 - 2.0 < 1e-9);
    }

    #[test]
    fn from_values_skips_non_finite() {
        let range = Range::from_values([3.0, f64::NAN, -1.0, 7.0]).unwrap();
        assert_eq!(range, Range::new(-1.0, 7.0));
        assert!(Range::from_values([f64::INFINITY]).is_none());
    }

    #[test]
    fn fraction_is_clamped() {
        let range = Range::new(0.0, 50.0);
        assert_eq!(range.fraction(25.0), 0.5);
        assert_eq!(range.fraction(80.0), 1.0);
        assert_eq!(Range::new(1.0, 1.0).fraction(1.0), 0.0);
    }

    #[test]
    fn fit_handles_flat_series() {
        let viewport = Viewport::fit(&[Point::new(10.0, 5.0), Point::new(20.0, 5.0)]).unwrap();
        assert!(viewport.is_valid());
        assert!(viewport.y.min < 5.0 && viewport.y.max > 5.0);
        assert!(Viewport::fit(&[]).is_none());
    }
}
