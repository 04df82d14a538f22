//! Axis tick placement and label formatting.

use serde::{Deserialize, Serialize};

use crate::timestamp::format_millis;
use crate::view::Range;

/// Formatter for axis tick labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisFormatter {
    /// Numeric value with up to two decimals.
    #[default]
    Default,
    /// Milliseconds since midnight as `HH:MM:SS:mmm`.
    TimeOfDay,
}

impl AxisFormatter {
    /// Format a value for display.
    pub fn format(&self, value: f64) -> String {
        match self {
            Self::Default => {
                let text = format!("{value:.2}");
                text.trim_end_matches('0').trim_end_matches('.').to_string()
            }
            Self::TimeOfDay => format_millis(value.round() as i64),
        }
    }
}

/// A labelled tick on an axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Position in data space.
    pub value: f64,
    /// Label text.
    pub label: String,
}

/// Ticks at every `stride`-th value, starting with the first.
///
/// A stride of zero is treated as one.
pub fn stride_ticks(values: &[f64], stride: usize, formatter: &AxisFormatter) -> Vec<Tick> {
    values
        .iter()
        .step_by(stride.max(1))
        .map(|value| Tick {
            value: *value,
            label: formatter.format(*value),
        })
        .collect()
}

/// Evenly spaced ticks across `range`, including both ends.
pub fn linear_ticks(range: Range, count: usize, formatter: &AxisFormatter) -> Vec<Tick> {
    if !range.is_finite() || count == 0 {
        return Vec::new();
    }
    if count == 1 || range.span() == 0.0 {
        return vec![Tick {
            value: range.min,
            label: formatter.format(range.min),
        }];
    }
    let step = range.span() / (count - 1) as f64;
    (0..count)
        .map(|index| {
            let value = range.min + step * index as f64;
            Tick {
                value,
                label: formatter.format(value),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_of_day_labels() {
        let formatter = AxisFormatter::TimeOfDay;
        assert_eq!(formatter.format(36_001_250.0), "10:00:01:250");
    }

    #[test]
    fn default_labels_drop_trailing_zeros() {
        let formatter = AxisFormatter::Default;
        assert_eq!(formatter.format(2.0), "2");
        assert_eq!(formatter.format(2.5), "2.5");
        assert_eq!(formatter.format(0.125), "0.13");
    }

    #[test]
    fn stride_ticks_take_every_nth() {
        let values: Vec<f64> = (0..21).map(|i| i as f64 * 500.0).collect();
        let ticks = stride_ticks(&values, 5, &AxisFormatter::Default);
        let positions: Vec<f64> = ticks.iter().map(|t| t.value).collect();
        assert_eq!(positions, [0.0, 2500.0, 5000.0, 7500.0, 10000.0]);
        assert_eq!(stride_ticks(&values[..2], 0, &AxisFormatter::Default).len(), 2);
    }

    #[test]
    fn linear_ticks_cover_range() {
        let ticks = linear_ticks(Range::new(0.0, 50.0), 6, &AxisFormatter::Default);
        assert_eq!(ticks.len(), 6);
        assert_eq!(ticks[0].label, "0");
        assert_eq!(ticks[5].label, "50");
        assert!(linear_ticks(Range::new(0.0, 1.0), 0, &AxisFormatter::Default).is_empty());
    }
}
