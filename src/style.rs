//! Dashboard theme.

use crate::render::Color;

/// Colors and sizes shared by every panel.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Window and panel background.
    pub background: Color,
    /// Chart grid lines.
    pub grid: Color,
    /// Tick labels and plain text.
    pub text: Color,
    /// Ray paths.
    pub ray: Color,
    /// Ray particles.
    pub particle: Color,
    /// Switch fill when on.
    pub toggle_on: Color,
    /// Switch fill when off.
    pub toggle_off: Color,
    /// Cycle of series colors.
    pub series: Vec<Color>,
    /// Label font size in pixels.
    pub text_size: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::from_rgb8(37, 37, 37),
            grid: Color::from_rgb8(67, 67, 67),
            text: Color::WHITE,
            ray: Color::from_rgb8(255, 165, 0),
            particle: Color::from_rgb8(255, 255, 0),
            toggle_on: Color::from_rgb8(50, 205, 50),
            toggle_off: Color::from_rgb8(90, 90, 90),
            series: vec![
                Color::from_rgb8(144, 238, 144),
                Color::from_rgb8(255, 0, 0),
                Color::from_rgb8(173, 216, 230),
                Color::from_rgb8(255, 165, 0),
                Color::from_rgb8(255, 255, 0),
                Color::from_rgb8(128, 0, 128),
            ],
            text_size: 12.0,
        }
    }
}

impl Theme {
    /// Create the default dark theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Series color for the `index`-th chart, cycling.
    pub fn series_color(&self, index: usize) -> Color {
        if self.series.is_empty() {
            return self.text;
        }
        self.series[index % self.series.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_colors_cycle() {
        let theme = Theme::new();
        assert_eq!(theme.series_color(0), theme.series_color(6));
        assert_ne!(theme.series_color(0), theme.series_color(1));
    }
}
