//! Session plus board, ready to be driven by a frontend.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::board::Board;
use crate::config::DashboardConfig;
use crate::datasource::Dataset;
use crate::geom::ScreenPoint;
use crate::panels::{Control, keys};
use crate::render::RenderList;
use crate::render::widgets::{DashboardLayout, paint_dashboard};
use crate::session::Session;
use crate::style::Theme;
use crate::view::Range;

/// Which control a mouse button sends to the widget under the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickKind {
    /// Toggle the switch, or pause/resume an animation.
    Primary,
    /// Start the widget over.
    Secondary,
}

/// A running dashboard: panels, their applied output, and the widget keys.
pub struct Dashboard {
    session: Session,
    board: Board,
    kpi_keys: Vec<String>,
    slider: Range,
    theme: Theme,
}

impl Dashboard {
    /// Build the standard dashboard over `dataset`.
    pub fn new(config: &DashboardConfig, dataset: Arc<Dataset>) -> Self {
        let kpi_keys = dataset
            .graphs()
            .iter()
            .map(|series| keys::kpi_series(series.name()))
            .collect();
        Self {
            session: Session::standard(config, dataset),
            board: Board::new(),
            kpi_keys,
            slider: Range::new(config.slider.min, config.slider.max),
            theme: Theme::new(),
        }
    }

    /// Tick due panels and apply their output. Returns whether anything changed.
    pub fn advance(&mut self, now: Duration) -> bool {
        let before = self.board.generation();
        self.board.apply_all(self.session.advance(now));
        self.board.generation() != before
    }

    /// Send `control` to panel `id` and apply its immediate output.
    pub fn control(&mut self, id: &str, control: Control) {
        let updates = self.session.control(id, control);
        self.board.apply_all(updates);
    }

    /// Route a click at `point` through the layout of the last frame.
    pub fn click(&mut self, layout: &DashboardLayout, point: ScreenPoint, kind: ClickKind) -> bool {
        let Some((panel, control)) = layout.hit(point) else {
            return false;
        };
        let control = match kind {
            ClickKind::Primary => control,
            ClickKind::Secondary => Control::Reset,
        };
        debug!(panel, ?control, "click");
        self.control(panel, control);
        true
    }

    /// Layout for a window of `width` by `height` pixels.
    pub fn layout(&self, width: f32, height: f32) -> DashboardLayout {
        DashboardLayout::new(width, height, self.kpi_keys.len())
    }

    /// Draw commands for the current board.
    pub fn render(&self, layout: &DashboardLayout) -> RenderList {
        paint_dashboard(&self.board, layout, &self.kpi_keys, self.slider, &self.theme)
    }

    /// Applied panel output.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Underlying scheduler.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Colors used when drawing.
    pub fn theme(&self) -> &Theme {
        &self.theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::MemoryStore;

    fn dashboard() -> Dashboard {
        let dataset = Arc::new(Dataset::load(&MemoryStore::new()));
        Dashboard::new(&DashboardConfig::default(), dataset)
    }

    #[test]
    fn clicks_flip_the_switch_and_reset_it() {
        let mut dashboard = dashboard();
        dashboard.advance(Duration::ZERO);
        let layout = dashboard.layout(1200.0, 800.0);
        let inside = layout.toggle.inset(2.0).min;

        assert!(dashboard.click(&layout, inside, ClickKind::Primary));
        assert_eq!(dashboard.board().text(keys::TOGGLE), Some("On"));
        assert!(dashboard.click(&layout, inside, ClickKind::Secondary));
        assert_eq!(dashboard.board().text(keys::TOGGLE), Some("Off"));
        assert!(!dashboard.click(&layout, layout.header.min, ClickKind::Primary));
    }

    #[test]
    fn advance_reports_board_changes() {
        let mut dashboard = dashboard();
        assert!(dashboard.advance(Duration::ZERO));
        assert!(!dashboard.advance(Duration::from_millis(1)));
        assert!(dashboard.advance(Duration::from_millis(50)));
    }

    #[test]
    fn renders_every_kpi_column() {
        let mut dashboard = dashboard();
        dashboard.advance(Duration::ZERO);
        let list = dashboard.render(&dashboard.layout(1200.0, 800.0));
        let texts: Vec<&str> = list.texts().collect();
        for column in crate::column::GRAPH_COLUMNS {
            let title = crate::column::format_column_name(column);
            assert!(texts.contains(&title.as_str()), "missing {title}");
        }
    }
}
