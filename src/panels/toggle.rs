use std::time::Duration;

use crate::error::Result;
use crate::panels::{Control, Panel, keys};
use crate::render::RenderUpdate;

/// On/off switch mirrored into a label.
pub struct TogglePanel {
    active: bool,
    interval: Duration,
}

impl TogglePanel {
    /// Create a switch that starts off.
    pub fn new(interval: Duration) -> Self {
        Self {
            active: false,
            interval,
        }
    }

    /// Current switch position.
    pub fn is_active(&self) -> bool {
        self.active
    }

    fn updates(&self) -> Vec<RenderUpdate> {
        let (text, value) = if self.active { ("On", 1.0) } else { ("Off", 0.0) };
        vec![
            RenderUpdate::text(keys::TOGGLE, text),
            RenderUpdate::scalar(keys::TOGGLE, value),
        ]
    }
}

impl Panel for TogglePanel {
    fn id(&self) -> &str {
        keys::TOGGLE
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    fn tick(&mut self) -> Result<Vec<RenderUpdate>> {
        Ok(self.updates())
    }

    fn control(&mut self, control: Control) -> Vec<RenderUpdate> {
        self.active = match control {
            Control::Toggle => !self.active,
            Control::Resume => true,
            Control::Pause | Control::Reset => false,
        };
        self.updates()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_mirrors_switch() {
        let mut panel = TogglePanel::new(Duration::from_millis(500));
        assert_eq!(panel.tick().unwrap()[0], RenderUpdate::text("toggle", "Off"));
        let updates = panel.control(Control::Toggle);
        assert_eq!(updates[0], RenderUpdate::text("toggle", "On"));
        assert!(panel.is_active());
        assert_eq!(panel.tick().unwrap()[1], RenderUpdate::scalar("toggle", 1.0));
        panel.control(Control::Reset);
        assert!(!panel.is_active());
    }
}
