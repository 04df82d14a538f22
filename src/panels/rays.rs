use std::time::Duration;

use crate::error::Result;
use crate::panels::{Control, Panel, keys};
use crate::rays::{RayAnimator, RayFrame};
use crate::render::RenderUpdate;

/// Ray animation layers.
///
/// The first tick also places the transmitter and receiver markers.
pub struct RayPanel {
    animator: RayAnimator,
    markers_sent: bool,
}

impl RayPanel {
    /// Drive `animator` at its own tick interval.
    pub fn new(animator: RayAnimator) -> Self {
        Self {
            animator,
            markers_sent: false,
        }
    }

    fn markers(&self) -> Vec<RenderUpdate> {
        let scene = self.animator.scene();
        vec![
            RenderUpdate::ReplacePoints {
                target: keys::RAY_TRANSMITTERS.to_string(),
                points: scene.transmitters.clone(),
            },
            RenderUpdate::ReplacePoints {
                target: keys::RAY_RECEIVERS.to_string(),
                points: scene.receivers.clone(),
            },
        ]
    }

    /// Access the animator.
    pub fn animator(&self) -> &RayAnimator {
        &self.animator
    }
}

fn layers(frame: RayFrame) -> Vec<RenderUpdate> {
    vec![
        RenderUpdate::ReplaceLines {
            target: keys::RAY_LINES.to_string(),
            lines: frame.lines,
        },
        RenderUpdate::ReplacePoints {
            target: keys::RAY_PARTICLES.to_string(),
            points: frame.particles,
        },
    ]
}

impl Panel for RayPanel {
    fn id(&self) -> &str {
        keys::RAYS
    }

    fn interval(&self) -> Duration {
        self.animator.timing().interval()
    }

    fn tick(&mut self) -> Result<Vec<RenderUpdate>> {
        let mut updates = Vec::new();
        if !self.markers_sent {
            self.markers_sent = true;
            updates.extend(self.markers());
        }
        updates.extend(layers(self.animator.tick()));
        Ok(updates)
    }

    fn control(&mut self, control: Control) -> Vec<RenderUpdate> {
        match control {
            Control::Pause => self.animator.set_paused(true),
            Control::Resume => self.animator.set_paused(false),
            Control::Toggle => self.animator.set_paused(!self.animator.is_paused()),
            Control::Reset => {
                self.animator.reset();
                return layers(RayFrame::default());
            }
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::rays::{RayTiming, Scene};

    #[test]
    fn ticks_replace_layers() {
        let mut panel = RayPanel::new(RayAnimator::new(Scene::demo(), RayTiming::default()));
        assert_eq!(panel.interval(), Duration::from_millis(50));
        let mut board = Board::new();
        board.apply_all(panel.tick().unwrap());
        assert_eq!(board.lines("rays/lines").len(), 1);
        assert!(board.points("rays/particles").is_empty());
        assert_eq!(board.points("rays/receivers").len(), 3);
        assert_eq!(panel.tick().unwrap().len(), 2);

        board.apply_all(panel.control(Control::Reset));
        assert!(board.lines("rays/lines").is_empty());
        assert_eq!(panel.animator().clock(), 0.0);
    }

    #[test]
    fn toggle_pauses_clock() {
        let mut panel = RayPanel::new(RayAnimator::new(Scene::demo(), RayTiming::default()));
        panel.tick().unwrap();
        panel.control(Control::Toggle);
        let clock = panel.animator().clock();
        panel.tick().unwrap();
        assert_eq!(panel.animator().clock(), clock);
        panel.control(Control::Toggle);
        panel.tick().unwrap();
        assert!(panel.animator().clock() > clock);
    }
}
