//! Animated transmitter-to-receiver rays.
//!
//! Each ray cycles through three phases. While growing, the visible path
//! extends along the ray at a fixed rate. Once complete it transmits: a
//! particle travels the full path a fixed number of times. It then finishes,
//! disappears, and is scheduled to start again after a pause.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::geom::{Point, partial_polyline, point_along_polyline};

/// Animation rates and pauses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RayTiming {
    /// Tick period in milliseconds.
    pub interval_ms: u64,
    /// Growth rate as path fraction per second.
    pub grow_speed: f64,
    /// Particle rate as path fraction per second.
    pub particle_speed: f64,
    /// Seconds between a ray finishing and starting again.
    pub cycle_pause: f64,
    /// Initial activation offset between consecutive rays, in seconds.
    pub stagger: f64,
    /// Particle passes before a ray finishes.
    pub transmissions: u32,
}

impl Default for RayTiming {
    fn default() -> Self {
        Self {
            interval_ms: 50,
            grow_speed: 0.6,
            particle_speed: 0.4,
            cycle_pause: 2.0,
            stagger: 0.2,
            transmissions: 4,
        }
    }
}

impl RayTiming {
    /// Tick period.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    fn dt(&self) -> f64 {
        self.interval_ms as f64 / 1000.0
    }

    fn seconds_to_ms(seconds: f64) -> u64 {
        (seconds.max(0.0) * 1000.0).round() as u64
    }
}

/// Transmitters, receivers, and the ray paths between them.
///
/// Coordinates are normalized to 0..1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    /// Transmitter positions.
    pub transmitters: Vec<Point>,
    /// Receiver positions.
    pub receivers: Vec<Point>,
    /// Ray paths, each from a transmitter to a receiver.
    pub rays: Vec<Vec<Point>>,
}

impl Scene {
    /// One transmitter with a direct ray to each of three receivers.
    pub fn demo() -> Self {
        let transmitters = vec![Point::new(0.872, 0.85)];
        let receivers = vec![
            Point::new(0.25, 0.6),
            Point::new(0.53, 0.15),
            Point::new(0.9, 0.3),
        ];
        Self::direct(transmitters, receivers)
    }

    /// Build a scene with a straight ray from every transmitter to every receiver.
    pub fn direct(transmitters: Vec<Point>, receivers: Vec<Point>) -> Self {
        let rays = transmitters
            .iter()
            .flat_map(|tx| receivers.iter().map(move |rx| vec![*tx, *rx]))
            .collect();
        Self {
            transmitters,
            receivers,
            rays,
        }
    }

    /// Load a scene from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let mut scene: Scene = serde_json::from_str(&text)?;
        scene.rays.retain(|ray| ray.len() >= 2);
        Ok(scene)
    }
}

/// Phase of an active ray.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RayPhase {
    /// Path is being drawn.
    Growing,
    /// Path is complete and particles travel along it.
    Transmitting,
    /// Done for this cycle.
    Finished,
}

#[derive(Debug, Clone)]
struct ActiveRay {
    ray: usize,
    grow: f64,
    particle: f64,
    phase: RayPhase,
    transmitted: u32,
}

#[derive(Debug, Clone, Copy)]
struct Activation {
    ray: usize,
    at_ms: u64,
}

/// A visible ray path.
#[derive(Debug, Clone, PartialEq)]
pub struct RayLine {
    /// Visible points.
    pub points: Vec<Point>,
    /// Stroke width in pixels.
    pub width: f32,
}

/// Drawing layers for one animation step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RayFrame {
    /// Growing or complete ray paths.
    pub lines: Vec<RayLine>,
    /// Particle positions on transmitting rays.
    pub particles: Vec<Point>,
}

/// Ray animation state machine.
#[derive(Debug, Clone)]
pub struct RayAnimator {
    scene: Scene,
    timing: RayTiming,
    clock_ms: u64,
    schedule: Vec<Activation>,
    active: Vec<ActiveRay>,
    paused: bool,
}

impl RayAnimator {
    /// Create an animator with the initial staggered schedule.
    pub fn new(scene: Scene, timing: RayTiming) -> Self {
        let mut animator = Self {
            scene,
            timing,
            clock_ms: 0,
            schedule: Vec::new(),
            active: Vec::new(),
            paused: false,
        };
        animator.reset();
        animator
    }

    /// Restart from time zero with no active rays.
    pub fn reset(&mut self) {
        self.clock_ms = 0;
        self.active.clear();
        self.schedule = (0..self.scene.rays.len())
            .map(|ray| Activation {
                ray,
                at_ms: RayTiming::seconds_to_ms(ray as f64 * self.timing.stagger),
            })
            .collect();
    }

    /// Stop or restart advancing time.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Check whether the animation is paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Access the scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Access the timing.
    pub fn timing(&self) -> &RayTiming {
        &self.timing
    }

    /// Simulated seconds since the last reset.
    pub fn clock(&self) -> f64 {
        self.clock_ms as f64 / 1000.0
    }

    /// Phase of every active ray, by ray index.
    pub fn phases(&self) -> Vec<(usize, RayPhase)> {
        self.active.iter().map(|ray| (ray.ray, ray.phase)).collect()
    }

    /// Advance one tick and return the layers to draw.
    ///
    /// While paused the clock holds and the current layers are returned.
    pub fn tick(&mut self) -> RayFrame {
        if self.paused {
            return self.frame();
        }
        let dt = self.timing.dt();
        self.clock_ms += self.timing.interval_ms;

        let clock_ms = self.clock_ms;
        let (due, waiting): (Vec<Activation>, Vec<Activation>) = self
            .schedule
            .drain(..)
            .partition(|activation| clock_ms >= activation.at_ms);
        self.schedule = waiting;
        for activation in due {
            debug!(ray = activation.ray, clock_ms, "ray activated");
            self.active.push(ActiveRay {
                ray: activation.ray,
                grow: 0.0,
                particle: 0.0,
                phase: RayPhase::Growing,
                transmitted: 0,
            });
        }

        let mut frame = RayFrame::default();
        for active in &mut self.active {
            let Some(points) = self.scene.rays.get(active.ray) else {
                active.phase = RayPhase::Finished;
                continue;
            };
            match active.phase {
                RayPhase::Growing => {
                    active.grow += self.timing.grow_speed * dt;
                    if active.grow >= 1.0 {
                        active.grow = 1.0;
                        active.phase = RayPhase::Transmitting;
                        active.particle = 0.0;
                    }
                    frame.lines.push(RayLine {
                        points: partial_polyline(points, active.grow),
                        width: 1.0 + 2.0 * active.grow as f32,
                    });
                }
                RayPhase::Transmitting => {
                    frame.lines.push(RayLine {
                        points: points.clone(),
                        width: 3.0,
                    });
                    active.particle = (active.particle + self.timing.particle_speed * dt).min(1.0);
                    if let Some(position) = point_along_polyline(points, active.particle) {
                        frame.particles.push(position);
                    }
                    if active.particle >= 1.0 {
                        active.transmitted += 1;
                        if active.transmitted < self.timing.transmissions {
                            active.particle = 0.0;
                        } else {
                            active.phase = RayPhase::Finished;
                            self.schedule.push(Activation {
                                ray: active.ray,
                                at_ms: clock_ms + RayTiming::seconds_to_ms(self.timing.cycle_pause),
                            });
                        }
                    }
                }
                RayPhase::Finished => {}
            }
        }
        self.active.retain(|ray| ray.phase != RayPhase::Finished);
        frame
    }

    fn frame(&self) -> RayFrame {
        let mut frame = RayFrame::default();
        for active in &self.active {
            let Some(points) = self.scene.rays.get(active.ray) else {
                continue;
            };
            match active.phase {
                RayPhase::Growing => frame.lines.push(RayLine {
                    points: partial_polyline(points, active.grow),
                    width: 1.0 + 2.0 * active.grow as f32,
                }),
                RayPhase::Transmitting => {
                    frame.lines.push(RayLine {
                        points: points.clone(),
                        width: 3.0,
                    });
                    if let Some(position) = point_along_polyline(points, active.particle) {
                        frame.particles.push(position);
                    }
                }
                RayPhase::Finished => {}
            }
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_ray() -> Scene {
        Scene::direct(vec![Point::new(0.0, 0.0)], vec![Point::new(1.0, 0.0)])
    }

    fn fast_timing() -> RayTiming {
        RayTiming {
            interval_ms: 100,
            grow_speed: 5.0,
            particle_speed: 5.0,
            cycle_pause: 0.5,
            stagger: 0.0,
            transmissions: 2,
        }
    }

    #[test]
    fn demo_scene_has_ray_per_receiver() {
        let scene = Scene::demo();
        assert_eq!(scene.rays.len(), 3);
        assert!(scene.rays.iter().all(|ray| ray[0] == scene.transmitters[0]));
    }

    #[test]
    fn ray_grows_then_transmits_then_finishes() {
        let mut animator = RayAnimator::new(single_ray(), fast_timing());

        let frame = animator.tick();
        assert_eq!(animator.phases(), vec![(0, RayPhase::Growing)]);
        assert_eq!(frame.lines.len(), 1);
        assert!((frame.lines[0].points.last().unwrap().x - 0.5).abs() < 1e-9);
        assert!(frame.particles.is_empty());

        animator.tick();
        assert_eq!(animator.phases(), vec![(0, RayPhase::Transmitting)]);

        let frame = animator.tick();
        assert_eq!(frame.particles.len(), 1);
        assert!((frame.particles[0].x - 0.5).abs() < 1e-9);
        assert_eq!(frame.lines[0].width, 3.0);

        // second tick of the first pass, then the full second pass
        animator.tick();
        animator.tick();
        let frame = animator.tick();
        assert_eq!(frame.particles.len(), 1);
        assert!(animator.phases().is_empty());
    }

    #[test]
    fn finished_ray_reactivates_after_pause() {
        let mut animator = RayAnimator::new(single_ray(), fast_timing());
        for _ in 0..6 {
            animator.tick();
        }
        assert!(animator.phases().is_empty());
        for _ in 0..4 {
            animator.tick();
            assert!(animator.phases().is_empty());
        }
        animator.tick();
        assert_eq!(animator.phases(), vec![(0, RayPhase::Growing)]);
    }

    #[test]
    fn staggered_activation() {
        let timing = RayTiming {
            stagger: 0.2,
            ..fast_timing()
        };
        let mut animator = RayAnimator::new(Scene::demo(), timing);
        animator.tick();
        assert_eq!(animator.phases().len(), 1);
        animator.tick();
        assert_eq!(animator.phases().len(), 2);
        animator.tick();
        animator.tick();
        assert_eq!(animator.phases().len(), 3);
    }

    #[test]
    fn pause_holds_clock_and_reset_clears() {
        let mut animator = RayAnimator::new(single_ray(), fast_timing());
        animator.tick();
        animator.set_paused(true);
        let clock = animator.clock();
        let frame = animator.tick();
        assert_eq!(animator.clock(), clock);
        assert_eq!(frame.lines.len(), 1);

        animator.reset();
        assert_eq!(animator.clock(), 0.0);
        assert!(animator.phases().is_empty());
    }
}
