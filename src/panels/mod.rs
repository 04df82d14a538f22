//! Dashboard panels.
//!
//! A panel owns the state behind one widget group and turns each of its ticks
//! into [`RenderUpdate`]s. Panels never draw and never block: all data is
//! loaded before the first tick.

mod constellation;
mod kpi;
mod loss;
mod lookup;
mod rays;
mod toggle;

pub use constellation::{
    CONSTELLATION_LIMIT, ConstellationPair, ConstellationPanel, load_pairs, synthetic_pairs,
};
pub use kpi::KpiGrid;
pub use loss::{LossPanel, loss_curve};
pub use lookup::{ClassifierPanel, RbsSliderPanel, SchedulingPanel};
pub use rays::RayPanel;
pub use toggle::TogglePanel;

use std::time::Duration;

use crate::error::Result;
use crate::render::RenderUpdate;

/// Placeholder shown by text widgets and empty charts with no data.
pub const NO_DATA: &str = "No data";

/// Placeholder shown by the scheduling policy label with no data.
pub const NOT_AVAILABLE: &str = "N/A";

/// Text shown by a panel whose tick failed.
pub const ERROR_TEXT: &str = "Error";

/// Target keys shared by panels and widgets.
pub mod keys {
    /// KPI grid panel.
    pub const KPI: &str = "kpi";
    /// Resource block slider panel and its value.
    pub const RBS_ASSIGNED: &str = "rbs_assigned";
    /// Classifier panel and its label.
    pub const CLASSIFIER: &str = "classifier";
    /// Raw classifier output line.
    pub const CLASSIFIER_RAW: &str = "classifier/raw";
    /// Scheduling policy panel and its label.
    pub const SCHEDULING: &str = "scheduling_policy";
    /// Toggle switch panel and its label.
    pub const TOGGLE: &str = "toggle";
    /// Loss chart panel and its series.
    pub const LOSS: &str = "loss";
    /// Ray animation panel.
    pub const RAYS: &str = "rays";
    /// Ray path layer.
    pub const RAY_LINES: &str = "rays/lines";
    /// Ray particle layer.
    pub const RAY_PARTICLES: &str = "rays/particles";
    /// Transmitter markers.
    pub const RAY_TRANSMITTERS: &str = "rays/transmitters";
    /// Receiver markers.
    pub const RAY_RECEIVERS: &str = "rays/receivers";
    /// Constellation panel.
    pub const CONSTELLATION: &str = "constellation";
    /// Ratio scatter layer.
    pub const RATIO: &str = "constellation/ratio";
    /// Demapper scatter layer.
    pub const DEMAPPER: &str = "constellation/demapper";

    /// Chart series key of a KPI column.
    pub fn kpi_series(name: &str) -> String {
        format!("{KPI}/{name}")
    }
}

/// External control action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Stop emitting, keep position.
    Pause,
    /// Emit again.
    Resume,
    /// Flip between paused and running, or flip a switch.
    Toggle,
    /// Start over.
    Reset,
}

/// A periodically ticked widget group.
pub trait Panel {
    /// Stable key; also the target of the panel's error text.
    fn id(&self) -> &str;

    /// Period between ticks.
    fn interval(&self) -> Duration;

    /// Produce the updates for one tick.
    fn tick(&mut self) -> Result<Vec<RenderUpdate>>;

    /// Apply a control action, returning any immediate updates.
    fn control(&mut self, control: Control) -> Vec<RenderUpdate> {
        tracing::debug!(panel = self.id(), ?control, "control ignored");
        Vec::new()
    }
}
