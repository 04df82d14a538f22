//! ran_liveboard replays recorded RAN telemetry as a live dashboard.
//!
//! KPI series, resource block assignments, scheduling policies, and xApp log
//! classifications are loaded once from a document store. A
//! [`Session`](session::Session) then replays them on fixed periods: the KPI
//! grid publishes its position through a shared timestamp, and the lookup
//! panels show the record nearest to it. Panels emit
//! [`RenderUpdate`](render::RenderUpdate)s into a [`Board`](board::Board),
//! which the widget builders turn into backend-agnostic render commands.
//! The `gpui` feature adds a desktop window on top.

#![forbid(unsafe_code)]

pub mod axis;
pub mod board;
pub mod clock;
pub mod column;
pub mod config;
pub mod dashboard;
pub mod datasource;
pub mod error;
pub mod geom;
#[cfg(feature = "gpui")]
pub mod gpui_backend;
pub mod logging;
pub mod lookup;
pub mod panels;
pub mod rays;
pub mod render;
pub mod replay;
pub mod series;
pub mod session;
pub mod style;
pub mod timestamp;
pub(crate) mod transform;
pub mod view;

pub use board::Board;
pub use clock::SharedTimestamp;
pub use column::format_column_name;
pub use config::DashboardConfig;
pub use dashboard::{ClickKind, Dashboard};
pub use datasource::{Dataset, DocumentStore, JsonDirStore, MemoryStore};
pub use error::{Error, Result};
pub use geom::{Point, ScreenPoint, ScreenRect};
#[cfg(feature = "gpui")]
pub use gpui_backend::DashboardView;
pub use lookup::{KeyedSeries, TimestampLookup};
pub use replay::ReplayEngine;
pub use series::{RollingWindow, Sample, TimeSeries};
pub use session::Session;
pub use style::Theme;
pub use timestamp::timestamp_to_millis;
