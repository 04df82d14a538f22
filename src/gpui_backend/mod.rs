//! GPUI frontend for the dashboard.
//!
//! [`run`] opens a window holding a [`DashboardView`]. A timer task advances
//! the session and repaints; clicks on the switch, the loss chart, or the ray
//! animation are routed to their panels.

mod paint;
mod view;

pub use view::{DashboardView, run};
