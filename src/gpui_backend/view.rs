use std::sync::Arc;
use std::time::{Duration, Instant};

use gpui::prelude::*;
use gpui::{
    Application, AsyncWindowContext, Bounds, MouseButton, MouseDownEvent, Pixels, Point, Timer,
    TitlebarOptions, Window, WindowBounds, WindowOptions, canvas, div, px, size,
};
use tracing::{error, info};

use crate::config::DashboardConfig;
use crate::dashboard::{ClickKind, Dashboard};
use crate::datasource::Dataset;
use crate::geom::ScreenPoint;
use crate::render::widgets::DashboardLayout;

use super::paint::{paint_list, to_hsla};

/// Interval of the task that advances the session.
const FRAME: Duration = Duration::from_millis(16);

/// A GPUI view that paints a [`Dashboard`] and forwards clicks to it.
pub struct DashboardView {
    dashboard: Dashboard,
    started: Instant,
    layout: Option<DashboardLayout>,
}

impl DashboardView {
    /// Wrap `dashboard`; its session clock starts now.
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard,
            started: Instant::now(),
            layout: None,
        }
    }

    fn advance(&mut self) -> bool {
        self.dashboard.advance(self.started.elapsed())
    }

    fn on_mouse_down(&mut self, ev: &MouseDownEvent, kind: ClickKind, cx: &mut Context<Self>) {
        let Some(layout) = self.layout.as_ref() else {
            return;
        };
        if self.dashboard.click(layout, screen_point(ev.position), kind) {
            cx.notify();
        }
    }
}

impl Render for DashboardView {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let viewport = window.viewport_size();
        let layout = self
            .dashboard
            .layout(f32::from(viewport.width), f32::from(viewport.height));
        let list = self.dashboard.render(&layout);
        self.layout = Some(layout);

        div()
            .size_full()
            .bg(to_hsla(self.dashboard.theme().background))
            .child(
                canvas(
                    |_, _, _| {},
                    move |_, _, window, cx| {
                        paint_list(&list, window, cx);
                    },
                )
                .size_full(),
            )
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_down(ev, ClickKind::Primary, cx);
                }),
            )
            .on_mouse_down(
                MouseButton::Right,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_down(ev, ClickKind::Secondary, cx);
                }),
            )
    }
}

fn screen_point(point: Point<Pixels>) -> ScreenPoint {
    ScreenPoint::new(f32::from(point.x), f32::from(point.y))
}

/// Open the dashboard window and drive it until the application quits.
pub fn run(config: DashboardConfig, dataset: Arc<Dataset>) {
    Application::new().run(move |cx| {
        let options = WindowOptions {
            titlebar: Some(TitlebarOptions {
                title: Some("RAN Live Board".into()),
                ..Default::default()
            }),
            window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                None,
                size(px(1400.0), px(900.0)),
                cx,
            ))),
            ..Default::default()
        };

        let opened = cx.open_window(options, |window, cx| {
            let view = cx.new(|_| DashboardView::new(Dashboard::new(&config, dataset)));
            let view_for_task = view.clone();
            window
                .spawn(cx, move |cx: &mut AsyncWindowContext| {
                    let mut cx = cx.clone();
                    async move {
                        loop {
                            Timer::after(FRAME).await;
                            let updated = cx.update(|_, cx| {
                                view_for_task.update(cx, |view, view_cx| {
                                    if view.advance() {
                                        view_cx.notify();
                                    }
                                });
                            });
                            if updated.is_err() {
                                break;
                            }
                        }
                    }
                })
                .detach();
            view
        });

        match opened {
            Ok(_) => info!("dashboard window opened"),
            Err(err) => {
                error!(error = %err, "failed to open dashboard window");
                cx.quit();
            }
        }
    });
}
