//! Widget layout and command building.
//!
//! [`DashboardLayout`] places every widget inside the window and
//! [`paint_dashboard`] turns the current [`Board`] into one [`RenderList`].
//! Nothing here depends on a UI toolkit, so the full frame can be inspected
//! in tests.

use crate::axis::{AxisFormatter, linear_ticks};
use crate::board::Board;
use crate::geom::{Point, ScreenPoint, ScreenRect};
use crate::panels::{CONSTELLATION_LIMIT, Control, ERROR_TEXT, NO_DATA, keys};
use crate::render::{
    Color, LineSegment, LineStyle, MarkerShape, MarkerStyle, RectStyle, RenderCommand, RenderList,
    TextStyle, build_line_segments, build_scatter_points,
};
use crate::style::Theme;
use crate::transform::Transform;
use crate::view::{Range, Viewport};

const PADDING: f32 = 8.0;
const HEADER_HEIGHT: f32 = 32.0;
const TITLE_HEIGHT: f32 = 20.0;
const AXIS_GUTTER: f32 = 44.0;
const LABEL_HEIGHT: f32 = 16.0;
const GRID_LINES: usize = 5;

/// Screen areas of every widget for a window size.
#[derive(Debug, Clone)]
pub struct DashboardLayout {
    /// Window bounds.
    pub bounds: ScreenRect,
    /// Title band.
    pub header: ScreenRect,
    /// One cell per KPI chart, row-major.
    pub kpi: Vec<ScreenRect>,
    /// Resource block slider.
    pub slider: ScreenRect,
    /// Classifier label.
    pub classifier: ScreenRect,
    /// Scheduling policy label.
    pub scheduling: ScreenRect,
    /// Toggle switch.
    pub toggle: ScreenRect,
    /// Loss chart.
    pub loss: ScreenRect,
    /// Ray animation.
    pub rays: ScreenRect,
    /// Ratio scatter.
    pub ratio: ScreenRect,
    /// Demapper scatter.
    pub demapper: ScreenRect,
}

impl DashboardLayout {
    /// Lay out `kpi_count` KPI charts and the other widgets in a window.
    pub fn new(width: f32, height: f32, kpi_count: usize) -> Self {
        let bounds = ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(width, height));
        let (header, body) = bounds.split_top(HEADER_HEIGHT);
        let (kpi_area, bottom) = body.split_top(body.height() * 0.5);
        let kpi = kpi_area
            .grid(3, kpi_count)
            .into_iter()
            .map(|cell| cell.inset(PADDING * 0.5))
            .collect();

        let columns = bottom.grid(4, 4);
        let controls = columns[0].grid(1, 4);
        let scatters = columns[3].grid(1, 2);
        Self {
            bounds,
            header,
            kpi,
            slider: controls[0].inset(PADDING * 0.5),
            classifier: controls[1].inset(PADDING * 0.5),
            scheduling: controls[2].inset(PADDING * 0.5),
            toggle: controls[3].inset(PADDING * 0.5),
            loss: columns[1].inset(PADDING * 0.5),
            rays: columns[2].inset(PADDING * 0.5),
            ratio: scatters[0].inset(PADDING * 0.5),
            demapper: scatters[1].inset(PADDING * 0.5),
        }
    }

    /// Panel and control triggered by a click at `point`.
    ///
    /// The toggle flips the switch; the loss chart and the rays pause or
    /// resume.
    pub fn hit(&self, point: ScreenPoint) -> Option<(&'static str, Control)> {
        [
            (self.toggle, keys::TOGGLE),
            (self.loss, keys::LOSS),
            (self.rays, keys::RAYS),
        ]
        .into_iter()
        .find(|(rect, _)| rect.contains(point))
        .map(|(_, panel)| (panel, Control::Toggle))
    }
}

/// Build the whole frame for `board`.
///
/// `kpi_series` lists the KPI chart keys in display order; `slider` is the
/// slider range.
pub fn paint_dashboard(
    board: &Board,
    layout: &DashboardLayout,
    kpi_series: &[String],
    slider: Range,
    theme: &Theme,
) -> RenderList {
    let mut list = RenderList::new();
    list.push(RenderCommand::Rect {
        rect: layout.bounds,
        style: RectStyle::filled(theme.background),
    });
    text(
        &mut list,
        layout.header.inset(PADDING),
        "RAN Live Board",
        theme.text,
        16.0,
    );
    if board.text(keys::KPI) == Some(ERROR_TEXT) {
        list.push(RenderCommand::Text {
            position: ScreenPoint::new(layout.header.max.x - 160.0, layout.header.min.y + PADDING),
            text: format!("KPI replay: {ERROR_TEXT}"),
            style: TextStyle {
                color: Color::from_rgb8(255, 80, 80),
                size: theme.text_size,
            },
        });
    }

    for (index, (key, rect)) in kpi_series.iter().zip(&layout.kpi).enumerate() {
        let title = key.strip_prefix("kpi/").unwrap_or(key.as_str());
        list.extend(chart(
            board,
            key,
            title,
            *rect,
            AxisFormatter::TimeOfDay,
            theme.series_color(index),
            theme,
        ));
    }

    list.extend(slider_widget(board, layout.slider, slider, theme));
    list.extend(label_widget(
        board,
        keys::CLASSIFIER,
        "Classifier output",
        layout.classifier,
        theme,
    ));
    list.extend(label_widget(
        board,
        keys::SCHEDULING,
        "Scheduling policy",
        layout.scheduling,
        theme,
    ));
    list.extend(toggle_widget(board, layout.toggle, theme));
    list.extend(chart(
        board,
        keys::LOSS,
        "Loss vs Epoch",
        layout.loss,
        AxisFormatter::Default,
        theme.series_color(0),
        theme,
    ));
    list.extend(ray_widget(board, layout.rays, theme));
    list.extend(scatter_widget(
        board.points(keys::RATIO),
        "Ratio",
        layout.ratio,
        Color::from_rgb8(30, 144, 255),
        theme,
    ));
    list.extend(scatter_widget(
        board.points(keys::DEMAPPER),
        "Demapper",
        layout.demapper,
        Color::from_rgb8(227, 122, 49),
        theme,
    ));
    list
}

fn text(list: &mut RenderList, rect: ScreenRect, content: &str, color: Color, size: f32) {
    list.push(RenderCommand::Text {
        position: rect.min,
        text: content.to_string(),
        style: TextStyle { color, size },
    });
}

fn frame(list: &mut RenderList, rect: ScreenRect, title: &str, theme: &Theme) -> ScreenRect {
    list.push(RenderCommand::Rect {
        rect,
        style: RectStyle {
            fill: theme.background,
            stroke: theme.grid,
            stroke_width: 1.0,
            radius: 4.0,
        },
    });
    let (title_band, body) = rect.inset(PADDING * 0.5).split_top(TITLE_HEIGHT);
    text(list, title_band, title, theme.text, theme.text_size);
    body
}

fn error_overlay(list: &mut RenderList, board: &Board, panel: &str, rect: ScreenRect, theme: &Theme) {
    if board.text(panel) == Some(ERROR_TEXT) {
        text(
            list,
            rect.inset(PADDING),
            ERROR_TEXT,
            Color::from_rgb8(255, 80, 80),
            theme.text_size,
        );
    }
}

/// Line chart with a grid, y labels, and the chart's own x ticks.
fn chart(
    board: &Board,
    key: &str,
    title: &str,
    rect: ScreenRect,
    x_formatter: AxisFormatter,
    color: Color,
    theme: &Theme,
) -> RenderList {
    let mut list = RenderList::new();
    let body = frame(&mut list, rect, title, theme);
    let plot = ScreenRect::new(
        ScreenPoint::new(body.min.x + AXIS_GUTTER, body.min.y),
        ScreenPoint::new(body.max.x - PADDING, body.max.y - LABEL_HEIGHT),
    );
    error_overlay(&mut list, board, key, body, theme);

    let points = board.chart(key).map(|chart| chart.points()).unwrap_or_default();
    let viewport = Viewport::fit(&points);
    let (Some(viewport), true) = (viewport, plot.is_valid()) else {
        let placeholder = board
            .text(key)
            .filter(|text| !text.is_empty() && *text != ERROR_TEXT)
            .unwrap_or(NO_DATA);
        text(&mut list, plot.inset(PADDING), placeholder, theme.text, theme.text_size);
        return list;
    };
    let Some(transform) = Transform::new(viewport, plot) else {
        return list;
    };

    let mut grid = Vec::new();
    for tick in linear_ticks(viewport.y, GRID_LINES, &AxisFormatter::Default) {
        let Some(screen) = transform.data_to_screen(Point::new(viewport.x.min, tick.value)) else {
            continue;
        };
        grid.push(LineSegment::new(
            ScreenPoint::new(plot.min.x, screen.y),
            ScreenPoint::new(plot.max.x, screen.y),
        ));
        list.push(RenderCommand::Text {
            position: ScreenPoint::new(body.min.x, screen.y - theme.text_size * 0.6),
            text: tick.label,
            style: TextStyle {
                color: theme.text,
                size: theme.text_size * 0.8,
            },
        });
    }
    let x_ticks = board
        .chart(key)
        .map(|chart| chart.ticks().to_vec())
        .filter(|ticks| !ticks.is_empty())
        .unwrap_or_else(|| linear_ticks(viewport.x, GRID_LINES, &x_formatter));
    for tick in x_ticks {
        let Some(screen) = transform.data_to_screen(Point::new(tick.value, viewport.y.min)) else {
            continue;
        };
        if screen.x < plot.min.x - 0.5 || screen.x > plot.max.x + 0.5 {
            continue;
        }
        grid.push(LineSegment::new(
            ScreenPoint::new(screen.x, plot.min.y),
            ScreenPoint::new(screen.x, plot.max.y),
        ));
        list.push(RenderCommand::Text {
            position: ScreenPoint::new(screen.x - 30.0, plot.max.y + 2.0),
            text: tick.label,
            style: TextStyle {
                color: theme.text,
                size: theme.text_size * 0.7,
            },
        });
    }
    list.push(RenderCommand::LineSegments {
        segments: grid,
        style: LineStyle {
            color: theme.grid,
            width: 1.0,
        },
    });

    let mut segments = Vec::new();
    build_line_segments(&points, &transform, plot, &mut segments);
    list.push(RenderCommand::ClipRect(plot));
    list.push(RenderCommand::LineSegments {
        segments,
        style: LineStyle { color, width: 2.0 },
    });
    list.push(RenderCommand::ClipEnd);
    list
}

fn slider_widget(board: &Board, rect: ScreenRect, range: Range, theme: &Theme) -> RenderList {
    let mut list = RenderList::new();
    let body = frame(&mut list, rect, "RBs assigned", theme);
    let value = board.scalar(keys::RBS_ASSIGNED).unwrap_or(range.min);
    let track_y = body.min.y + body.height() * 0.5;
    let track = ScreenRect::new(
        ScreenPoint::new(body.min.x + PADDING, track_y - 3.0),
        ScreenPoint::new(body.max.x - PADDING * 6.0, track_y + 3.0),
    );
    if track.is_valid() {
        list.push(RenderCommand::Rect {
            rect: track,
            style: RectStyle::filled(theme.grid).rounded(3.0),
        });
        let filled_x = track.min.x + track.width() * range.fraction(value) as f32;
        list.push(RenderCommand::Rect {
            rect: ScreenRect::new(track.min, ScreenPoint::new(filled_x, track.max.y)),
            style: RectStyle::filled(Color::from_rgb8(0, 0, 255)).rounded(3.0),
        });
        list.push(RenderCommand::Points {
            points: vec![ScreenPoint::new(filled_x, track_y)],
            style: MarkerStyle {
                color: theme.text,
                size: 12.0,
                shape: MarkerShape::Circle,
            },
        });
    }
    list.push(RenderCommand::Text {
        position: ScreenPoint::new(body.max.x - PADDING * 5.0, track_y - theme.text_size * 0.6),
        text: AxisFormatter::Default.format(value),
        style: TextStyle {
            color: theme.text,
            size: theme.text_size,
        },
    });
    error_overlay(&mut list, board, keys::RBS_ASSIGNED, body, theme);
    list
}

fn label_widget(
    board: &Board,
    key: &str,
    title: &str,
    rect: ScreenRect,
    theme: &Theme,
) -> RenderList {
    let mut list = RenderList::new();
    let body = frame(&mut list, rect, title, theme);
    let value = board.text(key).unwrap_or_default();
    text(&mut list, body.inset(PADDING), value, theme.text, theme.text_size * 1.4);
    list
}

fn toggle_widget(board: &Board, rect: ScreenRect, theme: &Theme) -> RenderList {
    let mut list = RenderList::new();
    let body = frame(&mut list, rect, "Switch", theme);
    let active = board.scalar(keys::TOGGLE).is_some_and(|value| value > 0.5);
    let track = ScreenRect::new(
        ScreenPoint::new(body.min.x + PADDING, body.min.y + PADDING),
        ScreenPoint::new(body.min.x + PADDING + 44.0, body.min.y + PADDING + 22.0),
    );
    list.push(RenderCommand::Rect {
        rect: track,
        style: RectStyle::filled(if active { theme.toggle_on } else { theme.toggle_off })
            .rounded(11.0),
    });
    let knob_x = if active { track.max.x - 11.0 } else { track.min.x + 11.0 };
    list.push(RenderCommand::Points {
        points: vec![ScreenPoint::new(knob_x, track.min.y + 11.0)],
        style: MarkerStyle {
            color: Color::WHITE,
            size: 18.0,
            shape: MarkerShape::Circle,
        },
    });
    let label = board.text(keys::TOGGLE).unwrap_or("Off");
    list.push(RenderCommand::Text {
        position: ScreenPoint::new(track.max.x + PADDING, track.min.y + 2.0),
        text: label.to_string(),
        style: TextStyle {
            color: theme.text,
            size: theme.text_size * 1.2,
        },
    });
    list
}

fn ray_widget(board: &Board, rect: ScreenRect, theme: &Theme) -> RenderList {
    let mut list = RenderList::new();
    let body = frame(&mut list, rect, "Ray tracing", theme);
    error_overlay(&mut list, board, keys::RAYS, body, theme);
    let scene = body.inset(PADDING);
    let Some(transform) = Transform::unit(scene) else {
        return list;
    };

    list.push(RenderCommand::ClipRect(scene));
    for line in board.lines(keys::RAY_LINES) {
        let mut segments = Vec::new();
        build_line_segments(&line.points, &transform, scene, &mut segments);
        list.push(RenderCommand::LineSegments {
            segments,
            style: LineStyle {
                color: theme.ray,
                width: line.width,
            },
        });
    }
    for (key, color, size, shape) in [
        (keys::RAY_TRANSMITTERS, Color::from_rgb8(255, 0, 0), 12.0, MarkerShape::Circle),
        (keys::RAY_RECEIVERS, Color::from_rgb8(0, 128, 0), 10.0, MarkerShape::Square),
        (keys::RAY_PARTICLES, theme.particle, 8.0, MarkerShape::Circle),
    ] {
        let mut points = Vec::new();
        build_scatter_points(board.points(key), &transform, scene, &mut points);
        list.push(RenderCommand::Points {
            points,
            style: MarkerStyle { color, size, shape },
        });
    }
    list.push(RenderCommand::ClipEnd);
    list
}

fn scatter_widget(
    points: &[Point],
    title: &str,
    rect: ScreenRect,
    color: Color,
    theme: &Theme,
) -> RenderList {
    let mut list = RenderList::new();
    let body = frame(&mut list, rect, title, theme);
    let limit = Range::new(-CONSTELLATION_LIMIT, CONSTELLATION_LIMIT);
    let plot = body.inset(PADDING);
    let Some(transform) = Transform::new(Viewport::new(limit, limit), plot) else {
        return list;
    };
    let mut screen = Vec::new();
    build_scatter_points(points, &transform, plot, &mut screen);
    list.push(RenderCommand::Points {
        points: screen,
        style: MarkerStyle {
            color,
            size: 6.0,
            shape: MarkerShape::Circle,
        },
    });
    list
}
