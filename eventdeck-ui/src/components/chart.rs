//! Chart Components
//!
//! Bar and timeline charts drawn on an HTML5 canvas. Colors come from a
//! [`ChartPalette`] built once at the root from the display mode.

use chrono::{DateTime, Utc};
use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::state::{DisplayMode, Priority};

/// Colors used by every chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPalette {
    pub background: &'static str,
    pub grid: &'static str,
    pub text: &'static str,
    pub series: [&'static str; 6],
}

impl ChartPalette {
    pub const LIGHT: ChartPalette = ChartPalette {
        background: "#ffffff",
        grid: "#e5e7eb",  // gray-200
        text: "#4b5563",  // gray-600
        series: ["#0ea5e9", "#22c55e", "#f59e0b", "#a855f7", "#ef4444", "#14b8a6"],
    };

    pub const DARK: ChartPalette = ChartPalette {
        background: "#1f2937", // gray-800
        grid: "#374151",       // gray-700
        text: "#9ca3af",       // gray-400
        series: ["#38bdf8", "#4ade80", "#fbbf24", "#c084fc", "#f87171", "#2dd4bf"],
    };

    pub fn for_mode(mode: DisplayMode) -> Self {
        match mode {
            DisplayMode::Light => Self::LIGHT,
            DisplayMode::Dark => Self::DARK,
        }
    }

    /// Series color for index `idx`, cycling
    pub fn color(&self, idx: usize) -> &'static str {
        self.series[idx % self.series.len()]
    }
}

/// Fixed color per priority so charts and badges agree
pub fn priority_color(priority: Priority) -> &'static str {
    match priority {
        Priority::Emergency => "#7f1d1d",
        Priority::Alert => "#991b1b",
        Priority::Critical => "#b91c1c",
        Priority::Error => "#ef4444",
        Priority::Warning => "#eab308",
        Priority::Notice => "#3b82f6",
        Priority::Informational => "#14b8a6",
        Priority::Debug | Priority::Unknown => "#6b7280",
    }
}

/// One bar of a bar chart
#[derive(Debug, Clone, PartialEq)]
pub struct BarDatum {
    pub label: String,
    pub value: i64,
    /// Overrides the palette's series color
    pub color: Option<&'static str>,
}

/// Geometry of a bar inside the plot area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub x: f64,
    pub width: f64,
    pub height: f64,
}

/// Smallest 1, 2 or 5 times a power of ten that is at least `value`
pub fn nice_max(value: i64) -> i64 {
    if value <= 1 {
        return 1;
    }
    let mut magnitude = 1_i64;
    loop {
        for step in [1, 2, 5] {
            let candidate = step * magnitude;
            if candidate >= value {
                return candidate;
            }
        }
        magnitude *= 10;
    }
}

/// Lay out equally spaced bars scaled against `max`
pub fn layout_bars(values: &[i64], max: i64, width: f64, height: f64, gap: f64) -> Vec<Bar> {
    if values.is_empty() {
        return Vec::new();
    }
    let slot = width / values.len() as f64;
    let bar_width = (slot - gap).max(1.0);
    let max = max.max(1) as f64;

    values
        .iter()
        .enumerate()
        .map(|(i, value)| Bar {
            x: i as f64 * slot + (slot - bar_width) / 2.0,
            width: bar_width,
            height: (*value).clamp(0, max as i64) as f64 / max * height,
        })
        .collect()
}

const MARGIN_LEFT: f64 = 50.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 40.0;
const GRID_LINES: i64 = 4;

/// Bar chart with one bar per datum
#[component]
pub fn BarChart(
    #[prop(into)] title: String,
    #[prop(into)] data: Signal<Vec<BarDatum>>,
    #[prop(into)] palette: Signal<ChartPalette>,
) -> impl IntoView {
    let canvas_ref = create_node_ref::<html::Canvas>();

    create_effect(move |_| {
        let data = data.get();
        let palette = palette.get();
        if let Some(canvas) = canvas_ref.get() {
            draw_bars(&canvas, &data, &palette);
        }
    });

    view! {
        <div class="rounded-xl p-4 shadow bg-white dark:bg-gray-800">
            <h3 class="text-sm font-semibold uppercase tracking-wide mb-2 text-gray-500">{title}</h3>
            <canvas node_ref=canvas_ref width="600" height="300" class="w-full h-64" />
        </div>
    }
}

/// Line chart of event counts over time
#[component]
pub fn TimelineChart(
    #[prop(into)] title: String,
    #[prop(into)] points: Signal<Vec<(DateTime<Utc>, i64)>>,
    #[prop(into)] palette: Signal<ChartPalette>,
) -> impl IntoView {
    let canvas_ref = create_node_ref::<html::Canvas>();

    create_effect(move |_| {
        let points = points.get();
        let palette = palette.get();
        if let Some(canvas) = canvas_ref.get() {
            draw_timeline(&canvas, &points, &palette);
        }
    });

    view! {
        <div class="rounded-xl p-4 shadow bg-white dark:bg-gray-800">
            <h3 class="text-sm font-semibold uppercase tracking-wide mb-2 text-gray-500">{title}</h3>
            <canvas node_ref=canvas_ref width="1200" height="300" class="w-full h-64" />
        </div>
    }
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
}

/// Clear the canvas and draw the horizontal grid with value labels
///
/// Returns the plot area as (width, height).
fn draw_frame(
    ctx: &CanvasRenderingContext2d,
    canvas: &HtmlCanvasElement,
    max: i64,
    palette: &ChartPalette,
) -> (f64, f64) {
    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    let plot_width = width - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = height - MARGIN_TOP - MARGIN_BOTTOM;

    ctx.set_fill_style(&palette.background.into());
    ctx.fill_rect(0.0, 0.0, width, height);

    ctx.set_stroke_style(&palette.grid.into());
    ctx.set_line_width(1.0);
    ctx.set_font("12px sans-serif");

    for i in 0..=GRID_LINES {
        let y = MARGIN_TOP + (i as f64 / GRID_LINES as f64) * plot_height;
        ctx.begin_path();
        ctx.move_to(MARGIN_LEFT, y);
        ctx.line_to(width - MARGIN_RIGHT, y);
        ctx.stroke();

        let value = max - i * max / GRID_LINES;
        ctx.set_fill_style(&palette.text.into());
        let _ = ctx.fill_text(&value.to_string(), 5.0, y + 4.0);
    }

    (plot_width, plot_height)
}

fn draw_empty(ctx: &CanvasRenderingContext2d, canvas: &HtmlCanvasElement, palette: &ChartPalette) {
    ctx.set_fill_style(&palette.text.into());
    ctx.set_font("16px sans-serif");
    let _ = ctx.fill_text(
        "No events yet",
        canvas.width() as f64 / 2.0 - 50.0,
        canvas.height() as f64 / 2.0,
    );
}

fn draw_bars(canvas: &HtmlCanvasElement, data: &[BarDatum], palette: &ChartPalette) {
    let Some(ctx) = context_2d(canvas) else {
        return;
    };

    let max = nice_max(data.iter().map(|d| d.value).max().unwrap_or(0));
    let (plot_width, plot_height) = draw_frame(&ctx, canvas, max, palette);

    if data.is_empty() {
        draw_empty(&ctx, canvas, palette);
        return;
    }

    let values: Vec<i64> = data.iter().map(|d| d.value).collect();
    let bars = layout_bars(&values, max, plot_width, plot_height, 12.0);
    let baseline = MARGIN_TOP + plot_height;

    for (idx, (bar, datum)) in bars.iter().zip(data).enumerate() {
        let color = datum.color.unwrap_or_else(|| palette.color(idx));
        ctx.set_fill_style(&color.into());
        ctx.fill_rect(MARGIN_LEFT + bar.x, baseline - bar.height, bar.width, bar.height);

        ctx.set_fill_style(&palette.text.into());
        ctx.set_font("11px sans-serif");
        let label: String = datum.label.chars().take(14).collect();
        let _ = ctx.fill_text(&label, MARGIN_LEFT + bar.x, baseline + 16.0);
        let _ = ctx.fill_text(
            &datum.value.to_string(),
            MARGIN_LEFT + bar.x,
            baseline - bar.height - 4.0,
        );
    }
}

fn draw_timeline(canvas: &HtmlCanvasElement, points: &[(DateTime<Utc>, i64)], palette: &ChartPalette) {
    let Some(ctx) = context_2d(canvas) else {
        return;
    };

    let max = nice_max(points.iter().map(|(_, c)| *c).max().unwrap_or(0));
    let (plot_width, plot_height) = draw_frame(&ctx, canvas, max, palette);

    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        draw_empty(&ctx, canvas, palette);
        return;
    };

    let start = first.0.timestamp_millis() as f64;
    let span = ((last.0.timestamp_millis() as f64) - start).max(1.0);
    let scale_x = |t: &DateTime<Utc>| {
        if points.len() == 1 {
            MARGIN_LEFT + plot_width / 2.0
        } else {
            MARGIN_LEFT + (t.timestamp_millis() as f64 - start) / span * plot_width
        }
    };
    let scale_y = |c: i64| MARGIN_TOP + plot_height - (c as f64 / max as f64) * plot_height;

    let color = palette.color(0);
    ctx.set_stroke_style(&color.into());
    ctx.set_line_width(2.0);
    ctx.begin_path();
    for (i, (time, count)) in points.iter().enumerate() {
        let (x, y) = (scale_x(time), scale_y(*count));
        if i == 0 {
            ctx.move_to(x, y);
        } else {
            ctx.line_to(x, y);
        }
    }
    ctx.stroke();

    ctx.set_fill_style(&color.into());
    for (time, count) in points {
        ctx.begin_path();
        let _ = ctx.arc(scale_x(time), scale_y(*count), 3.0, 0.0, std::f64::consts::PI * 2.0);
        ctx.fill();
    }

    ctx.set_fill_style(&palette.text.into());
    ctx.set_font("12px sans-serif");
    let baseline = canvas.height() as f64 - 10.0;
    let _ = ctx.fill_text(&first.0.format("%H:%M").to_string(), MARGIN_LEFT, baseline);
    if points.len() > 1 {
        let _ = ctx.fill_text(
            &last.0.format("%H:%M").to_string(),
            MARGIN_LEFT + plot_width - 30.0,
            baseline,
        );
    }
}
