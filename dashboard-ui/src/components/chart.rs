//! Chart Components
//!
//! Pipeline bar chart and stage pie chart drawn as inline SVG from the core
//! chart view-models.

use leptos::*;
use std::f64::consts::{FRAC_PI_2, TAU};

use pipeline_dashboard::charts::{
    pipeline_axis_tick, pipeline_axis_ticks, ChartView, PipelineBar, StageSlice,
};

use super::{ErrorBanner, Loading};

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 300.0;
const MARGIN_LEFT: f64 = 64.0;
const MARGIN_TOP: f64 = 12.0;
const MARGIN_BOTTOM: f64 = 40.0;
const Y_STEPS: usize = 4;

const PIE_SIZE: f64 = 300.0;
const PIE_RADIUS: f64 = 120.0;

#[component]
pub fn BarChart(#[prop(into)] chart: Signal<ChartView<PipelineBar>>) -> impl IntoView {
    move || match chart.get() {
        ChartView::Loading => view! { <Loading /> }.into_view(),
        ChartView::Failed(message) => view! { <ErrorBanner message=message /> }.into_view(),
        ChartView::Empty(message) => view! { <p class="text-gray-400 text-sm">{message}</p> }.into_view(),
        ChartView::Ready(bars) => bar_svg(bars).into_view(),
    }
}

fn bar_svg(bars: Vec<PipelineBar>) -> impl IntoView {
    let ticks = pipeline_axis_ticks(&bars, Y_STEPS);
    let max = ticks.last().copied().unwrap_or(0.0);
    let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let slot = (WIDTH - MARGIN_LEFT) / bars.len().max(1) as f64;

    let tick_lines = ticks
        .into_iter()
        .map(|tick| {
            let y = MARGIN_TOP + plot_height - scale(tick, max, plot_height);
            view! {
                <g>
                    <line x1=MARGIN_LEFT x2=WIDTH y1=y y2=y stroke="#374151" />
                    <text x=MARGIN_LEFT - 8.0 y=y + 4.0 text-anchor="end" fill="#9CA3AF" font-size="12">
                        {pipeline_axis_tick(tick)}
                    </text>
                </g>
            }
        })
        .collect_view();

    let bar_rects = bars
        .into_iter()
        .enumerate()
        .map(|(idx, bar)| {
            let height = scale(bar.total, max, plot_height);
            let x = MARGIN_LEFT + slot * idx as f64 + slot * 0.15;
            let y = MARGIN_TOP + plot_height - height;
            let tooltip = bar.tooltip();
            view! {
                <g>
                    <rect x=x y=y width=slot * 0.7 height=height fill="#0088FE">
                        <title>{tooltip}</title>
                    </rect>
                    <text
                        x=x + slot * 0.35
                        y=HEIGHT - MARGIN_BOTTOM + 18.0
                        text-anchor="middle"
                        fill="#9CA3AF"
                        font-size="11"
                    >
                        {bar.label}
                    </text>
                </g>
            }
        })
        .collect_view();

    view! {
        <svg viewBox=format!("0 0 {} {}", WIDTH, HEIGHT) class="w-full h-64 md:h-80">
            {tick_lines}
            {bar_rects}
        </svg>
    }
}

#[component]
pub fn PieChart(#[prop(into)] chart: Signal<ChartView<StageSlice>>) -> impl IntoView {
    move || match chart.get() {
        ChartView::Loading => view! { <Loading /> }.into_view(),
        ChartView::Failed(message) => view! { <ErrorBanner message=message /> }.into_view(),
        ChartView::Empty(message) => view! { <p class="text-gray-400 text-sm">{message}</p> }.into_view(),
        ChartView::Ready(slices) => pie_svg(slices).into_view(),
    }
}

fn pie_svg(slices: Vec<StageSlice>) -> impl IntoView {
    let center = PIE_SIZE / 2.0;
    let paths = slice_paths(&slices, center, center, PIE_RADIUS);

    let wedges = slices
        .iter()
        .zip(paths)
        .map(|(slice, d)| {
            let label = slice.label();
            view! {
                <path d=d fill=slice.color stroke="#111827">
                    <title>{label}</title>
                </path>
            }
        })
        .collect_view();

    let legend = slices
        .into_iter()
        .map(|slice| {
            let label = slice.label();
            view! {
                <div class="flex items-center space-x-2">
                    <div
                        class="w-3 h-3 rounded-full"
                        style=format!("background-color: {}", slice.color)
                    />
                    <span class="text-sm text-gray-300">{label}</span>
                </div>
            }
        })
        .collect_view();

    view! {
        <div class="flex flex-col md:flex-row items-center gap-6">
            <svg viewBox=format!("0 0 {} {}", PIE_SIZE, PIE_SIZE) class="w-64 h-64">
                {wedges}
            </svg>
            <div class="flex flex-col gap-2">{legend}</div>
        </div>
    }
}

fn scale(value: f64, max: f64, extent: f64) -> f64 {
    if max <= 0.0 {
        0.0
    } else {
        value / max * extent
    }
}

/// SVG path per slice, clockwise from twelve o'clock
fn slice_paths(slices: &[StageSlice], cx: f64, cy: f64, r: f64) -> Vec<String> {
    let whole: u64 = slices.iter().map(|s| s.value).sum();
    let point = |angle: f64| (cx + r * angle.cos(), cy + r * angle.sin());

    let mut start = -FRAC_PI_2;
    slices
        .iter()
        .map(|slice| {
            let fraction = if whole == 0 {
                0.0
            } else {
                slice.value as f64 / whole as f64
            };

            // A lone slice is the whole disc; one arc cannot close on itself
            if fraction >= 1.0 {
                return format!(
                    "M {:.2} {:.2} A {r:.2} {r:.2} 0 1 1 {:.2} {:.2} A {r:.2} {r:.2} 0 1 1 {:.2} {:.2} Z",
                    cx,
                    cy - r,
                    cx,
                    cy + r,
                    cx,
                    cy - r,
                    r = r
                );
            }

            let end = start + fraction * TAU;
            let (x0, y0) = point(start);
            let (x1, y1) = point(end);
            let large_arc = u8::from(fraction > 0.5);
            start = end;

            format!(
                "M {:.2} {:.2} L {:.2} {:.2} A {r:.2} {r:.2} 0 {} 1 {:.2} {:.2} Z",
                cx,
                cy,
                x0,
                y0,
                large_arc,
                x1,
                y1,
                r = r
            )
        })
        .collect()
}
