//! Chart View Models
//!
//! Turns fetched aggregates into what the pipeline bar chart and the stage pie
//! chart draw. Renderers (terminal and browser) only lay these out.

use crate::fetch::FetchState;
use crate::format::{format_currency, format_thousands, month_label};
use crate::models::{PipelineData, StageData};

/// Slice colors, assigned round-robin by index
pub const PALETTE: [&str; 8] = [
    "#0088FE", "#00C49F", "#FFBB28", "#FF8042", "#8884D8", "#82CA9D", "#A4DE6C", "#D0ED57",
];

pub const EMPTY_PIPELINE_MESSAGE: &str = "No pipeline data available";
pub const EMPTY_STAGES_MESSAGE: &str = "No open opportunities by stage";

/// What a chart panel shows for a given fetch state
#[derive(Debug, Clone, PartialEq)]
pub enum ChartView<T> {
    Loading,
    Failed(String),
    Empty(&'static str),
    Ready(Vec<T>),
}

impl<T> ChartView<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, ChartView::Ready(_))
    }
}

/// One bar of the pipeline chart
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineBar {
    pub label: String,
    pub total: f64,
    pub count: u64,
}

impl PipelineBar {
    pub fn tooltip(&self) -> String {
        format!("{}: {}", self.label, format_currency(self.total))
    }
}

pub fn pipeline_bars(rows: &[PipelineData]) -> Vec<PipelineBar> {
    rows.iter()
        .map(|row| PipelineBar {
            label: month_label(row.month, row.year),
            total: row.total,
            count: row.count,
        })
        .collect()
}

/// Y-axis tick label of the pipeline chart
pub fn pipeline_axis_tick(value: f64) -> String {
    format_thousands(value)
}

/// Evenly spaced y-axis ticks from zero up to a rounded maximum.
pub fn pipeline_axis_ticks(bars: &[PipelineBar], steps: usize) -> Vec<f64> {
    let steps = steps.max(1);
    let max = bars.iter().map(|b| b.total).fold(0.0_f64, f64::max);
    if max <= 0.0 {
        return vec![0.0];
    }

    let raw_step = max / steps as f64;
    let magnitude = 10_f64.powf(raw_step.log10().floor());
    let step = (raw_step / magnitude).ceil() * magnitude;

    (0..=steps).map(|i| step * i as f64).collect()
}

/// One slice of the stage pie chart
#[derive(Debug, Clone, PartialEq)]
pub struct StageSlice {
    pub stage_name: String,
    pub value: u64,
    pub percent: u32,
    pub color: &'static str,
}

impl StageSlice {
    /// `{stageName} {percent}%`
    pub fn label(&self) -> String {
        format!("{} {}%", self.stage_name, self.percent)
    }
}

pub fn stage_slices(rows: &[StageData]) -> Vec<StageSlice> {
    let whole: u64 = rows.iter().map(|r| r.count).sum();

    rows.iter()
        .enumerate()
        .map(|(idx, row)| StageSlice {
            stage_name: row.stage_name.clone(),
            value: row.count,
            percent: if whole == 0 {
                0
            } else {
                (row.count as f64 / whole as f64 * 100.0).round() as u32
            },
            color: PALETTE[idx % PALETTE.len()],
        })
        .collect()
}

pub fn pipeline_view(state: &FetchState<Vec<PipelineData>>) -> ChartView<PipelineBar> {
    chart_view(state, EMPTY_PIPELINE_MESSAGE, pipeline_bars)
}

pub fn stage_view(state: &FetchState<Vec<StageData>>) -> ChartView<StageSlice> {
    chart_view(state, EMPTY_STAGES_MESSAGE, stage_slices)
}

fn chart_view<R, T>(
    state: &FetchState<Vec<R>>,
    empty_message: &'static str,
    build: impl Fn(&[R]) -> Vec<T>,
) -> ChartView<T> {
    if state.loading {
        return ChartView::Loading;
    }

    match (&state.data, &state.error) {
        (Some(rows), _) if !rows.is_empty() => ChartView::Ready(build(rows)),
        (_, Some(error)) => ChartView::Failed(error.clone()),
        _ => ChartView::Empty(empty_message),
    }
}
