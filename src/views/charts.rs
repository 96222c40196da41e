use super::{error_banner, heading, LOADING};
use crate::charts::{pipeline_axis_tick, pipeline_axis_ticks, ChartView, PipelineBar, StageSlice};
use crate::format::format_currency;

pub const PIPELINE_TITLE: &str = "Pipeline by Month";
pub const STAGES_TITLE: &str = "Open Opportunities by Stage";

const BAR_WIDTH: usize = 40;
const AXIS_STEPS: usize = 4;

/// Horizontal bars, one per month, scaled to the top axis tick
pub fn render_bar_chart(view: &ChartView<PipelineBar>) -> String {
    let mut lines = vec![heading(PIPELINE_TITLE)];

    match view {
        ChartView::Loading => lines.push(LOADING.to_string()),
        ChartView::Failed(error) => lines.push(error_banner(error)),
        ChartView::Empty(message) => lines.push(message.to_string()),
        ChartView::Ready(bars) => {
            let ticks = pipeline_axis_ticks(bars, AXIS_STEPS);
            let scale = ticks.last().copied().unwrap_or(0.0);

            for bar in bars {
                let len = if scale > 0.0 {
                    (bar.total.max(0.0) / scale * BAR_WIDTH as f64).round() as usize
                } else {
                    0
                };
                lines.push(format!(
                    "{:<8} |{:<width$} {}",
                    bar.label,
                    "#".repeat(len),
                    format_currency(bar.total),
                    width = BAR_WIDTH
                ));
            }

            let labels: Vec<String> = ticks.iter().map(|t| pipeline_axis_tick(*t)).collect();
            lines.push(format!("{:<8} +{}", "", "-".repeat(BAR_WIDTH)));
            lines.push(format!("{:<8}  {}", "", labels.join(" .. ")));
        }
    }

    lines.join("\n")
}

/// One legend line per slice: `label`, count, color
pub fn render_pie_chart(view: &ChartView<StageSlice>) -> String {
    let mut lines = vec![heading(STAGES_TITLE)];

    match view {
        ChartView::Loading => lines.push(LOADING.to_string()),
        ChartView::Failed(error) => lines.push(error_banner(error)),
        ChartView::Empty(message) => lines.push(message.to_string()),
        ChartView::Ready(slices) => {
            for slice in slices {
                lines.push(format!(
                    "* {:<32} {:>5}  {}",
                    slice.label(),
                    slice.value,
                    slice.color
                ));
            }
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{stage_slices, stage_view, EMPTY_STAGES_MESSAGE};
    use crate::fetch::FetchState;
    use crate::models::StageData;

    #[test]
    fn test_bar_chart_scales_to_axis() {
        let bars = vec![
            PipelineBar { label: "Jan 2025".into(), total: 40_000.0, count: 2 },
            PipelineBar { label: "Feb 2025".into(), total: 20_000.0, count: 1 },
        ];
        let text = render_bar_chart(&ChartView::Ready(bars));

        assert!(text.contains(&format!("Jan 2025 |{} $40,000", "#".repeat(BAR_WIDTH))));
        assert!(text.contains("$0K .. $10K"));
        assert!(text.contains("$40K"));
    }

    #[test]
    fn test_empty_stage_chart_shows_message_only() {
        let mut state: FetchState<Vec<StageData>> = FetchState::default();
        state.succeed(Vec::new());

        let text = render_pie_chart(&stage_view(&state));
        assert!(text.ends_with(EMPTY_STAGES_MESSAGE));
        assert!(!text.contains('*'));
    }

    #[test]
    fn test_pie_legend() {
        let slices = stage_slices(&[
            StageData { stage_name: "Prospecting".into(), count: 3, total_amount: 0.0 },
            StageData { stage_name: "Negotiation/Review".into(), count: 1, total_amount: 0.0 },
        ]);
        let text = render_pie_chart(&ChartView::Ready(slices));
        assert!(text.contains("Prospecting 75%"));
        assert!(text.contains("Negotiation/Review 25%"));
        assert!(text.contains("#0088FE"));
    }
}
