use super::{error_banner, LOADING};
use crate::fetch::FetchState;
use crate::kpi::{kpi_cards, KpiCard};
use crate::models::KpiSummary;

/// `Open Pipeline         $480,000  12 open deals`
pub fn render_kpi_card(card: &KpiCard) -> String {
    let line = format!("{:<20} {:>14}", card.title, card.display_value());
    match &card.subtitle {
        Some(subtitle) => format!("{}  {}", line, subtitle),
        None => line,
    }
}

pub fn render_kpis(state: &FetchState<KpiSummary>) -> String {
    let mut lines = Vec::new();

    if let Some(error) = &state.error {
        lines.push(error_banner(error));
    }

    match &state.data {
        Some(summary) => lines.extend(kpi_cards(summary).iter().map(render_kpi_card)),
        None if state.loading => lines.push(LOADING.to_string()),
        None => {}
    }

    lines.join("\n")
}
