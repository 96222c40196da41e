//! KPI Cards
//!
//! Card definitions for the dashboard header row.

use crate::format::{ValueFormat, PLACEHOLDER};
use crate::models::KpiSummary;

/// A single KPI card
#[derive(Debug, Clone, PartialEq)]
pub struct KpiCard {
    pub title: String,
    /// `None` renders as a placeholder
    pub value: Option<f64>,
    pub format: ValueFormat,
    pub subtitle: Option<String>,
}

impl KpiCard {
    pub fn new(title: impl Into<String>, value: Option<f64>, format: ValueFormat) -> Self {
        Self {
            title: title.into(),
            value,
            format,
            subtitle: None,
        }
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn display_value(&self) -> String {
        self.value
            .map(|v| self.format.apply(v))
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    }
}

/// Win rate by count over deals closed this quarter, one decimal.
pub fn win_rate(summary: &KpiSummary) -> Option<f64> {
    let closed = summary.won.count + summary.lost.count;
    if closed == 0 {
        return None;
    }
    let rate = summary.won.count as f64 / closed as f64 * 100.0;
    Some((rate * 10.0).round() / 10.0)
}

/// The dashboard's KPI row
pub fn kpi_cards(summary: &KpiSummary) -> Vec<KpiCard> {
    vec![
        KpiCard::new("Open Pipeline", Some(summary.open.total), ValueFormat::Currency)
            .subtitle(deal_count(summary.open.count, "open deal")),
        KpiCard::new("Avg Deal Size", summary.open.average, ValueFormat::Currency),
        KpiCard::new("Won This Quarter", Some(summary.won.total), ValueFormat::Currency)
            .subtitle(deal_count(summary.won.count, "deal")),
        KpiCard::new("Lost This Quarter", Some(summary.lost.total), ValueFormat::Currency)
            .subtitle(deal_count(summary.lost.count, "deal")),
        KpiCard::new("Win Rate", win_rate(summary), ValueFormat::Percent),
    ]
}

fn deal_count(count: u64, noun: &str) -> String {
    if count == 1 {
        format!("1 {}", noun)
    } else {
        format!("{} {}s", count, noun)
    }
}
