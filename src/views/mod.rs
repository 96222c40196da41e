//! Terminal Views
//!
//! Plain-text rendering of the dashboard screens. Every function here is pure:
//! it takes fetch state or view-models and returns the text to print.

pub mod charts;
pub mod kpi;
pub mod pages;
pub mod table;

pub use charts::{render_bar_chart, render_pie_chart};
pub use kpi::{render_kpi_card, render_kpis};
pub use pages::{render_dashboard, render_loading, render_login, render_nav, render_opportunities};
pub use table::{render_filter_bar, render_pagination, render_table};

/// Spinner stand-in
pub const LOADING: &str = "Loading...";

/// Inline error shown next to the affected view
pub fn error_banner(message: &str) -> String {
    format!("! {}", message)
}

fn heading(title: &str) -> String {
    format!("{}\n{}", title, "=".repeat(title.chars().count()))
}
