//! UI Components
//!
//! Leptos components shared by the pages.

pub mod chart;
pub mod kpi_card;
pub mod loading;
pub mod nav;
pub mod table;

pub use chart::{BarChart, PieChart};
pub use kpi_card::KpiCards;
pub use loading::{CardSkeleton, ErrorBanner, Loading};
pub use nav::Nav;
pub use table::{FilterBar, OpportunityTable, PaginationBar};
