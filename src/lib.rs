//! # Pipeline Dashboard
//!
//! Sales pipeline dashboard over a CRM backend proxy: KPI cards, a pipeline
//! bar chart, a stage pie chart and a filterable opportunity table.
//!
//! ## Layout
//!
//! The core compiles everywhere (including `wasm32` for the browser crate):
//!
//! - [`models`]: wire records returned by the backend
//! - [`format`]: currency/percent/date formatting
//! - [`filters`]: opportunity filter and pagination state
//! - [`charts`]: chart view-models
//! - [`kpi`]: KPI card definitions
//! - [`table`]: opportunity table rows
//! - [`fetch`]: `{data, loading, error}` state with the request-generation guard
//! - [`auth`]: the auth gate state machine
//!
//! With the `native` feature (default):
//!
//! - [`client`]: reqwest client for the backend proxy
//! - [`config`]: TOML + environment configuration
//! - [`app`]: root controller and pages driving the terminal views
//! - [`views`]: plain-text rendering
//! - [`demo`]: a local backend serving a generated dataset
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pipeline_dashboard::{App, Config, DashboardClient, Route, Session};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load_default();
//!     let session = Session::from_config(&config.api);
//!     let client = DashboardClient::new(&config.api, session)?;
//!
//!     let app = App::start(client, config.dashboard.clone()).await;
//!     println!("{}", app.render(Route::Dashboard).await);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod charts;
pub mod fetch;
pub mod filters;
pub mod format;
pub mod kpi;
pub mod models;
pub mod table;

#[cfg(feature = "native")]
pub mod app;
#[cfg(feature = "native")]
pub mod client;
#[cfg(feature = "native")]
pub mod config;
#[cfg(feature = "native")]
pub mod demo;
#[cfg(feature = "native")]
pub mod views;

// Re-export top-level types for convenience
pub use auth::AuthState;
pub use charts::{ChartView, PipelineBar, StageSlice};
pub use fetch::{FetchState, RequestTracker, Ticket, TrackedState};
pub use filters::{
    OpportunityFilters, OpportunityQuery, Pagination, SortDirection, SortField, StageFilter,
};
pub use format::ValueFormat;
pub use kpi::KpiCard;
pub use table::OpportunityRow;
pub use models::{
    AuthStatus, HealthStatus, KpiMetric, KpiSummary, Opportunity, OpportunityListResponse,
    PipelineData, StageData,
};

#[cfg(feature = "native")]
pub use fetch::Resource;

#[cfg(feature = "native")]
pub use app::{App, DashboardPage, OpportunityTablePage, Route, Screen};

#[cfg(feature = "native")]
pub use client::{ClientError, DashboardApi, DashboardClient, Session};

#[cfg(feature = "native")]
pub use config::{ApiConfig, Config, ConfigError, DashboardConfig, DemoConfig, LoggingConfig};

#[cfg(feature = "native")]
pub use demo::{build_router, serve, DemoError, DemoState};
