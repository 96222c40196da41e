//! Sales Pipeline Dashboard
//!
//! Browser frontend built with Leptos (WASM).
//!
//! # Features
//!
//! - Salesforce sign-in through the backend proxy
//! - KPI cards, pipeline-by-month and stage charts
//! - Filterable, sortable, paginated opportunity table
//!
//! # Architecture
//!
//! A client-side rendered (CSR) Leptos application. Data comes from the backend
//! proxy over HTTP with cookie credentials; formatting, filters, chart models
//! and the fetch state machine come from the `pipeline-dashboard` core.

use leptos::*;

mod api;
mod app;
mod components;
mod hooks;
mod pages;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
