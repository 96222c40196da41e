//! Dashboard Page
//!
//! KPI cards, pipeline-by-month bar chart and open-opportunities-by-stage pie
//! chart. Each panel fetches on its own, so one failing leaves the others up.

use leptos::*;

use pipeline_dashboard::charts::{pipeline_view, stage_view};

use crate::api;
use crate::components::{BarChart, KpiCards, PieChart};
use crate::hooks::use_fetch;

/// Lookback of the pipeline chart, months
const PIPELINE_MONTHS: u32 = 12;

#[component]
pub fn Dashboard() -> impl IntoView {
    let kpis = use_fetch(|| (), |_| api::fetch_kpis());
    let pipeline = use_fetch(|| (), |_| api::fetch_pipeline(PIPELINE_MONTHS));
    let stages = use_fetch(|| (), |_| api::fetch_stages());

    let pipeline_chart = Signal::derive(move || pipeline.with(pipeline_view));
    let stage_chart = Signal::derive(move || stages.with(stage_view));

    view! {
        <div class="space-y-8">
            <div>
                <h1 class="text-3xl font-bold">"Dashboard"</h1>
                <p class="text-gray-400 mt-1">"Pipeline health at a glance"</p>
            </div>

            <KpiCards state=kpis />

            <div class="grid md:grid-cols-2 gap-8">
                <section class="bg-gray-800 rounded-xl p-6">
                    <h2 class="text-xl font-semibold mb-4">"Pipeline by Month"</h2>
                    <BarChart chart=pipeline_chart />
                </section>

                <section class="bg-gray-800 rounded-xl p-6">
                    <h2 class="text-xl font-semibold mb-4">"Open Opportunities by Stage"</h2>
                    <PieChart chart=stage_chart />
                </section>
            </div>
        </div>
    }
}
