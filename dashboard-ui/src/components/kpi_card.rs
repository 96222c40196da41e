//! KPI Card Components
//!
//! The dashboard's header row: one card per KPI built by the core.

use leptos::*;

use pipeline_dashboard::fetch::FetchState;
use pipeline_dashboard::kpi::{kpi_cards, KpiCard};
use pipeline_dashboard::models::KpiSummary;

use super::{CardSkeleton, ErrorBanner};

/// Number of cards in the KPI row
const CARD_COUNT: usize = 5;

#[component]
pub fn KpiCards(#[prop(into)] state: Signal<FetchState<KpiSummary>>) -> impl IntoView {
    view! {
        <div class="space-y-4">
            {move || state.get().error.map(|message| view! { <ErrorBanner message=message /> })}

            <div class="grid grid-cols-2 md:grid-cols-5 gap-4">
                {move || {
                    let state = state.get();
                    if state.loading {
                        (0..CARD_COUNT).map(|_| view! { <CardSkeleton /> }).collect_view()
                    } else if let Some(summary) = state.data {
                        kpi_cards(&summary)
                            .into_iter()
                            .map(|card| view! { <KpiCardView card=card /> })
                            .collect_view()
                    } else {
                        view! {}.into_view()
                    }
                }}
            </div>
        </div>
    }
}

#[component]
fn KpiCardView(card: KpiCard) -> impl IntoView {
    let value = card.display_value();

    view! {
        <div class="bg-gray-800 rounded-lg p-4 border border-gray-700">
            <span class="text-gray-400 text-sm">{card.title}</span>
            <div class="text-3xl font-bold mt-2">{value}</div>
            {card.subtitle.map(|subtitle| view! {
                <div class="text-gray-500 text-xs mt-1">{subtitle}</div>
            })}
        </div>
    }
}
